mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserSettingsRepo;
pub use postgres::PostgresUserSettingsRepo;

use memento_domain::{UserSettings, ID};

#[async_trait::async_trait]
pub trait IUserSettingsRepo: Send + Sync {
    /// Inserts or replaces the settings of `settings.user_id`
    async fn save(&self, settings: &UserSettings) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<UserSettings>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use memento_domain::Tz;

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryUserSettingsRepo::new();
        let user_id: ID = "u1".parse().unwrap();

        assert!(repo.find(&user_id).await.unwrap().is_none());

        let settings = UserSettings::new(user_id.clone(), Tz::US__Eastern);
        assert!(repo.save(&settings).await.is_ok());
        assert_eq!(repo.find(&user_id).await.unwrap(), Some(settings));

        // Save overwrites
        let settings = UserSettings::new(user_id.clone(), Tz::Europe__Oslo);
        assert!(repo.save(&settings).await.is_ok());
        assert_eq!(
            repo.find(&user_id).await.unwrap().map(|s| s.timezone),
            Some(Tz::Europe__Oslo)
        );
    }
}
