use super::IUserSettingsRepo;
use crate::repos::shared::inmemory_repo::*;
use memento_domain::{UserSettings, ID};

pub struct InMemoryUserSettingsRepo {
    settings: std::sync::Mutex<Vec<UserSettings>>,
}

impl InMemoryUserSettingsRepo {
    pub fn new() -> Self {
        Self {
            settings: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUserSettingsRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserSettingsRepo for InMemoryUserSettingsRepo {
    async fn save(&self, settings: &UserSettings) -> anyhow::Result<()> {
        save(settings, &self.settings);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<UserSettings>> {
        Ok(find(user_id, &self.settings))
    }
}
