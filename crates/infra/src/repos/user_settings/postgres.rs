use super::IUserSettingsRepo;
use memento_domain::{Tz, UserSettings, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresUserSettingsRepo {
    pool: PgPool,
}

impl PostgresUserSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserSettingsRaw {
    user_id: String,
    timezone: String,
}

#[async_trait::async_trait]
impl IUserSettingsRepo for PostgresUserSettingsRepo {
    async fn save(&self, settings: &UserSettings) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_settings(user_id, timezone)
            VALUES($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET timezone = EXCLUDED.timezone
            "#,
        )
        .bind(settings.user_id.as_str())
        .bind(settings.timezone.name())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<UserSettings>> {
        let raw = sqlx::query_as::<_, UserSettingsRaw>(
            r#"
            SELECT user_id, timezone FROM user_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let raw = match raw {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match raw.timezone.parse::<Tz>() {
            Ok(timezone) => Ok(Some(UserSettings::new(raw.user_id.parse()?, timezone))),
            Err(_) => {
                // Treated as if no preference was ever stored
                error!(
                    "Stored timezone `{}` of user: {} is unknown",
                    raw.timezone, raw.user_id
                );
                Ok(None)
            }
        }
    }
}
