mod reminder;
mod shared;
mod user_settings;

pub use reminder::{
    reminders_from_storage, reminders_to_storage, IReminderRepo, InMemoryReminderRepo,
    MalformedReminder, OwnerReminders, PostgresReminderRepo, ReminderRaw,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user_settings::{IUserSettingsRepo, InMemoryUserSettingsRepo, PostgresUserSettingsRepo};

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub user_settings: Arc<dyn IUserSettingsRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            user_settings: Arc::new(PostgresUserSettingsRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            user_settings: Arc::new(InMemoryUserSettingsRepo::new()),
        }
    }
}
