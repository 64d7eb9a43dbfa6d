mod config;
mod confirmation;
mod reminder_store;
mod repos;
mod services;
mod system;

pub use config::{Config, WebhookSettings};
pub use confirmation::ConfirmationRegistry;
pub use reminder_store::ReminderStore;
pub use repos::{
    IReminderRepo, IUserSettingsRepo, InMemoryReminderRepo, OwnerReminders, Repos,
};
pub use services::*;
use memento_domain::{SimpleTimeParser, TimeExpressionParser};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::{info, warn};

#[derive(Clone)]
pub struct MementoContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub reminders: Arc<ReminderStore>,
    pub confirmations: Arc<ConfirmationRegistry>,
    pub messenger: Arc<dyn IMessenger>,
    pub time_parser: Arc<dyn TimeExpressionParser>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl MementoContext {
    fn new(repos: Repos, config: Config) -> anyhow::Result<Self> {
        let messenger: Arc<dyn IMessenger> = match &config.webhook {
            Some(webhook) => Arc::new(WebhookMessenger::new(webhook.clone())?),
            None => Arc::new(LogMessenger),
        };
        Ok(Self {
            reminders: Arc::new(ReminderStore::new(repos.reminders.clone())),
            confirmations: Arc::new(ConfirmationRegistry::new(config.confirmation_timeout)),
            messenger,
            time_parser: Arc::new(SimpleTimeParser),
            sys: Arc::new(RealSys {}),
            repos,
            config,
        })
    }

    /// Context without durable storage, every reminder is lost on restart
    pub fn create_inmemory() -> anyhow::Result<Self> {
        Self::new(Repos::create_inmemory(), Config::new())
    }

    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        Self::new(repos, Config::new())
    }
}

/// Will setup the infrastructure context given the environment
/// and load every stored reminder into the cache.
pub async fn setup_context() -> anyhow::Result<MementoContext> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    let ctx = match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(postgres_connection_string) => {
            info!(
                "{} env var was provided. Going to use postgres.",
                PSQL_CONNECTION_STRING
            );
            MementoContext::create(ContextParams {
                postgres_connection_string,
            })
            .await?
        }
        Err(_) => {
            warn!(
                "{} env var was not provided. Going to use inmemory infra, reminders will not survive a restart.",
                PSQL_CONNECTION_STRING
            );
            MementoContext::create_inmemory()?
        }
    };

    ctx.reminders.load().await?;
    Ok(ctx)
}
