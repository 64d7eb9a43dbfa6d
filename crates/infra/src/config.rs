use chrono_tz::Tz;
use memento_domain::TimezoneResolver;
use memento_utils::create_random_secret;
use std::{fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub url: String,
    /// Sent along every delivery so the receiver can verify the sender
    pub key: String,
    /// Upper bound for a single delivery request, including connecting
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Time the reminder scheduler sleeps between two sweeps
    pub sweep_interval: Duration,
    /// Delay between two consecutive sends in one delivery batch.
    /// Keeps a large batch of due reminders from bursting the outbound
    /// transport.
    pub delivery_pacing: Duration,
    /// How long a created reminder waits for the owner to accept it
    /// before it is treated as declined.
    pub confirmation_timeout: Duration,
    /// Timezone used for owners that never set a preference
    pub default_timezone: Tz,
    /// Outbound delivery endpoint. Deliveries are only logged when missing.
    pub webhook: Option<WebhookSettings>,
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env("PORT", 5000);
        let sweep_interval = Duration::from_secs(parse_env("MEMENTO_SWEEP_INTERVAL_SECS", 5));
        let delivery_pacing =
            Duration::from_millis(parse_env("MEMENTO_DELIVERY_PACING_MILLIS", 100));
        let confirmation_timeout =
            Duration::from_secs(parse_env("MEMENTO_CONFIRMATION_TIMEOUT_SECS", 30));

        let default_timezone = match std::env::var("MEMENTO_DEFAULT_TIMEZONE") {
            Ok(name) => match TimezoneResolver::resolve(&name) {
                Some(tz) => tz,
                None => {
                    warn!(
                        "The given MEMENTO_DEFAULT_TIMEZONE: {} is not valid, falling back to: {}.",
                        name,
                        TimezoneResolver::default_timezone().name()
                    );
                    TimezoneResolver::default_timezone()
                }
            },
            Err(_) => TimezoneResolver::default_timezone(),
        };

        let webhook = match std::env::var("MEMENTO_WEBHOOK_URL") {
            Ok(url) => {
                let key = match std::env::var("MEMENTO_WEBHOOK_KEY") {
                    Ok(key) => key,
                    Err(_) => {
                        info!("Did not find MEMENTO_WEBHOOK_KEY environment variable. Going to create one.");
                        let key = create_random_secret(16);
                        info!("Webhook key was generated and set to: {}", key);
                        key
                    }
                };
                let timeout =
                    Duration::from_secs(parse_env("MEMENTO_WEBHOOK_TIMEOUT_SECS", 10));
                Some(WebhookSettings { url, key, timeout })
            }
            Err(_) => {
                info!("Did not find MEMENTO_WEBHOOK_URL environment variable. Reminders will only be logged.");
                None
            }
        };

        Self {
            port,
            sweep_interval,
            delivery_pacing,
            confirmation_timeout,
            default_timezone,
            webhook,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T: FromStr + Display>(name: &str, default: T) -> T {
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}
