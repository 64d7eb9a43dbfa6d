mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

use memento_domain::{format_dt, parse_dt, Owner, Recipient, Reminder, Tz, ID};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// The raw, not yet validated, reminder list of one owner
#[derive(Debug, Clone)]
pub struct OwnerReminders {
    pub owner: Owner,
    pub reminders: Vec<serde_json::Value>,
}

/// Durable storage of reminder lists. A list is always written as a whole.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Overwrites every stored reminder of `owner` with `reminders`
    async fn save(&self, owner: &Owner, reminders: &[Reminder]) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<OwnerReminders>>;
}

/// Persisted shape of a single reminder.
/// `role_id` is only present for channel reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRaw {
    pub id: String,
    pub dt: String,
    pub text: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

#[derive(Error, Debug)]
pub enum MalformedReminder {
    #[error("Reminder is missing required fields: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("Reminder id `{0}` is malformed")]
    InvalidId(String),
    #[error("Reminder datetime is malformed: {0}")]
    InvalidDatetime(String),
    #[error("Channel reminder `{0}` has no valid role_id")]
    MissingRoleId(String),
}

impl ReminderRaw {
    pub fn from_domain(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.as_string(),
            dt: format_dt(&reminder.trigger_at),
            text: reminder.text.clone(),
            timezone: reminder.timezone.map(|tz| tz.name().to_string()),
            role_id: reminder.role_id().map(|id| id.as_string()),
        }
    }

    pub fn to_domain(self, owner: &Owner) -> Result<Reminder, MalformedReminder> {
        let id = self
            .id
            .parse::<ID>()
            .map_err(|_| MalformedReminder::InvalidId(self.id.clone()))?;
        let trigger_at =
            parse_dt(&self.dt).map_err(|e| MalformedReminder::InvalidDatetime(e.to_string()))?;
        let timezone = match self.timezone {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    warn!("Unknown timezone `{}` on stored reminder {}", name, id);
                    None
                }
            },
            None => None,
        };
        let recipient = match owner {
            Owner::User(user_id) => Recipient::User {
                user_id: user_id.clone(),
            },
            Owner::Channel(channel_id) => {
                let role_id = self
                    .role_id
                    .and_then(|role_id| role_id.parse::<ID>().ok())
                    .ok_or_else(|| MalformedReminder::MissingRoleId(id.as_string()))?;
                Recipient::Channel {
                    channel_id: channel_id.clone(),
                    role_id,
                }
            }
        };

        Ok(Reminder {
            id,
            recipient,
            trigger_at,
            text: self.text,
            timezone,
        })
    }
}

pub fn reminders_to_storage(reminders: &[Reminder]) -> anyhow::Result<Vec<serde_json::Value>> {
    reminders
        .iter()
        .map(|r| serde_json::to_value(ReminderRaw::from_domain(r)).map_err(anyhow::Error::new))
        .collect()
}

/// Converts every stored record on its own. Malformed records are logged and
/// skipped so that one bad entry never hides the rest of the list.
pub fn reminders_from_storage(owner: &Owner, values: Vec<serde_json::Value>) -> Vec<Reminder> {
    values
        .into_iter()
        .filter_map(|value| {
            match serde_json::from_value::<ReminderRaw>(value)
                .map_err(MalformedReminder::from)
                .and_then(|raw| raw.to_domain(owner))
            {
                Ok(reminder) => Some(reminder),
                Err(e) => {
                    error!(
                        "Error converting stored reminder for owner: {}. Error: {}",
                        owner, e
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn id(s: &str) -> ID {
        s.parse().unwrap()
    }

    #[test]
    fn user_reminders_are_stored_in_the_documented_shape() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        let reminder = Reminder::new_user(id("u1"), dt, "call mom".into(), Tz::US__Pacific);
        let value = serde_json::to_value(ReminderRaw::from_domain(&reminder)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": reminder.id.as_string(),
                "dt": "2024-01-01T13:00:00Z",
                "text": "call mom",
                "timezone": "US/Pacific",
            })
        );
    }

    #[test]
    fn channel_reminders_carry_role_id() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        let reminder = Reminder::new_channel(id("c1"), id("r1"), dt, "raid".into(), Tz::UTC);
        let values = reminders_to_storage(&[reminder.clone()]).unwrap();
        assert_eq!(values[0]["role_id"], json!("r1"));

        let loaded = reminders_from_storage(&Owner::Channel(id("c1")), values);
        assert_eq!(loaded, vec![reminder]);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let owner = Owner::User(id("u1"));
        let values = vec![
            json!({ "id": "aaaaaaaa", "dt": "2024-01-01T13:00:00Z", "text": "ok", "timezone": "UTC" }),
            json!({ "id": "bbbbbbbb", "text": "no dt" }),
            json!({ "id": "cccccccc", "dt": "tomorrow", "text": "bad dt" }),
            json!("not even an object"),
            json!({ "id": "dddddddd", "dt": "2024-01-01T14:00:00Z", "text": "legacy, no timezone" }),
        ];
        let loaded = reminders_from_storage(&owner, values);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, id("aaaaaaaa"));
        assert_eq!(loaded[0].timezone, Some(Tz::UTC));
        assert_eq!(loaded[1].id, id("dddddddd"));
        assert_eq!(loaded[1].timezone, None);
    }

    #[test]
    fn channel_records_without_role_are_skipped() {
        let owner = Owner::Channel(id("c1"));
        let values = vec![json!({ "id": "aaaaaaaa", "dt": "2024-01-01T13:00:00Z", "text": "x" })];
        assert!(reminders_from_storage(&owner, values).is_empty());
    }
}
