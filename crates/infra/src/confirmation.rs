use chrono::{DateTime, Duration, Utc};
use memento_domain::{PendingReminder, Reminder};
use memento_utils::create_random_secret;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

const TOKEN_LEN: usize = 24;

/// Holds reminders between conversion and the owner's answer.
/// Nothing here is persisted, a restart drops every pending confirmation.
pub struct ConfirmationRegistry {
    timeout: Duration,
    pending: Mutex<HashMap<String, PendingReminder>>,
}

impl ConfirmationRegistry {
    pub fn new(timeout: std::time::Duration) -> Self {
        Self {
            timeout: Duration::from_std(timeout).unwrap_or_else(|_| Duration::seconds(30)),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn register(&self, reminder: Reminder, now: &DateTime<Utc>) -> PendingReminder {
        let pending = PendingReminder {
            token: create_random_secret(TOKEN_LEN),
            reminder,
            expires_at: *now + self.timeout,
        };

        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        map.retain(|_, p| p.expires_at > *now);
        if map.len() < before {
            debug!("Purged {} expired confirmations", before - map.len());
        }
        map.insert(pending.token.clone(), pending.clone());

        pending
    }

    /// Removes and returns the pending reminder of `token`. An expired
    /// confirmation is removed as well but never returned.
    pub fn take(&self, token: &str, now: &DateTime<Utc>) -> Option<PendingReminder> {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)?;

        if pending.expires_at <= *now {
            info!(
                "Confirmation for reminder {} expired at {}",
                pending.reminder.id, pending.expires_at
            );
            return None;
        }
        Some(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use memento_domain::Tz;

    fn reminder() -> Reminder {
        Reminder::new_user(
            "u1".parse().unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap(),
            "water the plants".into(),
            Tz::UTC,
        )
    }

    #[test]
    fn pending_reminders_can_be_taken_once() {
        let registry = ConfirmationRegistry::new(std::time::Duration::from_secs(30));
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        let pending = registry.register(reminder(), &now);
        assert_eq!(pending.token.len(), TOKEN_LEN);
        assert_eq!(pending.expires_at, now + Duration::seconds(30));

        let later = now + Duration::seconds(29);
        assert_eq!(registry.take(&pending.token, &later), Some(pending.clone()));
        assert_eq!(registry.take(&pending.token, &later), None);
    }

    #[test]
    fn expired_confirmations_are_rejected() {
        let registry = ConfirmationRegistry::new(std::time::Duration::from_secs(30));
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        let pending = registry.register(reminder(), &now);
        assert_eq!(
            registry.take(&pending.token, &(now + Duration::seconds(30))),
            None
        );
        assert_eq!(registry.take("unknown", &now), None);
    }

    #[test]
    fn registering_purges_expired_entries() {
        let registry = ConfirmationRegistry::new(std::time::Duration::from_secs(30));
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        let stale = registry.register(reminder(), &now);
        let later = now + Duration::minutes(5);
        registry.register(reminder(), &later);

        let map = registry.pending.lock().unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&stale.token));
    }
}
