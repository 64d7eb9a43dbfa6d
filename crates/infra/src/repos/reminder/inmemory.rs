use super::{reminders_to_storage, IReminderRepo, OwnerReminders};
use memento_domain::{Owner, Reminder};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Keeps the serialized lists, so the in-memory repo goes through the same
/// storage format as the persistent ones.
pub struct InMemoryReminderRepo {
    lists: Mutex<HashMap<Owner, Vec<serde_json::Value>>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds raw stored records, used to simulate data written by older versions
    pub fn with_raw(lists: Vec<OwnerReminders>) -> Self {
        Self {
            lists: Mutex::new(
                lists
                    .into_iter()
                    .map(|list| (list.owner, list.reminders))
                    .collect(),
            ),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn save(&self, owner: &Owner, reminders: &[Reminder]) -> anyhow::Result<()> {
        let values = reminders_to_storage(reminders)?;
        let mut lists = self.lists.lock().unwrap_or_else(PoisonError::into_inner);
        lists.insert(owner.clone(), values);
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<OwnerReminders>> {
        let lists = self.lists.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(lists
            .iter()
            .map(|(owner, reminders)| OwnerReminders {
                owner: owner.clone(),
                reminders: reminders.clone(),
            })
            .collect())
    }
}
