use crate::repos::{reminders_from_storage, IReminderRepo};
use chrono::{DateTime, Utc};
use memento_domain::{Owner, Reminder, ID};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

type Cache = HashMap<Owner, Vec<Reminder>>;

/// In-memory view of every owner's reminders, written through to durable
/// storage on every mutation.
///
/// The cache lock is held across the durable write, which makes each
/// mutation one atomic read-modify-persist step. The cache is only updated
/// once the write succeeded, so after a mutating call returns the cache and
/// storage agree for that owner.
pub struct ReminderStore {
    repo: Arc<dyn IReminderRepo>,
    cache: Mutex<Cache>,
}

impl ReminderStore {
    pub fn new(repo: Arc<dyn IReminderRepo>) -> Self {
        Self {
            repo,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the cache with everything in durable storage. Returns the
    /// number of reminders loaded.
    pub async fn load(&self) -> anyhow::Result<usize> {
        let lists = self.repo.find_all().await?;

        let mut cache = HashMap::new();
        let mut count = 0;
        for list in lists {
            let reminders = reminders_from_storage(&list.owner, list.reminders);
            if reminders.is_empty() {
                continue;
            }
            count += reminders.len();
            cache.insert(list.owner, reminders);
        }

        let owners = cache.len();
        *self.cache.lock().await = cache;
        info!(
            "Loaded {} reminders for {} owners from storage",
            count, owners
        );
        Ok(count)
    }

    /// The cached reminders of `owner`, in no particular order
    pub async fn list_for(&self, owner: &Owner) -> Vec<Reminder> {
        self.cache
            .lock()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    /// Every channel reminder, in any channel, that mentions `role_id`
    pub async fn list_by_role(&self, role_id: &ID) -> Vec<Reminder> {
        self.cache
            .lock()
            .await
            .iter()
            .filter(|(owner, _)| matches!(owner, Owner::Channel(_)))
            .flat_map(|(_, reminders)| reminders.iter())
            .filter(|r| r.role_id() == Some(role_id))
            .cloned()
            .collect()
    }

    pub async fn find(&self, owner: &Owner, reminder_id: &ID) -> Option<Reminder> {
        self.cache
            .lock()
            .await
            .get(owner)
            .and_then(|reminders| reminders.iter().find(|r| r.id == *reminder_id))
            .cloned()
    }

    pub async fn count(&self) -> usize {
        self.cache.lock().await.values().map(|r| r.len()).sum()
    }

    /// Snapshot of every reminder due at `now`, across all owners
    pub async fn due(&self, now: &DateTime<Utc>) -> Vec<Reminder> {
        self.cache
            .lock()
            .await
            .values()
            .flat_map(|reminders| reminders.iter())
            .filter(|r| r.is_due(now))
            .cloned()
            .collect()
    }

    /// Appends `reminder` to its owner's list. A reminder with the same id
    /// (identical content) is replaced instead of duplicated.
    pub async fn add(&self, reminder: Reminder) -> anyhow::Result<()> {
        let owner = reminder.owner();
        let mut cache = self.cache.lock().await;
        let mut reminders = cache.get(&owner).cloned().unwrap_or_default();

        match reminders.iter().position(|r| r.id == reminder.id) {
            Some(i) => {
                info!(
                    "Replacing reminder with identical content. Id: {} | Owner: {}",
                    reminder.id, owner
                );
                reminders[i] = reminder;
            }
            None => reminders.push(reminder),
        }

        self.persist(&mut cache, &owner, reminders).await?;
        info!(
            "Added reminder for owner: {} | Total reminders: {}",
            owner,
            cache.get(&owner).map(|r| r.len()).unwrap_or_default()
        );
        Ok(())
    }

    /// Removes the reminder with `reminder_id`. Unknown ids are a no-op and
    /// return `None`.
    pub async fn delete_by_id(
        &self,
        owner: &Owner,
        reminder_id: &ID,
    ) -> anyhow::Result<Option<Reminder>> {
        let mut cache = self.cache.lock().await;
        let mut reminders = cache.get(owner).cloned().unwrap_or_default();

        let deleted = match reminders.iter().position(|r| r.id == *reminder_id) {
            Some(i) => reminders.remove(i),
            None => return Ok(None),
        };

        self.persist(&mut cache, owner, reminders).await?;
        info!("Deleted reminder. Id: {} | Owner: {}", reminder_id, owner);
        Ok(Some(deleted))
    }

    /// Replaces the whole list of `owner`
    pub async fn overwrite(&self, owner: &Owner, reminders: Vec<Reminder>) -> anyhow::Result<()> {
        let mut cache = self.cache.lock().await;
        self.persist(&mut cache, owner, reminders).await
    }

    async fn persist(
        &self,
        cache: &mut MutexGuard<'_, Cache>,
        owner: &Owner,
        reminders: Vec<Reminder>,
    ) -> anyhow::Result<()> {
        self.repo.save(owner, &reminders).await?;
        if reminders.is_empty() {
            cache.remove(owner);
        } else {
            cache.insert(owner.clone(), reminders);
        }
        Ok(())
    }
}
