use crate::dispatcher::{DispatchReport, Dispatcher};
use memento_domain::OwnerKind;
use memento_infra::MementoContext;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    /// Due reminders whose removal could not be persisted, kept for the next sweep
    pub retained: usize,
    pub dispatch: DispatchReport,
}

/// Stops the scheduler loop. An in-flight sweep always finishes first.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            error!("Reminder scheduler did not shut down cleanly: {:?}", e);
        }
    }
}

pub fn start_reminder_scheduler(ctx: MementoContext) -> SchedulerHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let handle = actix_web::rt::spawn(run_reminder_scheduler(ctx, shutdown_rx));
    SchedulerHandle { shutdown, handle }
}

async fn run_reminder_scheduler(ctx: MementoContext, mut shutdown: watch::Receiver<bool>) {
    let dispatcher = Dispatcher::new(ctx.messenger.clone(), ctx.config.delivery_pacing);
    info!(
        "Reminder scheduler started, sweeping every {:?}",
        ctx.config.sweep_interval
    );

    loop {
        if *shutdown.borrow() {
            break;
        }

        let report = sweep_reminders(&ctx, &dispatcher).await;
        if report.due > 0 {
            info!("Reminder sweep completed: {:?}", report);
        }

        tokio::select! {
            _ = sleep(ctx.config.sweep_interval) => {}
            res = shutdown.changed() => {
                if res.is_err() {
                    break;
                }
            }
        }
    }

    info!("Reminder scheduler stopped");
}

/// One pass over every cached reminder. Due reminders are removed from the
/// store before they are sent, so a reminder is never delivered twice.
pub async fn sweep_reminders(ctx: &MementoContext, dispatcher: &Dispatcher) -> SweepReport {
    // Same cutoff for every reminder in this sweep
    let now = ctx.sys.now();

    let mut due = ctx.reminders.due(&now).await;
    due.sort_by_key(|r| (r.owner().kind() == OwnerKind::Channel, r.trigger_at));

    let mut report = SweepReport {
        due: due.len(),
        ..Default::default()
    };
    let mut queue = Vec::with_capacity(due.len());
    for reminder in due {
        match ctx.reminders.delete_by_id(&reminder.owner(), &reminder.id).await {
            Ok(Some(reminder)) => {
                info!(
                    "Queued reminder {} for {}, due at {}",
                    reminder.id,
                    reminder.owner(),
                    reminder.trigger_at
                );
                queue.push(reminder.into_delivery());
            }
            // Deleted by its owner since the snapshot
            Ok(None) => {}
            Err(e) => {
                error!(
                    "Unable to remove due reminder {} of {}, retrying next sweep. Error: {:?}",
                    reminder.id,
                    reminder.owner(),
                    e
                );
                report.retained += 1;
            }
        }
    }

    report.dispatch = dispatcher.dispatch(queue).await;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{setup, utc};
    use memento_domain::{Owner, Recipient, Reminder, Tz};
    use memento_infra::{IReminderRepo, InMemoryReminderRepo, OwnerReminders, ReminderStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn id(s: &str) -> memento_domain::ID {
        s.parse().unwrap()
    }

    fn dispatcher(ctx: &MementoContext) -> Dispatcher {
        Dispatcher::new(ctx.messenger.clone(), Duration::from_millis(1))
    }

    #[actix_web::test]
    async fn it_dispatches_due_reminders_once() {
        let test_ctx = setup(utc(2024, 1, 1, 12, 0, 1));
        let ctx = &test_ctx.ctx;
        let due = Reminder::new_user(id("U1"), utc(2024, 1, 1, 12, 0, 0), "due".into(), Tz::UTC);
        let not_due =
            Reminder::new_user(id("U1"), utc(2024, 1, 1, 12, 0, 2), "not due".into(), Tz::UTC);
        ctx.reminders.add(due.clone()).await.unwrap();
        ctx.reminders.add(not_due.clone()).await.unwrap();

        let report = sweep_reminders(ctx, &dispatcher(ctx)).await;
        assert_eq!(report.due, 1);
        assert_eq!(report.dispatch.sent, 1);

        assert_eq!(
            test_ctx.messenger.deliveries(),
            vec![due.clone().into_delivery()]
        );
        assert_eq!(ctx.reminders.list_for(&due.owner()).await, vec![not_due]);

        // Sweeping again at the same instant sends nothing new
        sweep_reminders(ctx, &dispatcher(ctx)).await;
        assert_eq!(test_ctx.messenger.deliveries().len(), 1);
    }

    #[actix_web::test]
    async fn it_sweeps_user_and_channel_reminders() {
        let test_ctx = setup(utc(2024, 1, 1, 12, 0, 0));
        let ctx = &test_ctx.ctx;
        let channel = Reminder::new_channel(
            id("C1"),
            id("R1"),
            utc(2024, 1, 1, 11, 0, 0),
            "raid".into(),
            Tz::UTC,
        );
        let user = Reminder::new_user(id("U1"), utc(2024, 1, 1, 12, 0, 0), "tea".into(), Tz::UTC);
        ctx.reminders.add(channel.clone()).await.unwrap();
        ctx.reminders.add(user.clone()).await.unwrap();

        sweep_reminders(ctx, &dispatcher(ctx)).await;

        let deliveries = test_ctx.messenger.deliveries();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].recipient, Recipient::User { user_id: id("U1") });
        assert_eq!(
            deliveries[1].recipient,
            Recipient::Channel {
                channel_id: id("C1"),
                role_id: id("R1")
            }
        );
        assert!(deliveries[1].content().starts_with("<@&R1>"));
        assert_eq!(ctx.reminders.count().await, 0);
    }

    #[actix_web::test]
    async fn failed_deliveries_are_not_requeued() {
        let mut test_ctx = setup(utc(2024, 1, 1, 12, 0, 0));
        let messenger = Arc::new(memento_infra::InMemoryMessenger::failing());
        test_ctx.ctx.messenger = messenger.clone();
        let ctx = &test_ctx.ctx;

        let reminder = Reminder::new_user(id("U1"), utc(2024, 1, 1, 11, 0, 0), "x".into(), Tz::UTC);
        ctx.reminders.add(reminder).await.unwrap();

        let report = sweep_reminders(ctx, &dispatcher(ctx)).await;
        assert_eq!(report.dispatch.failed, 1);
        assert_eq!(ctx.reminders.count().await, 0);

        sweep_reminders(ctx, &dispatcher(ctx)).await;
        assert_eq!(messenger.sent().len(), 1);
    }

    struct ReadOnlyRepo {
        inner: InMemoryReminderRepo,
        read_only: AtomicBool,
    }

    #[async_trait::async_trait]
    impl IReminderRepo for ReadOnlyRepo {
        async fn save(&self, owner: &Owner, reminders: &[Reminder]) -> anyhow::Result<()> {
            if self.read_only.load(Ordering::SeqCst) {
                return Err(anyhow::Error::msg("storage is read only"));
            }
            self.inner.save(owner, reminders).await
        }

        async fn find_all(&self) -> anyhow::Result<Vec<OwnerReminders>> {
            self.inner.find_all().await
        }
    }

    #[actix_web::test]
    async fn undeletable_reminders_are_kept_and_not_sent() {
        let mut test_ctx = setup(utc(2024, 1, 1, 12, 0, 0));
        let repo = Arc::new(ReadOnlyRepo {
            inner: InMemoryReminderRepo::new(),
            read_only: AtomicBool::new(false),
        });
        test_ctx.ctx.reminders = Arc::new(ReminderStore::new(repo.clone()));
        let ctx = &test_ctx.ctx;

        let reminder = Reminder::new_user(id("U1"), utc(2024, 1, 1, 11, 0, 0), "x".into(), Tz::UTC);
        ctx.reminders.add(reminder.clone()).await.unwrap();
        repo.read_only.store(true, Ordering::SeqCst);

        let report = sweep_reminders(ctx, &dispatcher(ctx)).await;
        assert_eq!(report.retained, 1);
        assert!(test_ctx.messenger.deliveries().is_empty());
        assert_eq!(ctx.reminders.list_for(&reminder.owner()).await, vec![reminder.clone()]);

        // Delivered once storage recovers
        repo.read_only.store(false, Ordering::SeqCst);
        sweep_reminders(ctx, &dispatcher(ctx)).await;
        assert_eq!(
            test_ctx.messenger.deliveries(),
            vec![reminder.into_delivery()]
        );
    }

    #[actix_web::test]
    async fn scheduler_loop_sweeps_until_stopped() {
        let mut test_ctx = setup(utc(2024, 1, 1, 12, 0, 0));
        test_ctx.ctx.config.sweep_interval = Duration::from_millis(10);
        let ctx = test_ctx.ctx.clone();

        let handle = start_reminder_scheduler(ctx.clone());

        let reminder = Reminder::new_user(id("U1"), utc(2024, 1, 1, 12, 0, 30), "x".into(), Tz::UTC);
        ctx.reminders.add(reminder.clone()).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        assert!(test_ctx.messenger.deliveries().is_empty());

        test_ctx.sys.set(utc(2024, 1, 1, 12, 0, 30));
        let mut waited = 0;
        while test_ctx.messenger.deliveries().is_empty() && waited < 100 {
            sleep(Duration::from_millis(10)).await;
            waited += 1;
        }
        assert_eq!(
            test_ctx.messenger.deliveries(),
            vec![reminder.into_delivery()]
        );

        handle.stop().await;

        // Nothing is swept after shutdown
        let late = Reminder::new_user(id("U1"), utc(2024, 1, 1, 12, 0, 0), "late".into(), Tz::UTC);
        ctx.reminders.add(late).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(test_ctx.messenger.deliveries().len(), 1);
    }
}
