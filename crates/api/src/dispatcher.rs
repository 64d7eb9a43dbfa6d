use memento_domain::Delivery;
use memento_infra::IMessenger;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

/// Hands fired reminders to the outbound transport, one at a time
pub struct Dispatcher {
    messenger: Arc<dyn IMessenger>,
    pacing: Duration,
}

impl Dispatcher {
    pub fn new(messenger: Arc<dyn IMessenger>, pacing: Duration) -> Self {
        Self { messenger, pacing }
    }

    /// Sends the whole batch in order with `pacing` between two sends.
    /// A failed send is logged and the delivery is dropped.
    pub async fn dispatch(&self, deliveries: Vec<Delivery>) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (i, delivery) in deliveries.iter().enumerate() {
            if i > 0 {
                sleep(self.pacing).await;
            }
            match self.messenger.send(delivery).await {
                Ok(_) => {
                    info!(
                        "Delivered reminder {} to {}",
                        delivery.reminder_id,
                        delivery.recipient.owner()
                    );
                    report.sent += 1;
                }
                Err(e) => {
                    error!(
                        "Unable to deliver reminder {} to {}, it is lost. Error: {}",
                        delivery.reminder_id,
                        delivery.recipient.owner(),
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}
