mod messenger;

pub use messenger::{
    DeliveryError, IMessenger, InMemoryMessenger, LogMessenger, WebhookMessenger,
};
