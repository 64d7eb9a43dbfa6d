mod base;
mod reminder;
mod status;
mod user;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
pub use memento_api_structs::dtos::*;
pub use memento_domain::{Tz, ID};
use reminder::ReminderClient;
pub use reminder::{CreateChannelReminderInput, CreateReminderInput, GetChannelRemindersInput};
use status::StatusClient;
use std::sync::Arc;
use user::UserClient;

// Domain
pub use memento_api_structs::dtos::PendingReminderDTO as PendingReminder;
pub use memento_api_structs::dtos::ReminderDTO as Reminder;

/// Memento SDK
///
/// The SDK contains methods for interacting with the Memento server API.
#[derive(Clone)]
pub struct MementoSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub user: UserClient,
}

impl MementoSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let user = UserClient::new(base);

        Self {
            reminder,
            status,
            user,
        }
    }
}
