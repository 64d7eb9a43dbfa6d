use crate::dtos::{PendingReminderDTO, ReminderDTO};
use memento_domain::{PendingReminder, Reminder, Tz, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder, fallback_timezone: Tz) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder, fallback_timezone),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindersResponse {
    /// Sorted by trigger time, earliest first
    pub reminders: Vec<ReminderDTO>,
}

impl RemindersResponse {
    pub fn new(reminders: Vec<Reminder>, fallback_timezone: Tz) -> Self {
        Self {
            reminders: reminders
                .into_iter()
                .map(|r| ReminderDTO::new(r, fallback_timezone))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReminderResponse {
    pub pending: PendingReminderDTO,
}

impl PendingReminderResponse {
    pub fn new(pending: PendingReminder) -> Self {
        Self {
            pending: PendingReminderDTO::new(pending),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub time_expression: String,
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    pub type APIResponse = PendingReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod create_channel_reminder {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// The user creating the reminder, their timezone is used
        pub user_id: ID,
        pub role_id: ID,
        pub time_expression: String,
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub channel_id: ID,
    }

    pub type APIResponse = PendingReminderResponse;
}

pub mod get_channel_reminders {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub channel_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default)]
        pub role_id: Option<ID>,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod get_role_reminders {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub role_id: ID,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod delete_channel_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub channel_id: ID,
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod confirm_reminder {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub accept: bool,
    }

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub token: String,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub accepted: bool,
        /// The stored reminder, only present when accepted
        #[serde(default)]
        pub reminder: Option<ReminderDTO>,
    }

    impl APIResponse {
        pub fn accepted(reminder: Reminder, fallback_timezone: Tz) -> Self {
            Self {
                accepted: true,
                reminder: Some(ReminderDTO::new(reminder, fallback_timezone)),
            }
        }

        pub fn declined() -> Self {
            Self {
                accepted: false,
                reminder: None,
            }
        }
    }
}
