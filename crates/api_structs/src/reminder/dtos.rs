use memento_domain::{format_dt, PendingReminder, Reminder, TimeConverter, Tz, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    /// The user or channel the reminder belongs to
    pub owner_id: ID,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<ID>,
    /// UTC, formatted as `YYYY-MM-DDTHH:MM:SSZ`
    pub trigger_at: String,
    /// `trigger_at` rendered in `timezone`
    pub local_time: String,
    pub timezone: String,
    pub text: String,
}

impl ReminderDTO {
    /// `fallback_timezone` is used to render reminders stored without one
    pub fn new(reminder: Reminder, fallback_timezone: Tz) -> Self {
        let timezone = reminder.timezone.unwrap_or(fallback_timezone);
        Self {
            owner_id: reminder.owner().id().clone(),
            role_id: reminder.role_id().cloned(),
            trigger_at: format_dt(&reminder.trigger_at),
            local_time: TimeConverter::to_local_display(&reminder.trigger_at, &timezone),
            timezone: timezone.name().to_string(),
            id: reminder.id,
            text: reminder.text,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReminderDTO {
    /// Pass to the confirmation endpoint to accept or decline
    pub token: String,
    /// Human readable summary to confirm, in the owner's timezone
    pub confirmation_text: String,
    pub expires_at: String,
    pub reminder: ReminderDTO,
}

impl PendingReminderDTO {
    pub fn new(pending: PendingReminder) -> Self {
        let reminder = ReminderDTO::new(pending.reminder, Tz::UTC);
        Self {
            token: pending.token,
            confirmation_text: format!(
                "Remind at {} ({}): {}",
                reminder.local_time, reminder.timezone, reminder.text
            ),
            expires_at: format_dt(&pending.expires_at),
            reminder,
        }
    }
}
