use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;

/// Per user preferences, persisted as the user's config
#[derive(Debug, Clone, PartialEq)]
pub struct UserSettings {
    pub user_id: ID,
    pub timezone: Tz,
}

impl UserSettings {
    pub fn new(user_id: ID, timezone: Tz) -> Self {
        Self { user_id, timezone }
    }
}

impl Entity for UserSettings {
    fn id(&self) -> &ID {
        &self.user_id
    }
}
