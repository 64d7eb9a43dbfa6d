use crate::{APIResponse, BaseClient};
use memento_api_structs::*;
use memento_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub user_id: ID,
    pub time_expression: String,
    pub text: String,
}

pub struct CreateChannelReminderInput {
    pub channel_id: ID,
    /// The acting user, their timezone is used
    pub user_id: ID,
    pub role_id: ID,
    pub time_expression: String,
    pub text: String,
}

pub struct GetChannelRemindersInput {
    pub channel_id: ID,
    pub role_id: Option<ID>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Returns a pending reminder that must be confirmed before it is stored
    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            time_expression: input.time_expression,
            text: input.text,
        };
        self.base
            .post(
                body,
                format!("users/{}/reminders", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn create_in_channel(
        &self,
        input: CreateChannelReminderInput,
    ) -> APIResponse<create_channel_reminder::APIResponse> {
        let body = create_channel_reminder::RequestBody {
            user_id: input.user_id,
            role_id: input.role_id,
            time_expression: input.time_expression,
            text: input.text,
        };
        self.base
            .post(
                body,
                format!("channels/{}/reminders", input.channel_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn confirm(
        &self,
        token: &str,
        accept: bool,
    ) -> APIResponse<confirm_reminder::APIResponse> {
        let body = confirm_reminder::RequestBody { accept };
        self.base
            .post(body, format!("confirmations/{}", token), StatusCode::OK)
            .await
    }

    pub async fn get(&self, user_id: ID) -> APIResponse<get_reminders::APIResponse> {
        self.base
            .get(format!("users/{}/reminders", user_id), StatusCode::OK)
            .await
    }

    pub async fn get_in_channel(
        &self,
        input: GetChannelRemindersInput,
    ) -> APIResponse<get_channel_reminders::APIResponse> {
        let path = match input.role_id {
            Some(role_id) => format!("channels/{}/reminders?roleId={}", input.channel_id, role_id),
            None => format!("channels/{}/reminders", input.channel_id),
        };
        self.base.get(path, StatusCode::OK).await
    }

    pub async fn get_by_role(&self, role_id: ID) -> APIResponse<get_role_reminders::APIResponse> {
        self.base
            .get(format!("roles/{}/reminders", role_id), StatusCode::OK)
            .await
    }

    pub async fn delete(
        &self,
        user_id: ID,
        reminder_id: ID,
    ) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(
                format!("users/{}/reminders/{}", user_id, reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete_in_channel(
        &self,
        channel_id: ID,
        reminder_id: ID,
    ) -> APIResponse<delete_channel_reminder::APIResponse> {
        self.base
            .delete(
                format!("channels/{}/reminders/{}", channel_id, reminder_id),
                StatusCode::OK,
            )
            .await
    }
}
