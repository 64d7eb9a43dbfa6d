use crate::{APIResponse, BaseClient};
use memento_api_structs::*;
use memento_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserClient {
    base: Arc<BaseClient>,
}

impl UserClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Accepts friendly aliases like `Pacific` and full tz database names
    pub async fn set_timezone<T: Into<String>>(
        &self,
        user_id: ID,
        timezone: T,
    ) -> APIResponse<set_timezone::APIResponse> {
        let body = set_timezone::RequestBody {
            timezone: timezone.into(),
        };
        self.base
            .put(body, format!("users/{}/timezone", user_id), StatusCode::OK)
            .await
    }

    pub async fn get_timezone(&self, user_id: ID) -> APIResponse<get_timezone::APIResponse> {
        self.base
            .get(format!("users/{}/timezone", user_id), StatusCode::OK)
            .await
    }

    pub async fn get_timezones(&self) -> APIResponse<get_timezones::APIResponse> {
        self.base.get("timezones".into(), StatusCode::OK).await
    }
}
