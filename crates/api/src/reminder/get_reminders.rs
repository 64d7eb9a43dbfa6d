use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memento_api_structs::{get_channel_reminders, get_reminders, RemindersResponse};
use memento_domain::{Owner, Reminder, ID};
use memento_infra::MementoContext;

pub async fn get_reminders_controller(
    path: web::Path<get_reminders::PathParams>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let usecase = GetRemindersUseCase {
        owner: Owner::User(path.into_inner().user_id),
        role_id: None,
    };

    let fallback_timezone = ctx.config.default_timezone;
    execute(usecase, &ctx)
        .await
        .map(|reminders| {
            HttpResponse::Ok().json(RemindersResponse::new(reminders, fallback_timezone))
        })
        .map_err(MementoError::from)
}

pub async fn get_channel_reminders_controller(
    path: web::Path<get_channel_reminders::PathParams>,
    query: web::Query<get_channel_reminders::QueryParams>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let usecase = GetRemindersUseCase {
        owner: Owner::Channel(path.into_inner().channel_id),
        role_id: query.into_inner().role_id,
    };

    let fallback_timezone = ctx.config.default_timezone;
    execute(usecase, &ctx)
        .await
        .map(|reminders| {
            HttpResponse::Ok().json(RemindersResponse::new(reminders, fallback_timezone))
        })
        .map_err(MementoError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub owner: Owner,
    /// Only keep channel reminders mentioning this role
    pub role_id: Option<ID>,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        let mut reminders = ctx.reminders.list_for(&self.owner).await;
        if let Some(role_id) = &self.role_id {
            reminders.retain(|r| r.role_id() == Some(role_id));
        }
        reminders.sort_by_key(|r| r.trigger_at);
        Ok(reminders)
    }
}
