use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memento_api_structs::get_timezone::*;
use memento_domain::{Tz, ID};
use memento_infra::MementoContext;
use tracing::debug;

pub async fn get_timezone_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let usecase = GetTimezoneUseCase {
        user_id: path.into_inner().user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.timezone, res.is_default)))
        .map_err(MementoError::from)
}

/// The stored preference of `user_id`, or the configured default
pub async fn find_user_timezone(user_id: &ID, ctx: &MementoContext) -> anyhow::Result<(Tz, bool)> {
    match ctx.repos.user_settings.find(user_id).await? {
        Some(settings) => Ok((settings.timezone, false)),
        None => {
            debug!(
                "User {} has no timezone preference, using {}",
                user_id,
                ctx.config.default_timezone.name()
            );
            Ok((ctx.config.default_timezone, true))
        }
    }
}

#[derive(Debug)]
pub struct GetTimezoneUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub timezone: Tz,
    pub is_default: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTimezoneUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "GetTimezone";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        find_user_timezone(&self.user_id, ctx)
            .await
            .map(|(timezone, is_default)| UseCaseRes {
                timezone,
                is_default,
            })
            .map_err(|_| UseCaseError::StorageError)
    }
}
