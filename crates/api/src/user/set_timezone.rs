use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memento_api_structs::set_timezone::*;
use memento_domain::{TimezoneResolver, Tz, UserSettings, ID};
use memento_infra::MementoContext;
use tracing::info;

pub async fn set_timezone_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let usecase = SetTimezoneUseCase {
        user_id: path.into_inner().user_id,
        timezone: body.into_inner().timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|settings| HttpResponse::Ok().json(APIResponse::new(settings.timezone, false)))
        .map_err(MementoError::from)
}

#[derive(Debug)]
pub struct SetTimezoneUseCase {
    pub user_id: ID,
    pub timezone: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    TimezoneNotFound(String),
    StorageError,
}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TimezoneNotFound(name) => Self::BadClientData(format!(
                "The timezone `{}` was not found. Try one of: {}, or a full tz database name like `Europe/Oslo`.",
                name,
                TimezoneResolver::friendly_options().join(", ")
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetTimezoneUseCase {
    type Response = UserSettings;
    type Error = UseCaseError;

    const NAME: &'static str = "SetTimezone";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        let timezone: Tz = TimezoneResolver::resolve(&self.timezone)
            .ok_or_else(|| UseCaseError::TimezoneNotFound(self.timezone.clone()))?;

        let settings = UserSettings::new(self.user_id.clone(), timezone);
        ctx.repos
            .user_settings
            .save(&settings)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            "Timezone of user {} set to {}",
            self.user_id,
            timezone.name()
        );
        Ok(settings)
    }
}
