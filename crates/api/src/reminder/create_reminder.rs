use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use crate::user::find_user_timezone;
use actix_web::{web, HttpResponse};
use memento_api_structs::{create_channel_reminder, create_reminder, PendingReminderResponse};
use memento_domain::{truncate_to_seconds, PendingReminder, Reminder, TimeConverter, ID};
use memento_infra::MementoContext;
use tracing::info;

pub async fn create_reminder_controller(
    path: web::Path<create_reminder::PathParams>,
    body: web::Json<create_reminder::RequestBody>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let body = body.into_inner();
    let usecase = CreateReminderUseCase {
        user_id: path.into_inner().user_id,
        channel: None,
        time_expression: body.time_expression,
        text: body.text,
    };

    execute(usecase, &ctx)
        .await
        .map(|pending| HttpResponse::Created().json(PendingReminderResponse::new(pending)))
        .map_err(MementoError::from)
}

pub async fn create_channel_reminder_controller(
    path: web::Path<create_channel_reminder::PathParams>,
    body: web::Json<create_channel_reminder::RequestBody>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let body = body.into_inner();
    let usecase = CreateReminderUseCase {
        user_id: body.user_id,
        channel: Some(ChannelTarget {
            channel_id: path.into_inner().channel_id,
            role_id: body.role_id,
        }),
        time_expression: body.time_expression,
        text: body.text,
    };

    execute(usecase, &ctx)
        .await
        .map(|pending| HttpResponse::Created().json(PendingReminderResponse::new(pending)))
        .map_err(MementoError::from)
}

#[derive(Debug)]
pub struct ChannelTarget {
    pub channel_id: ID,
    pub role_id: ID,
}

/// Converts the time expression and parks the resulting reminder until the
/// owner accepts it. Nothing is stored here.
#[derive(Debug)]
pub struct CreateReminderUseCase {
    /// The acting user, their timezone is used for the conversion
    pub user_id: ID,
    /// Set for reminders posted in a channel instead of a direct message
    pub channel: Option<ChannelTarget>,
    pub time_expression: String,
    pub text: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    TimeUnparseable(String),
    TimeInPast(String),
    EmptyText,
    StorageError,
}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TimeUnparseable(expression) => Self::BadClientData(format!(
                "Unable to understand the time: `{}`. Try something like `in 3 hours` or `tomorrow at 5pm`.",
                expression
            )),
            UseCaseError::TimeInPast(local_time) => Self::BadClientData(format!(
                "The time {} is in the past.",
                local_time
            )),
            UseCaseError::EmptyText => {
                Self::BadClientData("The reminder text can not be empty.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = PendingReminder;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        if self.text.trim().is_empty() {
            return Err(UseCaseError::EmptyText);
        }

        let (timezone, _) = find_user_timezone(&self.user_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let now = ctx.sys.now();
        let trigger_at = TimeConverter::new(ctx.time_parser.as_ref())
            .to_utc(&self.time_expression, &timezone, &now)
            .map_err(|e| UseCaseError::TimeUnparseable(e.0))?;
        // Both sides at second precision, a reminder for the current second is already past
        if trigger_at <= truncate_to_seconds(now) {
            return Err(UseCaseError::TimeInPast(TimeConverter::to_local_display(
                &trigger_at,
                &timezone,
            )));
        }

        let reminder = match self.channel.take() {
            Some(ChannelTarget {
                channel_id,
                role_id,
            }) => Reminder::new_channel(
                channel_id,
                role_id,
                trigger_at,
                self.text.clone(),
                timezone,
            ),
            None => Reminder::new_user(
                self.user_id.clone(),
                trigger_at,
                self.text.clone(),
                timezone,
            ),
        };

        let pending = ctx.confirmations.register(reminder, &now);
        info!(
            "Reminder {} for {} awaits confirmation until {}",
            pending.reminder.id,
            pending.reminder.owner(),
            pending.expires_at
        );
        Ok(pending)
    }
}
