use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memento_api_structs::{delete_channel_reminder, delete_reminder, ReminderResponse};
use memento_domain::{Owner, Reminder, ID};
use memento_infra::MementoContext;

pub async fn delete_reminder_controller(
    path: web::Path<delete_reminder::PathParams>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let path = path.into_inner();
    let usecase = DeleteReminderUseCase {
        owner: Owner::User(path.user_id),
        reminder_id: path.reminder_id,
    };

    let fallback_timezone = ctx.config.default_timezone;
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(ReminderResponse::new(reminder, fallback_timezone)))
        .map_err(MementoError::from)
}

pub async fn delete_channel_reminder_controller(
    path: web::Path<delete_channel_reminder::PathParams>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let path = path.into_inner();
    let usecase = DeleteReminderUseCase {
        owner: Owner::Channel(path.channel_id),
        reminder_id: path.reminder_id,
    };

    let fallback_timezone = ctx.config.default_timezone;
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(ReminderResponse::new(reminder, fallback_timezone)))
        .map_err(MementoError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub owner: Owner,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    ReminderNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::ReminderNotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        match ctx
            .reminders
            .delete_by_id(&self.owner, &self.reminder_id)
            .await
        {
            Ok(Some(reminder)) => Ok(reminder),
            Ok(None) => Err(UseCaseError::ReminderNotFound(self.reminder_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{setup, utc};
    use memento_domain::Tz;

    #[actix_web::test]
    async fn it_deletes_only_within_the_owner() {
        let ctx = setup(utc(2024, 1, 1, 10, 0, 0)).ctx;
        let reminder = Reminder::new_user(
            "U1".parse().unwrap(),
            utc(2024, 1, 1, 12, 0, 0),
            "x".into(),
            Tz::UTC,
        );
        ctx.reminders.add(reminder.clone()).await.unwrap();

        let mut usecase = DeleteReminderUseCase {
            owner: Owner::User("U2".parse().unwrap()),
            reminder_id: reminder.id.clone(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::ReminderNotFound(_))
        ));

        let mut usecase = DeleteReminderUseCase {
            owner: reminder.owner(),
            reminder_id: reminder.id.clone(),
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap(), reminder);
        assert!(ctx.reminders.list_for(&reminder.owner()).await.is_empty());
    }
}
