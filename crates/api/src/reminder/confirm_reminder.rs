use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memento_api_structs::confirm_reminder::*;
use memento_domain::Reminder;
use memento_infra::MementoContext;
use tracing::info;

pub async fn confirm_reminder_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let usecase = ConfirmReminderUseCase {
        token: path.into_inner().token,
        accept: body.accept,
    };

    let fallback_timezone = ctx.config.default_timezone;
    execute(usecase, &ctx)
        .await
        .map(|reminder| {
            HttpResponse::Ok().json(match reminder {
                Some(reminder) => APIResponse::accepted(reminder, fallback_timezone),
                None => APIResponse::declined(),
            })
        })
        .map_err(MementoError::from)
}

/// Stores the pending reminder on accept, drops it on decline
#[derive(Debug)]
pub struct ConfirmReminderUseCase {
    pub token: String,
    pub accept: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    ConfirmationNotFound,
    StorageError,
}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::ConfirmationNotFound => Self::NotFound(
                "The confirmation was not found. It might have expired, create the reminder again."
                    .into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ConfirmReminderUseCase {
    /// The stored reminder, `None` when declined
    type Response = Option<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "ConfirmReminder";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        let pending = ctx
            .confirmations
            .take(&self.token, &ctx.sys.now())
            .ok_or(UseCaseError::ConfirmationNotFound)?;

        if !self.accept {
            info!("Reminder {} was declined", pending.reminder.id);
            return Ok(None);
        }

        ctx.reminders
            .add(pending.reminder.clone())
            .await
            .map(|_| Some(pending.reminder))
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use crate::shared::test_utils::{setup, utc};
    use chrono::Duration;
    use memento_domain::PendingReminder;

    async fn create_pending(ctx: &MementoContext, text: &str) -> PendingReminder {
        let mut usecase = CreateReminderUseCase {
            user_id: "U1".parse().unwrap(),
            channel: None,
            time_expression: "in 3 hours".into(),
            text: text.into(),
        };
        usecase.execute(ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn accepting_stores_the_reminder() {
        let ctx = setup(utc(2024, 1, 1, 10, 0, 0)).ctx;
        let pending = create_pending(&ctx, "call mom").await;

        let mut usecase = ConfirmReminderUseCase {
            token: pending.token.clone(),
            accept: true,
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!(res, Some(pending.reminder.clone()));
        assert_eq!(
            ctx.reminders.list_for(&pending.reminder.owner()).await,
            vec![pending.reminder]
        );

        // A token can only be used once
        let mut usecase = ConfirmReminderUseCase {
            token: pending.token,
            accept: true,
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::ConfirmationNotFound)
        ));
    }

    #[actix_web::test]
    async fn declining_stores_nothing() {
        let ctx = setup(utc(2024, 1, 1, 10, 0, 0)).ctx;
        let pending = create_pending(&ctx, "call mom").await;

        let mut usecase = ConfirmReminderUseCase {
            token: pending.token,
            accept: false,
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap(), None);
        assert_eq!(ctx.reminders.count().await, 0);
    }

    #[actix_web::test]
    async fn timeout_counts_as_decline() {
        let test_ctx = setup(utc(2024, 1, 1, 10, 0, 0));
        let ctx = &test_ctx.ctx;
        let pending = create_pending(ctx, "call mom").await;

        test_ctx
            .sys
            .set(utc(2024, 1, 1, 10, 0, 0) + Duration::seconds(31));
        let mut usecase = ConfirmReminderUseCase {
            token: pending.token,
            accept: true,
        };
        assert!(matches!(
            usecase.execute(ctx).await,
            Err(UseCaseError::ConfirmationNotFound)
        ));
        assert_eq!(ctx.reminders.count().await, 0);
    }

    #[actix_web::test]
    async fn confirming_identical_reminders_twice_keeps_one() {
        let ctx = setup(utc(2024, 1, 1, 10, 0, 0)).ctx;
        for _ in 0..2 {
            let pending = create_pending(&ctx, "same text").await;
            let mut usecase = ConfirmReminderUseCase {
                token: pending.token,
                accept: true,
            };
            assert!(usecase.execute(&ctx).await.is_ok());
        }
        assert_eq!(ctx.reminders.count().await, 1);
    }
}
