use crate::error::MementoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memento_api_structs::get_role_reminders::*;
use memento_domain::{Reminder, ID};
use memento_infra::MementoContext;

pub async fn get_role_reminders_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MementoContext>,
) -> Result<HttpResponse, MementoError> {
    let usecase = GetRoleRemindersUseCase {
        role_id: path.into_inner().role_id,
    };

    let fallback_timezone = ctx.config.default_timezone;
    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders, fallback_timezone)))
        .map_err(MementoError::from)
}

/// Every channel reminder mentioning a role, whatever channel it lives in
#[derive(Debug)]
pub struct GetRoleRemindersUseCase {
    pub role_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for MementoError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRoleRemindersUseCase {
    type Response = Vec<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetRoleReminders";

    async fn execute(&mut self, ctx: &MementoContext) -> Result<Self::Response, Self::Error> {
        let mut reminders = ctx.reminders.list_by_role(&self.role_id).await;
        reminders.sort_by_key(|r| r.trigger_at);
        Ok(reminders)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{setup, utc};
    use memento_domain::{Owner, Tz};

    #[actix_web::test]
    async fn it_lists_across_channels() {
        let ctx = setup(utc(2024, 1, 1, 10, 0, 0)).ctx;
        let id = |s: &str| s.parse::<ID>().unwrap();
        let c2 = Reminder::new_channel(id("C2"), id("R1"), utc(2024, 1, 2, 0, 0, 0), "b".into(), Tz::UTC);
        let c1 = Reminder::new_channel(id("C1"), id("R1"), utc(2024, 1, 1, 12, 0, 0), "a".into(), Tz::UTC);
        for r in vec![c2.clone(), c1.clone()] {
            ctx.reminders.add(r).await.unwrap();
        }

        let mut usecase = GetRoleRemindersUseCase { role_id: id("R1") };
        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!(res, vec![c1, c2]);
        assert_eq!(res[0].owner(), Owner::Channel(id("C1")));
    }
}
