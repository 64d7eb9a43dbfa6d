use actix_web::{web, HttpResponse};
use memento_api_structs::get_service_health::*;
use memento_infra::MementoContext;

async fn status(ctx: web::Data<MementoContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        scheduled_reminders: ctx.reminders.count().await,
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
