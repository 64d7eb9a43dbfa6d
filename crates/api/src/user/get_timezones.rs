use actix_web::{web, HttpResponse};
use memento_api_structs::get_timezones::*;
use memento_domain::TimezoneResolver;
use memento_infra::MementoContext;

pub async fn get_timezones_controller(ctx: web::Data<MementoContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse::new(
        TimezoneResolver::friendly_options(),
        ctx.config.default_timezone,
    ))
}
