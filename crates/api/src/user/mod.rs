mod get_timezone;
mod get_timezones;
mod set_timezone;

use actix_web::web;
use get_timezone::get_timezone_controller;
use get_timezones::get_timezones_controller;
use set_timezone::set_timezone_controller;

pub use get_timezone::find_user_timezone;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/timezones", web::get().to(get_timezones_controller));
    cfg.route(
        "/users/{user_id}/timezone",
        web::get().to(get_timezone_controller),
    );
    cfg.route(
        "/users/{user_id}/timezone",
        web::put().to(set_timezone_controller),
    );
}
