mod confirm_reminder;
mod create_reminder;
mod delete_reminder;
mod get_reminders;
mod get_role_reminders;

use actix_web::web;
use confirm_reminder::confirm_reminder_controller;
use create_reminder::{create_channel_reminder_controller, create_reminder_controller};
use delete_reminder::{delete_channel_reminder_controller, delete_reminder_controller};
use get_reminders::{get_channel_reminders_controller, get_reminders_controller};
use get_role_reminders::get_role_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // User reminders
    cfg.route(
        "/users/{user_id}/reminders",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/users/{user_id}/reminders",
        web::get().to(get_reminders_controller),
    );
    cfg.route(
        "/users/{user_id}/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );

    // Channel reminders
    cfg.route(
        "/channels/{channel_id}/reminders",
        web::post().to(create_channel_reminder_controller),
    );
    cfg.route(
        "/channels/{channel_id}/reminders",
        web::get().to(get_channel_reminders_controller),
    );
    cfg.route(
        "/channels/{channel_id}/reminders/{reminder_id}",
        web::delete().to(delete_channel_reminder_controller),
    );
    cfg.route(
        "/roles/{role_id}/reminders",
        web::get().to(get_role_reminders_controller),
    );

    cfg.route(
        "/confirmations/{token}",
        web::post().to(confirm_reminder_controller),
    );
}
