pub mod create_reminder;
pub mod delete_reminder;
pub mod get_adherence;
pub mod get_reminders;
pub mod log_dose;
pub mod sweep_due_reminders;
pub mod update_reminder;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_adherence::get_adherence_controller;
use get_reminders::get_reminders_controller;
use log_dose::log_dose_controller;
use update_reminder::update_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));

    cfg.route(
        "/reminders/adherence",
        web::get().to(get_adherence_controller),
    );

    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );

    cfg.route(
        "/reminders/{reminder_id}/doses",
        web::post().to(log_dose_controller),
    );
}
