mod subscribers;
mod track_email_event;

use actix_web::web;
use track_email_event::track_email_event_controller;
pub use track_email_event::TrackEmailEventUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhooks/email", web::post().to(track_email_event_controller));
}
