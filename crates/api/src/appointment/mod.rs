mod dispatch_confirmation;
mod subscribers;

use actix_web::web;
use dispatch_confirmation::dispatch_confirmation_controller;
pub use dispatch_confirmation::DispatchConfirmationUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/appointments/{appointment_id}/confirmation",
        web::post().to(dispatch_confirmation_controller),
    );
}
