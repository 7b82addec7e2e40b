use actix_web::web;

use crate::handlers::{attendance, overtime};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("/time-in", web::post().to(attendance::time_in))
            .route("/time-out", web::post().to(attendance::time_out))
            .route("/lunch-in", web::post().to(attendance::lunch_in))
            .route("/lunch-out", web::post().to(attendance::lunch_out))
            .route("/today/{employee_id}", web::get().to(attendance::today))
            .route(
                "/overtime/request",
                web::post().to(overtime::request_overtime),
            )
            .route(
                "/{id}/overtime/accept",
                web::post().to(overtime::accept_overtime),
            )
            .route(
                "/{id}/overtime/reject",
                web::post().to(overtime::reject_overtime),
            ),
    );
}
