use actix_web::{HttpResponse, Responder, error::JsonPayloadError, get, web};

use crate::error::AppError;

pub mod attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(web::scope("/api/v1").configure(attendance::configure));
}

/// Malformed JSON bodies get the same envelope as every other input error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        AppError::BadRequest(err.to_string()).into()
    })
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}
