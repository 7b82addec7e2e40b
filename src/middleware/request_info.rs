use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::request_id::RequestIdExt;

/// Request details handlers attach to failure logs.
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub ip_address: String,
    pub correlation_id: String,
}

impl RequestInfo {
    pub fn from_http_request(req: &HttpRequest) -> Self {
        RequestInfo {
            method: req.method().to_string(),
            path: req.path().to_string(),
            ip_address: req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string(),
            correlation_id: req.correlation_id().unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Logs an internal failure together with the request that caused it and
    /// hands the error back for propagation.
    pub fn log_failure<B: Serialize>(&self, body: &B, error: AppError) -> AppError {
        if error.is_internal() {
            let body = serde_json::to_string(body).unwrap_or_else(|_| "<unserializable>".into());
            log::error!(
                "{} {} from {} failed [correlation_id={}]: {} body={}",
                self.method,
                self.path,
                self.ip_address,
                self.correlation_id,
                error,
                body
            );
        }
        error
    }
}

impl FromRequest for RequestInfo {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(RequestInfo::from_http_request(req)))
    }
}
