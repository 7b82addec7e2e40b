use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::AttendanceRecord;
use crate::error::{AppError, ValidationError};
use crate::handlers::shared::{ApiResponse, parse_timestamp, require_employee_id};
use crate::middleware::RequestInfo;
use crate::services::{ClockAction, ClockService};

/// Body of every clock operation.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockRequest {
    pub employee_id: Option<i64>,
    pub time_stamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockCommand {
    pub employee_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl ClockRequest {
    pub fn validate(&self) -> Result<ClockCommand, ValidationError> {
        let employee_id = require_employee_id(self.employee_id)?;
        let raw = self
            .time_stamp
            .as_deref()
            .ok_or(ValidationError::MissingTimestamp)?;

        Ok(ClockCommand {
            employee_id,
            timestamp: parse_timestamp(raw)?,
        })
    }
}

async fn clock(
    action: ClockAction,
    service: web::Data<ClockService>,
    info: RequestInfo,
    body: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    let command = body.validate()?;

    let record = service
        .apply(action, command.employee_id, command.timestamp)
        .await
        .map_err(|e| info.log_failure(&*body, e))?;

    log::debug!(
        "{} recorded for employee {} [correlation_id={}]",
        action,
        command.employee_id,
        info.correlation_id
    );
    Ok(ApiResponse::ok(record))
}

pub async fn time_in(
    service: web::Data<ClockService>,
    info: RequestInfo,
    body: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    clock(ClockAction::TimeIn, service, info, body).await
}

pub async fn time_out(
    service: web::Data<ClockService>,
    info: RequestInfo,
    body: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    clock(ClockAction::TimeOut, service, info, body).await
}

pub async fn lunch_in(
    service: web::Data<ClockService>,
    info: RequestInfo,
    body: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    clock(ClockAction::LunchIn, service, info, body).await
}

pub async fn lunch_out(
    service: web::Data<ClockService>,
    info: RequestInfo,
    body: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    clock(ClockAction::LunchOut, service, info, body).await
}

/// Today's record for an employee; `data` is null when there is none.
pub async fn today(
    service: web::Data<ClockService>,
    info: RequestInfo,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee_id = require_employee_id(Some(path.into_inner()))?;

    let record: Option<AttendanceRecord> = service
        .attendance_today(employee_id)
        .await
        .map_err(|e| info.log_failure(&employee_id, e))?;

    Ok(ApiResponse::ok(record))
}
