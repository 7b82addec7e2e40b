use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ValidationError};
use crate::handlers::shared::{ApiResponse, parse_timestamp, require_employee_id};
use crate::middleware::RequestInfo;
use crate::services::OvertimeService;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRequestBody {
    pub employee_id: Option<i64>,
    pub hours: Option<f64>,
    /// Picks the attendance day; defaults to now.
    pub time_stamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvertimeCommand {
    pub employee_id: i64,
    pub hours: f64,
    pub timestamp: DateTime<Utc>,
}

impl OvertimeRequestBody {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<OvertimeCommand, ValidationError> {
        let employee_id = require_employee_id(self.employee_id)?;
        let hours = self
            .hours
            .filter(|hours| hours.is_finite())
            .ok_or(ValidationError::InvalidHours)?;
        let timestamp = match self.time_stamp.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => now,
        };

        Ok(OvertimeCommand {
            employee_id,
            hours,
            timestamp,
        })
    }
}

pub async fn request_overtime(
    service: web::Data<OvertimeService>,
    info: RequestInfo,
    body: web::Json<OvertimeRequestBody>,
) -> Result<HttpResponse, AppError> {
    let command = body.validate(Utc::now())?;

    let record = service
        .request(command.employee_id, command.hours, command.timestamp)
        .await
        .map_err(|e| info.log_failure(&*body, e))?;

    Ok(ApiResponse::ok(record))
}

pub async fn accept_overtime(
    service: web::Data<OvertimeService>,
    info: RequestInfo,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let attendance_id = path.into_inner();

    let record = service
        .accept(attendance_id)
        .await
        .map_err(|e| info.log_failure(&attendance_id, e))?;

    Ok(ApiResponse::ok(record))
}

pub async fn reject_overtime(
    service: web::Data<OvertimeService>,
    info: RequestInfo,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let attendance_id = path.into_inner();

    let record = service
        .reject(attendance_id)
        .await
        .map_err(|e| info.log_failure(&attendance_id, e))?;

    Ok(ApiResponse::ok(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamp_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 3, 0, 0).unwrap();
        let body = OvertimeRequestBody {
            employee_id: Some(4),
            hours: Some(1.5),
            time_stamp: None,
        };

        assert_eq!(
            body.validate(now),
            Ok(OvertimeCommand {
                employee_id: 4,
                hours: 1.5,
                timestamp: now,
            })
        );
    }

    #[test]
    fn hours_must_be_present_and_finite() {
        let now = Utc::now();
        let mut body = OvertimeRequestBody {
            employee_id: Some(4),
            hours: None,
            time_stamp: None,
        };
        assert_eq!(body.validate(now), Err(ValidationError::InvalidHours));

        body.hours = Some(f64::NAN);
        assert_eq!(body.validate(now), Err(ValidationError::InvalidHours));
    }
}
