use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data` wrapped in the envelope.
    pub fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::success(data))
    }
}

impl ApiResponse<()> {
    // Error response (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// Parses a client timestamp. An offset is required so the instant is
/// unambiguous before it is projected into the configured zone.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidTimestamp(raw.to_string()))
}

pub fn require_employee_id(employee_id: Option<i64>) -> Result<i64, ValidationError> {
    match employee_id {
        None => Err(ValidationError::MissingEmployeeId),
        Some(id) if id <= 0 => Err(ValidationError::InvalidEmployeeId(id)),
        Some(id) => Ok(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamps_with_offsets_become_utc() {
        let parsed = parse_timestamp("2024-05-06T08:30:00+08:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 6, 0, 30, 0).unwrap());

        let zulu = parse_timestamp("2024-05-06T00:30:00.250Z").unwrap();
        assert_eq!(zulu.timestamp(), parsed.timestamp());
    }

    #[test]
    fn timestamps_without_offsets_are_rejected() {
        assert_eq!(
            parse_timestamp("2024-05-06T08:30:00"),
            Err(ValidationError::InvalidTimestamp(
                "2024-05-06T08:30:00".to_string()
            ))
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn employee_ids_must_be_positive() {
        assert_eq!(require_employee_id(Some(7)), Ok(7));
        assert_eq!(
            require_employee_id(None),
            Err(ValidationError::MissingEmployeeId)
        );
        assert_eq!(
            require_employee_id(Some(0)),
            Err(ValidationError::InvalidEmployeeId(0))
        );
    }
}
