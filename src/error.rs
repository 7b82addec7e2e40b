use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::database::models::OvertimeRequestStatus;
use crate::handlers::shared::ApiResponse;

/// Failure categories surfaced at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    NotFound,
    StateConflict,
    ScheduleViolation,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Input | ErrorKind::StateConflict | ErrorKind::ScheduleViolation => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Rule violations raised by the clock engine and the overtime workflow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("Employee {0} not found")]
    EmployeeNotFound(i64),

    #[error("Employee {0} has no role or department assigned")]
    EmployeeUnassigned(i64),

    #[error("No schedule found for role {role} in department {department_id}")]
    ScheduleNotFound { role: String, department_id: i64 },

    #[error("Attendance record not found")]
    AttendanceNotFound,

    #[error("Already clocked in today")]
    AlreadyClockedInToday,

    #[error("Already on break")]
    AlreadyOnBreak,

    #[error("Already timed out today")]
    AlreadyTimedOut,

    #[error("Attendance record has no time-in")]
    MissingTimeIn,

    #[error("Cannot time out while on break")]
    OnBreak,

    #[error("Time-in is past the allowed limit of {limit}")]
    TimeInTooLate { limit: NaiveTime },

    #[error("Time-out cannot be earlier than time-in")]
    TimeOutBeforeTimeIn,

    #[error("Lunch cannot start before {start}")]
    LunchTooEarly { start: NaiveTime },

    #[error("Lunch cannot start after {end}")]
    LunchTooLate { end: NaiveTime },

    #[error("Lunch has not started")]
    LunchNotStarted,

    #[error("Lunch has already ended")]
    LunchAlreadyEnded,

    #[error("Requested overtime of {requested}h is below the minimum of {minimum}h")]
    OvertimeBelowMinimum { requested: f64, minimum: f64 },

    #[error("Requested overtime of {requested}h exceeds the daily limit of {limit}h")]
    OvertimeExceedsLimit { requested: f64, limit: f64 },

    #[error("Cannot {action} an overtime request that is {from}")]
    InvalidOvertimeTransition {
        from: OvertimeRequestStatus,
        action: &'static str,
    },

    #[error("Local time {0} does not exist in the configured time zone")]
    UnrepresentableLocalTime(NaiveDateTime),

    #[error("Attendance record is inconsistent: {0}")]
    InvalidRecord(&'static str),
}

impl ClockError {
    pub fn kind(&self) -> ErrorKind {
        use ClockError::*;

        match self {
            EmployeeNotFound(_) => ErrorKind::NotFound,
            EmployeeUnassigned(_) | ScheduleNotFound { .. } | AttendanceNotFound => {
                ErrorKind::StateConflict
            }
            AlreadyClockedInToday | AlreadyOnBreak | AlreadyTimedOut | MissingTimeIn | OnBreak
            | LunchNotStarted | LunchAlreadyEnded | InvalidOvertimeTransition { .. } => {
                ErrorKind::StateConflict
            }
            TimeInTooLate { .. }
            | TimeOutBeforeTimeIn
            | LunchTooEarly { .. }
            | LunchTooLate { .. }
            | OvertimeBelowMinimum { .. }
            | OvertimeExceedsLimit { .. } => ErrorKind::ScheduleViolation,
            UnrepresentableLocalTime(_) | InvalidRecord(_) => ErrorKind::Internal,
        }
    }
}

/// Boundary input that failed its post-deserialization checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("employeeId is required")]
    MissingEmployeeId,

    #[error("employeeId must be a positive integer, got {0}")]
    InvalidEmployeeId(i64),

    #[error("timeStamp is required")]
    MissingTimestamp,

    #[error("timeStamp `{0}` is not a valid ISO-8601 date-time")]
    InvalidTimestamp(String),

    #[error("hours must be a finite number")]
    InvalidHours,

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(&'static str),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Clock(err) => err.kind(),
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorKind::Input,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => ErrorKind::Internal,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    /// Message safe to hand to a client; storage details stay in the logs.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if self.is_internal() {
            log::error!("Request failed with status {}: {}", status_code, self);
        } else {
            log::warn!("Request rejected with status {}: {}", status_code, self);
        }

        let response_body = ApiResponse::<()>::error(&self.public_message());

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn employee_not_found_is_404() {
        let err = AppError::from(ClockError::EmployeeNotFound(7));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Employee 7 not found");
    }

    #[test]
    fn rule_violations_are_400() {
        let errors = [
            ClockError::EmployeeUnassigned(1),
            ClockError::ScheduleNotFound {
                role: "EMPLOYEE".to_string(),
                department_id: 3,
            },
            ClockError::AttendanceNotFound,
            ClockError::AlreadyOnBreak,
            ClockError::LunchTooEarly {
                start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            },
            ClockError::OvertimeExceedsLimit {
                requested: 5.0,
                limit: 4.0,
            },
        ];

        for clock_err in errors {
            assert_eq!(AppError::from(clock_err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::internal_server_error_message("connection reset by peer");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::from(ClockError::InvalidRecord("timeOut set while ONGOING"));
        assert!(err.is_internal());
    }

    #[test]
    fn validation_errors_are_input_errors() {
        let err = AppError::from(ValidationError::MissingTimestamp);
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
