use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::database::models::AttendanceRecord;
use crate::database::repositories::AttendanceStore;
use crate::error::{AppError, ClockError};
use crate::services::clock::HoursPolicy;
use crate::services::notifier::{ATTENDANCE_TOPIC, Notifier};
use crate::services::time_of_day::{ZonedClock, round_hours};

/// Overtime approval workflow. It only moves the request status; time-out
/// reads that status when crediting the day.
#[derive(Clone)]
pub struct OvertimeService {
    attendance: Arc<dyn AttendanceStore>,
    notifier: Arc<dyn Notifier>,
    clock: ZonedClock,
    policy: HoursPolicy,
}

impl OvertimeService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        notifier: Arc<dyn Notifier>,
        clock: ZonedClock,
        policy: HoursPolicy,
    ) -> Self {
        Self {
            attendance,
            notifier,
            clock,
            policy,
        }
    }

    /// Asks for `hours` of overtime on the day `timestamp` falls on.
    pub async fn request(
        &self,
        employee_id: i64,
        hours: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        self.check_bounds(hours)?;

        let date = self.clock.local_date(timestamp);
        let mut record = self
            .attendance
            .find_by_employee_and_date(employee_id, date)
            .await?
            .ok_or(ClockError::AttendanceNotFound)?;

        record.request_overtime(round_hours(hours))?;
        let saved = self.persist(&record).await?;
        log::info!(
            "Employee {} requested {}h overtime on {}",
            employee_id,
            saved.requested_over_time,
            date
        );
        Ok(saved)
    }

    pub async fn accept(&self, attendance_id: i64) -> Result<AttendanceRecord, AppError> {
        self.decide(attendance_id, true).await
    }

    pub async fn reject(&self, attendance_id: i64) -> Result<AttendanceRecord, AppError> {
        self.decide(attendance_id, false).await
    }

    async fn decide(&self, attendance_id: i64, accept: bool) -> Result<AttendanceRecord, AppError> {
        let mut record = self
            .attendance
            .find_by_id(attendance_id)
            .await?
            .ok_or(ClockError::AttendanceNotFound)?;

        record.decide_overtime(accept)?;
        let saved = self.persist(&record).await?;
        log::info!(
            "Overtime request on attendance {} is now {}",
            attendance_id,
            saved.request_over_time_status
        );
        Ok(saved)
    }

    fn check_bounds(&self, hours: f64) -> Result<(), ClockError> {
        if hours < self.policy.overtime_min_hours {
            return Err(ClockError::OvertimeBelowMinimum {
                requested: hours,
                minimum: self.policy.overtime_min_hours,
            });
        }
        if hours > self.policy.overtime_limit_hours {
            return Err(ClockError::OvertimeExceedsLimit {
                requested: hours,
                limit: self.policy.overtime_limit_hours,
            });
        }
        Ok(())
    }

    async fn persist(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        record.validate()?;
        let saved = self.attendance.update(record).await?;
        self.notifier.notify(ATTENDANCE_TOPIC);
        Ok(saved)
    }
}
