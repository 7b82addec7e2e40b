use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::error::ValidationError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ScheduleType {
        Fixed => "FIXED",
        Flexi => "FLEXI",
        SuperFlexi => "SUPER_FLEXI",
    }
}

/// Work pattern for a (role, department) pair. Only the time-of-day of each
/// boundary is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub role: String,
    pub department_id: i64,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub start_time_limit: Option<NaiveTime>,
    pub lunch_start_time: Option<NaiveTime>,
    pub lunch_end_time: Option<NaiveTime>,
    pub allowed_overtime: bool,
    pub limit_work_hours_day: Option<f64>,
}

impl Schedule {
    /// Both lunch bounds, when the schedule defines a lunch window.
    pub fn lunch_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.lunch_start_time.zip(self.lunch_end_time)
    }

    /// Checks run by schedule writers before a schedule is stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidSchedule(
                "startTime must be before endTime",
            ));
        }

        match (self.lunch_start_time, self.lunch_end_time) {
            (Some(start), Some(end)) if start >= end => {
                return Err(ValidationError::InvalidSchedule(
                    "lunchStartTime must be before lunchEndTime",
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ValidationError::InvalidSchedule(
                    "lunch window needs both lunchStartTime and lunchEndTime",
                ));
            }
            _ => {}
        }

        if let Some(limit) = self.start_time_limit {
            if limit < self.start_time || limit > self.end_time {
                return Err(ValidationError::InvalidSchedule(
                    "startTimeLimit must fall between startTime and endTime",
                ));
            }
        }

        if let Some(cap) = self.limit_work_hours_day {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ValidationError::InvalidSchedule(
                    "limitWorkHoursDay must be a positive number",
                ));
            }
        }

        Ok(())
    }
}
