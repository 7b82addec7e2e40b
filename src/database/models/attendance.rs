use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::{OvertimeRequestStatus, ScheduleType};
use crate::error::ClockError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AttendanceStatus {
        Ongoing => "ONGOING",
        Break => "BREAK",
        Done => "DONE",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum RequestStatus {
        #[default]
        NoRequest => "NO_REQUEST",
        Pending => "PENDING",
        ApprovedByAdmin => "APPROVED_BY_ADMIN",
        RejectByAdmin => "REJECT_BY_ADMIN",
        RejectByTeamLeader => "REJECT_BY_TEAM_LEADER",
    }
}

/// One employee's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Copied from the schedule at time-in; later schedule edits leave it alone.
    pub schedule_type: ScheduleType,
    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,
    pub lunch_time_in: Option<DateTime<Utc>>,
    pub lunch_time_out: Option<DateTime<Utc>>,
    pub lunch_time_total: f64,
    pub time_hours_worked: f64,
    pub over_time_total: f64,
    pub time_total: f64,
    pub request_over_time_status: OvertimeRequestStatus,
    pub requested_over_time: f64,
    pub request_leave_status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub schedule_type: ScheduleType,
    pub time_in: DateTime<Utc>,
}

/// Values computed at time-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotals {
    pub time_out: DateTime<Utc>,
    pub time_total: f64,
    pub time_hours_worked: f64,
    pub over_time_total: f64,
}

impl AttendanceRecord {
    /// Builds the ONGOING record a first time-in of the day creates.
    pub fn open(id: i64, input: NewAttendance, now: DateTime<Utc>) -> Self {
        Self {
            id,
            employee_id: input.employee_id,
            date: input.date,
            status: AttendanceStatus::Ongoing,
            schedule_type: input.schedule_type,
            time_in: Some(input.time_in),
            time_out: None,
            lunch_time_in: None,
            lunch_time_out: None,
            lunch_time_total: 0.0,
            time_hours_worked: 0.0,
            over_time_total: 0.0,
            time_total: 0.0,
            request_over_time_status: OvertimeRequestStatus::default(),
            requested_over_time: 0.0,
            request_leave_status: RequestStatus::default(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        self.time_out.is_some() || self.status == AttendanceStatus::Done
    }

    pub fn is_on_break(&self) -> bool {
        self.status == AttendanceStatus::Break
    }

    /// Reopens the day after a time-out. Time-in, lunch and the schedule
    /// snapshot are kept; everything derived at time-out is cleared.
    pub fn resume(&mut self) -> Result<(), ClockError> {
        if self.is_on_break() {
            return Err(ClockError::AlreadyOnBreak);
        }

        self.status = AttendanceStatus::Ongoing;
        self.time_out = None;
        self.time_total = 0.0;
        self.time_hours_worked = 0.0;
        self.over_time_total = 0.0;
        Ok(())
    }

    /// The time-in a time-out will be measured from.
    pub fn time_in_for_time_out(&self) -> Result<DateTime<Utc>, ClockError> {
        if self.is_timed_out() {
            return Err(ClockError::AlreadyTimedOut);
        }
        let time_in = self.time_in.ok_or(ClockError::MissingTimeIn)?;
        if self.is_on_break() {
            return Err(ClockError::OnBreak);
        }
        Ok(time_in)
    }

    pub fn close(&mut self, totals: DayTotals) {
        self.time_out = Some(totals.time_out);
        self.time_total = totals.time_total;
        self.time_hours_worked = totals.time_hours_worked;
        self.over_time_total = totals.over_time_total;
        self.status = AttendanceStatus::Done;
    }

    pub fn ensure_can_start_lunch(&self) -> Result<(), ClockError> {
        if self.is_timed_out() {
            return Err(ClockError::AlreadyTimedOut);
        }
        if self.is_on_break() {
            return Err(ClockError::AlreadyOnBreak);
        }
        Ok(())
    }

    /// Starts (or resumes) the lunch break. An earlier lunch start is kept.
    pub fn start_lunch(&mut self, at: DateTime<Utc>) -> Result<(), ClockError> {
        self.ensure_can_start_lunch()?;

        self.lunch_time_in.get_or_insert(at);
        self.lunch_time_out = None;
        self.lunch_time_total = 0.0;
        self.status = AttendanceStatus::Break;
        Ok(())
    }

    /// The lunch start a lunch-out will be measured from.
    pub fn lunch_in_for_lunch_out(&self) -> Result<DateTime<Utc>, ClockError> {
        if self.is_timed_out() {
            return Err(ClockError::AlreadyTimedOut);
        }
        let lunch_in = self.lunch_time_in.ok_or(ClockError::LunchNotStarted)?;
        if self.lunch_time_out.is_some() {
            return Err(ClockError::LunchAlreadyEnded);
        }
        Ok(lunch_in)
    }

    pub fn end_lunch(&mut self, at: DateTime<Utc>, lunch_hours: f64) {
        self.lunch_time_out = Some(at);
        self.lunch_time_total = lunch_hours;
        self.status = AttendanceStatus::Ongoing;
    }

    pub fn request_overtime(&mut self, hours: f64) -> Result<(), ClockError> {
        if self.is_timed_out() {
            return Err(ClockError::AlreadyTimedOut);
        }
        self.request_over_time_status = self.request_over_time_status.request()?;
        self.requested_over_time = hours;
        Ok(())
    }

    pub fn decide_overtime(&mut self, accept: bool) -> Result<(), ClockError> {
        self.request_over_time_status = if accept {
            self.request_over_time_status.accept()?
        } else {
            self.request_over_time_status.reject()?
        };
        Ok(())
    }

    /// Overtime hours an accepted request entitles the day to.
    pub fn accepted_overtime(&self) -> Option<f64> {
        self.request_over_time_status
            .is_accepted()
            .then_some(self.requested_over_time)
    }

    /// Record-level invariants checked before every write.
    pub fn validate(&self) -> Result<(), ClockError> {
        if self.time_out.is_some() && self.status != AttendanceStatus::Done {
            return Err(ClockError::InvalidRecord("timeOut is set but status is not DONE"));
        }

        match (self.lunch_time_in, self.lunch_time_out) {
            (None, Some(_)) => {
                return Err(ClockError::InvalidRecord("lunchTimeOut is set without lunchTimeIn"));
            }
            (Some(lunch_in), Some(lunch_out)) if lunch_out < lunch_in => {
                return Err(ClockError::InvalidRecord("lunchTimeOut precedes lunchTimeIn"));
            }
            _ => {}
        }

        let totals = [
            self.lunch_time_total,
            self.time_hours_worked,
            self.over_time_total,
            self.time_total,
            self.requested_over_time,
        ];
        if totals.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(ClockError::InvalidRecord("hour totals must be non-negative"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn ongoing() -> AttendanceRecord {
        AttendanceRecord::open(
            1,
            NewAttendance {
                employee_id: 10,
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                schedule_type: ScheduleType::Fixed,
                time_in: at(0, 0),
            },
            at(0, 0),
        )
    }

    #[test]
    fn lunch_moves_between_break_and_ongoing() {
        let mut record = ongoing();

        record.start_lunch(at(4, 0)).unwrap();
        assert_eq!(record.status, AttendanceStatus::Break);
        assert_eq!(record.start_lunch(at(4, 5)), Err(ClockError::AlreadyOnBreak));

        let lunch_in = record.lunch_in_for_lunch_out().unwrap();
        assert_eq!(lunch_in, at(4, 0));
        record.end_lunch(at(5, 0), 1.0);
        assert_eq!(record.status, AttendanceStatus::Ongoing);
        assert_eq!(record.lunch_in_for_lunch_out(), Err(ClockError::LunchAlreadyEnded));
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn second_lunch_keeps_the_first_start() {
        let mut record = ongoing();
        record.start_lunch(at(4, 0)).unwrap();
        record.end_lunch(at(4, 30), 0.5);

        record.start_lunch(at(5, 0)).unwrap();
        assert_eq!(record.lunch_time_in, Some(at(4, 0)));
        assert_eq!(record.lunch_time_out, None);
        assert_eq!(record.lunch_time_total, 0.0);
    }

    #[test]
    fn time_out_is_blocked_on_break() {
        let mut record = ongoing();
        record.start_lunch(at(4, 0)).unwrap();
        assert_eq!(record.time_in_for_time_out(), Err(ClockError::OnBreak));
    }

    #[test]
    fn closed_day_rejects_lunch_and_reopens_on_resume() {
        let mut record = ongoing();
        record.close(DayTotals {
            time_out: at(9, 0),
            time_total: 9.0,
            time_hours_worked: 8.0,
            over_time_total: 0.0,
        });
        assert_eq!(record.status, AttendanceStatus::Done);
        assert_eq!(record.start_lunch(at(9, 30)), Err(ClockError::AlreadyTimedOut));
        assert_eq!(record.lunch_in_for_lunch_out(), Err(ClockError::AlreadyTimedOut));
        assert_eq!(record.time_in_for_time_out(), Err(ClockError::AlreadyTimedOut));

        record.resume().unwrap();
        assert_eq!(record.status, AttendanceStatus::Ongoing);
        assert_eq!(record.time_out, None);
        assert_eq!(record.time_hours_worked, 0.0);
        assert_eq!(record.time_in, Some(at(0, 0)));
    }

    #[test]
    fn validate_catches_a_dangling_lunch_out() {
        let mut record = ongoing();
        record.lunch_time_out = Some(at(5, 0));
        assert!(record.validate().is_err());

        let mut record = ongoing();
        record.time_out = Some(at(9, 0));
        assert!(record.validate().is_err());
    }

    #[test]
    fn accepted_overtime_is_only_reported_once_accepted() {
        let mut record = ongoing();
        record.request_overtime(2.0).unwrap();
        assert_eq!(record.accepted_overtime(), None);

        record.decide_overtime(true).unwrap();
        assert_eq!(record.accepted_overtime(), Some(2.0));
        assert!(record.decide_overtime(false).is_err());
    }
}
