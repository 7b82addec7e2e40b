use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::Config;
use crate::database::models::{
    AttendanceRecord, DayTotals, NewAttendance, Schedule, ScheduleType,
};
use crate::database::repositories::{AttendanceStore, EmployeeStore, ScheduleStore};
use crate::error::{AppError, ClockError};
use crate::services::notifier::{ATTENDANCE_TOPIC, Notifier};
use crate::services::time_of_day::{TimeOfDay, ZonedClock, hours_from_minutes, round_hours};

/// The four clock operations, as named on the wire and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockAction {
    TimeIn,
    TimeOut,
    LunchIn,
    LunchOut,
}

impl std::fmt::Display for ClockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockAction::TimeIn => write!(f, "time-in"),
            ClockAction::TimeOut => write!(f, "time-out"),
            ClockAction::LunchIn => write!(f, "lunch-in"),
            ClockAction::LunchOut => write!(f, "lunch-out"),
        }
    }
}

/// Hour limits applied when crediting a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursPolicy {
    /// Regular hours credited per day unless the schedule sets its own limit.
    pub regular_hours_cap: f64,
    pub overtime_limit_hours: f64,
    pub overtime_min_hours: f64,
}

impl HoursPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            regular_hours_cap: config.regular_hours_cap,
            overtime_limit_hours: config.overtime_limit_hours,
            overtime_min_hours: config.overtime_min_hours,
        }
    }
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            regular_hours_cap: 8.0,
            overtime_limit_hours: 4.0,
            overtime_min_hours: 0.5,
        }
    }
}

/// The clock engine: time-in, time-out and the lunch break, one attendance
/// record per employee per calendar day in the configured zone.
#[derive(Clone)]
pub struct ClockService {
    employees: Arc<dyn EmployeeStore>,
    schedules: Arc<dyn ScheduleStore>,
    attendance: Arc<dyn AttendanceStore>,
    notifier: Arc<dyn Notifier>,
    clock: ZonedClock,
    policy: HoursPolicy,
}

impl ClockService {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        schedules: Arc<dyn ScheduleStore>,
        attendance: Arc<dyn AttendanceStore>,
        notifier: Arc<dyn Notifier>,
        clock: ZonedClock,
        policy: HoursPolicy,
    ) -> Self {
        Self {
            employees,
            schedules,
            attendance,
            notifier,
            clock,
            policy,
        }
    }

    pub async fn apply(
        &self,
        action: ClockAction,
        employee_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        match action {
            ClockAction::TimeIn => self.time_in(employee_id, timestamp).await,
            ClockAction::TimeOut => self.time_out(employee_id, timestamp).await,
            ClockAction::LunchIn => self.lunch_in(employee_id, timestamp).await,
            ClockAction::LunchOut => self.lunch_out(employee_id, timestamp).await,
        }
    }

    pub async fn time_in(
        &self,
        employee_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        let schedule = self.load_schedule(employee_id).await?;
        let date = self.clock.local_date(timestamp);

        let record = match self
            .attendance
            .find_by_employee_and_date(employee_id, date)
            .await?
        {
            Some(mut existing) => {
                existing.resume()?;
                log::info!(
                    "Reopening attendance {} for employee {} on {}",
                    existing.id,
                    employee_id,
                    date
                );
                self.persist(&existing).await?
            }
            None => {
                let time_in = self.effective_time_in(&schedule, date, timestamp)?;
                let created = self
                    .attendance
                    .create(NewAttendance {
                        employee_id,
                        date,
                        schedule_type: schedule.schedule_type,
                        time_in,
                    })
                    .await?;
                log::info!(
                    "Employee {} timed in at {} ({})",
                    employee_id,
                    time_in,
                    schedule.schedule_type
                );
                created
            }
        };

        self.after_write(employee_id, Some(true)).await;
        Ok(record)
    }

    pub async fn time_out(
        &self,
        employee_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        let schedule = self.load_schedule(employee_id).await?;
        let date = self.clock.local_date(timestamp);
        let mut record = self.record_for(employee_id, date).await?;

        let time_in = record.time_in_for_time_out()?;
        let totals = self.day_totals(&record, &schedule, time_in, timestamp)?;
        record.close(totals);

        let saved = self.persist(&record).await?;
        log::info!(
            "Employee {} timed out: {}h worked, {}h overtime",
            employee_id,
            saved.time_hours_worked,
            saved.over_time_total
        );

        self.after_write(employee_id, Some(false)).await;
        Ok(saved)
    }

    pub async fn lunch_in(
        &self,
        employee_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        let schedule = self.load_schedule(employee_id).await?;
        let date = self.clock.local_date(timestamp);
        let mut record = self.record_for(employee_id, date).await?;

        record.ensure_can_start_lunch()?;
        if record.schedule_type == ScheduleType::Fixed {
            if let Some((start, end)) = schedule.lunch_window() {
                let hour = self.clock.normalize(timestamp).hour();
                if hour < TimeOfDay::from_time(start).hour() {
                    return Err(ClockError::LunchTooEarly { start }.into());
                }
                if hour > TimeOfDay::from_time(end).hour() {
                    return Err(ClockError::LunchTooLate { end }.into());
                }
            }
        }
        record.start_lunch(timestamp)?;

        let saved = self.persist(&record).await?;
        self.after_write(employee_id, None).await;
        Ok(saved)
    }

    pub async fn lunch_out(
        &self,
        employee_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AppError> {
        let schedule = self.load_schedule(employee_id).await?;
        let date = self.clock.local_date(timestamp);
        let mut record = self.record_for(employee_id, date).await?;

        let lunch_in = record.lunch_in_for_lunch_out()?;
        let mut lunch_out = timestamp;
        if record.schedule_type == ScheduleType::Fixed {
            if let Some((_, end)) = schedule.lunch_window() {
                if self.clock.normalize(timestamp).is_after(TimeOfDay::from_time(end)) {
                    lunch_out = self.clock.instant_at(record.date, end)?;
                }
            }
        }
        let lunch_out = lunch_out.max(lunch_in);

        let lunch_hours = self
            .clock
            .normalize(lunch_out)
            .hours_since(self.clock.normalize(lunch_in))
            .max(0.0);
        record.end_lunch(lunch_out, round_hours(lunch_hours));

        let saved = self.persist(&record).await?;
        self.after_write(employee_id, None).await;
        Ok(saved)
    }

    /// Today's record in the configured zone, if the employee has one.
    pub async fn attendance_today(
        &self,
        employee_id: i64,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        self.attendance_on(employee_id, Utc::now()).await
    }

    pub async fn attendance_on(
        &self,
        employee_id: i64,
        instant: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        self.attendance
            .find_by_employee_and_date(employee_id, self.clock.local_date(instant))
            .await
    }

    async fn load_schedule(&self, employee_id: i64) -> Result<Schedule, AppError> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or(ClockError::EmployeeNotFound(employee_id))?;

        let (role, department_id) = employee
            .assignment()
            .ok_or(ClockError::EmployeeUnassigned(employee_id))?;

        let schedule = self
            .schedules
            .find_by_role_and_department(role, department_id)
            .await?
            .ok_or_else(|| ClockError::ScheduleNotFound {
                role: role.to_string(),
                department_id,
            })?;

        Ok(schedule)
    }

    async fn record_for(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<AttendanceRecord, AppError> {
        let record = self
            .attendance
            .find_by_employee_and_date(employee_id, date)
            .await?
            .ok_or(ClockError::AttendanceNotFound)?;
        Ok(record)
    }

    async fn persist(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        record.validate()?;
        self.attendance.update(record).await
    }

    /// Side effects of a successful write. Failures are logged, never raised.
    async fn after_write(&self, employee_id: i64, is_active: Option<bool>) {
        if let Some(is_active) = is_active {
            if let Err(e) = self.employees.set_active(employee_id, is_active).await {
                log::warn!(
                    "Failed to set employee {} active={}: {}",
                    employee_id,
                    is_active,
                    e
                );
            }
        }
        self.notifier.notify(ATTENDANCE_TOPIC);
    }

    fn effective_time_in(
        &self,
        schedule: &Schedule,
        date: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ClockError> {
        let arrival = self.clock.normalize(timestamp);

        match schedule.schedule_type {
            ScheduleType::Fixed => {
                // No credit for arriving early
                if arrival.is_before(TimeOfDay::from_time(schedule.start_time)) {
                    return self.clock.instant_at(date, schedule.start_time);
                }
            }
            ScheduleType::Flexi => {
                if let Some(limit) = schedule.start_time_limit {
                    if arrival.is_after(TimeOfDay::from_time(limit)) {
                        return Err(ClockError::TimeInTooLate { limit });
                    }
                }
            }
            ScheduleType::SuperFlexi => {}
        }

        Ok(timestamp)
    }

    fn day_totals(
        &self,
        record: &AttendanceRecord,
        schedule: &Schedule,
        time_in: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    ) -> Result<DayTotals, ClockError> {
        let start = self.clock.normalize(time_in);
        let out = self.clock.normalize(timestamp);
        if out.is_before(start) {
            return Err(ClockError::TimeOutBeforeTimeIn);
        }

        let cap = schedule
            .limit_work_hours_day
            .unwrap_or(self.policy.regular_hours_cap);
        let elapsed = out.minutes_since(start);

        let (credited_minutes, time_out, fixed_overtime) = match record.schedule_type {
            ScheduleType::Fixed => {
                let end = TimeOfDay::from_time(schedule.end_time);
                if out.is_after(end) {
                    // Overtime runs from the scheduled end, or from time-in
                    // when the shift began after it
                    let window_start = start.max(end);
                    let beyond = out.minutes_since(window_start);
                    let window_instant = if start.is_after(end) {
                        time_in
                    } else {
                        self.clock.instant_at(record.date, schedule.end_time)?
                    };

                    if schedule.allowed_overtime {
                        (elapsed, timestamp, Some(hours_from_minutes(beyond)))
                    } else if let Some(approved) = record.accepted_overtime() {
                        let approved_minutes = (approved * 60.0).round() as i64;
                        if beyond > approved_minutes {
                            (
                                (elapsed - (beyond - approved_minutes)).max(0),
                                (window_instant + Duration::minutes(approved_minutes))
                                    .max(time_in),
                                Some(approved),
                            )
                        } else {
                            (elapsed, timestamp, Some(hours_from_minutes(beyond)))
                        }
                    } else {
                        (
                            (elapsed - beyond).max(0),
                            window_instant.max(time_in),
                            Some(0.0),
                        )
                    }
                } else {
                    (elapsed, timestamp, Some(0.0))
                }
            }
            ScheduleType::Flexi | ScheduleType::SuperFlexi => (elapsed, timestamp, None),
        };

        let time_total = hours_from_minutes(credited_minutes);
        let worked = (time_total - record.lunch_time_total).max(0.0);

        let over_time_total = match fixed_overtime {
            Some(hours) => hours,
            None => {
                let beyond_cap = (worked - cap).max(0.0);
                if schedule.allowed_overtime {
                    beyond_cap
                } else if let Some(approved) = record.accepted_overtime() {
                    beyond_cap.min(approved)
                } else {
                    0.0
                }
            }
        };

        Ok(DayTotals {
            time_out,
            time_total: round_hours(time_total),
            time_hours_worked: round_hours(worked.min(cap)),
            over_time_total: round_hours(over_time_total),
        })
    }
}
