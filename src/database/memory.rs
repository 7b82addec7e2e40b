//! In-process implementations of the store traits.
//!
//! They keep the same contracts as the Postgres repositories, including the
//! one-record-per-employee-day rule, and are what the test suites run against.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::database::models::{AttendanceRecord, Employee, NewAttendance, Schedule};
use crate::database::repositories::{AttendanceStore, EmployeeStore, ScheduleStore};
use crate::error::{AppError, ClockError, ValidationError};

#[derive(Default)]
struct Tables {
    employees: HashMap<i64, Employee>,
    schedules: Vec<Schedule>,
    attendance: Vec<AttendanceRecord>,
    next_attendance_id: i64,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    schedule_lookups: AtomicUsize,
    fail_writes: AtomicBool,
    fail_set_active: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_employee(&self, employee: Employee) {
        self.tables
            .lock()
            .await
            .employees
            .insert(employee.id, employee);
    }

    /// Stores a schedule after the same checks a schedule writer runs.
    pub async fn insert_schedule(&self, schedule: Schedule) -> Result<(), ValidationError> {
        schedule.validate()?;

        let mut tables = self.tables.lock().await;
        tables.schedules.retain(|existing| {
            existing.role != schedule.role || existing.department_id != schedule.department_id
        });
        tables.schedules.push(schedule);
        Ok(())
    }

    pub async fn employee(&self, id: i64) -> Option<Employee> {
        self.tables.lock().await.employees.get(&id).cloned()
    }

    /// Every stored record, deleted ones included.
    pub async fn attendance_records(&self) -> Vec<AttendanceRecord> {
        self.tables.lock().await.attendance.clone()
    }

    /// Soft-deletes a record the way an admin action would.
    pub async fn delete_attendance(&self, id: i64) -> bool {
        let mut tables = self.tables.lock().await;
        match tables
            .attendance
            .iter_mut()
            .find(|record| record.id == id && record.deleted_at.is_none())
        {
            Some(record) => {
                record.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    pub fn schedule_lookups(&self) -> usize {
        self.schedule_lookups.load(Ordering::SeqCst)
    }

    /// Makes attendance writes fail the way a lost database connection would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_set_active(&self, fail: bool) {
        self.fail_set_active.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal_server_error_message(
                "attendance store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, AppError> {
        Ok(self.employee(id).await)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<(), AppError> {
        if self.fail_set_active.load(Ordering::SeqCst) {
            return Err(AppError::internal_server_error_message(
                "employee store unavailable",
            ));
        }

        if let Some(employee) = self.tables.lock().await.employees.get_mut(&id) {
            employee.is_active = is_active;
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn find_by_role_and_department(
        &self,
        role: &str,
        department_id: i64,
    ) -> Result<Option<Schedule>, AppError> {
        self.schedule_lookups.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.lock().await;
        Ok(tables
            .schedules
            .iter()
            .find(|schedule| schedule.role == role && schedule.department_id == department_id)
            .cloned())
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn find_by_employee_and_date(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .attendance
            .iter()
            .find(|record| {
                record.employee_id == employee_id
                    && record.date == date
                    && record.deleted_at.is_none()
            })
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .attendance
            .iter()
            .find(|record| record.id == id && record.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, input: NewAttendance) -> Result<AttendanceRecord, AppError> {
        self.check_writable()?;

        let mut tables = self.tables.lock().await;
        let exists = tables.attendance.iter().any(|record| {
            record.employee_id == input.employee_id
                && record.date == input.date
                && record.deleted_at.is_none()
        });
        if exists {
            return Err(ClockError::AlreadyClockedInToday.into());
        }

        tables.next_attendance_id += 1;
        let record = AttendanceRecord::open(tables.next_attendance_id, input, Utc::now());
        tables.attendance.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        self.check_writable()?;

        let mut tables = self.tables.lock().await;
        let stored = tables
            .attendance
            .iter_mut()
            .find(|stored| stored.id == record.id && stored.deleted_at.is_none())
            .ok_or(ClockError::AttendanceNotFound)?;

        *stored = AttendanceRecord {
            updated_at: Utc::now(),
            ..record.clone()
        };
        Ok(stored.clone())
    }
}
