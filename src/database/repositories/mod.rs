use async_trait::async_trait;
use chrono::NaiveDate;

use crate::database::models::{AttendanceRecord, Employee, NewAttendance, Schedule};
use crate::error::AppError;

pub mod attendance;
pub mod employee;
pub mod schedule;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use employee::EmployeeRepository;
pub use schedule::ScheduleRepository;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, AppError>;

    async fn set_active(&self, id: i64, is_active: bool) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn find_by_role_and_department(
        &self,
        role: &str,
        department_id: i64,
    ) -> Result<Option<Schedule>, AppError>;
}

/// Attendance persistence. Implementations must hold at most one non-deleted
/// record per (employee, date) and report a second `create` as
/// [`ClockError::AlreadyClockedInToday`](crate::error::ClockError).
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_by_employee_and_date(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>, AppError>;

    async fn create(&self, input: NewAttendance) -> Result<AttendanceRecord, AppError>;

    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError>;
}
