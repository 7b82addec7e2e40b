use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use super::AttendanceStore;
use crate::database::{
    models::{AttendanceRecord, AttendanceStatus, NewAttendance, OvertimeRequestStatus, RequestStatus},
    utils::sql,
};
use crate::error::{AppError, ClockError};

const ATTENDANCE_COLUMNS: &str = r#"
    id,
    employee_id,
    date,
    status,
    schedule_type,
    time_in,
    time_out,
    lunch_time_in,
    lunch_time_out,
    lunch_time_total,
    time_hours_worked,
    over_time_total,
    time_total,
    request_over_time_status,
    requested_over_time,
    request_leave_status,
    created_at,
    updated_at,
    deleted_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn find_by_employee_and_date(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let query = sql(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE employee_id = ? AND date = ? AND deleted_at IS NULL
            "#
        ));

        let record = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>, AppError> {
        let query = sql(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE id = ? AND deleted_at IS NULL
            "#
        ));

        let record = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn create(&self, input: NewAttendance) -> Result<AttendanceRecord, AppError> {
        let now = Utc::now();
        let query = sql(&format!(
            r#"
            INSERT INTO
                attendance (
                    employee_id,
                    date,
                    status,
                    schedule_type,
                    time_in,
                    request_over_time_status,
                    request_leave_status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ));

        let created = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(input.employee_id)
            .bind(input.date)
            .bind(AttendanceStatus::Ongoing)
            .bind(input.schedule_type)
            .bind(input.time_in)
            .bind(OvertimeRequestStatus::default())
            .bind(RequestStatus::default())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match created {
            Ok(record) => Ok(record),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                log::info!(
                    "Attendance for employee {} on {} already exists",
                    input.employee_id,
                    input.date
                );
                Err(ClockError::AlreadyClockedInToday.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let query = sql(&format!(
            r#"
            UPDATE
                attendance
            SET
                status = ?,
                time_in = ?,
                time_out = ?,
                lunch_time_in = ?,
                lunch_time_out = ?,
                lunch_time_total = ?,
                time_hours_worked = ?,
                over_time_total = ?,
                time_total = ?,
                request_over_time_status = ?,
                requested_over_time = ?,
                updated_at = ?
            WHERE
                id = ? AND deleted_at IS NULL
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ));

        let updated = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(record.status)
            .bind(record.time_in)
            .bind(record.time_out)
            .bind(record.lunch_time_in)
            .bind(record.lunch_time_out)
            .bind(record.lunch_time_total)
            .bind(record.time_hours_worked)
            .bind(record.over_time_total)
            .bind(record.time_total)
            .bind(record.request_over_time_status)
            .bind(record.requested_over_time)
            .bind(Utc::now())
            .bind(record.id)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or_else(|| ClockError::AttendanceNotFound.into())
    }
}
