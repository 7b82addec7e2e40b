use async_trait::async_trait;
use sqlx::PgPool;

use super::ScheduleStore;
use crate::database::{models::Schedule, utils::sql};
use crate::error::AppError;

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    async fn find_by_role_and_department(
        &self,
        role: &str,
        department_id: i64,
    ) -> Result<Option<Schedule>, AppError> {
        let schedule = sqlx::query_as::<_, Schedule>(&sql(r#"
            SELECT
                id,
                role,
                department_id,
                schedule_type,
                start_time,
                end_time,
                start_time_limit,
                lunch_start_time,
                lunch_end_time,
                allowed_overtime,
                limit_work_hours_day
            FROM
                schedules
            WHERE
                role = ?
                AND department_id = ?
                AND deleted_at IS NULL
        "#))
        .bind(role)
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }
}
