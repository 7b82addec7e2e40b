use async_trait::async_trait;
use sqlx::PgPool;

use super::EmployeeStore;
use crate::database::{models::Employee, utils::sql};
use crate::error::AppError;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            SELECT
                id,
                role,
                department_id,
                is_active
            FROM
                employees
            WHERE
                id = ?
                AND deleted_at IS NULL
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<(), AppError> {
        sqlx::query(&sql(r#"
            UPDATE
                employees
            SET
                is_active = ?,
                updated_at = NOW()
            WHERE
                id = ?
        "#))
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
