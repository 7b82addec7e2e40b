use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::database::models::Schedule;
use crate::database::repositories::ScheduleStore;
use crate::error::AppError;

/// Read-through cache in front of a schedule store. Only hits are cached, so
/// a schedule created for a new (role, department) is visible immediately.
pub struct CachedScheduleStore {
    inner: Arc<dyn ScheduleStore>,
    cache: Cache<(String, i64), Schedule>,
}

impl CachedScheduleStore {
    pub fn new(inner: Arc<dyn ScheduleStore>, ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();

        Self { inner, cache }
    }

    pub async fn invalidate(&self, role: &str, department_id: i64) {
        self.cache
            .invalidate(&(role.to_string(), department_id))
            .await;
    }
}

#[async_trait]
impl ScheduleStore for CachedScheduleStore {
    async fn find_by_role_and_department(
        &self,
        role: &str,
        department_id: i64,
    ) -> Result<Option<Schedule>, AppError> {
        let key = (role.to_string(), department_id);
        if let Some(schedule) = self.cache.get(&key).await {
            return Ok(Some(schedule));
        }

        let schedule = self
            .inner
            .find_by_role_and_department(role, department_id)
            .await?;
        if let Some(found) = &schedule {
            self.cache.insert(key, found.clone()).await;
        }
        Ok(schedule)
    }
}
