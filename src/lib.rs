use std::sync::Arc;

use actix_web::web;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
use database::repositories::{AttendanceStore, EmployeeStore, ScheduleStore};
use services::{
    CachedScheduleStore, ClockService, HoursPolicy, Notifier, OvertimeService, ZonedClock,
};

/// The services handlers run against, wired once per process.
#[derive(Clone)]
pub struct AppState {
    pub clock_service: ClockService,
    pub overtime_service: OvertimeService,
    /// Schedule writers call [`AppState::schedule_changed`] through this handle.
    pub schedule_cache: Arc<CachedScheduleStore>,
}

impl AppState {
    /// Builds both services over the given stores. Schedule lookups go
    /// through a TTL cache.
    pub fn new(
        config: &Config,
        employees: Arc<dyn EmployeeStore>,
        schedules: Arc<dyn ScheduleStore>,
        attendance: Arc<dyn AttendanceStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let clock = ZonedClock::new(config.time_zone);
        let policy = HoursPolicy::from_config(config);
        let schedule_cache = Arc::new(CachedScheduleStore::new(
            schedules,
            config.schedule_cache_ttl_secs,
        ));
        let schedules: Arc<dyn ScheduleStore> = schedule_cache.clone();

        Self {
            clock_service: ClockService::new(
                employees,
                schedules,
                attendance.clone(),
                notifier.clone(),
                clock,
                policy,
            ),
            overtime_service: OvertimeService::new(attendance, notifier, clock, policy),
            schedule_cache,
        }
    }

    /// Drops the cached schedule for a role and department so the next
    /// clock action reads the stored one.
    pub async fn schedule_changed(&self, role: &str, department_id: i64) {
        self.schedule_cache.invalidate(role, department_id).await;
    }

    /// Registers the services, the JSON body config and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.clock_service.clone()))
            .app_data(web::Data::new(self.overtime_service.clone()))
            .app_data(routes::json_config())
            .configure(routes::configure);
    }
}
