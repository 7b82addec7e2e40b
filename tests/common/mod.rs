#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Asia::Manila;

use timekeeping::AppState;
use timekeeping::config::Config;
use timekeeping::database::memory::InMemoryStore;
use timekeeping::database::models::{Employee, Schedule, ScheduleType};
use timekeeping::services::{
    BroadcastNotifier, ClockService, HoursPolicy, OvertimeService, ZonedClock,
};

pub const EMPLOYEE_ID: i64 = 1;
pub const ROLE: &str = "AGENT";
pub const DEPARTMENT_ID: i64 = 10;

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// The calendar day most tests clock on, a Monday.
pub fn work_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

/// Manila wall-clock time on [`work_day`] as a UTC instant.
pub fn manila(hour: u32, minute: u32) -> DateTime<Utc> {
    Manila
        .with_ymd_and_hms(2024, 5, 6, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// FIXED 08:00-17:00 with a 12:00-13:00 lunch window and no overtime.
pub fn fixed_schedule() -> Schedule {
    Schedule {
        id: 1,
        role: ROLE.to_string(),
        department_id: DEPARTMENT_ID,
        schedule_type: ScheduleType::Fixed,
        start_time: hm(8, 0),
        end_time: hm(17, 0),
        start_time_limit: None,
        lunch_start_time: Some(hm(12, 0)),
        lunch_end_time: Some(hm(13, 0)),
        allowed_overtime: false,
        limit_work_hours_day: None,
    }
}

/// FLEXI 07:00-19:00 that must be started by 10:00.
pub fn flexi_schedule() -> Schedule {
    Schedule {
        schedule_type: ScheduleType::Flexi,
        start_time: hm(7, 0),
        end_time: hm(19, 0),
        start_time_limit: Some(hm(10, 0)),
        lunch_start_time: None,
        lunch_end_time: None,
        ..fixed_schedule()
    }
}

pub fn super_flexi_schedule() -> Schedule {
    Schedule {
        schedule_type: ScheduleType::SuperFlexi,
        start_time_limit: Some(hm(9, 0)),
        ..flexi_schedule()
    }
}

pub fn assigned_employee(id: i64) -> Employee {
    Employee {
        id,
        role: Some(ROLE.to_string()),
        department_id: Some(DEPARTMENT_ID),
        is_active: false,
    }
}

pub struct TestContext {
    pub config: Config,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<BroadcastNotifier>,
    pub clock: ClockService,
    pub overtime: OvertimeService,
}

impl TestContext {
    /// One assigned employee ([`EMPLOYEE_ID`]) working `schedule`. The
    /// services read the store directly, so schedule edits apply at once.
    pub async fn new(schedule: Schedule) -> Self {
        setup_test_env();

        let config = Config::test_config();
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(BroadcastNotifier::default());

        store.insert_employee(assigned_employee(EMPLOYEE_ID)).await;
        store.insert_schedule(schedule).await.unwrap();

        let zoned = ZonedClock::new(config.time_zone);
        let policy = HoursPolicy::from_config(&config);
        let clock = ClockService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            zoned,
            policy,
        );
        let overtime = OvertimeService::new(store.clone(), notifier.clone(), zoned, policy);

        Self {
            config,
            store,
            notifier,
            clock,
            overtime,
        }
    }

    /// Fully wired state over the same store, as the server builds it.
    pub fn app_state(&self) -> AppState {
        AppState::new(
            &self.config,
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.notifier.clone(),
        )
    }
}
