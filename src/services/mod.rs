pub mod clock;
pub mod notifier;
pub mod overtime;
pub mod schedule_cache;
pub mod time_of_day;

pub use clock::{ClockAction, ClockService, HoursPolicy};
pub use notifier::{BroadcastNotifier, Notifier};
pub use overtime::OvertimeService;
pub use schedule_cache::CachedScheduleStore;
pub use time_of_day::{TimeOfDay, ZonedClock};
