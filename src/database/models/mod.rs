pub mod attendance;
pub mod employee;
pub(crate) mod macros;
pub mod overtime;
pub mod schedule;

// Re-export all models for easy importing
pub use attendance::*;
pub use employee::*;
pub use overtime::*;
pub use schedule::*;
