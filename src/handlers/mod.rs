pub mod attendance;
pub mod overtime;
pub mod shared;
