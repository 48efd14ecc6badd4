pub mod app;
pub mod exit;
pub mod log;
pub mod plugin;
pub mod prelude;
pub mod schedules;
pub mod time;

mod limiter;
