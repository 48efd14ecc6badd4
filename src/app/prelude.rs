pub use super::app::{App, FrameConfig};
pub use super::exit::ExitCmdExt;
pub use super::log::{LogConfig, LogPlugin};
pub use super::plugin::{MainPlugins, Plugin};
pub use super::schedules::*;
pub use super::time::{Time, TimePlugin};
