//! Background polling engine: diffing, notification, auto-open and
//! suspend handling.

pub mod auto_open;
pub mod notification_tracker;
pub mod poll;
pub mod session_log;
pub mod suspend;

pub use notification_tracker::NotificationTracker;
pub use poll::{EngineOptions, PollEngine};
pub use session_log::SessionLog;
pub use suspend::SuspendController;

#[cfg(test)]
mod tests;
