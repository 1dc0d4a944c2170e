//! Live watcher: polls the followed-streams list, notifies about newly
//! live channels and auto-opens the pages of selected broadcasters.

pub mod app;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod infra;
pub mod messaging;
pub mod model;
pub mod ports;
pub mod server;
pub mod shutdown;
pub mod usecase;

#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::{init_foundation, spawn_background_tasks};
pub use error::{WatchError, WatchResult};
