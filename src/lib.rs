pub mod api;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod format;
pub mod forms;
pub mod session;
pub mod state;
pub mod sync;
