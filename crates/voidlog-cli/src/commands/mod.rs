pub mod config;
pub mod history;
pub mod reset;
pub mod status;
pub mod watch;
