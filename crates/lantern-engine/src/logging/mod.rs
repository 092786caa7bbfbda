//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only uses the `log` facade;
//! applications call [`init_logging`] once to install `env_logger`.

mod init;

pub use init::{LOG_ENV, LoggingConfig, init_logging};
