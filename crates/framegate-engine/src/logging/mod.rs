//! Logging utilities.
//!
//! Logger initialization lives here so the binary and tests agree on filters.
//! Everything else logs through the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
