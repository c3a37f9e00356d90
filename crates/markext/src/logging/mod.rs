//! Logging setup.
//!
//! The library itself only emits through the `log` facade; this module is a
//! convenience for tools and tests that want `env_logger` output.

mod init;

pub use init::{init_logging, LoggingConfig};
