//! Command-line front end for `xapi-core`.
//!
//! The binary is a thin wrapper: [`CliConfig`] parses flags and environment
//! variables, [`init_logging`] installs a subscriber, and
//! [`commands::run`] does the work.

pub mod commands;
pub mod config;

pub use config::{CliConfig, Command};

/// Initializes tracing/logging.
///
/// `RUST_LOG` wins when set. Logs go to standard error so that standard
/// output only carries command output.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xapi_core={},xapi_cli={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
