//! provides logging helpers

use tracing_subscriber::filter::{self};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// Environment variable holding the log filter directives.
pub const LOG_FILTER_ENV_VAR: &str = "RUST_LOG";

/// initiate the global tracing subscriber
///
/// Logs go to stderr so that manifests written to stdout stay clean.
pub fn init() {
    let env_filter = filter::EnvFilter::builder()
        .with_default_directive(filter::LevelFilter::INFO.into())
        .with_env_var(LOG_FILTER_ENV_VAR)
        .from_env_lossy();

    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    registry().with(fmt_layer).init();
}
