//! Tracing subscriber setup for the CLI.
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install a stderr subscriber once for the process.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Classified errors
/// are additionally gated by the configured trace level.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let result = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init();
        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
