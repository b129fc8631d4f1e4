use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing subscriber for interactive use.
/// - Respects `RUST_LOG` if set
/// - Falls back to `warn,service=info` so command output stays readable
/// - Writes to stderr; stdout is reserved for command results
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,service=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info,service::http=debug`
/// - Emits one JSON object per event for machine parsing
pub fn init_logging_json() {
    // request-level fallback decisions are logged at debug under service::http
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,service::http=debug"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}
