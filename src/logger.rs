use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

/// Directive used when `RUST_LOG` is unset or empty.
pub const DEFAULT_DIRECTIVE: &str = "debris_tracker=info";

/// Install a stdout subscriber filtered by `RUST_LOG`, or by [`DEFAULT_DIRECTIVE`].
///
/// Meant for binaries; the library itself only emits events.
pub fn init_logging() -> Result<(), TryInitError> {
    let directives = std::env::var("RUST_LOG").unwrap_or_default();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stdout).with_target(true))
        .with(env_filter(&directives))
        .try_init()
}

fn env_filter(directives: &str) -> EnvFilter {
    if directives.trim().is_empty() {
        EnvFilter::new(DEFAULT_DIRECTIVE)
    } else {
        EnvFilter::new(directives)
    }
}
