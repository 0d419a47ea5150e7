use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a stderr subscriber so engine diagnostics never mix with
/// command output on stdout. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
