//! `tracing` subscriber setup for the command-line tool.

use tracing_subscriber::EnvFilter;

/// Installs a compact stderr subscriber. `RUST_LOG` wins when set; otherwise
/// only warnings are shown, or debug output with `verbose`.
///
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "metaclean=debug"
    } else {
        "metaclean=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
