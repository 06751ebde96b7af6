//! Tracing setup for the `buildctx` binary.
//!
//! Logs go to stderr so stdout stays reserved for `setup --json`. The
//! informational lines reported during setup are emitted at `info`, which is
//! enabled by default.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "buildctx=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; falls back to [`DEFAULT_FILTER`].
///
/// # Example
/// ```bash
/// RUST_LOG=buildctx=debug buildctx setup
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
