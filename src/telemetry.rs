//! Structured logging setup, enabled by the `tracing` feature. Mirrors
//! the original's tracy/chrome subscriber wiring, trimmed to a plain
//! `fmt` layer filterable by `RUST_LOG` since this crate has no GUI or
//! profiler to feed.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `tracing` subscriber that writes to stderr,
/// filtered by `RUST_LOG` (defaulting to `info`). Call once, near the
/// start of a binary embedding this crate; a second call is a no-op
/// error from `tracing`'s global dispatcher, not a panic.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = fmt().with_env_filter(filter).try_init();
}
