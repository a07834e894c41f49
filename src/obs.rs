//! Logging shims.
//!
//! With the `logging` feature the macros forward to `tracing`; without it
//! they expand to nothing and the arguments are never evaluated.

#[cfg(feature = "logging")]
macro_rules! obs_trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! obs_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! obs_debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! obs_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! obs_warn {
    ($($arg:tt)*) => { ::tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! obs_warn {
    ($($arg:tt)*) => {};
}

pub(crate) use obs_debug;
pub(crate) use obs_trace;
pub(crate) use obs_warn;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(feature = "logging")]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Logging is compiled out without the `logging` feature.
#[cfg(not(feature = "logging"))]
pub fn init_logging() {}
