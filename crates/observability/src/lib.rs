//! Tracing/logging setup shared by every process embedding the engine.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};

/// Initialize process-wide logging with defaults (`info`, JSON).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&LogSettings::default());
}

/// Initialize process-wide logging from explicit settings.
pub fn init_with(settings: &LogSettings) {
    tracing::init(settings);
}
