//! Tracing/logging setup shared by every stockgate binary and test harness.

/// Initialize process-wide tracing with the `info` fallback directive.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Initialize process-wide tracing, using `default_directive` when `RUST_LOG`
/// is not set (typically `AppConfig::log_filter`).
pub fn init_with_default(default_directive: &str) {
    tracing::init(default_directive);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
