/// Application-level constants
pub const APP_NAME: &str = "Labtrail";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default lookback window for personal baseline statistics, in years.
pub const DEFAULT_LOOKBACK_YEARS: u32 = 2;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "labtrail=info"
}
