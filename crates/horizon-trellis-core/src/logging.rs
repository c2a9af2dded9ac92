//! Logging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::new("horizon_trellis=debug"))
//!     .init();
//! ```
//!
//! Every event emitted by the toolkit uses one of the [`targets`] below, so
//! filter directives can select a single subsystem.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Element contract and in-memory document target.
    pub const DOM: &str = "horizon_trellis_core::dom";
    /// MultipleSelect widget target.
    pub const MULTIPLE_SELECT: &str = "horizon_trellis::multiple_select";
    /// Searcher sub-component target.
    pub const SEARCHER: &str = "horizon_trellis::searcher";
}

/// Span names used throughout Horizon Trellis for tracing.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL_EMIT: &str = "horizon_trellis::signal_emit";
    /// Search recomputation span.
    pub const SEARCH: &str = "horizon_trellis::search";
    /// Event adapter dispatch span.
    pub const DISPATCH: &str = "horizon_trellis::dispatch";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_share_crate_prefixes() {
        assert!(targets::SIGNAL.starts_with("horizon_trellis_core::"));
        assert!(targets::DOM.starts_with("horizon_trellis_core::"));
        assert!(targets::SEARCHER.starts_with("horizon_trellis::"));
    }
}
