//! Logging and tracing conventions for Caredesk.
//!
//! Caredesk uses the `tracing` crate for instrumentation and never installs
//! a subscriber itself. Hosts pick one, for example:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("caredesk=debug,caredesk_core=info")
//!     .init();
//! ```
//!
//! Every event is emitted with an explicit target from [`targets`] so that
//! subsystems can be filtered independently.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "caredesk_core";
    /// Signal/slot system target. Also the target of the `emit` span.
    pub const SIGNAL: &str = "caredesk_core::signal";
    /// Performance span target.
    pub const PERF: &str = "caredesk_core::perf";
    /// Property system target.
    pub const PROPERTY: &str = "caredesk_core::property";
    /// Patient selection context target.
    pub const SELECTION: &str = "caredesk::selection";
    /// Searchable option binder target.
    pub const BINDER: &str = "caredesk::binder";
    /// Form state target.
    pub const FORM: &str = "caredesk::form";
    /// Advisory access checks target.
    pub const ACCESS: &str = "caredesk::access";
    /// Configuration loading target.
    pub const CONFIG: &str = "caredesk::config";
}

/// A guard that records the duration of an operation as a tracing span.
///
/// The span is entered on creation and exited when the guard is dropped.
///
/// ```
/// use caredesk_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("filter_options");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_prefixes() {
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::PROPERTY.starts_with(targets::CORE));
        assert!(targets::PERF.starts_with(targets::CORE));
        for target in [targets::SELECTION, targets::BINDER, targets::FORM, targets::ACCESS] {
            assert!(target.starts_with("caredesk::"));
        }
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new("test_operation");
            tracing::trace!(target: targets::CORE, "inside perf span");
        });
    }
}
