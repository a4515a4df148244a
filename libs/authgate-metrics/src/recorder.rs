//! Recording traits and the no-op sink.

use std::time::Duration;

/// Shared, immutable metrics sink.
///
/// One recorder lives for the process lifetime; per-call scoping happens
/// through [`with_tags`](Self::with_tags), which must be cheap; it runs on
/// every intercepted call. Implementations must be safe to use from many
/// concurrent calls.
pub trait MetricsRecorder: Send + Sync {
    /// A handle scoped to an operation and a namespace tag.
    ///
    /// `namespace` is the already-resolved tag value: callers substitute
    /// their unknown-namespace sentinel before calling, so implementations
    /// never see an empty namespace.
    #[must_use]
    fn with_tags(&self, operation: &'static str, namespace: &str) -> Box<dyn MetricsScope>;
}

/// A tag-scoped recording handle, created fresh per call.
pub trait MetricsScope: Send + Sync {
    /// Add one to the named counter.
    fn increment_counter(&self, name: &'static str);

    /// Record one duration sample for the named timer.
    fn record_timer(&self, name: &'static str, elapsed: Duration);
}

/// Discards every sample. The default sink when a host wires no metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl MetricsRecorder for NoopRecorder {
    fn with_tags(&self, _operation: &'static str, _namespace: &str) -> Box<dyn MetricsScope> {
        Box::new(NoopScope)
    }
}

struct NoopScope;

impl MetricsScope for NoopScope {
    fn increment_counter(&self, _name: &'static str) {}

    fn record_timer(&self, _name: &'static str, _elapsed: Duration) {}
}
