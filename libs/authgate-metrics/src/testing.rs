//! In-memory recorder for assertions in tests.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::recorder::{MetricsRecorder, MetricsScope};

/// One recorded counter increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSample {
    /// Operation tag the scope was built with.
    pub operation: &'static str,
    /// Namespace tag the scope was built with.
    pub namespace: String,
    /// Counter name.
    pub name: &'static str,
}

/// One recorded timer sample.
#[derive(Debug, Clone)]
pub struct TimerSample {
    /// Operation tag the scope was built with.
    pub operation: &'static str,
    /// Namespace tag the scope was built with.
    pub namespace: String,
    /// Timer name.
    pub name: &'static str,
    /// The recorded duration.
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct Captured {
    counters: Vec<CounterSample>,
    timers: Vec<TimerSample>,
}

/// A [`MetricsRecorder`] that keeps every sample in memory.
///
/// Clones share storage, so a test can hand one clone to the code under test
/// and keep another for assertions.
#[derive(Debug, Clone, Default)]
pub struct CapturingRecorder {
    captured: Arc<Mutex<Captured>>,
}

impl CapturingRecorder {
    /// Fresh recorder with empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every counter increment recorded so far, in order.
    #[must_use]
    pub fn counters(&self) -> Vec<CounterSample> {
        self.captured.lock().counters.clone()
    }

    /// Every timer sample recorded so far, in order.
    #[must_use]
    pub fn timers(&self) -> Vec<TimerSample> {
        self.captured.lock().timers.clone()
    }

    /// Total increments of the named counter across all scopes.
    #[must_use]
    pub fn counter_total(&self, name: &str) -> usize {
        self.captured
            .lock()
            .counters
            .iter()
            .filter(|sample| sample.name == name)
            .count()
    }

    /// Total samples of the named timer across all scopes.
    #[must_use]
    pub fn timer_total(&self, name: &str) -> usize {
        self.captured
            .lock()
            .timers
            .iter()
            .filter(|sample| sample.name == name)
            .count()
    }

    /// Whether nothing at all has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let captured = self.captured.lock();
        captured.counters.is_empty() && captured.timers.is_empty()
    }
}

impl MetricsRecorder for CapturingRecorder {
    fn with_tags(&self, operation: &'static str, namespace: &str) -> Box<dyn MetricsScope> {
        Box::new(CapturingScope {
            captured: Arc::clone(&self.captured),
            operation,
            namespace: namespace.to_owned(),
        })
    }
}

struct CapturingScope {
    captured: Arc<Mutex<Captured>>,
    operation: &'static str,
    namespace: String,
}

impl MetricsScope for CapturingScope {
    fn increment_counter(&self, name: &'static str) {
        self.captured.lock().counters.push(CounterSample {
            operation: self.operation,
            namespace: self.namespace.clone(),
            name,
        });
    }

    fn record_timer(&self, name: &'static str, elapsed: Duration) {
        self.captured.lock().timers.push(TimerSample {
            operation: self.operation,
            namespace: self.namespace.clone(),
            name,
            elapsed,
        });
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn captures_counters_with_scope_tags() {
        let recorder = CapturingRecorder::new();
        let scope = recorder.with_tags("Authorization", "ns1");
        scope.increment_counter("service_errors_unauthorized");
        scope.increment_counter("service_errors_unauthorized");

        assert_eq!(recorder.counter_total("service_errors_unauthorized"), 2);
        let counters = recorder.counters();
        assert_eq!(counters[0].namespace, "ns1");
        assert_eq!(counters[0].operation, "Authorization");
    }

    #[test]
    fn captures_timers() {
        let recorder = CapturingRecorder::new();
        recorder
            .with_tags("Authorization", "_unknown_")
            .record_timer("service_authorization_latency", Duration::from_micros(250));

        assert_eq!(recorder.timer_total("service_authorization_latency"), 1);
        assert_eq!(recorder.timers()[0].namespace, "_unknown_");
    }

    #[test]
    fn clones_share_storage() {
        let recorder = CapturingRecorder::new();
        let handle = recorder.clone();
        recorder
            .with_tags("Authorization", "ns1")
            .increment_counter("service_errors_authorize_failed");

        assert_eq!(handle.counter_total("service_errors_authorize_failed"), 1);
        assert!(!handle.is_empty());
    }
}
