#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthGate` metrics facade
//!
//! Narrow recording interface the authorization interceptor emits through:
//!
//! - [`MetricsRecorder`] - shared sink, builds per-call tag scopes
//! - [`MetricsScope`] - counter/timer handle scoped to operation + namespace
//! - [`names`] - the metric and tag name constants
//! - [`NoopRecorder`] - default sink that discards everything
//! - [`testing::CapturingRecorder`] - in-memory sink for assertions
//!
//! Hosts adapt their metrics system (statsd, OTLP, whatever) by implementing
//! the two traits; nothing here depends on a concrete metrics backend.

pub mod names;
pub mod recorder;
pub mod testing;

// Re-export main types at crate root
pub use recorder::{MetricsRecorder, MetricsScope, NoopRecorder};
