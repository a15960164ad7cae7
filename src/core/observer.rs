//! Injected diagnostics sink.
//!
//! The engine reports faults and placement decisions here instead of
//! logging from its control flow, so tests can assert on diagnostics and
//! hosts can route them anywhere.  [`TracingObserver`] is the default and
//! turns every report into a `tracing` event.

use super::error::StickyError;
use super::phase::StickyPhase;

/// Receives engine diagnostics.  Every method defaults to a no-op.
pub trait EngineObserver {
    /// A subscriber's `on_update` failed; it stays registered.
    fn subscriber_failed(&self, _id: &str, _error: &anyhow::Error) {}

    /// The scroll-end quiet window elapsed.
    fn scroll_ended(&self, _scroll_y: f64) {}

    /// A sticky element got a new placement.
    fn placement_applied(&self, _id: &str, _phase: StickyPhase, _top: Option<f64>, _scroll_y: f64) {}

    /// A placement was held back by the anti-flicker check.
    fn placement_suppressed(&self, _id: &str, _phase: StickyPhase, _scroll_y: f64) {}

    /// An element was skipped for this cycle.
    fn element_skipped(&self, _error: &StickyError) {}

    /// The header landmark could not be found; the previous height is kept.
    fn header_not_found(&self, _kept_height: f64) {}
}

/// Emits every report as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn subscriber_failed(&self, id: &str, error: &anyhow::Error) {
        tracing::error!(subscriber = id, "scroll subscriber failed: {error:#}");
    }

    fn scroll_ended(&self, scroll_y: f64) {
        tracing::trace!(scroll_y, "scroll ended");
    }

    fn placement_applied(&self, id: &str, phase: StickyPhase, top: Option<f64>, scroll_y: f64) {
        tracing::debug!(element = id, phase = phase.as_str(), ?top, scroll_y, "sticky placement");
    }

    fn placement_suppressed(&self, id: &str, phase: StickyPhase, scroll_y: f64) {
        tracing::trace!(element = id, phase = phase.as_str(), scroll_y, "placement held (rapid scroll)");
    }

    fn element_skipped(&self, error: &StickyError) {
        tracing::warn!(element = error.element_id(), "skipping sticky element: {error}");
    }

    fn header_not_found(&self, kept_height: f64) {
        tracing::warn!(kept_height, "header landmark not found");
    }
}
