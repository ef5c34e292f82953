// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll event gate: threshold filtering and single-flight scheduling.
//!
//! Hosts deliver scroll notifications far more often than a repaint is worth
//! doing. [`ScrollGate`] decides, per notification, whether to ignore it,
//! fold it into a repaint that is already pending, or ask for a new one.
//!
//! The gate compares against the position of the *last paint*, not the last
//! notification. A run of small movements that each stay under the threshold
//! is discarded until their sum crosses it.
//!
//! ```rust
//! use journal_virtual_scroll::{GateDecision, ScrollGate};
//!
//! let mut gate = ScrollGate::new(100.0, 0.0);
//! assert_eq!(gate.offer(40.0), GateDecision::Discarded);
//! assert_eq!(gate.offer(150.0), GateDecision::Scheduled);
//! assert_eq!(gate.offer(400.0), GateDecision::Coalesced);
//!
//! // The deferred pass reads the position at execution time.
//! gate.complete(420.0);
//! assert!(!gate.is_pending());
//! assert_eq!(gate.last_accepted(), 420.0);
//! ```

/// Outcome of offering a scroll position to a [`ScrollGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Movement since the last paint is below the threshold.
    Discarded,
    /// A repaint is already pending and will pick this position up.
    Coalesced,
    /// The caller must schedule exactly one repaint.
    Scheduled,
}

impl GateDecision {
    /// Returns `true` for [`GateDecision::Scheduled`].
    #[must_use]
    pub const fn needs_schedule(self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

/// Threshold filter plus a single-flight pending flag.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollGate {
    threshold: f64,
    last_accepted: f64,
    pending: bool,
}

impl ScrollGate {
    /// Creates a gate with nothing pending, anchored at `origin`.
    ///
    /// `threshold` is expected to be finite and non-negative; see
    /// [`crate::LayoutParams::sanitized`].
    #[must_use]
    pub const fn new(threshold: f64, origin: f64) -> Self {
        Self {
            threshold,
            last_accepted: origin,
            pending: false,
        }
    }

    /// Minimum movement that can trigger a repaint.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scroll position of the most recent paint.
    #[must_use]
    pub const fn last_accepted(&self) -> f64 {
        self.last_accepted
    }

    /// Returns `true` while a scheduled repaint has not yet run.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Offers a raw scroll notification at `scroll_top`.
    ///
    /// Only [`GateDecision::Scheduled`] changes the gate's state.
    pub fn offer(&mut self, scroll_top: f64) -> GateDecision {
        let delta = (scroll_top - self.last_accepted).abs();
        if delta.is_nan() || delta < self.threshold {
            return GateDecision::Discarded;
        }
        if self.pending {
            return GateDecision::Coalesced;
        }
        self.pending = true;
        GateDecision::Scheduled
    }

    /// Marks the scheduled repaint as done after painting at `scroll_top`.
    pub fn complete(&mut self, scroll_top: f64) {
        self.last_accepted = scroll_top;
        self.pending = false;
    }

    /// Clears the pending flag without painting.
    ///
    /// Used when a scheduled repaint was lost; the anchor does not move.
    pub fn release(&mut self) {
        self.pending = false;
    }

    /// Records a synchronous paint at `scroll_top`.
    ///
    /// A repaint that is already pending stays pending; it still runs once.
    pub fn record_paint(&mut self, scroll_top: f64) {
        self.last_accepted = scroll_top;
    }
}
