// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout parameters and scroll behavior modes.

/// Row height used when none is configured, in logical pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 50.0;

/// Rows rendered beyond each viewport edge when none is configured.
pub const DEFAULT_BUFFER: usize = 5;

/// Minimum scroll delta, in logical pixels, before a repaint is considered.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Smallest row height accepted after sanitizing.
pub const MIN_ROW_HEIGHT: f64 = 1.0;

/// Immutable layout configuration for a [`crate::VirtualScroll`].
///
/// Every row shares the same `row_height`. Values are expressed in the host
/// surface's 1D coordinate space, typically logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutParams {
    /// Height of every row.
    pub row_height: f64,
    /// Extra rows realized beyond each edge of the viewport.
    pub buffer: usize,
    /// Minimum scroll movement before the gate schedules a repaint.
    pub threshold: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            buffer: DEFAULT_BUFFER,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl LayoutParams {
    /// Creates layout parameters from explicit values.
    ///
    /// The values are stored as given; call [`LayoutParams::sanitized`] to
    /// clamp them into the ranges the geometry model expects.
    #[must_use]
    pub const fn new(row_height: f64, buffer: usize, threshold: f64) -> Self {
        Self {
            row_height,
            buffer,
            threshold,
        }
    }

    /// Returns a copy with every field clamped to a usable value.
    ///
    /// - A non-finite `row_height` falls back to [`DEFAULT_ROW_HEIGHT`].
    /// - A finite `row_height` below [`MIN_ROW_HEIGHT`] is raised to it.
    /// - A negative or non-finite `threshold` becomes `0`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let row_height = if !self.row_height.is_finite() {
            DEFAULT_ROW_HEIGHT
        } else {
            self.row_height.max(MIN_ROW_HEIGHT)
        };
        let threshold = if self.threshold.is_finite() {
            self.threshold.max(0.0)
        } else {
            0.0
        };
        Self {
            row_height,
            buffer: self.buffer,
            threshold,
        }
    }

    /// Returns `true` if [`LayoutParams::sanitized`] would leave `self` unchanged.
    #[must_use]
    pub fn is_sanitized(&self) -> bool {
        self.sanitized() == *self
    }

    /// Total extent of `len` rows.
    #[must_use]
    pub fn total_height(&self, len: usize) -> f64 {
        len as f64 * self.row_height
    }

    /// Offset of the leading edge of row `index`.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> f64 {
        index as f64 * self.row_height
    }
}

/// How the host surface should move when asked to scroll programmatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    /// Jump straight to the target offset.
    #[default]
    Immediate,
    /// Let the host animate towards the target offset.
    Smooth,
}
