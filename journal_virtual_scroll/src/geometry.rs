// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry model: scroll offset to render window.
//!
//! Everything in this module is pure. Given a scroll offset, a viewport
//! extent, a row count and the fixed row height, [`compute_range`] returns the
//! half-open [`RenderWindow`] of rows to realize, and
//! [`RenderWindow::spacers`] returns the padding that stands in for every row
//! outside it.
//!
//! ```rust
//! use journal_virtual_scroll::compute_range;
//!
//! // 12 500 rows of 50px in a 600px viewport, five buffer rows per side.
//! let window = compute_range(5000.0, 600.0, 12_500, 50.0, 5);
//! assert_eq!((window.start, window.end), (95, 117));
//!
//! let spacers = window.spacers(12_500, 50.0);
//! assert_eq!(spacers.top, 95.0 * 50.0);
//! assert_eq!(spacers.bottom, (12_500.0 - 117.0) * 50.0);
//! ```

use std::ops::Range;

use crate::config::MIN_ROW_HEIGHT;

/// Half-open range `[start, end)` of rows realized by a render pass.
///
/// A window produced by [`compute_range`] always satisfies
/// `start <= end <= len` for the `len` it was computed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderWindow {
    /// First realized row.
    pub start: usize,
    /// One past the last realized row.
    pub end: usize,
}

impl RenderWindow {
    /// The empty window at the origin.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Creates a window; `end` is raised to `start` if it is smaller.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Number of realized rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` when no rows are realized.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `index` falls inside the window.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Iterates the realized indices in display order.
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Combined height of the realized rows.
    #[must_use]
    pub fn rendered_height(&self, row_height: f64) -> f64 {
        self.len() as f64 * row_height
    }

    /// Padding before and after the window for a sequence of `len` rows.
    ///
    /// `top + rendered_height + bottom` equals `len * row_height`, so the
    /// scrollable extent does not change as the window moves.
    #[must_use]
    pub fn spacers(&self, len: usize, row_height: f64) -> Spacers {
        Spacers {
            top: self.start as f64 * row_height,
            bottom: len.saturating_sub(self.end) as f64 * row_height,
        }
    }
}

impl From<RenderWindow> for Range<usize> {
    fn from(window: RenderWindow) -> Self {
        window.start..window.end
    }
}

impl IntoIterator for RenderWindow {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Extents of the placeholders surrounding a [`RenderWindow`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacers {
    /// Extent standing in for rows `0..start`.
    pub top: f64,
    /// Extent standing in for rows `end..len`.
    pub bottom: f64,
}

/// Computes the rows to realize for the given scroll state.
///
/// - `start = max(0, floor(scroll_top / row_height) - buffer)`, clamped to `len`.
/// - `end = min(len, start + ceil(viewport_height / row_height) + 2 * buffer)`.
/// - An empty sequence always yields [`RenderWindow::EMPTY`].
///
/// Negative or non-finite `scroll_top` and `viewport_height` are treated as
/// `0`. A non-positive or non-finite `row_height` is replaced by
/// [`MIN_ROW_HEIGHT`].
#[must_use]
pub fn compute_range(
    scroll_top: f64,
    viewport_height: f64,
    len: usize,
    row_height: f64,
    buffer: usize,
) -> RenderWindow {
    if len == 0 {
        return RenderWindow::EMPTY;
    }

    let row_height = if row_height.is_finite() && row_height > 0.0 {
        row_height
    } else {
        MIN_ROW_HEIGHT
    };
    let scroll_top = non_negative(scroll_top);
    let viewport_height = non_negative(viewport_height);

    let first_visible = to_index((scroll_top / row_height).floor());
    let start = first_visible.saturating_sub(buffer).min(len);

    let visible_count =
        to_index((viewport_height / row_height).ceil()).saturating_add(buffer.saturating_mul(2));
    let end = start.saturating_add(visible_count).min(len);

    RenderWindow { start, end }
}

/// Reads `value` as an offset: negative and non-finite values become `0`.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn to_index(value: f64) -> usize {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Float to integer casts saturate; the index is clamped to `len` by the caller"
    )]
    {
        value as usize
    }
}
