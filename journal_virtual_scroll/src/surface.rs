// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host surface capability.
//!
//! [`Surface`] is everything the engine needs from the scrollable container
//! it renders into: where it is scrolled to, how tall the viewport is, a way
//! to replace its content, a way to move it, and a slot for one scroll
//! listener. The geometry model and the scroll gate never see it; only the
//! render pass does.

use std::rc::Rc;

use crate::config::ScrollBehavior;
use crate::geometry::{RenderWindow, Spacers};

/// Callback a [`Surface`] invokes whenever its scroll position changes.
///
/// The listener re-reads the position through [`Surface::scroll_position`],
/// so it takes no arguments.
pub type ScrollListener = Rc<dyn Fn()>;

/// One realized row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row<F> {
    /// Output of the caller's row renderer.
    Rendered(F),
    /// Fixed-height stand-in used when no row renderer is configured.
    Placeholder {
        /// Index of the row in the backing sequence.
        index: usize,
    },
}

impl<F> Row<F> {
    /// Returns the rendered fragment, if any.
    #[must_use]
    pub fn fragment(&self) -> Option<&F> {
        match self {
            Self::Rendered(fragment) => Some(fragment),
            Self::Placeholder { .. } => None,
        }
    }
}

/// Content produced by a render pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Content<F> {
    /// The backing sequence is empty; show a single "no data" placeholder
    /// instead of spacers.
    NoData,
    /// A window of rows framed by two spacers.
    Window {
        /// Rows covered by `rows`.
        window: RenderWindow,
        /// Extents of the leading and trailing placeholders.
        spacers: Spacers,
        /// Total scrollable extent, `len * row_height`.
        extent: f64,
        /// Realized rows in display order, one per index of `window`.
        rows: Vec<Row<F>>,
    },
}

impl<F> Content<F> {
    /// Returns `true` for [`Content::NoData`].
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Realized rows; empty for [`Content::NoData`].
    #[must_use]
    pub fn rows(&self) -> &[Row<F>] {
        match self {
            Self::NoData => &[],
            Self::Window { rows, .. } => rows,
        }
    }

    /// Window the content was rendered for.
    #[must_use]
    pub fn window(&self) -> RenderWindow {
        match self {
            Self::NoData => RenderWindow::EMPTY,
            Self::Window { window, .. } => *window,
        }
    }

    /// Spacer extents; zero for [`Content::NoData`].
    #[must_use]
    pub fn spacers(&self) -> Spacers {
        match self {
            Self::NoData => Spacers::default(),
            Self::Window { spacers, .. } => *spacers,
        }
    }

    /// Total scrollable extent described by the content.
    #[must_use]
    pub fn extent(&self) -> f64 {
        match self {
            Self::NoData => 0.0,
            Self::Window { extent, .. } => *extent,
        }
    }
}

/// Scrollable container the engine renders into.
///
/// Implementations wrap whatever the host uses: a DOM element, a terminal
/// grid, a native list view, or [`crate::HeadlessSurface`] in tests.
///
/// Programmatic moves through [`Surface::move_to`] may or may not be echoed
/// to the listener; the engine offers the new position to its gate itself
/// after moving, and a duplicate echo is absorbed by the gate.
pub trait Surface {
    /// Host representation of one rendered row.
    type Fragment;

    /// Current scroll offset from the top of the content.
    fn scroll_position(&self) -> f64;

    /// Height of the visible viewport.
    fn viewport_extent(&self) -> f64;

    /// Replaces everything currently shown with `content`.
    fn set_content(&mut self, content: Content<Self::Fragment>);

    /// Removes all rendered content.
    fn clear_content(&mut self);

    /// Moves the viewport so that `offset` is at its top edge.
    fn move_to(&mut self, offset: f64, behavior: ScrollBehavior);

    /// Installs the scroll listener, or detaches it when `None`.
    fn set_scroll_listener(&mut self, listener: Option<ScrollListener>);
}
