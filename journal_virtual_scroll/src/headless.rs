// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Surface`] implementation.
//!
//! [`HeadlessSurface`] behaves like a scroll container with no pixels behind
//! it. It keeps the last content it was given, clamps its scroll offset to
//! that content's extent, and records every programmatic move. It is the
//! backing store for terminal front ends and for tests.
//!
//! The handle is cheap to clone; clones share the same state, so the host
//! keeps one and hands another to the engine.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::config::ScrollBehavior;
use crate::surface::{Content, ScrollListener, Surface};

/// Programmatic move recorded by a [`HeadlessSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedMove {
    /// Offset the surface was asked to move to, before clamping.
    pub offset: f64,
    /// Requested transition.
    pub behavior: ScrollBehavior,
}

struct HeadlessState<F> {
    scroll_position: f64,
    viewport_extent: f64,
    content: Option<Content<F>>,
    content_updates: u64,
    listener: Option<ScrollListener>,
    moves: Vec<RecordedMove>,
}

impl<F> HeadlessState<F> {
    fn max_scroll(&self) -> Option<f64> {
        self.content
            .as_ref()
            .map(|content| (content.extent() - self.viewport_extent).max(0.0))
    }

    fn clamp(&self, offset: f64) -> f64 {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        match self.max_scroll() {
            Some(max) => offset.min(max),
            None => offset,
        }
    }
}

/// Shared, in-memory scroll container.
pub struct HeadlessSurface<F> {
    state: Rc<RefCell<HeadlessState<F>>>,
}

impl<F> Clone for HeadlessSurface<F> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<F> HeadlessSurface<F> {
    /// Creates a surface scrolled to the top with the given viewport height.
    #[must_use]
    pub fn new(viewport_extent: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                scroll_position: 0.0,
                viewport_extent,
                content: None,
                content_updates: 0,
                listener: None,
                moves: Vec::new(),
            })),
        }
    }

    /// Simulates a user scroll to `offset` and notifies the listener.
    ///
    /// The offset is clamped to `[0, extent - viewport]` of the current
    /// content. The listener is called even if clamping leaves the position
    /// unchanged, matching hosts that report every wheel tick.
    pub fn scroll_to(&self, offset: f64) {
        let listener = {
            let mut state = self.state.borrow_mut();
            state.scroll_position = state.clamp(offset);
            state.listener.clone()
        };
        if let Some(listener) = listener {
            listener();
        }
    }

    /// Simulates a user scroll by `delta` relative to the current position.
    pub fn scroll_by(&self, delta: f64) {
        let current = self.state.borrow().scroll_position;
        self.scroll_to(current + delta);
    }

    /// Resizes the viewport without notifying the listener.
    pub fn set_viewport_extent(&self, extent: f64) {
        self.state.borrow_mut().viewport_extent = extent;
    }

    /// Returns `true` while a scroll listener is installed.
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.state.borrow().listener.is_some()
    }

    /// Last content set on the surface; `None` before the first paint and
    /// after [`Surface::clear_content`].
    #[must_use]
    pub fn content(&self) -> Ref<'_, Option<Content<F>>> {
        Ref::map(self.state.borrow(), |state| &state.content)
    }

    /// Number of times content has been set.
    #[must_use]
    pub fn content_updates(&self) -> u64 {
        self.state.borrow().content_updates
    }

    /// Programmatic moves in the order they were requested.
    #[must_use]
    pub fn moves(&self) -> Vec<RecordedMove> {
        self.state.borrow().moves.clone()
    }
}

impl<F> Surface for HeadlessSurface<F> {
    type Fragment = F;

    fn scroll_position(&self) -> f64 {
        self.state.borrow().scroll_position
    }

    fn viewport_extent(&self) -> f64 {
        self.state.borrow().viewport_extent
    }

    fn set_content(&mut self, content: Content<F>) {
        let mut state = self.state.borrow_mut();
        state.content = Some(content);
        state.content_updates += 1;
        // Shrinking content pulls the offset back in range, as a browser does.
        state.scroll_position = state.clamp(state.scroll_position);
    }

    fn clear_content(&mut self) {
        self.state.borrow_mut().content = None;
    }

    fn move_to(&mut self, offset: f64, behavior: ScrollBehavior) {
        let mut state = self.state.borrow_mut();
        state.moves.push(RecordedMove { offset, behavior });
        // No animation clock; smooth moves land immediately.
        state.scroll_position = state.clamp(offset);
    }

    fn set_scroll_listener(&mut self, listener: Option<ScrollListener>) {
        self.state.borrow_mut().listener = listener;
    }
}

impl<F> fmt::Debug for HeadlessSurface<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessSurface")
            .field("scroll_position", &state.scroll_position)
            .field("viewport_extent", &state.viewport_extent)
            .field("has_content", &state.content.is_some())
            .field("content_updates", &state.content_updates)
            .field("has_listener", &state.listener.is_some())
            .field("moves", &state.moves.len())
            .finish()
    }
}
