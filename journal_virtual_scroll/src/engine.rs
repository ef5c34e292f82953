// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The windowed renderer: backing sequence, gate and surface in one place.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::{LayoutParams, ScrollBehavior};
use crate::error::{Error, Result};
use crate::gate::{GateDecision, ScrollGate};
use crate::geometry::{RenderWindow, Spacers, compute_range, non_negative};
use crate::scheduler::{FrameCallback, FrameScheduler, ImmediateScheduler};
use crate::surface::{Content, Row, ScrollListener, Surface};

const TARGET: &str = "journal_virtual_scroll::engine";

/// Caller-supplied row renderer: `(item, index) -> fragment`.
pub type RenderRow<T, F> = Box<dyn FnMut(&T, usize) -> F>;

/// Lifecycle of a [`VirtualScroll`].
///
/// An engine that has not been built yet lives in its
/// [`VirtualScrollBuilder`]; once built it is `Ready` until destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Listener bound; every operation is live.
    Ready,
    /// Terminal. Operations are no-ops or return [`Error::Disposed`].
    Destroyed,
}

/// Configures and builds a [`VirtualScroll`].
///
/// Only the container is required. Layout parameters default to
/// [`LayoutParams::default`] and the scheduler defaults to
/// [`ImmediateScheduler`].
pub struct VirtualScrollBuilder<T, S: Surface> {
    container: Option<S>,
    layout: LayoutParams,
    render_row: Option<RenderRow<T, S::Fragment>>,
    scheduler: Option<Box<dyn FrameScheduler>>,
}

impl<T, S: Surface> Default for VirtualScrollBuilder<T, S> {
    fn default() -> Self {
        Self {
            container: None,
            layout: LayoutParams::default(),
            render_row: None,
            scheduler: None,
        }
    }
}

impl<T: 'static, S: Surface + 'static> VirtualScrollBuilder<T, S> {
    /// Creates a builder with default layout and no container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host surface to render into.
    #[must_use]
    pub fn container(mut self, surface: S) -> Self {
        self.container = Some(surface);
        self
    }

    /// Sets all layout parameters at once.
    #[must_use]
    pub fn layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the fixed row height.
    #[must_use]
    pub fn row_height(mut self, row_height: f64) -> Self {
        self.layout.row_height = row_height;
        self
    }

    /// Sets how many extra rows are realized beyond each viewport edge.
    #[must_use]
    pub fn buffer(mut self, buffer: usize) -> Self {
        self.layout.buffer = buffer;
        self
    }

    /// Sets the minimum scroll movement that can trigger a repaint.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.layout.threshold = threshold;
        self
    }

    /// Sets the row renderer.
    #[must_use]
    pub fn render_row<R>(mut self, render: R) -> Self
    where
        R: FnMut(&T, usize) -> S::Fragment + 'static,
    {
        self.render_row = Some(Box::new(render));
        self
    }

    /// Sets the frame scheduler used for deferred repaints.
    #[must_use]
    pub fn scheduler<Sch>(mut self, scheduler: Sch) -> Self
    where
        Sch: FrameScheduler + 'static,
    {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Builds the engine and binds its scroll listener to the container.
    ///
    /// Nothing is rendered until [`VirtualScroll::set_data`] or
    /// [`VirtualScroll::refresh`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingContainer`] if no container was supplied.
    pub fn build(self) -> Result<VirtualScroll<T, S>> {
        let Some(surface) = self.container else {
            return Err(Error::MissingContainer);
        };

        let layout = self.layout.sanitized();
        if layout != self.layout {
            tracing::debug!(
                target: TARGET,
                requested = ?self.layout,
                effective = ?layout,
                "clamped layout parameters"
            );
        }

        let origin = non_negative(surface.scroll_position());
        let shared = Rc::new(Shared {
            state: RefCell::new(State {
                surface,
                items: Vec::new(),
                render_row: self.render_row,
                layout,
                gate: ScrollGate::new(layout.threshold, origin),
                window: RenderWindow::EMPTY,
                revision: 0,
                lifecycle: Lifecycle::Ready,
            }),
            scheduler: RefCell::new(self.scheduler.unwrap_or_else(|| Box::new(ImmediateScheduler))),
            lost_frame: Cell::new(false),
        });

        let weak = Rc::downgrade(&shared);
        let listener: ScrollListener = Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                VirtualScroll::<T, S>::handle_scroll(&shared);
            }
        });
        shared
            .state
            .borrow_mut()
            .surface
            .set_scroll_listener(Some(listener));

        Ok(VirtualScroll { shared })
    }
}

impl<T, S: Surface> fmt::Debug for VirtualScrollBuilder<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualScrollBuilder")
            .field("has_container", &self.container.is_some())
            .field("layout", &self.layout)
            .field("has_render_row", &self.render_row.is_some())
            .field("has_scheduler", &self.scheduler.is_some())
            .finish()
    }
}

struct Shared<T, S: Surface> {
    state: RefCell<State<T, S>>,
    scheduler: RefCell<Box<dyn FrameScheduler>>,
    /// A pending frame found both the state and the scheduler busy and was
    /// dropped; the gate's pending flag is released on the next notification.
    lost_frame: Cell<bool>,
}

struct State<T, S: Surface> {
    surface: S,
    items: Vec<T>,
    render_row: Option<RenderRow<T, S::Fragment>>,
    layout: LayoutParams,
    gate: ScrollGate,
    window: RenderWindow,
    revision: u64,
    lifecycle: Lifecycle,
}

impl<T, S: Surface> Shared<T, S> {
    fn state_mut(&self, operation: &'static str) -> Result<RefMut<'_, State<T, S>>> {
        self.state.try_borrow_mut().map_err(|_| {
            tracing::warn!(target: TARGET, operation, "engine busy; operation ignored");
            Error::Busy
        })
    }
}

impl<T, S: Surface> State<T, S> {
    fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    /// Surface scroll position, read the same way the geometry reads it.
    fn scroll_position(&self) -> f64 {
        non_negative(self.surface.scroll_position())
    }

    /// Recomputes the window at `scroll_top` and hands it to the surface.
    fn paint(&mut self, scroll_top: f64) -> RenderWindow {
        let len = self.items.len();
        let LayoutParams {
            row_height, buffer, ..
        } = self.layout;
        let viewport = self.surface.viewport_extent();
        let window = compute_range(scroll_top, viewport, len, row_height, buffer);

        let content = if len == 0 {
            Content::NoData
        } else {
            let items = &self.items;
            let rows = match self.render_row.as_mut() {
                Some(render) => window
                    .iter()
                    .map(|index| Row::Rendered(render(&items[index], index)))
                    .collect(),
                None => {
                    tracing::debug!(
                        target: TARGET,
                        len,
                        "no row renderer configured; emitting placeholder rows"
                    );
                    window.iter().map(|index| Row::Placeholder { index }).collect()
                }
            };
            Content::Window {
                window,
                spacers: window.spacers(len, row_height),
                extent: self.layout.total_height(len),
                rows,
            }
        };

        self.surface.set_content(content);
        self.window = window;
        self.revision += 1;
        self.gate.record_paint(scroll_top);
        tracing::trace!(
            target: TARGET,
            scroll_top,
            start = window.start,
            end = window.end,
            len,
            revision = self.revision,
            "painted window"
        );
        window
    }
}

/// Windowed renderer for a long, fixed-row-height list.
///
/// The engine owns the backing sequence and a host [`Surface`]. Scroll
/// notifications pass through a [`ScrollGate`]; accepted ones schedule a
/// single deferred repaint on the configured [`FrameScheduler`]. Each paint
/// renders only the rows inside the [`RenderWindow`], framed by two spacers
/// that keep the total scrollable extent at `len * row_height`.
///
/// The engine is single-threaded. Callbacks handed to the surface and the
/// scheduler hold weak references, so dropping the engine (which also
/// destroys it) leaves them inert.
///
/// ```rust
/// use journal_virtual_scroll::{HeadlessSurface, VirtualScroll};
///
/// let surface = HeadlessSurface::<String>::new(600.0);
/// let list = VirtualScroll::builder()
///     .container(surface.clone())
///     .render_row(|amount: &i64, index| format!("#{index}: {amount}"))
///     .build()
///     .unwrap();
///
/// let window = list.set_data((0..12_500).collect()).unwrap();
/// assert_eq!((window.start, window.end), (0, 22));
///
/// surface.scroll_to(5000.0);
/// assert_eq!((list.window().start, list.window().end), (95, 117));
/// assert_eq!(list.total_height(), 12_500.0 * 50.0);
/// ```
pub struct VirtualScroll<T, S: Surface> {
    shared: Rc<Shared<T, S>>,
}

impl<T: 'static, S: Surface + 'static> VirtualScroll<T, S> {
    /// Starts configuring a new engine.
    #[must_use]
    pub fn builder() -> VirtualScrollBuilder<T, S> {
        VirtualScrollBuilder::new()
    }

    /// Replaces the backing sequence, scrolls to the top and paints at once.
    ///
    /// The paint bypasses the scroll gate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] after [`VirtualScroll::destroy`] and
    /// [`Error::Busy`] while the data is borrowed; in both cases `items` is
    /// dropped.
    pub fn set_data(&self, items: Vec<T>) -> Result<RenderWindow> {
        let mut state = self.shared.state_mut("set_data")?;
        if state.is_destroyed() {
            tracing::debug!(target: TARGET, "set_data after destroy ignored");
            return Err(Error::Disposed);
        }
        state.items = items;
        state.surface.move_to(0.0, ScrollBehavior::Immediate);
        let scroll_top = state.scroll_position();
        Ok(state.paint(scroll_top))
    }

    /// Borrows the backing sequence; empty after destroy.
    ///
    /// While the borrow is alive, mutating operations report
    /// [`Error::Busy`] (or return `false`) and deferred repaints wait for
    /// the next frame.
    #[must_use]
    pub fn data(&self) -> Ref<'_, [T]> {
        Ref::map(self.shared.state.borrow(), |state| state.items.as_slice())
    }

    /// Recomputes and paints at the current scroll position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] after [`VirtualScroll::destroy`] and
    /// [`Error::Busy`] while the data is borrowed.
    pub fn refresh(&self) -> Result<RenderWindow> {
        let mut state = self.shared.state_mut("refresh")?;
        if state.is_destroyed() {
            tracing::debug!(target: TARGET, "refresh after destroy ignored");
            return Err(Error::Disposed);
        }
        let scroll_top = state.scroll_position();
        Ok(state.paint(scroll_top))
    }

    /// Moves the surface so row `index` sits at the top of the viewport.
    ///
    /// Returns `false` without moving if `index` is outside `0..len` (a
    /// warning is logged), the engine is busy or it has been destroyed.
    /// After moving, the new position is offered to the scroll gate.
    pub fn scroll_to_index(&self, index: usize, behavior: ScrollBehavior) -> bool {
        {
            let Ok(mut state) = self.shared.state_mut("scroll_to_index") else {
                return false;
            };
            if state.is_destroyed() {
                tracing::debug!(target: TARGET, index, "scroll_to_index after destroy ignored");
                return false;
            }
            let len = state.items.len();
            if index >= len {
                tracing::warn!(target: TARGET, index, len, "scroll_to_index out of range");
                return false;
            }
            let offset = state.layout.offset_of(index);
            state.surface.move_to(offset, behavior);
        }
        Self::handle_scroll(&self.shared);
        true
    }

    /// Forwards a scroll notification from a host that does not call the
    /// bound listener itself.
    pub fn notify_scroll(&self) {
        Self::handle_scroll(&self.shared);
    }

    fn handle_scroll(shared: &Rc<Shared<T, S>>) {
        let decision = {
            let Ok(mut state) = shared.state.try_borrow_mut() else {
                // Raised from inside a paint, which reads the position itself.
                tracing::trace!(target: TARGET, "dropped re-entrant scroll notification");
                return;
            };
            if state.is_destroyed() {
                return;
            }
            if shared.lost_frame.take() {
                state.gate.release();
            }
            let scroll_top = state.scroll_position();
            let decision = state.gate.offer(scroll_top);
            tracing::trace!(
                target: TARGET,
                scroll_top,
                last_accepted = state.gate.last_accepted(),
                ?decision,
                "scroll notification"
            );
            decision
        };
        if decision != GateDecision::Scheduled {
            return;
        }

        let frame = Self::frame(shared);
        match shared.scheduler.try_borrow_mut() {
            Ok(mut scheduler) => scheduler.request_frame(frame),
            // Requested from inside a running frame; the pending flag must
            // still be cleared, so run it now.
            Err(_) => frame(),
        }
    }

    fn frame(shared: &Rc<Shared<T, S>>) -> FrameCallback {
        let weak: Weak<Shared<T, S>> = Rc::downgrade(shared);
        Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Self::run_frame(&shared);
            }
        })
    }

    fn run_frame(shared: &Rc<Shared<T, S>>) {
        let Ok(mut state) = shared.state.try_borrow_mut() else {
            // The repaint is still owed, so try again next frame.
            let frame = Self::frame(shared);
            match shared.scheduler.try_borrow_mut() {
                Ok(mut scheduler) => {
                    tracing::trace!(target: TARGET, "engine busy; frame requeued");
                    scheduler.request_frame(frame);
                }
                Err(_) => {
                    tracing::debug!(target: TARGET, "engine and scheduler busy; frame dropped");
                    shared.lost_frame.set(true);
                }
            }
            return;
        };
        if state.is_destroyed() {
            tracing::trace!(target: TARGET, "frame ran after destroy");
            return;
        }
        let scroll_top = state.scroll_position();
        state.paint(scroll_top);
        state.gate.complete(scroll_top);
    }
}

impl<T, S: Surface> VirtualScroll<T, S> {
    /// Detaches the listener, drops the sequence and clears the surface.
    ///
    /// Idempotent. A repaint that is already scheduled still runs but finds
    /// the engine destroyed and does nothing. While the data is borrowed this
    /// logs a warning and does nothing.
    pub fn destroy(&self) {
        let Ok(mut state) = self.shared.state_mut("destroy") else {
            return;
        };
        if state.is_destroyed() {
            return;
        }
        state.lifecycle = Lifecycle::Destroyed;
        state.surface.set_scroll_listener(None);
        state.items = Vec::new();
        state.render_row = None;
        state.window = RenderWindow::EMPTY;
        state.surface.clear_content();
        tracing::debug!(target: TARGET, revision = state.revision, "destroyed");
    }

    /// Total scrollable extent, `len * row_height`; `0` after destroy.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        let state = self.shared.state.borrow();
        state.layout.total_height(state.items.len())
    }

    /// Number of items in the backing sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.borrow().items.len()
    }

    /// Returns `true` if the backing sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Window of the most recent paint.
    #[must_use]
    pub fn window(&self) -> RenderWindow {
        self.shared.state.borrow().window
    }

    /// Returns `true` if row `index` was realized by the most recent paint.
    #[must_use]
    pub fn is_rendered(&self, index: usize) -> bool {
        self.window().contains(index)
    }

    /// Number of paints performed so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.shared.state.borrow().revision
    }

    /// Returns `true` while a deferred repaint is scheduled but has not run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.state.borrow().gate.is_pending() && !self.shared.lost_frame.get()
    }

    /// Effective (sanitized) layout parameters.
    #[must_use]
    pub fn layout(&self) -> LayoutParams {
        self.shared.state.borrow().layout
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.state.borrow().lifecycle
    }

    /// Returns `true` after [`VirtualScroll::destroy`].
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle() == Lifecycle::Destroyed
    }

    /// Snapshot of the engine state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> VirtualScrollDebugInfo {
        let state = self.shared.state.borrow();
        let len = state.items.len();
        VirtualScrollDebugInfo {
            layout: state.layout,
            len,
            window: state.window,
            spacers: state.window.spacers(len, state.layout.row_height),
            total_height: state.layout.total_height(len),
            scroll_position: state.surface.scroll_position(),
            viewport_extent: state.surface.viewport_extent(),
            last_accepted: state.gate.last_accepted(),
            pending: state.gate.is_pending() && !self.shared.lost_frame.get(),
            revision: state.revision,
            lifecycle: state.lifecycle,
        }
    }
}

impl<T, S: Surface> Drop for VirtualScroll<T, S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T, S: Surface> fmt::Debug for VirtualScroll<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shared.state.try_borrow() {
            Ok(state) => f
                .debug_struct("VirtualScroll")
                .field("len", &state.items.len())
                .field("window", &state.window)
                .field("layout", &state.layout)
                .field("revision", &state.revision)
                .field("lifecycle", &state.lifecycle)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("VirtualScroll { <painting> }"),
        }
    }
}

/// Debug snapshot of a [`VirtualScroll`].
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualScrollDebugInfo {
    /// Effective layout parameters.
    pub layout: LayoutParams,
    /// Length of the backing sequence.
    pub len: usize,
    /// Window of the most recent paint.
    pub window: RenderWindow,
    /// Spacers for `window` against the current length.
    pub spacers: Spacers,
    /// `len * row_height`.
    pub total_height: f64,
    /// Scroll position reported by the surface right now.
    pub scroll_position: f64,
    /// Viewport extent reported by the surface right now.
    pub viewport_extent: f64,
    /// Position of the last paint, as seen by the gate.
    pub last_accepted: f64,
    /// Whether a deferred repaint is outstanding.
    pub pending: bool,
    /// Number of paints so far.
    pub revision: u64,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{Lifecycle, VirtualScroll};
    use crate::error::Error;
    use crate::headless::HeadlessSurface;
    use crate::scheduler::ManualScheduler;
    use crate::surface::Surface;

    fn journal(
        surface: &HeadlessSurface<usize>,
        scheduler: &ManualScheduler,
    ) -> VirtualScroll<u32, HeadlessSurface<usize>> {
        VirtualScroll::builder()
            .container(surface.clone())
            .render_row(|_: &u32, index| index)
            .scheduler(scheduler.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn missing_container_is_fatal() {
        let result = VirtualScroll::<u32, HeadlessSurface<usize>>::builder()
            .row_height(20.0)
            .build();
        assert_eq!(result.err(), Some(Error::MissingContainer));
    }

    #[test]
    fn build_binds_listener_without_painting() {
        let surface = HeadlessSurface::new(600.0);
        let scheduler = ManualScheduler::new();
        let list = journal(&surface, &scheduler);
        assert!(surface.has_listener());
        assert_eq!(surface.content_updates(), 0);
        assert_eq!(list.revision(), 0);
        assert_eq!(list.lifecycle(), Lifecycle::Ready);
    }

    #[test]
    fn layout_is_sanitized_at_build() {
        let surface = HeadlessSurface::<usize>::new(600.0);
        let list = VirtualScroll::<u32, _>::builder()
            .container(surface)
            .row_height(0.0)
            .threshold(-5.0)
            .build()
            .unwrap();
        assert_eq!(list.layout().row_height, 1.0);
        assert_eq!(list.layout().threshold, 0.0);
    }

    #[test]
    fn deferred_frame_reads_position_at_execution_time() {
        let surface = HeadlessSurface::new(600.0);
        let scheduler = ManualScheduler::new();
        let list = journal(&surface, &scheduler);
        list.set_data((0..12_500).collect()).unwrap();

        surface.scroll_to(1_000.0);
        assert!(list.is_pending());
        surface.scroll_to(5_000.0);
        assert_eq!(scheduler.pending_len(), 1);

        assert_eq!(scheduler.run_pending(), 1);
        assert!(!list.is_pending());
        assert_eq!((list.window().start, list.window().end), (95, 117));
        assert_eq!(list.debug_info().last_accepted, 5_000.0);
    }

    #[test]
    fn destroy_leaves_pending_frame_inert() {
        let surface = HeadlessSurface::new(600.0);
        let scheduler = ManualScheduler::new();
        let list = journal(&surface, &scheduler);
        list.set_data((0..1_000).collect()).unwrap();
        surface.scroll_to(2_000.0);
        assert_eq!(scheduler.pending_len(), 1);

        list.destroy();
        let revision = list.revision();
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(list.revision(), revision);
        assert!(surface.content().is_none());
        assert_eq!(surface.scroll_position(), 2_000.0);
    }

    #[test]
    fn dropping_the_engine_detaches_the_surface() {
        let surface = HeadlessSurface::new(600.0);
        let scheduler = ManualScheduler::new();
        let list = journal(&surface, &scheduler);
        list.set_data((0..1_000).collect()).unwrap();
        surface.scroll_to(2_000.0);
        drop(list);

        assert!(!surface.has_listener());
        assert!(surface.content().is_none());
        // The queued frame only holds a weak reference.
        assert_eq!(scheduler.run_pending(), 1);
    }

    #[test]
    fn debug_info_reports_spacers_and_totals() {
        let surface = HeadlessSurface::new(600.0);
        let scheduler = ManualScheduler::new();
        let list = journal(&surface, &scheduler);
        list.set_data((0..100).collect()).unwrap();

        let info = list.debug_info();
        assert_eq!(info.len, 100);
        assert_eq!(info.total_height, 5_000.0);
        assert_eq!(info.spacers.top, 0.0);
        assert_eq!(info.spacers.bottom, (100.0 - 22.0) * 50.0);
        assert_eq!(info.viewport_extent, 600.0);
        assert_eq!(info.revision, 1);
        assert!(!info.pending);
    }

    #[test]
    fn frame_lost_while_everything_is_busy_does_not_wedge_the_gate() {
        let surface = HeadlessSurface::new(600.0);
        let scheduler = ManualScheduler::new();
        let list = journal(&surface, &scheduler);
        list.set_data((0..12_500).collect()).unwrap();
        surface.scroll_to(5_000.0);
        assert!(list.is_pending());

        let shared = Rc::clone(&list.shared);
        {
            let _state = shared.state.borrow();
            let _scheduler = shared.scheduler.borrow_mut();
            VirtualScroll::<u32, HeadlessSurface<usize>>::run_frame(&shared);
        }
        assert!(shared.lost_frame.get());
        assert!(!list.is_pending());

        // The next notification releases the gate and schedules again.
        scheduler.run_pending();
        surface.scroll_to(10_000.0);
        assert!(!shared.lost_frame.get());
        assert!(list.is_pending());
        scheduler.run_pending();
        assert!(!list.is_pending());
        assert_eq!((list.window().start, list.window().end), (195, 217));
    }
}
