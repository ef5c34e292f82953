// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hosts that behave less politely than `HeadlessSurface`: surfaces that
//! report a scroll synchronously while content is being set or moved,
//! schedulers that scroll from inside a frame, and surfaces that report
//! nonsense positions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use journal_virtual_scroll::{
    Content, FrameCallback, HeadlessSurface, RenderWindow, ScrollBehavior, ScrollListener,
    Surface, VirtualScroll,
};

/// Wraps a `HeadlessSurface` and fires the scroll listener from every
/// content update and programmatic move, the way some toolkits do.
#[derive(Clone)]
struct EchoSurface {
    inner: HeadlessSurface<String>,
    listener: Rc<RefCell<Option<ScrollListener>>>,
    echoes: Rc<Cell<usize>>,
    reported: Rc<Cell<Option<f64>>>,
}

impl EchoSurface {
    fn new(viewport: f64) -> Self {
        Self {
            inner: HeadlessSurface::new(viewport),
            listener: Rc::new(RefCell::new(None)),
            echoes: Rc::new(Cell::new(0)),
            reported: Rc::new(Cell::new(None)),
        }
    }

    fn echo(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            self.echoes.set(self.echoes.get() + 1);
            listener();
        }
    }

    /// Makes `scroll_position` report `position` instead of the real offset.
    fn report(&self, position: Option<f64>) {
        self.reported.set(position);
    }
}

impl Surface for EchoSurface {
    type Fragment = String;

    fn scroll_position(&self) -> f64 {
        self.reported
            .get()
            .unwrap_or_else(|| self.inner.scroll_position())
    }

    fn viewport_extent(&self) -> f64 {
        self.inner.viewport_extent()
    }

    fn set_content(&mut self, content: Content<String>) {
        self.inner.set_content(content);
        self.echo();
    }

    fn clear_content(&mut self) {
        self.inner.clear_content();
        self.echo();
    }

    fn move_to(&mut self, offset: f64, behavior: ScrollBehavior) {
        self.inner.move_to(offset, behavior);
        self.echo();
    }

    fn set_scroll_listener(&mut self, listener: Option<ScrollListener>) {
        *self.listener.borrow_mut() = listener.clone();
        self.inner.set_scroll_listener(listener);
    }
}

fn echo_journal(surface: &EchoSurface) -> VirtualScroll<u64, EchoSurface> {
    VirtualScroll::builder()
        .container(surface.clone())
        .render_row(|amount: &u64, index| format!("{index}:{amount}"))
        .build()
        .unwrap()
}

fn bounds(window: RenderWindow) -> (usize, usize) {
    (window.start, window.end)
}

#[test]
fn notifications_raised_during_a_paint_are_dropped() {
    let surface = EchoSurface::new(600.0);
    let journal = echo_journal(&surface);

    journal.set_data((0..12_500).collect()).unwrap();
    // One echo from the move to the top, one from the content update.
    assert_eq!(surface.echoes.get(), 2);
    assert_eq!(journal.revision(), 1);

    // The user scroll paints once; the echo from that paint is dropped.
    surface.inner.scroll_to(5_000.0);
    assert_eq!(surface.echoes.get(), 3);
    assert_eq!(journal.revision(), 2);
    assert_eq!(bounds(journal.window()), (95, 117));
    assert!(!journal.is_pending());
}

#[test]
fn programmatic_move_that_echoes_paints_once() {
    let surface = EchoSurface::new(600.0);
    let journal = echo_journal(&surface);
    journal.set_data((0..12_500).collect()).unwrap();
    let echoes = surface.echoes.get();

    assert!(journal.scroll_to_index(100, ScrollBehavior::Smooth));
    // Echoes from the move and from the repaint.
    assert_eq!(surface.echoes.get(), echoes + 2);
    assert_eq!(journal.revision(), 2);
    assert_eq!(bounds(journal.window()), (95, 117));
    assert!(!journal.is_pending());
    assert_eq!(journal.debug_info().last_accepted, 5_000.0);
}

#[test]
fn destroy_on_an_echoing_surface_is_quiet() {
    let surface = EchoSurface::new(600.0);
    let journal = echo_journal(&surface);
    journal.set_data((0..100).collect()).unwrap();
    let echoes = surface.echoes.get();

    journal.destroy();
    // The listener is detached before the content is cleared.
    assert_eq!(surface.echoes.get(), echoes);
    assert!(surface.inner.content().is_none());
}

#[test]
fn scroll_from_inside_a_frame_runs_inline() {
    let surface = HeadlessSurface::<String>::new(600.0);
    let momentum = surface.clone();
    let requests = Rc::new(Cell::new(0_usize));
    let counter = Rc::clone(&requests);
    // Runs each frame, then keeps gliding 2 500px like a fling.
    let scheduler = move |frame: FrameCallback| {
        counter.set(counter.get() + 1);
        frame();
        momentum.scroll_to(momentum.scroll_position() + 2_500.0);
    };
    let journal = VirtualScroll::builder()
        .container(surface.clone())
        .scheduler(scheduler)
        .render_row(|amount: &u64, _| amount.to_string())
        .build()
        .unwrap();
    journal.set_data((0..12_500).collect()).unwrap();

    surface.scroll_to(5_000.0);
    // The glide lands while the scheduler is still running the first frame,
    // so its repaint runs inline instead of being requested again.
    assert_eq!(requests.get(), 1);
    assert_eq!(journal.revision(), 3);
    assert_eq!(surface.scroll_position(), 7_500.0);
    assert_eq!(bounds(journal.window()), (145, 167));
    assert!(!journal.is_pending());
}

#[test]
fn nan_scroll_position_does_not_poison_the_gate() {
    let surface = EchoSurface::new(600.0);
    let journal = echo_journal(&surface);
    journal.set_data((0..12_500).collect()).unwrap();

    surface.report(Some(f64::NAN));
    journal.notify_scroll();
    assert_eq!(bounds(journal.refresh().unwrap()), (0, 22));
    assert_eq!(journal.debug_info().last_accepted, 0.0);

    surface.report(None);
    surface.inner.scroll_to(5_000.0);
    assert_eq!(bounds(journal.window()), (95, 117));
    assert!(!journal.is_pending());
}

#[test]
fn negative_scroll_position_reads_as_the_top() {
    let surface = EchoSurface::new(600.0);
    let journal = echo_journal(&surface);
    journal.set_data((0..12_500).collect()).unwrap();

    surface.report(Some(-400.0));
    journal.refresh().unwrap();
    assert_eq!(journal.debug_info().last_accepted, 0.0);
    let revision = journal.revision();

    // Measured from 0, not from -400.
    surface.report(None);
    surface.inner.scroll_to(60.0);
    assert_eq!(journal.revision(), revision);
}
