// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=journal_virtual_scroll --heading-base-level=0

//! Journal Virtual Scroll: a windowed renderer for long, fixed-height lists.
//!
//! A journal view can hold tens of thousands of entries while the viewport
//! shows a dozen. This crate keeps render work proportional to the viewport:
//! only the rows inside a small window are rendered, and two spacers stand in
//! for everything else so the scrollable extent (and the scrollbar) never
//! changes as the window moves.
//!
//! The pieces, from the bottom up:
//!
//! - [`compute_range`]: pure geometry from scroll offset, viewport height,
//!   row count, row height and buffer to a [`RenderWindow`], plus
//!   [`RenderWindow::spacers`] for the padding around it.
//! - [`ScrollGate`]: drops scroll notifications that moved less than the
//!   threshold since the last paint and coalesces the rest into a single
//!   pending repaint.
//! - [`VirtualScroll`]: owns the backing sequence and a host [`Surface`],
//!   runs the gate, schedules repaints on a [`FrameScheduler`] and calls the
//!   caller's row renderer for visible rows only.
//!
//! The crate knows nothing about any UI toolkit. Hosts implement [`Surface`]
//! for their scroll container and [`FrameScheduler`] for their refresh
//! cadence. [`HeadlessSurface`], [`ImmediateScheduler`] and
//! [`ManualScheduler`] cover terminal front ends and tests.
//!
//! ## Minimal example
//!
//! ```rust
//! use journal_virtual_scroll::{
//!     Content, HeadlessSurface, ManualScheduler, ScrollBehavior, VirtualScroll,
//! };
//!
//! let surface = HeadlessSurface::<String>::new(600.0);
//! let frames = ManualScheduler::new();
//! let journal = VirtualScroll::builder()
//!     .container(surface.clone())
//!     .scheduler(frames.clone())
//!     .row_height(50.0)
//!     .buffer(5)
//!     .threshold(100.0)
//!     .render_row(|entry: &String, index| format!("{index:>5} {entry}"))
//!     .build()
//!     .unwrap();
//!
//! // The initial paint is synchronous.
//! let entries = (0..12_500).map(|n| format!("entry {n}")).collect();
//! journal.set_data(entries).unwrap();
//! assert_eq!(journal.window().len(), 22);
//!
//! // Scrolling schedules one repaint for the next frame.
//! surface.scroll_to(5_000.0);
//! assert!(journal.is_pending());
//! frames.run_pending();
//! assert_eq!((journal.window().start, journal.window().end), (95, 117));
//!
//! if let Some(Content::Window { spacers, rows, .. }) = &*surface.content() {
//!     assert_eq!(rows.len(), 22);
//!     assert_eq!(spacers.top, 95.0 * 50.0);
//! }
//!
//! // Out-of-range navigation is logged and ignored.
//! assert!(!journal.scroll_to_index(12_500, ScrollBehavior::Immediate));
//! ```
//!
//! All offsets and extents share one caller-chosen 1D coordinate space,
//! typically logical pixels. Every row has the same height.
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`] under targets starting with
//! `journal_virtual_scroll`. The crate never installs a subscriber.
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`LayoutParams`] and
//!   [`ScrollBehavior`] so layout can live in a settings file.

mod config;
mod engine;
mod error;
mod gate;
mod geometry;
mod headless;
mod scheduler;
mod surface;

pub use config::{
    DEFAULT_BUFFER, DEFAULT_ROW_HEIGHT, DEFAULT_THRESHOLD, LayoutParams, MIN_ROW_HEIGHT,
    ScrollBehavior,
};
pub use engine::{
    Lifecycle, RenderRow, VirtualScroll, VirtualScrollBuilder, VirtualScrollDebugInfo,
};
pub use error::{Error, Result};
pub use gate::{GateDecision, ScrollGate};
pub use geometry::{RenderWindow, Spacers, compute_range};
pub use headless::{HeadlessSurface, RecordedMove};
pub use scheduler::{FrameCallback, FrameScheduler, ImmediateScheduler, ManualScheduler};
pub use surface::{Content, Row, ScrollListener, Surface};
