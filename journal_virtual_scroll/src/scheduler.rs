// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling capability.
//!
//! The engine never waits on a clock itself. When the [`crate::ScrollGate`]
//! accepts a notification, the engine hands a boxed callback to a
//! [`FrameScheduler`], and the host runs it at its next display refresh.
//! Callbacks are never cancelled once handed over.
//!
//! Two schedulers ship with the crate:
//!
//! - [`ImmediateScheduler`] runs each callback inline. Useful for hosts with
//!   no refresh cadence and for synchronous tests.
//! - [`ManualScheduler`] queues callbacks until the host calls
//!   [`ManualScheduler::run_pending`], typically once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Deferred work handed to a [`FrameScheduler`].
pub type FrameCallback = Box<dyn FnOnce()>;

/// Host capability that runs a callback at the next display refresh.
pub trait FrameScheduler {
    /// Arranges for `frame` to run exactly once.
    fn request_frame(&mut self, frame: FrameCallback);
}

impl<F> FrameScheduler for F
where
    F: FnMut(FrameCallback),
{
    fn request_frame(&mut self, frame: FrameCallback) {
        self(frame);
    }
}

/// Runs every frame as soon as it is requested.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn request_frame(&mut self, frame: FrameCallback) {
        frame();
    }
}

/// Queues frames until the host drains them.
///
/// Clones share the same queue, so the host keeps one handle and gives
/// another to the engine.
///
/// ```rust
/// use journal_virtual_scroll::{FrameScheduler, ManualScheduler};
///
/// let host = ManualScheduler::new();
/// let mut handle = host.clone();
/// handle.request_frame(Box::new(|| {}));
/// assert_eq!(host.pending_len(), 1);
/// assert_eq!(host.run_pending(), 1);
/// assert_eq!(host.pending_len(), 0);
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl ManualScheduler {
    /// Creates a scheduler with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames waiting to run.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs the frames queued at the time of the call and returns how many ran.
    ///
    /// Frames requested while draining wait for the next call, like a
    /// callback requested from inside an animation frame.
    pub fn run_pending(&self) -> usize {
        let batch: VecDeque<FrameCallback> = std::mem::take(&mut *self.queue.borrow_mut());
        let count = batch.len();
        for frame in batch {
            frame();
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, frame: FrameCallback) {
        self.queue.borrow_mut().push_back(frame);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending_len())
            .finish()
    }
}
