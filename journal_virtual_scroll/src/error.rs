// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors reported by [`crate::VirtualScroll`].
///
/// Only conditions the caller must act on are surfaced here. Out-of-range
/// navigation and a missing row renderer are recoverable and only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The builder was finished without a host surface.
    #[error("virtual scroll requires a container surface")]
    MissingContainer,
    /// The engine was used after [`crate::VirtualScroll::destroy`].
    #[error("virtual scroll has been destroyed")]
    Disposed,
    /// The engine is borrowed, either through [`crate::VirtualScroll::data`]
    /// or by a paint in progress.
    #[error("virtual scroll is busy")]
    Busy,
}

/// Convenience alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
