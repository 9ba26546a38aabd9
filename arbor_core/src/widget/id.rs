// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget and timer identity types.

use core::fmt;

/// Sentinel value indicating "no widget" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a widget in a [`WidgetTree`](super::WidgetTree).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a widget is freed by a removal sweep and its slot is
/// reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    /// Slot index into the tree's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the tree's generation for this slot.
    pub(crate) generation: u32,
}

impl WidgetId {
    /// Returns the raw slot index (for diagnostics and `*_at` accessors).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({}@gen{})", self.idx, self.generation)
    }
}

/// An opaque reference to a software timer owned by an external timer service.
///
/// The tree only stores the handle. When a widget is freed its timer is
/// reported through [`TreeChanges::released_timers`](super::TreeChanges::released_timers)
/// so the service can drop it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({})", self.0)
    }
}
