// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for tree mutations.
//!
//! This module provides a [`TraceSink`] trait with one method per engine
//! event. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink and lives inside the
//! [`WidgetTree`](crate::widget::WidgetTree). When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and installing a sink
//! drops it. When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`InvalidateEvent`], emitted once
//!   per invalidated widget.

use alloc::boxed::Box;

use crate::widget::WidgetId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which direction a z-order walk went.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZOrderDirection {
    /// Toward the tail (painted later, visually in front).
    ToBottom,
    /// Toward the head (painted earlier, visually behind).
    ToTop,
}

/// Stage of a dialog's life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogPhase {
    /// Added to the registry.
    Registered,
    /// Dismissed with a status.
    Dismissed(i32),
    /// Removed without a dismiss while a caller was blocked on it.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a widget is fully created and linked.
#[derive(Clone, Copy, Debug)]
pub struct WidgetCreatedEvent {
    /// The new widget.
    pub widget: WidgetId,
    /// Its numeric id.
    pub tag: u32,
    /// Its kind name.
    pub kind: &'static str,
    /// Its parent, if any.
    pub parent: Option<WidgetId>,
}

/// Emitted when a removal request is refused by a callback.
#[derive(Clone, Copy, Debug)]
pub struct RemovalVetoedEvent {
    /// Root of the subtree that was asked to go.
    pub widget: WidgetId,
    /// The widget whose callback refused.
    pub vetoed_by: WidgetId,
}

/// Emitted at the end of a removal sweep.
#[derive(Clone, Copy, Debug)]
pub struct RemovalSweepEvent {
    /// Widgets freed by the sweep.
    pub freed: u32,
}

/// Emitted when the focused widget changes.
#[derive(Clone, Copy, Debug)]
pub struct FocusChangeEvent {
    /// Previously focused widget.
    pub from: Option<WidgetId>,
    /// Newly focused widget.
    pub to: Option<WidgetId>,
}

/// Emitted when the active widget changes.
#[derive(Clone, Copy, Debug)]
pub struct ActiveChangeEvent {
    /// Previously active widget.
    pub from: Option<WidgetId>,
    /// Newly active widget.
    pub to: Option<WidgetId>,
}

/// Emitted when a z-order walk moved a widget at least once.
#[derive(Clone, Copy, Debug)]
pub struct ZOrderEvent {
    /// The widget that moved.
    pub widget: WidgetId,
    /// Walk direction.
    pub direction: ZOrderDirection,
    /// Single-step swaps performed.
    pub moves: u32,
}

/// Emitted on dialog registry transitions.
#[derive(Clone, Copy, Debug)]
pub struct DialogEvent {
    /// The dialog widget.
    pub widget: WidgetId,
    /// Its numeric id.
    pub tag: u32,
    /// What happened.
    pub phase: DialogPhase,
}

/// Emitted for every widget that gains the redraw flag.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct InvalidateEvent {
    /// The invalidated widget.
    pub widget: WidgetId,
    /// Its visible rectangle at the time of invalidation.
    pub rect: kurbo::Rect,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receiver of tree events.
pub trait TraceSink {
    /// Called after a widget is created.
    fn on_widget_created(&mut self, e: &WidgetCreatedEvent) {
        _ = e;
    }

    /// Called when a removal request is refused.
    fn on_removal_vetoed(&mut self, e: &RemovalVetoedEvent) {
        _ = e;
    }

    /// Called at the end of a removal sweep.
    fn on_removal_sweep(&mut self, e: &RemovalSweepEvent) {
        _ = e;
    }

    /// Called when the focused widget changes.
    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        _ = e;
    }

    /// Called when the active widget changes.
    fn on_active_change(&mut self, e: &ActiveChangeEvent) {
        _ = e;
    }

    /// Called after a z-order walk that moved its widget.
    fn on_zorder(&mut self, e: &ZOrderEvent) {
        _ = e;
    }

    /// Called on dialog registry transitions.
    fn on_dialog(&mut self, e: &DialogEvent) {
        _ = e;
    }

    /// Called per invalidated widget (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        _ = e;
    }
}

/// A sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Owning wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink + Send>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! emit {
    ($(#[$m:meta])* $name:ident, $hook:ident, $ty:ty) => {
        $(#[$m])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$hook(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink + Send>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Removes and returns the installed sink.
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink + Send>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    emit!(
        /// Emits a [`WidgetCreatedEvent`].
        widget_created, on_widget_created, WidgetCreatedEvent
    );
    emit!(
        /// Emits a [`RemovalVetoedEvent`].
        removal_vetoed, on_removal_vetoed, RemovalVetoedEvent
    );
    emit!(
        /// Emits a [`RemovalSweepEvent`].
        removal_sweep, on_removal_sweep, RemovalSweepEvent
    );
    emit!(
        /// Emits a [`FocusChangeEvent`].
        focus_change, on_focus_change, FocusChangeEvent
    );
    emit!(
        /// Emits an [`ActiveChangeEvent`].
        active_change, on_active_change, ActiveChangeEvent
    );
    emit!(
        /// Emits a [`ZOrderEvent`].
        zorder, on_zorder, ZOrderEvent
    );
    emit!(
        /// Emits a [`DialogEvent`].
        dialog, on_dialog, DialogEvent
    );
    emit!(
        /// Emits an [`InvalidateEvent`].
        #[cfg(feature = "trace-rich")]
        invalidate, on_invalidate, InvalidateEvent
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
