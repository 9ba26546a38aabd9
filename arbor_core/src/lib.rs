// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode widget tree for embedded user interfaces.
//!
//! `arbor_core` holds the widget hierarchy of a small GUI: who contains
//! whom, in which order siblings paint, which widgets need repainting, which
//! widget has focus, and which dialogs are open. It is `no_std` compatible
//! (with `alloc`) and stores widgets in struct-of-arrays layout addressed by
//! generational handles.
//!
//! # Architecture
//!
//! ```text
//!   input / application
//!       │
//!       ▼
//!   WidgetTree (create, set_*, set_focus, dismiss_dialog, remove)
//!       │  invalidation engine marks REDRAW + dirty rect
//!       ▼
//!   WidgetTree::take_changes() ──► TreeChanges ──► renderer
//!                                                     │
//!                 ┌───────────────────────────────────┘
//!                 ▼
//!   WidgetTree::clear_redraw()      WidgetTree::execute_remove() (sweep)
//! ```
//!
//! **[`widget`]**: The tree itself. Sibling lists follow the z-order
//! policy; creation, two-phase removal, and focus tracking all feed the
//! invalidation engine.
//!
//! **[`dialog`]**: Dialog registry and the dismiss protocol.
//!
//! **[`dirty`]**: Dirty-tracking channels via `understory_dirty`.
//!
//! **[`notify`]**: Best-effort wake-up messages for the processing loop.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! tree instrumentation, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **`sync`** (feature `std`): The shared tree lock, a channel-backed
//! notifier, and blocking dialogs.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables the `sync` module and `std`
//!   support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-widget
//!   invalidation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod dialog;
pub mod dirty;
pub mod error;
pub mod notify;
#[cfg(feature = "std")]
pub mod sync;
pub mod trace;
pub mod widget;

pub use config::TreeConfig;
pub use error::{ColorError, CreateError, DialogError, RemoveError, TextError};
