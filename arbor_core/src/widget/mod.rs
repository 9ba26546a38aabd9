// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget tree data model.
//!
//! A *widget* is a node in a retained-mode UI tree. Each widget has:
//!
//! - An identity ([`WidgetId`]), a generational handle that goes stale when
//!   the widget is freed, plus a numeric tag chosen by the application.
//! - A [`WidgetKind`] shared by all widgets of the same type, carrying the
//!   callback that receives [`ControlCode`] messages.
//! - Topology: a parent back-reference and membership in exactly one
//!   [`SiblingList`] (the parent's children, or the process-root list).
//!   Containers own a child list of their own.
//! - Geometry in [`Length`] units relative to the parent's inner area, a
//!   z-index, and a transparency level.
//!
//! Sibling order is paint order and follows a z-order policy: plain widgets,
//! then containers, then dialogs, each group sorted by z-index (see
//! [`WidgetTree::move_to_bottom`]).
//!
//! # Dirty tracking
//!
//! Mutations go through the invalidation engine
//! ([`WidgetTree::invalidate`]), which sets [`WidgetFlags::REDRAW`] on
//! everything that must repaint and grows the tree's dirty rectangle. The
//! renderer collects the result with [`WidgetTree::take_changes`].

mod changes;
mod flags;
mod focus;
mod geometry;
mod id;
mod invalidate;
mod kind;
mod lifecycle;
mod list;
mod props;
mod resources;
mod store;
mod traverse;
mod zorder;

pub use changes::TreeChanges;
pub use flags::{CreateFlags, WidgetFlags};
pub use geometry::{Bounds, Length, Padding};
pub use id::{INVALID, TimerId, WidgetId};
pub use kind::{
    BASE_NODE_SIZE, CONTAINER_NODE_SIZE, Color, ControlCode, DESKTOP, Param, Reply, WINDOW,
    WidgetCallback, WidgetKind,
};
pub use list::{Link, SiblingList};
pub use store::{OPAQUE, WidgetTree};
pub use traverse::Children;
