// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The widget tree records changes in two independent channels of an
//! [`understory_dirty`] tracker. Both are local-only: the invalidation
//! engine decides explicitly which relatives get repainted, so no dependency
//! edges are registered.
//!
//! - [`REDRAW`] is marked whenever a widget gains the
//!   [`REDRAW`](crate::widget::WidgetFlags::REDRAW) flag.
//! - [`TOPOLOGY`] is marked on the parent whose child list changed (link,
//!   unlink, z-order move) and on created or freed widgets.
//!
//! [`WidgetTree::take_changes`](crate::widget::WidgetTree::take_changes)
//! drains both channels into [`TreeChanges`](crate::widget::TreeChanges).

use understory_dirty::Channel;

/// Widget needs repaint.
pub const REDRAW: Channel = Channel::new(0);

/// Sibling order or membership changed.
pub const TOPOLOGY: Channel = Channel::new(1);
