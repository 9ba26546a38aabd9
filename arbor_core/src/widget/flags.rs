// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-widget state bits and creation options.

use bitflags::bitflags;

bitflags! {
    /// State bits stored on every widget.
    ///
    /// Bits that describe the widget's role ([`ALLOW_CHILDREN`](Self::ALLOW_CHILDREN),
    /// [`DIALOG_BASE`](Self::DIALOG_BASE), [`INVALIDATE_PARENT`](Self::INVALIDATE_PARENT))
    /// are seeded from the widget kind at creation and may be changed later.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u32 {
        /// Needs repaint on the next renderer pass.
        const REDRAW = 1 << 0;
        /// Not painted; children are not painted either.
        const HIDDEN = 1 << 1;
        /// Input is ignored; painted in its disabled style.
        const DISABLED = 1 << 2;
        /// On the focus path (the focused widget or one of its ancestors).
        const FOCUS = 1 << 3;
        /// Currently receiving pointer input.
        const ACTIVE = 1 << 4;
        /// Marked for the next removal sweep.
        const REMOVE = 1 << 5;
        /// Invalidation requests for this widget are dropped.
        const IGNORE_INVALIDATE = 1 << 6;
        /// Member of the dialog z-order group.
        const DIALOG_BASE = 1 << 7;
        /// Container; may own a child list.
        const ALLOW_CHILDREN = 1 << 8;
        /// Every invalidation also invalidates the parent.
        const INVALIDATE_PARENT = 1 << 9;
        /// Fills the parent's inner area, ignoring its own size and position.
        const EXPANDED = 1 << 10;
        /// Owns a heap text buffer.
        const DYNAMIC_TEXT = 1 << 11;
        /// Pointer is dragging across the widget while it is active.
        const TOUCH_MOVE = 1 << 12;
    }
}

bitflags! {
    /// Options accepted by [`WidgetTree::create`](super::WidgetTree::create).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CreateFlags: u32 {
        /// Attach to the desktop regardless of the requested parent.
        const PARENT_DESKTOP = 1 << 0;
        /// Start hidden.
        const HIDDEN = 1 << 1;
        /// Start expanded to the parent's inner area.
        const EXPANDED = 1 << 2;
    }
}

impl WidgetFlags {
    /// Bits that select the z-order group of a widget.
    pub const GROUP: Self = Self::DIALOG_BASE.union(Self::ALLOW_CHILDREN);

    /// Z-order group rank: plain widgets `0`, containers `1`, dialogs `2`.
    ///
    /// Sibling lists keep groups in ascending rank from head to tail.
    #[inline]
    #[must_use]
    pub const fn group_rank(self) -> u8 {
        if self.contains(Self::DIALOG_BASE) {
            2
        } else if self.contains(Self::ALLOW_CHILDREN) {
            1
        } else {
            0
        }
    }
}
