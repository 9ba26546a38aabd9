// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus path, active widget, and visibility.
//!
//! The focused widget and each of its ancestors up to (not including) the
//! head of the process-root list carry [`WidgetFlags::FOCUS`]. Changing focus
//! only touches the part of the path that differs: the old branch below the
//! common ancestor gets `FocusOut`, the new branch gets `FocusIn`, and every
//! touched widget is invalidated.

use super::flags::WidgetFlags;
use super::id::{INVALID, WidgetId};
use super::kind::ControlCode;
use super::store::WidgetTree;
use crate::trace::{ActiveChangeEvent, FocusChangeEvent};

impl WidgetTree {
    /// The focused widget.
    #[must_use]
    pub fn focused(&self) -> Option<WidgetId> {
        self.opt_handle(self.focused)
    }

    /// The widget that held focus before the last [`clear_focus`](Self::clear_focus).
    #[must_use]
    pub fn focused_prev(&self) -> Option<WidgetId> {
        self.opt_handle(self.focused_prev)
    }

    /// The widget receiving pointer input.
    #[must_use]
    pub fn active(&self) -> Option<WidgetId> {
        self.opt_handle(self.active)
    }

    /// The widget that was active before the last change.
    #[must_use]
    pub fn active_prev(&self) -> Option<WidgetId> {
        self.opt_handle(self.active_prev)
    }

    /// Default parent for widgets created without a container parent.
    #[must_use]
    pub fn active_window(&self) -> Option<WidgetId> {
        self.opt_handle(self.window_active)
    }

    /// Sets the default parent for new widgets.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the widget is not a container.
    pub fn set_active_window(&mut self, id: WidgetId) {
        self.validate(id);
        assert!(
            self.flags[id.idx as usize].contains(WidgetFlags::ALLOW_CHILDREN),
            "active window must be a container"
        );
        self.window_active = id.idx;
    }

    /// Nearest widget that is `a` or an ancestor of `a` and also `b` or an
    /// ancestor of `b`.
    ///
    /// Falls back to the head of the process-root list when the two share
    /// nothing.
    #[must_use]
    pub fn common_ancestor(&self, a: WidgetId, b: WidgetId) -> Option<WidgetId> {
        self.validate(a);
        self.validate(b);
        self.opt_handle(self.common_ancestor_at(a.idx, b.idx))
    }

    fn common_ancestor_at(&self, a: u32, b: u32) -> u32 {
        let mut h1 = a;
        while h1 != INVALID {
            let mut h2 = b;
            while h2 != INVALID {
                if h1 == h2 {
                    return h2;
                }
                h2 = self.parent[h2 as usize];
            }
            h1 = self.parent[h1 as usize];
        }
        self.root.first
    }

    /// Moves focus to `target`, or drops it when `target` is `None`.
    ///
    /// Widgets leaving the focus path get `FocusOut` before widgets joining
    /// it get `FocusIn`. Focusing the widget that already has focus does
    /// nothing.
    pub fn set_focus(&mut self, target: Option<WidgetId>) {
        let new = match target {
            Some(id) => {
                self.validate(id);
                id.idx
            }
            None => INVALID,
        };
        if self.focused == new {
            return;
        }
        let from = self.focused_at();

        let common = if self.focused == INVALID || new == INVALID {
            self.root.first
        } else {
            self.common_ancestor_at(self.focused, new)
        };

        let mut h = self.focused;
        while h != INVALID && h != common {
            self.flags[h as usize].remove(WidgetFlags::FOCUS);
            self.notify_at(h, ControlCode::FocusOut);
            self.invalidate_at(h);
            h = self.parent[h as usize];
        }

        self.focused = new;
        let mut h = new;
        while h != INVALID && h != common {
            self.flags[h as usize] |= WidgetFlags::FOCUS;
            self.notify_at(h, ControlCode::FocusIn);
            self.invalidate_at(h);
            h = self.parent[h as usize];
        }

        self.tracer.focus_change(&FocusChangeEvent {
            from,
            to: target,
        });
    }

    /// Drops focus entirely, remembering the old holder in
    /// [`focused_prev`](Self::focused_prev).
    ///
    /// Does nothing when nothing is focused or when the head of the
    /// process-root list is.
    pub fn clear_focus(&mut self) {
        if self.focused == INVALID || self.focused == self.root.first {
            return;
        }
        let from = self.focused_at();
        self.focused_prev = self.focused;
        let mut h = self.focused;
        while h != INVALID && h != self.root.first {
            self.notify_at(h, ControlCode::FocusOut);
            self.flags[h as usize].remove(WidgetFlags::FOCUS);
            self.invalidate_at(h);
            h = self.parent[h as usize];
        }
        self.focused = INVALID;
        self.tracer.focus_change(&FocusChangeEvent { from, to: None });
    }

    /// Makes `target` the active widget, clearing the previous one first.
    pub fn set_active(&mut self, target: Option<WidgetId>) {
        if let Some(id) = target {
            self.validate(id);
        }
        self.clear_active();
        if let Some(id) = target {
            self.active = id.idx;
            self.flags[id.idx as usize] |= WidgetFlags::ACTIVE;
            self.notify_at(id.idx, ControlCode::ActiveIn);
            self.tracer.active_change(&ActiveChangeEvent {
                from: self.active_prev(),
                to: target,
            });
        }
    }

    /// Clears the active widget, sending it `ActiveOut`.
    pub fn clear_active(&mut self) {
        if self.active == INVALID {
            return;
        }
        let idx = self.active;
        self.notify_at(idx, ControlCode::ActiveOut);
        self.flags[idx as usize].remove(WidgetFlags::ACTIVE | WidgetFlags::TOUCH_MOVE);
        self.active_prev = idx;
        self.active = INVALID;
        self.tracer.active_change(&ActiveChangeEvent {
            from: self.opt_handle(idx),
            to: None,
        });
    }

    // -- Visibility --

    /// Hides the widget and its subtree.
    ///
    /// Focus moves to the parent if it was inside the subtree; the active
    /// widget is cleared if it was inside the subtree.
    pub fn hide(&mut self, id: WidgetId) {
        self.validate(id);
        let idx = id.idx;
        if self.flags[idx as usize].contains(WidgetFlags::HIDDEN) {
            return;
        }
        self.flags[idx as usize] |= WidgetFlags::HIDDEN;
        self.invalidate_with_parent_at(idx);

        if self.focused != INVALID
            && (self.focused == idx || self.is_descendant_at(self.focused, idx))
        {
            let parent = self.opt_handle(self.parent[idx as usize]);
            self.set_focus(parent);
        }
        if self.active != INVALID
            && (self.active == idx || self.is_descendant_at(self.active, idx))
        {
            self.clear_active();
        }
    }

    /// Shows a hidden widget.
    pub fn show(&mut self, id: WidgetId) {
        self.validate(id);
        let idx = id.idx;
        if !self.flags[idx as usize].contains(WidgetFlags::HIDDEN) {
            return;
        }
        self.flags[idx as usize].remove(WidgetFlags::HIDDEN);
        self.invalidate_with_parent_at(idx);
    }

    /// Hides every direct child of a container.
    pub fn hide_children(&mut self, id: WidgetId) {
        self.validate(id);
        let kids: alloc::vec::Vec<WidgetId> = self.children(id).collect();
        for k in kids {
            self.hide(k);
        }
    }
}
