// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-off of accumulated changes to the renderer.
//!
//! The engine never paints. Mutations raise [`REDRAW`](WidgetFlags::REDRAW)
//! flags and grow the dirty rectangle; the processing loop periodically calls
//! [`WidgetTree::take_changes`] and passes the result to a renderer, which
//! repaints and then clears the flags with [`WidgetTree::clear_redraw`].

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use super::flags::WidgetFlags;
use super::id::{TimerId, WidgetId};
use super::store::WidgetTree;
use crate::dirty;

/// Changes accumulated since the last [`WidgetTree::take_changes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeChanges {
    /// Widgets flagged for redraw, in paint order (back to front).
    pub redraw: Vec<u32>,
    /// Widgets created, in creation order.
    pub created: Vec<u32>,
    /// Slots freed by removal sweeps, in free order.
    pub removed: Vec<u32>,
    /// Timers that were still attached to freed widgets.
    pub released_timers: Vec<TimerId>,
    /// Union of the visible rectangles of invalidated widgets.
    pub dirty_rect: Option<Rect>,
    /// Whether any sibling list changed.
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.redraw.clear();
        self.created.clear();
        self.removed.clear();
        self.released_timers.clear();
        self.dirty_rect = None;
        self.topology_changed = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.redraw.is_empty()
            && self.created.is_empty()
            && self.removed.is_empty()
            && self.released_timers.is_empty()
            && self.dirty_rect.is_none()
            && !self.topology_changed
    }
}

impl WidgetTree {
    /// Drains the accumulated changes and resets the dirty rectangle.
    ///
    /// Redraw flags stay set until the renderer clears them.
    pub fn take_changes(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a caller-provided
    /// buffer.
    pub fn take_changes_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();

        let marked: Vec<u32> = self
            .dirty
            .drain(dirty::REDRAW)
            .deterministic()
            .run()
            .collect();
        if !marked.is_empty() {
            let mut hit = vec![false; self.len as usize];
            for idx in marked {
                hit[idx as usize] = true;
            }
            changes.redraw = self
                .paint_order()
                .into_iter()
                .filter(|&idx| {
                    hit[idx as usize] && self.flags[idx as usize].contains(WidgetFlags::REDRAW)
                })
                .collect();
        }

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_created, &mut changes.created);
        changes.created.retain(|&idx| self.id_at(idx).is_some());
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        core::mem::swap(&mut self.released_timers, &mut changes.released_timers);

        changes.topology_changed =
            !topology.is_empty() || !changes.created.is_empty() || !changes.removed.is_empty();
        changes.dirty_rect = self.dirty_rect.take();
        self.needs_redraw = false;
    }

    /// Clears the redraw flag of one widget after it was repainted.
    pub fn clear_redraw(&mut self, id: WidgetId) {
        self.validate(id);
        self.flags[id.idx as usize].remove(WidgetFlags::REDRAW);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TreeConfig;
    use crate::widget::{Bounds, CreateFlags, WINDOW, WidgetFlags, WidgetTree};
    use kurbo::Rect;

    #[test]
    fn redraw_list_is_in_paint_order() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let f = CreateFlags::empty();
        let a = t.create(&WINDOW, 1, Bounds::px(0, 0, 10, 10), None, None, f).unwrap();
        let b = t.create(&WINDOW, 2, Bounds::px(50, 0, 10, 10), None, None, f).unwrap();
        let changes = t.take_changes();
        assert_eq!(
            changes.redraw,
            [t.desktop().index(), a.index(), b.index()],
            "desktop, then children head to tail"
        );
        assert_eq!(changes.created, [a.index(), b.index()]);
        assert!(changes.topology_changed);
        assert!(!t.needs_redraw());
        assert_eq!(t.dirty_rect(), None);
    }

    #[test]
    fn second_take_is_empty() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let _ = t.take_changes();
        assert!(t.take_changes().is_empty());
    }

    #[test]
    fn cleared_widgets_are_not_reported() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let f = CreateFlags::empty();
        let a = t.create(&WINDOW, 1, Bounds::px(0, 0, 10, 10), None, None, f).unwrap();
        let _ = t.take_changes();
        t.clear_redraw(t.desktop());
        t.clear_redraw(a);
        t.invalidate(a);
        t.clear_redraw(a);
        let changes = t.take_changes();
        assert!(!changes.redraw.contains(&a.index()));
        assert_eq!(changes.dirty_rect, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!t.flags(a).contains(WidgetFlags::REDRAW));
    }
}
