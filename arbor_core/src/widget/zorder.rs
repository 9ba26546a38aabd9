// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order policy for sibling lists.
//!
//! Every sibling list is kept in three groups, head to tail: plain widgets,
//! containers, dialogs (see [`WidgetFlags::group_rank`]). Inside a group,
//! z-index is non-decreasing toward the tail, and among equal z-indices the
//! most recently positioned widget is closest to the tail.
//!
//! "Bottom" means the tail of the list, which is painted last and therefore
//! appears in front.

use super::flags::WidgetFlags;
use super::id::{INVALID, WidgetId};
use super::store::WidgetTree;
use crate::trace::{ZOrderDirection, ZOrderEvent};

impl WidgetTree {
    /// Walks `id` toward the tail of its list while the z-order policy
    /// allows, then repeats for each ancestor in its own list.
    ///
    /// Returns the total number of single-step swaps. A second call right
    /// after the first returns `0`.
    pub fn move_to_bottom(&mut self, id: WidgetId) -> u32 {
        self.validate(id);
        let mut total = 0;
        let mut idx = id.idx;
        while idx != INVALID {
            total += self.settle_down(idx);
            idx = self.parent[idx as usize];
        }
        total
    }

    /// Walks `id` toward the head of its list while the z-order policy
    /// allows, then repeats for each ancestor in its own list.
    ///
    /// Returns the total number of single-step swaps.
    pub fn move_to_top(&mut self, id: WidgetId) -> u32 {
        self.validate(id);
        let mut total = 0;
        let mut idx = id.idx;
        while idx != INVALID {
            total += self.settle_up(idx);
            idx = self.parent[idx as usize];
        }
        total
    }

    /// Brings `id` and each ancestor as far to the front as the policy
    /// allows, invalidating every level that moved.
    pub fn bring_to_front(&mut self, id: WidgetId) {
        self.validate(id);
        let mut idx = id.idx;
        while idx != INVALID {
            if self.settle_down(idx) > 0 {
                let h = self.handle(idx);
                self.invalidate(h);
            }
            idx = self.parent[idx as usize];
        }
    }

    /// [`bring_to_front`](Self::bring_to_front), then focus `id`.
    pub fn put_on_front(&mut self, id: WidgetId) {
        self.bring_to_front(id);
        self.set_focus(Some(id));
    }

    /// Changes the z-index and re-settles the widget within its list.
    ///
    /// A lower value walks it toward the head, a higher one toward the tail.
    pub fn set_z_index(&mut self, id: WidgetId, z: i32) {
        self.validate(id);
        let idx = id.idx;
        let current = self.z_index[idx as usize];
        if current == z {
            return;
        }
        self.z_index[idx as usize] = z;
        let moved = if z < current {
            self.settle_up(idx)
        } else {
            self.settle_down(idx)
        };
        if moved > 0 {
            self.invalidate_with_parent_at(idx);
        }
    }

    /// Single-list walk toward the tail.
    pub(crate) fn settle_down(&mut self, idx: u32) -> u32 {
        let mut list = self.list_of(idx);
        let mut moves = 0;
        loop {
            let next = self.links[idx as usize].next;
            if next == INVALID || !self.may_pass_down(idx, next) {
                break;
            }
            list.move_down(&mut self.links, idx);
            moves += 1;
        }
        if moves > 0 {
            self.store_list_of(idx, list);
            self.trace_zorder(idx, ZOrderDirection::ToBottom, moves);
        }
        moves
    }

    /// Single-list walk toward the head.
    pub(crate) fn settle_up(&mut self, idx: u32) -> u32 {
        let mut list = self.list_of(idx);
        let mut moves = 0;
        loop {
            let prev = self.links[idx as usize].prev;
            if prev == INVALID || !self.may_pass_up(idx, prev) {
                break;
            }
            list.move_up(&mut self.links, idx);
            moves += 1;
        }
        if moves > 0 {
            self.store_list_of(idx, list);
            self.trace_zorder(idx, ZOrderDirection::ToTop, moves);
        }
        moves
    }

    /// Whether `idx` may swap past its successor `next`.
    fn may_pass_down(&self, idx: u32, next: u32) -> bool {
        let (a, b) = (self.group_of(idx), self.group_of(next));
        if a != b {
            return a > b;
        }
        self.z_index[idx as usize] >= self.z_index[next as usize]
    }

    /// Whether `idx` may swap past its predecessor `prev`.
    fn may_pass_up(&self, idx: u32, prev: u32) -> bool {
        let (a, b) = (self.group_of(idx), self.group_of(prev));
        if a != b {
            return a < b;
        }
        self.z_index[idx as usize] <= self.z_index[prev as usize]
    }

    fn group_of(&self, idx: u32) -> u8 {
        (self.flags[idx as usize] & WidgetFlags::GROUP).group_rank()
    }

    fn trace_zorder(&mut self, idx: u32, direction: ZOrderDirection, moves: u32) {
        let widget = self.handle(idx);
        self.tracer.zorder(&ZOrderEvent {
            widget,
            direction,
            moves,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::config::TreeConfig;
    use crate::widget::kind::{BASE_NODE_SIZE, ControlCode, Param, Reply, WidgetKind};
    use crate::widget::{Bounds, CreateFlags, WINDOW, WidgetFlags, WidgetId, WidgetTree};

    fn no_op(_: &mut WidgetTree, _: WidgetId, _: ControlCode, _: &Param, _: &mut Reply) -> bool {
        false
    }

    static LABEL: WidgetKind = WidgetKind {
        name: "label",
        size: BASE_NODE_SIZE,
        flags: WidgetFlags::empty(),
        callback: no_op,
        colors: &[],
    };

    fn tree() -> WidgetTree {
        WidgetTree::new(TreeConfig::qvga())
    }

    fn label(t: &mut WidgetTree, tag: u32, parent: Option<WidgetId>) -> WidgetId {
        t.create(&LABEL, tag, Bounds::px(0, 0, 10, 10), parent, None, CreateFlags::empty())
            .unwrap()
    }

    fn window(t: &mut WidgetTree, tag: u32, parent: Option<WidgetId>) -> WidgetId {
        t.create(&WINDOW, tag, Bounds::px(0, 0, 10, 10), parent, None, CreateFlags::empty())
            .unwrap()
    }

    fn tags(t: &WidgetTree, parent: WidgetId) -> Vec<u32> {
        t.children(parent).map(|c| t.tag(c)).collect()
    }

    /// Group ranks never decrease toward the tail and z never decreases
    /// inside a group.
    fn assert_policy(t: &WidgetTree, parent: WidgetId) {
        let kids: Vec<_> = t.children(parent).collect();
        for pair in kids.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ga, gb) = (
                (t.flags(a) & WidgetFlags::GROUP).group_rank(),
                (t.flags(b) & WidgetFlags::GROUP).group_rank(),
            );
            assert!(ga <= gb, "group order violated between {a:?} and {b:?}");
            if ga == gb {
                assert!(
                    t.z_index(a) <= t.z_index(b),
                    "z order violated between {a:?} and {b:?}"
                );
            }
        }
    }

    #[test]
    fn plain_widgets_stay_before_containers() {
        let mut t = tree();
        let d = t.desktop();
        let _p1 = label(&mut t, 1, None);
        let _w1 = window(&mut t, 2, None);
        let _p2 = label(&mut t, 3, None);
        assert_eq!(tags(&t, d), [1, 3, 2]);
        assert_policy(&t, d);
    }

    #[test]
    fn z_index_orders_within_group() {
        let mut t = tree();
        let d = t.desktop();
        let a = label(&mut t, 1, None);
        let b = label(&mut t, 2, None);
        let c = label(&mut t, 3, None);
        t.set_z_index(a, 5);
        assert_eq!(tags(&t, d), [2, 3, 1]);
        t.set_z_index(c, 9);
        assert_eq!(tags(&t, d), [2, 1, 3]);
        t.set_z_index(c, -1);
        assert_eq!(tags(&t, d), [3, 2, 1]);
        assert_policy(&t, d);
        let _ = b;
    }

    #[test]
    fn equal_z_places_newest_last() {
        let mut t = tree();
        let d = t.desktop();
        for tag in 1..=4 {
            label(&mut t, tag, None);
        }
        assert_eq!(tags(&t, d), [1, 2, 3, 4]);
    }

    #[test]
    fn second_move_is_noop() {
        let mut t = tree();
        let a = label(&mut t, 1, None);
        let _b = label(&mut t, 2, None);
        let _c = label(&mut t, 3, None);
        assert_eq!(t.move_to_bottom(a), 2, "passes two equal-z siblings");
        assert_eq!(t.move_to_bottom(a), 0);
        assert_eq!(t.move_to_top(a), 2);
        assert_eq!(t.move_to_top(a), 0);
    }

    #[test]
    fn container_never_passes_a_dialog() {
        let mut t = tree();
        let d = t.desktop();
        let w = window(&mut t, 1, None);
        let dlg = t
            .create_dialog(&WINDOW, 2, Bounds::px(0, 0, 10, 10), None, CreateFlags::empty())
            .unwrap();
        t.set_z_index(w, 100);
        assert_eq!(tags(&t, d), [1, 2], "dialog stays in front");
        assert_eq!(t.move_to_bottom(w), 0);
        assert_policy(&t, d);
        let _ = dlg;
    }

    #[test]
    fn move_to_bottom_recurses_into_ancestors() {
        let mut t = tree();
        let d = t.desktop();
        let w1 = window(&mut t, 1, None);
        let _w2 = window(&mut t, 2, None);
        let a = label(&mut t, 10, Some(w1));
        let _b = label(&mut t, 11, Some(w1));
        t.move_to_top(a);
        assert_eq!(tags(&t, w1), [10, 11]);
        let moves = t.move_to_bottom(a);
        assert_eq!(moves, 2, "one swap for a, one for its window");
        assert_eq!(tags(&t, w1), [11, 10]);
        assert_eq!(tags(&t, d), [2, 1]);
    }

    #[test]
    fn put_on_front_focuses_and_invalidates() {
        let mut t = tree();
        let w1 = window(&mut t, 1, None);
        let _w2 = window(&mut t, 2, None);
        for idx in t.paint_order() {
            if let Some(id) = t.id_at(idx) {
                t.clear_redraw(id);
            }
        }
        t.put_on_front(w1);
        assert_eq!(t.focused(), Some(w1));
        assert!(t.flags(w1).contains(WidgetFlags::REDRAW));
        assert_eq!(tags(&t, t.desktop()), [2, 1]);
    }

    #[test]
    fn randomized_creation_keeps_policy() {
        let mut t = WidgetTree::new(TreeConfig::wvga());
        let d = t.desktop();
        // Small LCG; the sequence only needs to be deterministic.
        let mut seed: u32 = 0x1234_5678;
        let mut next = || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            seed >> 16
        };
        for tag in 0..60 {
            let roll = next();
            let id = match roll % 3 {
                0 => label(&mut t, tag, None),
                1 => window(&mut t, tag, None),
                _ => t
                    .create_dialog(&WINDOW, tag, Bounds::px(0, 0, 5, 5), None, CreateFlags::empty())
                    .unwrap(),
            };
            let z = i32::try_from(next() % 7).unwrap() - 3;
            t.set_z_index(id, z);
            assert_policy(&t, d);
        }
    }
}
