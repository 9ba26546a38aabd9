// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint plan: the widgets to repaint in one pass, back to front.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use arbor_core::widget::{TreeChanges, WidgetFlags, WidgetId, WidgetTree};

use crate::DamageRegion;

/// One widget to repaint.
///
/// Items are produced in back-to-front order, matching sibling list order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepaintItem {
    /// The widget to paint.
    pub widget: WidgetId,
    /// Area to paint: the widget's visible rectangle clipped to the dirty
    /// rectangle, in screen pixels.
    pub rect: Rect,
}

/// Widgets to repaint in one pass.
#[derive(Clone, Debug, Default)]
pub struct RepaintPlan {
    /// Repaint items in back-to-front order.
    pub items: Vec<RepaintItem>,
    /// Screen area touched by this pass.
    pub damage: DamageRegion,
    /// Every flagged widget seen, painted or not; cleared on commit.
    flagged: Vec<WidgetId>,
}

impl RepaintPlan {
    /// Builds a plan from the tree's redraw flags and the dirty rectangle in
    /// `changes`.
    ///
    /// A widget is painted when it is flagged, or when its parent is painted:
    /// a repainted container covers its children, so they are painted again
    /// on top. Widgets inside hidden subtrees, and widgets whose visible area
    /// misses the dirty rectangle, are skipped.
    #[must_use]
    pub fn build(tree: &WidgetTree, changes: &TreeChanges) -> Self {
        let mut plan = Self {
            items: Vec::new(),
            damage: DamageRegion::from_dirty_rect(changes.dirty_rect),
            flagged: Vec::new(),
        };
        let order = tree.paint_order();
        let slots = order.iter().max().map_or(0, |&m| m as usize + 1);
        // Paint order is pre-order, so a parent's entry is settled before
        // any of its children is looked at.
        let mut painted = vec![false; slots];
        for idx in order {
            let Some(widget) = tree.id_at(idx) else {
                continue;
            };
            let flagged = tree.flags_at(idx).contains(WidgetFlags::REDRAW);
            if flagged {
                plan.flagged.push(widget);
            }
            let covered = tree
                .parent(widget)
                .is_some_and(|p| painted.get(p.index() as usize).copied().unwrap_or(false));
            if !flagged && !covered {
                continue;
            }
            if hidden_in_chain(tree, widget) {
                continue;
            }
            let visible = tree.visible_rect_at(idx);
            let rect = match changes.dirty_rect {
                Some(dirty) => visible.intersect(dirty),
                None => visible,
            };
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                continue;
            }
            painted[idx as usize] = true;
            plan.items.push(RepaintItem { widget, rect });
        }
        plan
    }

    /// Whether there is nothing to paint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clears the redraw flag of every flagged widget the plan saw.
    ///
    /// Call after painting, under the same lock as [`build`](Self::build).
    /// Widgets freed since the plan was built are ignored.
    pub fn commit(self, tree: &mut WidgetTree) {
        for id in self.flagged {
            if tree.is_alive(id) {
                tree.clear_redraw(id);
            }
        }
    }
}

fn hidden_in_chain(tree: &WidgetTree, widget: WidgetId) -> bool {
    let mut cur = Some(widget);
    while let Some(id) = cur {
        if tree.is_hidden(id) {
            return true;
        }
        cur = tree.parent(id);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::TreeConfig;
    use arbor_core::widget::{Bounds, CreateFlags, WINDOW};

    fn tree() -> (WidgetTree, [WidgetId; 3]) {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let f = CreateFlags::empty();
        let a = t.create(&WINDOW, 1, Bounds::px(0, 0, 100, 100), None, None, f).unwrap();
        let b = t.create(&WINDOW, 2, Bounds::px(50, 50, 100, 100), None, None, f).unwrap();
        let c = t.create(&WINDOW, 3, Bounds::px(10, 10, 20, 20), Some(a), None, f).unwrap();
        (t, [a, b, c])
    }

    fn settle(t: &mut WidgetTree) {
        let changes = t.take_changes();
        RepaintPlan::build(t, &changes).commit(t);
    }

    #[test]
    fn first_pass_paints_everything_back_to_front() {
        let (mut t, [a, b, c]) = tree();
        let changes = t.take_changes();
        let plan = RepaintPlan::build(&t, &changes);
        let order: Vec<_> = plan.items.iter().map(|i| i.widget).collect();
        assert_eq!(order, [t.desktop(), a, c, b]);
        plan.commit(&mut t);
        assert!(!t.flags(a).contains(WidgetFlags::REDRAW), "commit clears flags");
    }

    #[test]
    fn overlapping_sibling_repaints_clipped_to_dirty_rect() {
        let (mut t, [a, b, c]) = tree();
        settle(&mut t);
        t.invalidate(a);
        let changes = t.take_changes();
        let plan = RepaintPlan::build(&t, &changes);
        let b_item = plan.items.iter().find(|i| i.widget == b).unwrap();
        assert_eq!(b_item.rect, Rect::new(50.0, 50.0, 100.0, 100.0));
        let pos = |w| plan.items.iter().position(|i| i.widget == w);
        assert!(pos(c).is_some(), "child of the repainted container");
        assert!(pos(a) < pos(c));
        assert_eq!(
            plan.damage,
            DamageRegion::Rects(alloc::vec![[0.0, 0.0, 100.0, 100.0]])
        );
    }

    #[test]
    fn repainted_container_repaints_its_children() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let f = CreateFlags::empty();
        let a = t.create(&WINDOW, 1, Bounds::px(0, 0, 100, 100), None, None, f).unwrap();
        let c = t.create(&WINDOW, 2, Bounds::px(10, 10, 20, 20), Some(a), None, f).unwrap();
        settle(&mut t);

        t.invalidate(a);
        assert!(!t.flags(c).contains(WidgetFlags::REDRAW), "only the container is flagged");
        let changes = t.take_changes();
        let plan = RepaintPlan::build(&t, &changes);
        let order: Vec<_> = plan.items.iter().map(|i| i.widget).collect();
        assert_eq!(order, [a, c]);
    }

    #[test]
    fn hidden_subtree_is_skipped_but_cleared() {
        let (mut t, [a, _, c]) = tree();
        settle(&mut t);
        t.hide(a);
        t.invalidate(c);
        let changes = t.take_changes();
        let plan = RepaintPlan::build(&t, &changes);
        assert!(plan.items.iter().all(|i| i.widget != c && i.widget != a));
        plan.commit(&mut t);
        assert!(!t.flags(c).contains(WidgetFlags::REDRAW));
    }

    #[test]
    fn nothing_flagged_means_empty_plan() {
        let (mut t, _) = tree();
        settle(&mut t);
        let changes = t.take_changes();
        let plan = RepaintPlan::build(&t, &changes);
        assert!(plan.is_empty());
        assert!(plan.damage.is_empty());
    }
}
