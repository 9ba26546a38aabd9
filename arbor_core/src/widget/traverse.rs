// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, WidgetId};
use super::store::WidgetTree;

/// An iterator over one sibling list, head (back) to tail (front).
///
/// Created by [`WidgetTree::children`] and [`WidgetTree::roots`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a WidgetTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a WidgetTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<WidgetId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.links[idx as usize].next;
        Some(self.tree.handle(idx))
    }
}

impl WidgetTree {
    /// Raw slot indices of every linked widget in paint order.
    ///
    /// Parents come before their children and each sibling list is walked
    /// head to tail, so painting in this order draws back to front.
    #[must_use]
    pub fn paint_order(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.live as usize);
        let mut stack: Vec<u32> = Vec::new();
        push_reversed(&mut stack, self, self.root.first);
        while let Some(idx) = stack.pop() {
            out.push(idx);
            push_reversed(&mut stack, self, self.children[idx as usize].first);
        }
        out
    }
}

fn push_reversed(stack: &mut Vec<u32>, tree: &WidgetTree, first: u32) {
    let start = stack.len();
    let mut cur = first;
    while cur != INVALID {
        stack.push(cur);
        cur = tree.links[cur as usize].next;
    }
    stack[start..].reverse();
}

#[cfg(test)]
mod tests {
    use crate::config::TreeConfig;
    use crate::widget::{Bounds, CreateFlags, WINDOW, WidgetTree};

    #[test]
    fn paint_order_is_preorder_back_to_front() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let flags = CreateFlags::empty();
        let a = t.create(&WINDOW, 1, Bounds::px(0, 0, 10, 10), None, None, flags).unwrap();
        let a1 = t.create(&WINDOW, 2, Bounds::px(0, 0, 5, 5), Some(a), None, flags).unwrap();
        let b = t.create(&WINDOW, 3, Bounds::px(0, 0, 10, 10), None, None, flags).unwrap();
        let order = t.paint_order();
        let expect = [t.desktop().index(), a.index(), a1.index(), b.index()];
        assert_eq!(order, expect);
    }
}
