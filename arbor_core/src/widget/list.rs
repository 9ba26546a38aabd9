// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-linked doubly linked sibling lists.
//!
//! A [`SiblingList`] stores only its head and tail slot indices. The
//! per-element `prev`/`next` links live in a caller-owned `[Link]` slice, so
//! the same code serves the widget tree (one list per container plus the
//! process-root list) and the dialog registry.
//!
//! List order is paint order: the head is painted first (visually at the
//! back), the tail is painted last (visually in front).
//!
//! None of these operations check that an index actually belongs to the list
//! it is passed with; callers own that invariant.

use super::id::INVALID;

/// Previous/next links of one list element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub(crate) prev: u32,
    pub(crate) next: u32,
}

impl Link {
    /// Links of an element that is not in any list.
    pub const DETACHED: Self = Self {
        prev: INVALID,
        next: INVALID,
    };
}

impl Default for Link {
    fn default() -> Self {
        Self::DETACHED
    }
}

/// Head and tail of an ordered sibling list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiblingList {
    pub(crate) first: u32,
    pub(crate) last: u32,
}

impl Default for SiblingList {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl SiblingList {
    /// A list with no elements.
    pub const EMPTY: Self = Self {
        first: INVALID,
        last: INVALID,
    };

    /// Returns `true` if the list has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first == INVALID
    }

    /// Slot index of the head (painted first), if any.
    #[inline]
    #[must_use]
    pub const fn first(&self) -> Option<u32> {
        opt(self.first)
    }

    /// Slot index of the tail (painted last), if any.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> Option<u32> {
        opt(self.last)
    }

    /// Appends `idx` at the tail.
    pub(crate) fn push_back(&mut self, links: &mut [Link], idx: u32) {
        links[idx as usize] = Link {
            prev: self.last,
            next: INVALID,
        };
        if self.last == INVALID {
            self.first = idx;
        } else {
            links[self.last as usize].next = idx;
        }
        self.last = idx;
    }

    /// Detaches `idx`, patching its neighbours and the head/tail.
    ///
    /// The element's own links are reset to [`Link::DETACHED`].
    pub(crate) fn unlink(&mut self, links: &mut [Link], idx: u32) {
        let Link { prev, next } = links[idx as usize];
        if prev == INVALID {
            if self.first == idx {
                self.first = next;
            }
        } else {
            links[prev as usize].next = next;
        }
        if next == INVALID {
            if self.last == idx {
                self.last = prev;
            }
        } else {
            links[next as usize].prev = prev;
        }
        links[idx as usize] = Link::DETACHED;
    }

    /// Swaps `idx` with its successor. Returns `false` if it is already last.
    pub(crate) fn move_down(&mut self, links: &mut [Link], idx: u32) -> bool {
        let next = links[idx as usize].next;
        if next == INVALID {
            return false;
        }
        let prev = links[idx as usize].prev;
        let after = links[next as usize].next;

        if prev == INVALID {
            self.first = next;
        } else {
            links[prev as usize].next = next;
        }
        if after == INVALID {
            self.last = idx;
        } else {
            links[after as usize].prev = idx;
        }
        links[next as usize] = Link { prev, next: idx };
        links[idx as usize] = Link {
            prev: next,
            next: after,
        };
        true
    }

    /// Swaps `idx` with its predecessor. Returns `false` if it is already first.
    pub(crate) fn move_up(&mut self, links: &mut [Link], idx: u32) -> bool {
        let prev = links[idx as usize].prev;
        if prev == INVALID {
            return false;
        }
        // Moving up is moving the predecessor down.
        self.move_down(links, prev)
    }

    /// Returns the element `k` steps from the head.
    #[must_use]
    pub(crate) fn nth(&self, links: &[Link], k: usize) -> Option<u32> {
        let mut cur = self.first;
        for _ in 0..k {
            if cur == INVALID {
                break;
            }
            cur = links[cur as usize].next;
        }
        opt(cur)
    }

    /// Iterates elements from head to tail.
    pub(crate) fn iter<'a>(&self, links: &'a [Link]) -> ListIter<'a> {
        ListIter {
            links,
            current: self.first,
        }
    }
}

/// Next element after `element`, or the head of `list` when `element` is `None`.
///
/// | list | element | result |
/// |------|---------|--------|
/// | none | none    | none |
/// | none | some    | successor of element |
/// | some | none    | head of list |
/// | some | some    | successor of element |
#[must_use]
pub(crate) fn next_in(list: Option<&SiblingList>, links: &[Link], element: Option<u32>) -> Option<u32> {
    match element {
        Some(e) => opt(links[e as usize].next),
        None => list.and_then(SiblingList::first),
    }
}

/// Mirror of [`next_in`] using predecessor links and the list tail.
#[must_use]
pub(crate) fn prev_in(list: Option<&SiblingList>, links: &[Link], element: Option<u32>) -> Option<u32> {
    match element {
        Some(e) => opt(links[e as usize].prev),
        None => list.and_then(SiblingList::last),
    }
}

/// Iterator over the slot indices of a [`SiblingList`], head to tail.
#[derive(Debug)]
pub(crate) struct ListIter<'a> {
    links: &'a [Link],
    current: u32,
}

impl Iterator for ListIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.links[idx as usize].next;
        Some(idx)
    }
}

#[inline]
const fn opt(idx: u32) -> Option<u32> {
    if idx == INVALID { None } else { Some(idx) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn list_of(n: u32) -> (SiblingList, Vec<Link>) {
        let mut links = vec![Link::DETACHED; n as usize];
        let mut list = SiblingList::EMPTY;
        for i in 0..n {
            list.push_back(&mut links, i);
        }
        (list, links)
    }

    fn order(list: &SiblingList, links: &[Link]) -> Vec<u32> {
        list.iter(links).collect()
    }

    fn check_consistent(list: &SiblingList, links: &[Link]) {
        let items = order(list, links);
        for (i, &idx) in items.iter().enumerate() {
            let l = links[idx as usize];
            let expected_prev = if i == 0 { INVALID } else { items[i - 1] };
            let expected_next = items.get(i + 1).copied().unwrap_or(INVALID);
            assert_eq!(l.prev, expected_prev, "prev link of {idx}");
            assert_eq!(l.next, expected_next, "next link of {idx}");
        }
        assert_eq!(list.first(), items.first().copied(), "head");
        assert_eq!(list.last(), items.last().copied(), "tail");
    }

    #[test]
    fn push_back_appends_at_tail() {
        let (list, links) = list_of(3);
        assert_eq!(order(&list, &links), vec![0, 1, 2]);
        check_consistent(&list, &links);
    }

    #[test]
    fn unlink_head_middle_tail() {
        let (mut list, mut links) = list_of(4);
        list.unlink(&mut links, 0);
        check_consistent(&list, &links);
        list.unlink(&mut links, 2);
        check_consistent(&list, &links);
        list.unlink(&mut links, 3);
        check_consistent(&list, &links);
        assert_eq!(order(&list, &links), vec![1]);
        assert_eq!(links[0], Link::DETACHED, "unlinked element is detached");
        list.unlink(&mut links, 1);
        assert!(list.is_empty(), "last unlink empties the list");
    }

    #[test]
    fn move_down_at_tail_is_noop() {
        let (mut list, mut links) = list_of(3);
        assert!(!list.move_down(&mut links, 2), "already last");
        assert_eq!(order(&list, &links), vec![0, 1, 2]);
    }

    #[test]
    fn move_up_at_head_is_noop() {
        let (mut list, mut links) = list_of(3);
        assert!(!list.move_up(&mut links, 0), "already first");
        assert_eq!(order(&list, &links), vec![0, 1, 2]);
    }

    #[test]
    fn move_down_swaps_with_successor() {
        let (mut list, mut links) = list_of(4);
        assert!(list.move_down(&mut links, 0));
        assert_eq!(order(&list, &links), vec![1, 0, 2, 3]);
        check_consistent(&list, &links);
        assert!(list.move_down(&mut links, 2));
        assert_eq!(order(&list, &links), vec![1, 0, 3, 2]);
        check_consistent(&list, &links);
    }

    #[test]
    fn move_up_swaps_with_predecessor() {
        let (mut list, mut links) = list_of(3);
        assert!(list.move_up(&mut links, 2));
        assert_eq!(order(&list, &links), vec![0, 2, 1]);
        assert!(list.move_up(&mut links, 2));
        assert_eq!(order(&list, &links), vec![2, 0, 1]);
        check_consistent(&list, &links);
    }

    #[test]
    fn two_element_swap_updates_head_and_tail() {
        let (mut list, mut links) = list_of(2);
        assert!(list.move_down(&mut links, 0));
        assert_eq!(list.first(), Some(1));
        assert_eq!(list.last(), Some(0));
        check_consistent(&list, &links);
    }

    fn backward(list: &SiblingList, links: &[Link]) -> Vec<u32> {
        let mut out = Vec::new();
        let mut cur = list.last;
        while cur != INVALID {
            out.push(cur);
            cur = links[cur as usize].prev;
        }
        out
    }

    #[test]
    fn random_operations_keep_links_consistent() {
        const SLOTS: u32 = 24;
        let mut links = vec![Link::DETACHED; SLOTS as usize];
        let mut list = SiblingList::EMPTY;
        let mut model: Vec<u32> = Vec::new();
        // Small LCG; the sequence only needs to be deterministic.
        let mut seed: u32 = 0x0bad_5eed;
        let mut next = |bound: usize| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as usize % bound
        };

        for _ in 0..2_000 {
            match next(4) {
                0 => {
                    let free: Vec<u32> = (0..SLOTS).filter(|i| !model.contains(i)).collect();
                    if let Some(&idx) = free.get(next(free.len().max(1))) {
                        list.push_back(&mut links, idx);
                        model.push(idx);
                    }
                }
                op if !model.is_empty() => {
                    let pos = next(model.len());
                    let idx = model[pos];
                    match op {
                        1 => {
                            list.unlink(&mut links, idx);
                            model.remove(pos);
                        }
                        2 => {
                            let moved = list.move_down(&mut links, idx);
                            assert_eq!(moved, pos + 1 < model.len());
                            if moved {
                                model.swap(pos, pos + 1);
                            }
                        }
                        _ => {
                            let moved = list.move_up(&mut links, idx);
                            assert_eq!(moved, pos > 0);
                            if moved {
                                model.swap(pos - 1, pos);
                            }
                        }
                    }
                }
                _ => {}
            }

            let forward = order(&list, &links);
            assert_eq!(forward, model);
            let mut back = backward(&list, &links);
            back.reverse();
            assert_eq!(back, forward, "backward walk mirrors forward walk");
            let mut seen = forward.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), forward.len(), "each node visited once");
            check_consistent(&list, &links);
            for i in (0..SLOTS).filter(|i| !model.contains(i)) {
                assert_eq!(links[i as usize], Link::DETACHED, "{i} is detached");
            }
        }
    }

    #[test]
    fn nth_walks_from_head() {
        let (list, links) = list_of(3);
        assert_eq!(list.nth(&links, 0), Some(0));
        assert_eq!(list.nth(&links, 2), Some(2));
        assert_eq!(list.nth(&links, 3), None);
        assert_eq!(SiblingList::EMPTY.nth(&links, 0), None);
    }

    #[test]
    fn next_and_prev_dispatch() {
        let (list, links) = list_of(3);
        assert_eq!(next_in(None, &links, None), None);
        assert_eq!(next_in(Some(&list), &links, None), Some(0));
        assert_eq!(next_in(None, &links, Some(1)), Some(2));
        assert_eq!(next_in(Some(&list), &links, Some(2)), None);
        assert_eq!(prev_in(None, &links, None), None);
        assert_eq!(prev_in(Some(&list), &links, None), Some(2));
        assert_eq!(prev_in(Some(&list), &links, Some(1)), Some(0));
        assert_eq!(prev_in(None, &links, Some(0)), None);
    }
}
