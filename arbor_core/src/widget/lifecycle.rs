// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget creation and deferred removal.
//!
//! Creation is immediate. Removal is two-phase: [`WidgetTree::remove`]
//! checks that the whole subtree agrees to go and marks its root, and a
//! later [`WidgetTree::execute_remove`] sweep (normally run by the processing
//! loop) frees every marked widget together with its descendants. Handles
//! stay valid between the two phases.

use alloc::vec::Vec;

use super::flags::{CreateFlags, WidgetFlags};
use super::geometry::Bounds;
use super::id::{INVALID, WidgetId};
use super::kind::{ControlCode, Param, Reply, WidgetCallback, WidgetKind};
use super::store::WidgetTree;
use crate::dirty;
use crate::error::{CreateError, RemoveError};
use crate::notify::WakeMessage;
use crate::trace::{RemovalSweepEvent, RemovalVetoedEvent, WidgetCreatedEvent};

/// Sweep worklist entry.
#[derive(Clone, Copy, Debug)]
enum Step {
    Visit(u32),
    Free(u32),
}

impl WidgetTree {
    /// Creates a widget of `kind` and links it into its parent's list.
    ///
    /// The parent is the desktop when the kind is a dialog base or
    /// [`CreateFlags::PARENT_DESKTOP`] is given; otherwise `parent` if it is a
    /// container; otherwise the [active window](Self::active_window).
    ///
    /// Callback sequence: `PreInit` (may veto), `ExcludeLinkedList`, `Init`,
    /// then `ChildWidgetCreated` on the parent.
    ///
    /// # Errors
    ///
    /// - [`CreateError::UndersizedKind`] if `kind.size` is below the node
    ///   footprint for its role.
    /// - [`CreateError::OutOfMemory`] if the widget budget is exhausted or the
    ///   per-instance storage cannot be allocated.
    /// - [`CreateError::Vetoed`] if the `PreInit` reply is `Bool(false)`.
    ///
    /// The tree is unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn create(
        &mut self,
        kind: &'static WidgetKind,
        tag: u32,
        bounds: Bounds,
        parent: Option<WidgetId>,
        callback: Option<WidgetCallback>,
        flags: CreateFlags,
    ) -> Result<WidgetId, CreateError> {
        let required = kind.required_size();
        if kind.size < required {
            return Err(CreateError::UndersizedKind {
                kind: kind.name,
                declared: kind.size,
                required,
            });
        }
        if self.live >= self.config.max_widgets {
            return Err(CreateError::OutOfMemory);
        }
        let extra = kind.size - required;
        let mut instance = Vec::new();
        instance
            .try_reserve_exact(extra)
            .map_err(|_| CreateError::OutOfMemory)?;
        instance.resize(extra, 0_u8);

        let parent_idx = if kind.flags.contains(WidgetFlags::DIALOG_BASE)
            || flags.contains(CreateFlags::PARENT_DESKTOP)
        {
            self.desktop
        } else {
            match parent {
                Some(p) => {
                    self.validate(p);
                    if self.flags[p.idx as usize].contains(WidgetFlags::ALLOW_CHILDREN) {
                        p.idx
                    } else {
                        self.window_active
                    }
                }
                None => self.window_active,
            }
        };

        let idx = self.alloc_slot(kind, tag, parent_idx, callback, instance);

        let mut reply = Reply::Bool(true);
        self.dispatch_at(idx, ControlCode::PreInit, &Param::None, &mut reply);
        if !reply.as_bool(true) {
            self.release_slot(idx);
            return Err(CreateError::Vetoed);
        }

        let i = idx as usize;
        self.flags[i] |= WidgetFlags::IGNORE_INVALIDATE;
        if flags.contains(CreateFlags::HIDDEN) {
            self.flags[i] |= WidgetFlags::HIDDEN;
        }
        if flags.contains(CreateFlags::EXPANDED) {
            self.flags[i] |= WidgetFlags::EXPANDED;
        }
        self.set_size_at(idx, bounds.width, bounds.height);
        self.set_position_at(idx, bounds.x, bounds.y);
        self.flags[i].remove(WidgetFlags::IGNORE_INVALIDATE);
        self.invalidate_at(idx);

        let mut reply = Reply::Bool(false);
        self.dispatch_at(idx, ControlCode::ExcludeLinkedList, &Param::None, &mut reply);
        if reply.as_bool(false) {
            self.excluded.push(idx);
        } else {
            self.link(idx);
        }

        self.notify_at(idx, ControlCode::Init);
        self.invalidate_at(idx);

        let id = self.handle(idx);
        if parent_idx != INVALID {
            let mut reply = Reply::None;
            self.dispatch_at(
                parent_idx,
                ControlCode::ChildWidgetCreated,
                &Param::Widget(id),
                &mut reply,
            );
        }

        self.pending_created.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.tracer.widget_created(&WidgetCreatedEvent {
            widget: id,
            tag,
            kind: kind.name,
            parent: self.opt_handle(parent_idx),
        });
        self.post(WakeMessage::WidgetCreated);
        Ok(id)
    }

    /// Appends to the parent's list, then settles by the z-order policy.
    fn link(&mut self, idx: u32) {
        let mut list = self.list_of(idx);
        list.push_back(&mut self.links, idx);
        self.store_list_of(idx, list);
        self.settle_up(idx);
        self.settle_down(idx);
    }

    /// Whether `id` and every descendant would agree to be removed.
    ///
    /// Asks each widget with `CanRemove`; a widget that does not answer
    /// agrees. The desktop never agrees.
    pub fn can_remove(&mut self, id: WidgetId) -> bool {
        self.validate(id);
        self.removal_veto(id.idx).is_none()
    }

    /// Returns the first widget (pre-order) that refuses removal.
    fn removal_veto(&mut self, idx: u32) -> Option<u32> {
        if idx == self.desktop {
            return Some(idx);
        }
        let mut stack = alloc::vec![idx];
        while let Some(h) = stack.pop() {
            let mut reply = Reply::Bool(true);
            self.dispatch_at(h, ControlCode::CanRemove, &Param::None, &mut reply);
            if !reply.as_bool(true) {
                return Some(h);
            }
            let start = stack.len();
            stack.extend(self.owned_children(h));
            stack[start..].reverse();
        }
        None
    }

    /// Linked children of `idx` followed by its excluded children.
    ///
    /// Removal treats both as the subtree; only the linked ones are painted.
    fn owned_children(&self, idx: u32) -> Vec<u32> {
        let mut kids: Vec<u32> = self.children[idx as usize].iter(&self.links).collect();
        kids.extend(
            self.excluded
                .iter()
                .copied()
                .filter(|&e| self.parent[e as usize] == idx),
        );
        kids
    }

    /// Marks `id` for removal by the next sweep.
    ///
    /// If the widget is on the focus path, focus moves to its parent. A widget
    /// that is already marked is left alone.
    ///
    /// # Errors
    ///
    /// - [`RemoveError::Desktop`] for the desktop.
    /// - [`RemoveError::Vetoed`] if any widget in the subtree refuses; nothing
    ///   is marked.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: WidgetId) -> Result<(), RemoveError> {
        self.validate(id);
        let idx = id.idx;
        if self.flags[idx as usize].contains(WidgetFlags::REMOVE) {
            return Ok(());
        }
        if idx == self.desktop {
            return Err(RemoveError::Desktop);
        }
        if let Some(v) = self.removal_veto(idx) {
            let vetoed_by = self.handle(v);
            self.tracer.removal_vetoed(&RemovalVetoedEvent {
                widget: id,
                vetoed_by,
            });
            return Err(RemoveError::Vetoed(vetoed_by));
        }
        self.mark_for_removal(idx);
        Ok(())
    }

    /// Marks `idx` for the next sweep without asking the subtree.
    ///
    /// Used where the removal has already been decided, such as closing a
    /// dialog. The desktop and already-marked widgets are left alone.
    pub(crate) fn mark_for_removal(&mut self, idx: u32) {
        if idx == self.desktop || self.flags[idx as usize].contains(WidgetFlags::REMOVE) {
            return;
        }
        self.flags[idx as usize] |= WidgetFlags::REMOVE;
        self.removal_pending = true;
        if self.flags[idx as usize].contains(WidgetFlags::FOCUS) {
            let parent = self.opt_handle(self.parent[idx as usize]);
            self.set_focus(parent);
        }
        self.post(WakeMessage::WidgetRemoved);
    }

    /// Whether a removal sweep is scheduled.
    #[must_use]
    pub fn removal_pending(&self) -> bool {
        self.removal_pending
    }

    /// Frees every widget marked for removal, and all of their descendants.
    ///
    /// Descendants are freed before their ancestors. Returns the number of
    /// widgets freed; `0` if no sweep was scheduled, or if called from a
    /// callback while a sweep is already running.
    pub fn execute_remove(&mut self) -> usize {
        if !self.removal_pending || self.sweeping {
            return 0;
        }
        self.removal_pending = false;
        self.sweeping = true;

        let mut freed = 0_usize;
        let mut stack: Vec<Step> = self.root.iter(&self.links).map(Step::Visit).collect();
        stack.reverse();
        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(idx) => {
                    let kids = self.owned_children(idx);
                    if self.flags[idx as usize].contains(WidgetFlags::REMOVE) {
                        for &k in &kids {
                            self.flags[k as usize] |= WidgetFlags::REMOVE;
                        }
                        stack.push(Step::Free(idx));
                    }
                    stack.extend(kids.into_iter().rev().map(Step::Visit));
                }
                Step::Free(idx) => {
                    self.free_widget(idx);
                    freed += 1;
                }
            }
        }

        self.sweeping = false;
        if freed > 0 {
            self.tracer.removal_sweep(&RemovalSweepEvent {
                freed: u32::try_from(freed).unwrap_or(u32::MAX),
            });
            self.post(WakeMessage::WidgetRemoved);
        }
        freed
    }

    /// Releases one widget whose children are already gone.
    fn free_widget(&mut self, idx: u32) {
        if self.active == idx {
            self.clear_active();
        }
        self.notify_at(idx, ControlCode::Remove);

        let parent = self.parent[idx as usize];
        if self.focused == idx {
            self.focused = parent;
        }
        if self.focused_prev == idx {
            self.focused_prev = INVALID;
        }
        if self.active_prev == idx {
            self.active_prev = parent;
        }
        if self.window_active == idx {
            self.window_active = parent;
        }

        self.invalidate_with_parent_at(idx);
        let id = self.handle(idx);
        self.dialog_widget_freed(id);

        if let Some(pos) = self.excluded.iter().position(|&e| e == idx) {
            self.excluded.swap_remove(pos);
        } else {
            let mut list = self.list_of(idx);
            list.unlink(&mut self.links, idx);
            self.store_list_of(idx, list);
        }

        self.pending_removed.push(idx);
        self.release_slot(idx);
    }
}
