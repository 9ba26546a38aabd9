// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dialog registry and the dismiss protocol.
//!
//! Dialogs are ordinary widgets created under the desktop with
//! [`DIALOG_BASE`](WidgetFlags::DIALOG_BASE) set, which places them in the
//! front-most z-order group. Each one is also recorded in a side registry so
//! that [`WidgetTree::dismiss_dialog`] can deliver a status to whoever opened
//! it.
//!
//! A caller that wants to wait for the status attaches a [`DismissWaker`].
//! Every path that frees a registered dialog wakes it: a dismiss delivers
//! `Some(status)`, any other removal delivers `None`. The blocking handshake
//! built on top of this lives in [`sync`](crate::sync) (feature `std`).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::error::DialogError;
use crate::trace::{DialogEvent, DialogPhase};
use crate::widget::{
    Bounds, ControlCode, CreateFlags, Link, Param, Reply, SiblingList, WidgetCallback, WidgetFlags,
    WidgetId, WidgetKind, WidgetTree,
};

/// Status reported to a blocked opener when the dialog could not be shown.
pub const DIALOG_FAILED: i32 = -1;

/// One-shot wake-up for a caller waiting on a dialog.
pub trait DismissWaker: Send {
    /// Delivers the dismiss status, or `None` if the dialog was removed
    /// without a dismiss.
    fn wake(self: Box<Self>, status: Option<i32>);
}

struct DialogEntry {
    widget: WidgetId,
    tag: u32,
    waker: Option<Box<dyn DismissWaker>>,
}

impl fmt::Debug for DialogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogEntry")
            .field("widget", &self.widget)
            .field("tag", &self.tag)
            .field("blocking", &self.waker.is_some())
            .finish()
    }
}

/// Side list of live dialogs, in registration order.
#[derive(Debug, Default)]
pub(crate) struct DialogRegistry {
    list: SiblingList,
    links: Vec<Link>,
    entries: Vec<Option<DialogEntry>>,
    free: Vec<u32>,
}

impl DialogRegistry {
    pub(crate) const fn new() -> Self {
        Self {
            list: SiblingList::EMPTY,
            links: Vec::new(),
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, entry: DialogEntry) -> Result<(), DialogError> {
        let slot = if let Some(slot) = self.free.pop() {
            self.entries[slot as usize] = Some(entry);
            self.links[slot as usize] = Link::DETACHED;
            slot
        } else {
            let slot =
                u32::try_from(self.entries.len()).map_err(|_| DialogError::NotRegistered)?;
            self.entries
                .try_reserve(1)
                .map_err(|_| DialogError::NotRegistered)?;
            self.links
                .try_reserve(1)
                .map_err(|_| DialogError::NotRegistered)?;
            self.entries.push(Some(entry));
            self.links.push(Link::DETACHED);
            slot
        };
        self.list.push_back(&mut self.links, slot);
        Ok(())
    }

    fn find(&self, widget: WidgetId) -> Option<u32> {
        self.list
            .iter(&self.links)
            .find(|&slot| matches!(&self.entries[slot as usize], Some(e) if e.widget == widget))
    }

    fn take(&mut self, slot: u32) -> Option<DialogEntry> {
        self.list.unlink(&mut self.links, slot);
        self.free.push(slot);
        self.entries[slot as usize].take()
    }

    fn len(&self) -> usize {
        self.list.iter(&self.links).count()
    }
}

impl WidgetTree {
    /// Creates a dialog: a widget parented to the desktop, placed in the
    /// dialog group, and registered for [`dismiss_dialog`](Self::dismiss_dialog).
    ///
    /// # Errors
    ///
    /// [`DialogError::Create`] if the widget cannot be created, or
    /// [`DialogError::NotRegistered`] if the registry entry cannot be
    /// allocated (the widget is then removed again).
    pub fn create_dialog(
        &mut self,
        kind: &'static WidgetKind,
        tag: u32,
        bounds: Bounds,
        callback: Option<WidgetCallback>,
        flags: CreateFlags,
    ) -> Result<WidgetId, DialogError> {
        let id = self.create(
            kind,
            tag,
            bounds,
            None,
            callback,
            flags | CreateFlags::PARENT_DESKTOP,
        )?;
        self.flags[id.idx as usize] |= WidgetFlags::DIALOG_BASE;
        if self.settle_down(id.idx) > 0 {
            self.invalidate_with_parent_at(id.idx);
        }
        let entry = DialogEntry {
            widget: id,
            tag,
            waker: None,
        };
        if let Err(e) = self.dialogs.insert(entry) {
            self.mark_for_removal(id.idx);
            return Err(e);
        }
        self.tracer.dialog(&DialogEvent {
            widget: id,
            tag,
            phase: DialogPhase::Registered,
        });
        Ok(id)
    }

    /// Attaches a waker to a registered dialog, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`DialogError::NotRegistered`] if `id` is not a registered dialog.
    pub fn set_dialog_waker(
        &mut self,
        id: WidgetId,
        waker: Box<dyn DismissWaker>,
    ) -> Result<(), DialogError> {
        let slot = self.dialogs.find(id).ok_or(DialogError::NotRegistered)?;
        if let Some(entry) = &mut self.dialogs.entries[slot as usize] {
            entry.waker = Some(waker);
        }
        Ok(())
    }

    /// Whether `id` is a registered dialog.
    #[must_use]
    pub fn is_dialog_registered(&self, id: WidgetId) -> bool {
        self.dialogs.find(id).is_some()
    }

    /// Number of registered dialogs.
    #[must_use]
    pub fn dialog_count(&self) -> usize {
        self.dialogs.len()
    }

    /// Closes a dialog with `status`.
    ///
    /// Deregisters it, sends it `OnDismiss` with [`Param::Status`], wakes a
    /// waiting opener, and marks it for the next removal sweep. A dismissed
    /// dialog is not asked `CanRemove`. Returns `false` without doing
    /// anything if `id` is not a registered dialog.
    pub fn dismiss_dialog(&mut self, id: WidgetId, status: i32) -> bool {
        let Some(slot) = self.dialogs.find(id) else {
            return false;
        };
        let Some(entry) = self.dialogs.take(slot) else {
            return false;
        };
        self.tracer.dialog(&DialogEvent {
            widget: id,
            tag: entry.tag,
            phase: DialogPhase::Dismissed(status),
        });
        if self.is_alive(id) {
            let mut reply = Reply::None;
            self.dispatch_at(id.idx, ControlCode::OnDismiss, &Param::Status(status), &mut reply);
        }
        if let Some(waker) = entry.waker {
            waker.wake(Some(status));
        }
        if self.is_alive(id) {
            self.mark_for_removal(id.idx);
        }
        true
    }

    /// Called by the removal sweep just before a widget's slot is released.
    pub(crate) fn dialog_widget_freed(&mut self, id: WidgetId) {
        let Some(slot) = self.dialogs.find(id) else {
            return;
        };
        let Some(entry) = self.dialogs.take(slot) else {
            return;
        };
        self.tracer.dialog(&DialogEvent {
            widget: id,
            tag: entry.tag,
            phase: DialogPhase::Cancelled,
        });
        if let Some(waker) = entry.waker {
            waker.wake(None);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use std::sync::Mutex;

    use super::DismissWaker;
    use crate::config::TreeConfig;
    use crate::widget::{
        Bounds, ControlCode, CreateFlags, Param, Reply, WINDOW, WidgetFlags, WidgetId, WidgetTree,
    };

    std::thread_local! {
        static DISMISSED: RefCell<Vec<i32>> = const { RefCell::new(Vec::new()) };
    }

    fn on_dismiss(_: &mut WidgetTree, _: WidgetId, code: ControlCode, p: &Param, _: &mut Reply) -> bool {
        if let (ControlCode::OnDismiss, Param::Status(s)) = (code, *p) {
            DISMISSED.with(|d| d.borrow_mut().push(s));
            return true;
        }
        false
    }

    struct Slot(Arc<Mutex<Vec<Option<i32>>>>);

    impl DismissWaker for Slot {
        fn wake(self: Box<Self>, status: Option<i32>) {
            self.0.lock().unwrap().push(status);
        }
    }

    fn open(t: &mut WidgetTree, tag: u32) -> WidgetId {
        t.create_dialog(&WINDOW, tag, Bounds::px(0, 0, 50, 50), Some(on_dismiss), CreateFlags::empty())
            .unwrap()
    }

    #[test]
    fn dialog_is_parented_to_desktop_in_front() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let w = t
            .create(&WINDOW, 1, Bounds::px(0, 0, 10, 10), None, None, CreateFlags::empty())
            .unwrap();
        t.set_active_window(w);
        let d = open(&mut t, 2);
        assert_eq!(t.parent(d), Some(t.desktop()));
        assert!(t.flags(d).contains(WidgetFlags::DIALOG_BASE));
        let w2 = t
            .create(&WINDOW, 3, Bounds::px(0, 0, 10, 10), Some(t.desktop()), None, CreateFlags::empty())
            .unwrap();
        let order: Vec<_> = t.children(t.desktop()).collect();
        assert_eq!(order, [w, w2, d], "dialog stays last");
        assert!(t.is_dialog_registered(d));
    }

    #[test]
    fn dismiss_notifies_wakes_and_removes() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let d = open(&mut t, 1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        t.set_dialog_waker(d, Box::new(Slot(Arc::clone(&seen)))).unwrap();

        assert!(t.dismiss_dialog(d, 42));
        assert_eq!(DISMISSED.with(|v| v.borrow().clone()), [42]);
        assert_eq!(*seen.lock().unwrap(), [Some(42)]);
        assert!(!t.is_dialog_registered(d));
        assert!(t.flags(d).contains(WidgetFlags::REMOVE));
        t.execute_remove();
        assert!(!t.is_alive(d));
        assert_eq!(seen.lock().unwrap().len(), 1, "sweep does not wake twice");
    }

    fn keep_open(_: &mut WidgetTree, _: WidgetId, code: ControlCode, _: &Param, r: &mut Reply) -> bool {
        if code == ControlCode::CanRemove {
            *r = Reply::Bool(false);
            return true;
        }
        false
    }

    #[test]
    fn dismiss_closes_dialog_that_refuses_removal() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let d = t
            .create_dialog(&WINDOW, 1, Bounds::px(0, 0, 50, 50), Some(keep_open), CreateFlags::empty())
            .unwrap();
        assert!(t.remove(d).is_err(), "plain removal is refused");
        assert!(t.dismiss_dialog(d, 5));
        assert!(t.flags(d).contains(WidgetFlags::REMOVE));
        assert_eq!(t.execute_remove(), 1);
        assert!(!t.is_alive(d));
        assert_eq!(t.dialog_count(), 0);
    }

    #[test]
    fn dismiss_unregistered_is_noop() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let w = t
            .create(&WINDOW, 1, Bounds::px(0, 0, 10, 10), None, None, CreateFlags::empty())
            .unwrap();
        assert!(!t.dismiss_dialog(w, 1));
        assert!(!t.flags(w).contains(WidgetFlags::REMOVE));
    }

    #[test]
    fn forced_removal_cancels_waiter() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let d = open(&mut t, 1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        t.set_dialog_waker(d, Box::new(Slot(Arc::clone(&seen)))).unwrap();
        t.remove(d).unwrap();
        assert!(seen.lock().unwrap().is_empty(), "marking alone does not cancel");
        t.execute_remove();
        assert_eq!(*seen.lock().unwrap(), [None]);
        assert_eq!(t.dialog_count(), 0);
    }

    #[test]
    fn registry_slots_are_reused() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let a = open(&mut t, 1);
        let b = open(&mut t, 2);
        assert!(t.dismiss_dialog(a, 0));
        let c = open(&mut t, 3);
        assert_eq!(t.dialog_count(), 2);
        assert!(t.is_dialog_registered(b));
        assert!(t.is_dialog_registered(c));
        assert_eq!(t.dialogs.entries.len(), 2);
    }
}
