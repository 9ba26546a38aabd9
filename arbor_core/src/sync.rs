// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sharing a tree between threads, and blocking dialogs.
//!
//! [`SharedTree`] is the tree-wide lock: every mutator (application code,
//! input dispatch, the renderer clearing redraw flags) takes it before
//! touching the tree. Callbacks receive `&mut WidgetTree` directly, so
//! nothing needs to re-enter the lock.
//!
//! A blocking dialog is a request/response pair. [`open_dialog_blocking`]
//! creates and registers the dialog under the lock and returns a
//! [`PendingDialog`]; [`PendingDialog::wait`] parks on a one-slot channel
//! with the lock released until the dialog is dismissed or removed.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::dialog::{DIALOG_FAILED, DismissWaker};
use crate::error::DialogError;
use crate::notify::{Notifier, WakeMessage};
use crate::widget::{Bounds, CreateFlags, WidgetCallback, WidgetId, WidgetKind, WidgetTree};

/// A widget tree behind the tree-wide lock. Cloning is cheap (Arc bump).
#[derive(Clone)]
pub struct SharedTree {
    inner: Arc<Mutex<WidgetTree>>,
}

impl fmt::Debug for SharedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTree").finish_non_exhaustive()
    }
}

impl SharedTree {
    /// Wraps a tree.
    #[must_use]
    pub fn new(tree: WidgetTree) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tree)),
        }
    }

    /// Takes the lock.
    ///
    /// A panic while the lock was held does not make the tree unusable: the
    /// guard is recovered from the poison error.
    pub fn lock(&self) -> MutexGuard<'_, WidgetTree> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Forwards [`WakeMessage`]s into a bounded channel without blocking.
///
/// Messages are dropped when the channel is full or disconnected.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    tx: SyncSender<WakeMessage>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end of its mailbox.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, Receiver<WakeMessage>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn post(&mut self, msg: WakeMessage) {
        _ = self.tx.try_send(msg);
    }
}

impl DismissWaker for SyncSender<Option<i32>> {
    fn wake(self: Box<Self>, status: Option<i32>) {
        // The slot is fresh, so this never blocks. A dropped receiver means
        // nobody is waiting.
        _ = self.try_send(status);
    }
}

/// A dialog whose opener is waiting for its status.
#[derive(Debug)]
pub struct PendingDialog {
    widget: WidgetId,
    rx: Receiver<Option<i32>>,
}

impl PendingDialog {
    /// The dialog widget.
    #[must_use]
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Blocks until the dialog is dismissed and returns its status.
    ///
    /// Must be called without holding the tree lock.
    ///
    /// # Errors
    ///
    /// [`DialogError::Cancelled`] if the dialog was removed without a
    /// dismiss, or if the tree was dropped.
    pub fn wait(self) -> Result<i32, DialogError> {
        match self.rx.recv() {
            Ok(Some(status)) => Ok(status),
            Ok(None) | Err(_) => Err(DialogError::Cancelled),
        }
    }
}

/// Creates a dialog and arms it for [`PendingDialog::wait`].
///
/// Takes and releases the lock.
///
/// # Errors
///
/// Errors from [`WidgetTree::create_dialog`]. If the waker cannot be attached
/// the dialog is removed again.
pub fn open_dialog_blocking(
    tree: &SharedTree,
    kind: &'static WidgetKind,
    tag: u32,
    bounds: Bounds,
    callback: Option<WidgetCallback>,
    flags: CreateFlags,
) -> Result<PendingDialog, DialogError> {
    let mut t = tree.lock();
    let widget = t.create_dialog(kind, tag, bounds, callback, flags)?;
    let (tx, rx) = mpsc::sync_channel(1);
    if let Err(e) = t.set_dialog_waker(widget, Box::new(tx)) {
        t.mark_for_removal(widget.idx);
        return Err(e);
    }
    Ok(PendingDialog { widget, rx })
}

/// Creates a dialog and blocks until it is dismissed.
///
/// Returns the dismiss status, or [`DIALOG_FAILED`] if the dialog could not
/// be created or was removed without a dismiss.
pub fn create_blocking(
    tree: &SharedTree,
    kind: &'static WidgetKind,
    tag: u32,
    bounds: Bounds,
    callback: Option<WidgetCallback>,
    flags: CreateFlags,
) -> i32 {
    open_dialog_blocking(tree, kind, tag, bounds, callback, flags)
        .and_then(PendingDialog::wait)
        .unwrap_or(DIALOG_FAILED)
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::config::TreeConfig;
    use crate::widget::WINDOW;

    fn shared() -> SharedTree {
        SharedTree::new(WidgetTree::new(TreeConfig::qvga()))
    }

    /// Polls until a dialog with `tag` is registered.
    fn wait_for_dialog(tree: &SharedTree, tag: u32) -> WidgetId {
        loop {
            {
                let t = tree.lock();
                if let Some(id) = t.find_by_tag(tag)
                    && t.is_dialog_registered(id)
                {
                    return id;
                }
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn blocking_dialog_returns_dismiss_status() {
        let tree = shared();
        let opener = {
            let tree = tree.clone();
            thread::spawn(move || {
                create_blocking(&tree, &WINDOW, 7, Bounds::px(0, 0, 40, 40), None, CreateFlags::empty())
            })
        };
        let d = wait_for_dialog(&tree, 7);
        assert!(tree.lock().dismiss_dialog(d, 42));
        assert_eq!(opener.join().unwrap(), 42);

        let mut t = tree.lock();
        assert!(!t.is_dialog_registered(d), "entry gone after the round trip");
        t.execute_remove();
        assert!(!t.is_alive(d));
    }

    #[test]
    fn removal_wakes_waiter_with_cancel() {
        let tree = shared();
        let pending = open_dialog_blocking(
            &tree,
            &WINDOW,
            3,
            Bounds::px(0, 0, 10, 10),
            None,
            CreateFlags::empty(),
        )
        .unwrap();
        let d = pending.widget();
        let waiter = thread::spawn(move || pending.wait());
        {
            let mut t = tree.lock();
            t.remove(d).unwrap();
            t.execute_remove();
        }
        assert_eq!(waiter.join().unwrap(), Err(DialogError::Cancelled));
    }

    #[test]
    fn failed_creation_reports_sentinel() {
        let tree = SharedTree::new(WidgetTree::new(TreeConfig {
            max_widgets: 1,
            ..TreeConfig::qvga()
        }));
        let status =
            create_blocking(&tree, &WINDOW, 1, Bounds::px(0, 0, 1, 1), None, CreateFlags::empty());
        assert_eq!(status, DIALOG_FAILED);
    }

    #[test]
    fn channel_notifier_drops_when_full() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let (notifier, rx) = ChannelNotifier::new(1);
        let _ = t.set_notifier(Some(Box::new(notifier)));
        let w = t
            .create(&WINDOW, 1, Bounds::px(0, 0, 10, 10), None, None, CreateFlags::empty())
            .unwrap();
        t.invalidate(w);
        assert_eq!(rx.try_iter().count(), 1, "bounded mailbox keeps one message");
    }

    #[test]
    fn shared_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedTree>();
    }
}
