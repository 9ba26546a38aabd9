// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-effort wake-up messages for an external processing loop.
//!
//! Tree mutations that require the loop to run again post a [`WakeMessage`]
//! to the installed [`Notifier`]. Posting happens while the tree is borrowed
//! mutably (under the tree lock when shared), so implementations must not
//! block; dropping a message when a mailbox is full is fine because the loop
//! drains all pending work on every pass.

/// Why the processing loop should wake up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WakeMessage {
    /// A widget was created.
    WidgetCreated,
    /// A widget was marked for removal or a removal sweep finished.
    WidgetRemoved,
    /// A widget was invalidated.
    WidgetInvalidated,
}

/// Receiver of [`WakeMessage`]s.
pub trait Notifier {
    /// Posts a message without blocking.
    fn post(&mut self, msg: WakeMessage);
}

/// A notifier that drops every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn post(&mut self, msg: WakeMessage) {
        _ = msg;
    }
}
