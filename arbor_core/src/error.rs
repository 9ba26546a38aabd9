// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable error types.
//!
//! Misuse of a freed handle is not represented here; it panics with a
//! `stale WidgetId` message.

use crate::widget::WidgetId;

/// Why a widget could not be created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    /// The kind declares fewer bytes than the node footprint for its role.
    #[error("widget kind `{kind}` declares {declared} bytes, needs at least {required}")]
    UndersizedKind {
        /// Kind name.
        kind: &'static str,
        /// Declared size.
        declared: usize,
        /// Minimum for the kind's role.
        required: usize,
    },
    /// The widget budget or the allocator is exhausted.
    #[error("out of widget memory")]
    OutOfMemory,
    /// The pre-init hook rejected the widget.
    #[error("widget creation vetoed by its pre-init hook")]
    Vetoed,
}

/// Why a removal request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoveError {
    /// The desktop cannot be removed.
    #[error("the desktop widget cannot be removed")]
    Desktop,
    /// A widget in the subtree refused.
    #[error("removal vetoed by {0:?}")]
    Vetoed(WidgetId),
}

/// Why a color override could not be stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The widget's kind has no color table to override.
    #[error("widget kind has no color table")]
    NoPalette,
    /// The index is past the end of the kind's color table.
    #[error("color index {index} out of range (table has {len})")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Table length.
        len: usize,
    },
    /// The override table could not be allocated.
    #[error("out of memory for color overrides")]
    OutOfMemory,
}

/// Why text could not be stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The text buffer could not be allocated.
    #[error("out of memory for text buffer")]
    OutOfMemory,
    /// Borrowed text can only be `'static` when no owned buffer is allocated.
    #[error("widget has no owned text buffer")]
    NoBuffer,
}

/// Why a dialog operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// The underlying widget could not be created.
    #[error(transparent)]
    Create(#[from] CreateError),
    /// The dialog is not in the registry.
    #[error("dialog is not registered")]
    NotRegistered,
    /// The dialog was removed without being dismissed.
    #[error("dialog was removed before it was dismissed")]
    Cancelled,
}
