// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget kinds and the callback protocol.
//!
//! Every widget points at a `&'static` [`WidgetKind`] describing its
//! behavior: a name, the per-instance storage it needs, default flags, a
//! default color table, and the callback that receives [`ControlCode`]
//! messages. A widget may also carry a per-instance callback override, which
//! receives every message first.

use core::mem::size_of;

use super::flags::WidgetFlags;
use super::geometry::{Bounds, Padding};
use super::id::WidgetId;
use super::list::{Link, SiblingList};
use super::store::WidgetTree;

/// A packed ARGB color.
pub type Color = u32;

/// Per-widget message handler.
///
/// Returns `true` if the message was handled. When it returns `false` the
/// tree applies its default for that code (see [`ControlCode`]).
pub type WidgetCallback =
    fn(tree: &mut WidgetTree, widget: WidgetId, code: ControlCode, param: &Param, reply: &mut Reply) -> bool;

/// Storage the tree keeps for every widget.
///
/// Kinds must declare at least this much; the excess becomes zeroed
/// per-instance storage (see [`WidgetTree::instance_data`]).
pub const BASE_NODE_SIZE: usize = size_of::<Link>()
    + size_of::<u32>() // parent
    + size_of::<u32>() // tag
    + size_of::<WidgetFlags>()
    + size_of::<Bounds>()
    + size_of::<i32>() // z-index
    + size_of::<u8>() // transparency
    + size_of::<&'static WidgetKind>();

/// Storage the tree keeps for every container widget.
pub const CONTAINER_NODE_SIZE: usize =
    BASE_NODE_SIZE + size_of::<SiblingList>() + size_of::<Padding>() + 2 * size_of::<i32>();

/// Static description of a widget type.
#[derive(Debug)]
pub struct WidgetKind {
    /// Human-readable type name.
    pub name: &'static str,
    /// Declared instance size in bytes, including the node footprint.
    pub size: usize,
    /// Flags copied onto every new instance.
    pub flags: WidgetFlags,
    /// Default message handler.
    pub callback: WidgetCallback,
    /// Default color table, indexed by [`WidgetTree::set_color`].
    pub colors: &'static [Color],
}

impl WidgetKind {
    /// Minimum declared size for this kind's role.
    #[must_use]
    pub const fn required_size(&self) -> usize {
        if self.flags.contains(WidgetFlags::ALLOW_CHILDREN) {
            CONTAINER_NODE_SIZE
        } else {
            BASE_NODE_SIZE
        }
    }
}

/// Messages delivered to widget callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlCode {
    /// Before the widget is linked. Reply `Bool(false)` to veto creation.
    PreInit,
    /// Reply `Bool(true)` to keep the widget out of its parent's list.
    ExcludeLinkedList,
    /// A custom parameter was set (`Param::Custom`).
    SetParam,
    /// A custom parameter is read (`Param::Custom`, reply `Int`).
    GetParam,
    /// The widget is linked and initialized.
    Init,
    /// A child was created (`Param::Widget`).
    ChildWidgetCreated,
    /// Paint request from a renderer.
    Draw,
    /// Reply `Bool(false)` to veto removal.
    CanRemove,
    /// The widget is about to be freed by a removal sweep.
    Remove,
    /// The widget joined the focus path.
    FocusIn,
    /// The widget left the focus path.
    FocusOut,
    /// The widget became active.
    ActiveIn,
    /// The widget stopped being active.
    ActiveOut,
    /// Pointer pressed inside the widget (`Param::Touch`).
    TouchStart,
    /// Pointer moved while active (`Param::Touch`).
    TouchMove,
    /// Pointer released (`Param::Touch`).
    TouchEnd,
    /// Short press.
    Click,
    /// Long press.
    LongClick,
    /// Double press.
    DblClick,
    /// Key delivered to the focused widget (`Param::Key`).
    KeyPress,
    /// Selection changed.
    SelectionChanged,
    /// Value changed.
    ValueChanged,
    /// Text changed.
    TextChanged,
    /// Move the selection (`Param::Step`).
    IncSelection,
    /// A dialog was dismissed (`Param::Status`).
    OnDismiss,
}

/// Message argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Param {
    /// No argument.
    #[default]
    None,
    /// A related widget.
    Widget(WidgetId),
    /// Dialog dismiss status.
    Status(i32),
    /// Signed step.
    Step(i16),
    /// Custom parameter key and value.
    Custom {
        /// Parameter key.
        key: u16,
        /// Parameter value.
        value: i32,
    },
    /// Pointer position relative to the widget.
    Touch {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
    /// Key code.
    Key(u32),
}

/// Message result written by a callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reply {
    /// No result.
    #[default]
    None,
    /// Boolean result.
    Bool(bool),
    /// Integer result.
    Int(i32),
}

impl Reply {
    /// Returns the boolean result, or `default` if none was written.
    #[must_use]
    pub const fn as_bool(self, default: bool) -> bool {
        match self {
            Self::Bool(b) => b,
            _ => default,
        }
    }
}

fn ignore_all(_: &mut WidgetTree, _: WidgetId, _: ControlCode, _: &Param, _: &mut Reply) -> bool {
    false
}

/// The root container covering the whole screen.
pub static DESKTOP: WidgetKind = WidgetKind {
    name: "desktop",
    size: CONTAINER_NODE_SIZE,
    flags: WidgetFlags::ALLOW_CHILDREN,
    callback: ignore_all,
    colors: &[0xFF_20_20_20],
};

/// A plain container window, also the usual base for dialogs.
pub static WINDOW: WidgetKind = WidgetKind {
    name: "window",
    size: CONTAINER_NODE_SIZE,
    flags: WidgetFlags::ALLOW_CHILDREN,
    callback: ignore_all,
    colors: &[0xFF_F0_F0_F0, 0xFF_80_80_80],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_footprint_exceeds_base() {
        assert!(CONTAINER_NODE_SIZE > BASE_NODE_SIZE, "containers carry more state");
        assert_eq!(WINDOW.required_size(), CONTAINER_NODE_SIZE);
    }

    #[test]
    fn reply_default_applies_when_unset() {
        assert!(Reply::None.as_bool(true));
        assert!(!Reply::Int(1).as_bool(false));
        assert!(!Reply::Bool(false).as_bool(true));
    }
}
