// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON dumps of the widget tree.
//!
//! [`tree_to_json`] renders every widget reachable from the process-root
//! list, children nested in paint order. Each node carries its handle, tag,
//! kind, set flags, resolved visible rectangle, z-index, and transparency.
//! Hidden subtrees are included.

use std::io::{self, Write};

use serde_json::{Value, json};

use arbor_core::widget::{WidgetId, WidgetTree};

/// Builds the JSON form of the whole tree.
#[must_use]
pub fn tree_to_json(tree: &WidgetTree) -> Value {
    let roots: Vec<Value> = tree.roots().map(|id| widget_to_json(tree, id)).collect();
    json!({
        "widgets": tree.len(),
        "focused": tree.focused().map(|id| format!("{id:?}")),
        "active": tree.active().map(|id| format!("{id:?}")),
        "dialogs": tree.dialog_count(),
        "dirty_rect": tree.dirty_rect().map(|r| [r.x0, r.y0, r.x1, r.y1]),
        "roots": roots,
    })
}

/// Builds the JSON form of one widget and its subtree.
#[must_use]
pub fn widget_to_json(tree: &WidgetTree, id: WidgetId) -> Value {
    let flags: Vec<&str> = tree.flags(id).iter_names().map(|(name, _)| name).collect();
    let r = tree.visible_rect(id);
    let children: Vec<Value> = tree
        .children(id)
        .map(|child| widget_to_json(tree, child))
        .collect();
    json!({
        "id": format!("{id:?}"),
        "tag": tree.tag(id),
        "kind": tree.kind(id).name,
        "flags": flags,
        "rect": [r.x0, r.y0, r.x1, r.y1],
        "z": tree.z_index(id),
        "transparency": tree.transparency(id),
        "children": children,
    })
}

/// Writes the tree as pretty-printed JSON.
pub fn write_tree(tree: &WidgetTree, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &tree_to_json(tree))?;
    writeln!(writer)
}
