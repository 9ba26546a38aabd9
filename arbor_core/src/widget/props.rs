// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry and appearance setters.
//!
//! Every setter invalidates what it changes. Moves and resizes also
//! invalidate the parent, since the vacated area belongs to it.

use super::flags::WidgetFlags;
use super::geometry::{Length, Padding};
use super::id::WidgetId;
use super::store::WidgetTree;

impl WidgetTree {
    /// Sets width and height.
    pub fn set_size(&mut self, id: WidgetId, width: Length, height: Length) {
        self.validate(id);
        self.set_size_at(id.idx, width, height);
    }

    /// Sets the width, keeping the height.
    pub fn set_width(&mut self, id: WidgetId, width: Length) {
        self.validate(id);
        let height = self.bounds[id.idx as usize].height;
        self.set_size_at(id.idx, width, height);
    }

    /// Sets the height, keeping the width.
    pub fn set_height(&mut self, id: WidgetId, height: Length) {
        self.validate(id);
        let width = self.bounds[id.idx as usize].width;
        self.set_size_at(id.idx, width, height);
    }

    /// Sets the position relative to the parent's inner area.
    pub fn set_position(&mut self, id: WidgetId, x: Length, y: Length) {
        self.validate(id);
        self.set_position_at(id.idx, x, y);
    }

    /// Sets the x coordinate, keeping y.
    pub fn set_x(&mut self, id: WidgetId, x: Length) {
        self.validate(id);
        let y = self.bounds[id.idx as usize].y;
        self.set_position_at(id.idx, x, y);
    }

    /// Sets the y coordinate, keeping x.
    pub fn set_y(&mut self, id: WidgetId, y: Length) {
        self.validate(id);
        let x = self.bounds[id.idx as usize].x;
        self.set_position_at(id.idx, x, y);
    }

    pub(crate) fn set_size_at(&mut self, idx: u32, width: Length, height: Length) {
        let i = idx as usize;
        let b = self.bounds[i];
        if b.width == width && b.height == height {
            return;
        }
        let expanded = self.flags[i].contains(WidgetFlags::EXPANDED);
        let (old_w, old_h) = (self.width_at(idx), self.height_at(idx));
        if !expanded {
            self.invalidate_with_parent_at(idx);
        }
        self.bounds[i].width = width;
        self.bounds[i].height = height;
        if !expanded && (self.width_at(idx) > old_w || self.height_at(idx) > old_h) {
            self.invalidate_with_parent_at(idx);
        }
    }

    pub(crate) fn set_position_at(&mut self, idx: u32, x: Length, y: Length) {
        let i = idx as usize;
        let b = self.bounds[i];
        if b.x == x && b.y == y {
            return;
        }
        let expanded = self.flags[i].contains(WidgetFlags::EXPANDED);
        if !expanded {
            self.invalidate_with_parent_at(idx);
        }
        self.bounds[i].x = x;
        self.bounds[i].y = y;
        if !expanded {
            self.invalidate_with_parent_at(idx);
        }
    }

    /// Makes the widget fill its parent's inner area, ignoring its own
    /// bounds.
    pub fn set_expanded(&mut self, id: WidgetId, expanded: bool) {
        self.validate(id);
        let i = id.idx as usize;
        if self.flags[i].contains(WidgetFlags::EXPANDED) == expanded {
            return;
        }
        self.invalidate_with_parent_at(id.idx);
        self.flags[i].set(WidgetFlags::EXPANDED, expanded);
        self.invalidate_with_parent_at(id.idx);
    }

    /// Sets the inner spacing of a container.
    pub fn set_padding(&mut self, id: WidgetId, padding: Padding) {
        self.validate(id);
        let i = id.idx as usize;
        if self.padding[i] == padding {
            return;
        }
        self.padding[i] = padding;
        self.invalidate_at(id.idx);
    }

    // -- Scrolling --

    /// Horizontal scroll offset of a container's children.
    #[must_use]
    pub fn scroll_x(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.scroll[id.idx as usize].0
    }

    /// Vertical scroll offset of a container's children.
    #[must_use]
    pub fn scroll_y(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.scroll[id.idx as usize].1
    }

    /// Sets the horizontal scroll offset.
    ///
    /// # Panics
    ///
    /// Panics if the widget is not a container.
    pub fn set_scroll_x(&mut self, id: WidgetId, x: i32) {
        let y = self.scroll_y(id);
        self.set_scroll_at(id, x, y);
    }

    /// Sets the vertical scroll offset.
    ///
    /// # Panics
    ///
    /// Panics if the widget is not a container.
    pub fn set_scroll_y(&mut self, id: WidgetId, y: i32) {
        let x = self.scroll_x(id);
        self.set_scroll_at(id, x, y);
    }

    /// Adds `dx` to the horizontal scroll offset.
    pub fn inc_scroll_x(&mut self, id: WidgetId, dx: i32) {
        let (x, y) = (self.scroll_x(id), self.scroll_y(id));
        self.set_scroll_at(id, x.saturating_add(dx), y);
    }

    /// Adds `dy` to the vertical scroll offset.
    pub fn inc_scroll_y(&mut self, id: WidgetId, dy: i32) {
        let (x, y) = (self.scroll_x(id), self.scroll_y(id));
        self.set_scroll_at(id, x, y.saturating_add(dy));
    }

    fn set_scroll_at(&mut self, id: WidgetId, x: i32, y: i32) {
        let i = id.idx as usize;
        assert!(
            self.flags[i].contains(WidgetFlags::ALLOW_CHILDREN),
            "only containers scroll"
        );
        if self.scroll[i] == (x, y) {
            return;
        }
        self.scroll[i] = (x, y);
        self.invalidate_at(id.idx);
    }

    // -- Appearance --

    /// Sets the transparency, where [`OPAQUE`](super::OPAQUE) is fully opaque.
    ///
    /// A non-opaque widget pulls its parent into every invalidation.
    pub fn set_transparency(&mut self, id: WidgetId, value: u8) {
        self.validate(id);
        let i = id.idx as usize;
        if self.transparency[i] == value {
            return;
        }
        self.transparency[i] = value;
        self.invalidate_with_parent_at(id.idx);
    }

    /// Makes every invalidation of this widget include its parent.
    pub fn set_invalidate_parent(&mut self, id: WidgetId, on: bool) {
        self.validate(id);
        self.flags[id.idx as usize].set(WidgetFlags::INVALIDATE_PARENT, on);
    }

    /// Enables or disables input for the widget.
    pub fn set_disabled(&mut self, id: WidgetId, disabled: bool) {
        self.validate(id);
        let i = id.idx as usize;
        if self.flags[i].contains(WidgetFlags::DISABLED) == disabled {
            return;
        }
        self.flags[i].set(WidgetFlags::DISABLED, disabled);
        self.invalidate_at(id.idx);
    }
}
