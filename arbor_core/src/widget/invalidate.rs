// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry resolution and the invalidation engine.
//!
//! Invalidating a widget sets its [`REDRAW`](WidgetFlags::REDRAW) flag and
//! repairs the consequences for its relatives:
//!
//! 1. Widgets with [`IGNORE_INVALIDATE`](WidgetFlags::IGNORE_INVALIDATE)
//!    are skipped entirely.
//! 2. The widget is flagged and the tree-wide redraw bit is raised.
//! 3. When requested, its visible rectangle grows the dirty rectangle.
//! 4. A transparent widget invalidates its parent (no dirty-rect growth).
//! 5. Every later sibling whose visible rectangle overlaps it is flagged.
//!    This does not cascade further.
//! 6. A widget that is not last among its siblings invalidates its parent.
//! 7. The nearest transparent ancestor is invalidated.
//!
//! Relatives are processed from a worklist instead of by recursion. Every
//! follow-up goes strictly up the parent chain, so the list is bounded by the
//! tree depth.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use super::flags::WidgetFlags;
use super::geometry::{grow, overlaps, rect_from_xywh};
use super::id::{INVALID, WidgetId};
use super::store::{OPAQUE, WidgetTree};
use crate::dirty;
use crate::notify::WakeMessage;

impl WidgetTree {
    // -- Geometry --

    /// Resolved width in pixels.
    #[must_use]
    pub fn width(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.width_at(id.idx)
    }

    /// Resolved height in pixels.
    #[must_use]
    pub fn height(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.height_at(id.idx)
    }

    /// Width available to children: width minus horizontal padding.
    #[must_use]
    pub fn inner_width(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.inner_width_at(id.idx)
    }

    /// Height available to children: height minus vertical padding.
    #[must_use]
    pub fn inner_height(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.inner_height_at(id.idx)
    }

    /// Resolved left edge relative to the parent's inner area.
    #[must_use]
    pub fn relative_x(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.rel_x_at(id.idx)
    }

    /// Resolved top edge relative to the parent's inner area.
    #[must_use]
    pub fn relative_y(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.rel_y_at(id.idx)
    }

    /// Left edge in screen coordinates, including ancestor scroll.
    #[must_use]
    pub fn absolute_x(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.abs_x_at(id.idx)
    }

    /// Top edge in screen coordinates, including ancestor scroll.
    #[must_use]
    pub fn absolute_y(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.abs_y_at(id.idx)
    }

    /// On-screen rectangle after clipping by every ancestor's inner area and
    /// by the screen.
    ///
    /// Ancestor clip areas are not shifted by their own scroll offset.
    #[must_use]
    pub fn visible_rect(&self, id: WidgetId) -> Rect {
        self.validate(id);
        self.visible_rect_at(id.idx)
    }

    /// Whether the widget's visible rectangle intersects the dirty rectangle.
    #[must_use]
    pub fn is_inside_dirty_rect(&self, id: WidgetId) -> bool {
        self.validate(id);
        self.dirty_rect
            .is_some_and(|d| overlaps(d, self.visible_rect_at(id.idx)))
    }

    /// Visible rectangle by raw slot index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn visible_rect_at(&self, idx: u32) -> Rect {
        let x = self.abs_x_at(idx);
        let y = self.abs_y_at(idx);
        let (mut x1, mut y1) = (x, y);
        let (mut x2, mut y2) = (x + self.width_at(idx), y + self.height_at(idx));

        let mut h = idx;
        loop {
            let p = self.parent[h as usize];
            let (cx, cy, cw, ch) = if p == INVALID {
                (0, 0, self.config.screen_width, self.config.screen_height)
            } else {
                let pad = self.padding[p as usize];
                (
                    self.abs_x_at(p) + pad.left,
                    self.abs_y_at(p) + pad.top,
                    self.inner_width_at(p),
                    self.inner_height_at(p),
                )
            };
            x1 = x1.max(cx);
            y1 = y1.max(cy);
            x2 = x2.min(cx + cw);
            y2 = y2.min(cy + ch);
            if p == INVALID {
                break;
            }
            h = p;
        }
        rect_from_xywh(x1, y1, x2 - x1, y2 - y1)
    }

    pub(crate) fn parent_inner_width_at(&self, idx: u32) -> i32 {
        let p = self.parent[idx as usize];
        if p == INVALID {
            self.config.screen_width
        } else {
            self.inner_width_at(p)
        }
    }

    pub(crate) fn parent_inner_height_at(&self, idx: u32) -> i32 {
        let p = self.parent[idx as usize];
        if p == INVALID {
            self.config.screen_height
        } else {
            self.inner_height_at(p)
        }
    }

    pub(crate) fn width_at(&self, idx: u32) -> i32 {
        let parent = self.parent_inner_width_at(idx);
        if self.flags[idx as usize].contains(WidgetFlags::EXPANDED) {
            parent
        } else {
            self.bounds[idx as usize].width.resolve(parent)
        }
    }

    pub(crate) fn height_at(&self, idx: u32) -> i32 {
        let parent = self.parent_inner_height_at(idx);
        if self.flags[idx as usize].contains(WidgetFlags::EXPANDED) {
            parent
        } else {
            self.bounds[idx as usize].height.resolve(parent)
        }
    }

    pub(crate) fn inner_width_at(&self, idx: u32) -> i32 {
        self.width_at(idx) - self.padding[idx as usize].horizontal()
    }

    pub(crate) fn inner_height_at(&self, idx: u32) -> i32 {
        self.height_at(idx) - self.padding[idx as usize].vertical()
    }

    pub(crate) fn rel_x_at(&self, idx: u32) -> i32 {
        if self.flags[idx as usize].contains(WidgetFlags::EXPANDED) {
            0
        } else {
            self.bounds[idx as usize]
                .x
                .resolve(self.parent_inner_width_at(idx))
        }
    }

    pub(crate) fn rel_y_at(&self, idx: u32) -> i32 {
        if self.flags[idx as usize].contains(WidgetFlags::EXPANDED) {
            0
        } else {
            self.bounds[idx as usize]
                .y
                .resolve(self.parent_inner_height_at(idx))
        }
    }

    pub(crate) fn abs_x_at(&self, idx: u32) -> i32 {
        let mut out = self.rel_x_at(idx);
        let mut w = self.parent[idx as usize];
        while w != INVALID {
            out += self.rel_x_at(w) + self.padding[w as usize].left - self.scroll[w as usize].0;
            w = self.parent[w as usize];
        }
        out
    }

    pub(crate) fn abs_y_at(&self, idx: u32) -> i32 {
        let mut out = self.rel_y_at(idx);
        let mut w = self.parent[idx as usize];
        while w != INVALID {
            out += self.rel_y_at(w) + self.padding[w as usize].top - self.scroll[w as usize].1;
            w = self.parent[w as usize];
        }
        out
    }

    // -- Invalidation --

    /// Requests a repaint of `id` and of everything its repaint disturbs.
    ///
    /// Also invalidates the parent (without growing the dirty rectangle) when
    /// the widget is transparent or has
    /// [`INVALIDATE_PARENT`](WidgetFlags::INVALIDATE_PARENT) set, then posts
    /// [`WakeMessage::WidgetInvalidated`].
    pub fn invalidate(&mut self, id: WidgetId) {
        self.validate(id);
        self.invalidate_at(id.idx);
    }

    pub(crate) fn invalidate_at(&mut self, idx: u32) {
        self.invalidate_inner(idx, true);
        let i = idx as usize;
        let p = self.parent[i];
        if p != INVALID
            && (self.flags[i].contains(WidgetFlags::INVALIDATE_PARENT)
                || self.transparency[i] != OPAQUE)
        {
            self.invalidate_inner(p, false);
        }
        self.post(WakeMessage::WidgetInvalidated);
    }

    /// Invalidates `id` and then unconditionally its parent.
    ///
    /// Used when a widget's footprint changes, since the area it leaves or
    /// enters belongs to the parent.
    pub fn invalidate_with_parent(&mut self, id: WidgetId) {
        self.validate(id);
        self.invalidate_with_parent_at(id.idx);
    }

    pub(crate) fn invalidate_with_parent_at(&mut self, idx: u32) {
        if self.flags[idx as usize].contains(WidgetFlags::IGNORE_INVALIDATE) {
            return;
        }
        self.invalidate_inner(idx, true);
        let p = self.parent[idx as usize];
        if p != INVALID {
            self.invalidate_inner(p, false);
        }
    }

    /// Core invalidation walk. Only `start` may grow the dirty rectangle.
    pub(crate) fn invalidate_inner(&mut self, start: u32, grow_clip: bool) {
        let mut work = vec![(start, grow_clip)];
        let mut done: Vec<u32> = Vec::new();

        while let Some((idx, clip)) = work.pop() {
            let i = idx as usize;
            if done.contains(&idx) {
                continue;
            }
            done.push(idx);
            if self.flags[i].contains(WidgetFlags::IGNORE_INVALIDATE) {
                continue;
            }

            self.mark_redraw(idx);
            let rect = self.visible_rect_at(idx);
            if clip {
                grow(&mut self.dirty_rect, rect);
            }
            #[cfg(feature = "trace-rich")]
            self.tracer.invalidate(&crate::trace::InvalidateEvent {
                widget: self.handle(idx),
                rect,
            });

            let parent = self.parent[i];
            if parent != INVALID && self.transparency[i] != OPAQUE {
                work.push((parent, false));
            }

            // Later siblings paint over this widget; repaint those that overlap.
            let mut n = self.links[i].next;
            while n != INVALID {
                if !self.flags[n as usize].contains(WidgetFlags::REDRAW)
                    && overlaps(rect, self.visible_rect_at(n))
                {
                    self.mark_redraw(n);
                }
                n = self.links[n as usize].next;
            }

            if parent != INVALID && self.links[i].next != INVALID {
                work.push((parent, false));
            }

            let mut a = parent;
            while a != INVALID {
                if self.transparency[a as usize] != OPAQUE {
                    work.push((a, false));
                    break;
                }
                a = self.parent[a as usize];
            }
        }
    }

    pub(crate) fn mark_redraw(&mut self, idx: u32) {
        self.flags[idx as usize] |= WidgetFlags::REDRAW;
        self.needs_redraw = true;
        self.dirty.mark(idx, dirty::REDRAW);
    }
}
