// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auxiliary per-widget resources: text, color overrides, timer and user
//! data slots, instance storage, and custom parameters.

use alloc::string::String;
use alloc::vec::Vec;

use super::flags::WidgetFlags;
use super::id::{TimerId, WidgetId};
use super::kind::{Color, ControlCode, Param, Reply};
use super::store::{Text, WidgetTree};
use crate::error::{ColorError, TextError};

impl WidgetTree {
    // -- Instance storage --

    /// Per-instance bytes: the kind's declared size minus the node footprint.
    ///
    /// Zeroed at creation.
    #[must_use]
    pub fn instance_data(&self, id: WidgetId) -> &[u8] {
        self.validate(id);
        &self.instance[id.idx as usize]
    }

    /// Mutable per-instance bytes.
    pub fn instance_data_mut(&mut self, id: WidgetId) -> &mut [u8] {
        self.validate(id);
        &mut self.instance[id.idx as usize]
    }

    // -- Text --

    /// Gives the widget an owned text buffer holding up to `capacity - 1`
    /// bytes, replacing any previous text.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfMemory`] if the buffer cannot be allocated; the old
    /// text is kept.
    pub fn alloc_text(&mut self, id: WidgetId, capacity: usize) -> Result<(), TextError> {
        self.validate(id);
        let mut buf = String::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| TextError::OutOfMemory)?;
        let i = id.idx as usize;
        self.text[i] = Text::Owned { buf, capacity };
        self.flags[i] |= WidgetFlags::DYNAMIC_TEXT;
        Ok(())
    }

    /// Drops the owned text buffer, if any.
    pub fn free_text(&mut self, id: WidgetId) {
        self.validate(id);
        let i = id.idx as usize;
        if matches!(self.text[i], Text::Owned { .. }) {
            self.text[i] = Text::None;
            self.flags[i].remove(WidgetFlags::DYNAMIC_TEXT);
            self.text_changed(id.idx);
        }
    }

    /// Copies `text` into the owned buffer, truncated on a char boundary to
    /// fit.
    ///
    /// # Errors
    ///
    /// [`TextError::NoBuffer`] if [`alloc_text`](Self::alloc_text) was not
    /// called first. Use [`set_static_text`](Self::set_static_text) for
    /// borrowed text.
    pub fn set_text(&mut self, id: WidgetId, text: &str) -> Result<(), TextError> {
        self.validate(id);
        let Text::Owned { buf, capacity } = &mut self.text[id.idx as usize] else {
            return Err(TextError::NoBuffer);
        };
        buf.clear();
        buf.push_str(truncate(text, capacity.saturating_sub(1)));
        self.text_changed(id.idx);
        Ok(())
    }

    /// Attaches borrowed text, or copies it when the widget owns a buffer.
    pub fn set_static_text(&mut self, id: WidgetId, text: &'static str) {
        self.validate(id);
        let i = id.idx as usize;
        if let Text::Owned { buf, capacity } = &mut self.text[i] {
            buf.clear();
            buf.push_str(truncate(text, capacity.saturating_sub(1)));
        } else {
            self.text[i] = Text::Static(text);
        }
        self.text_changed(id.idx);
    }

    /// The widget's text, if any.
    #[must_use]
    pub fn text(&self, id: WidgetId) -> Option<&str> {
        self.validate(id);
        match &self.text[id.idx as usize] {
            Text::None => None,
            Text::Static(s) => Some(s),
            Text::Owned { buf, .. } => Some(buf),
        }
    }

    fn text_changed(&mut self, idx: u32) {
        self.invalidate_at(idx);
        self.notify_at(idx, ControlCode::TextChanged);
    }

    // -- Colors --

    /// Overrides one entry of the widget's color table.
    ///
    /// The first override copies the kind's default table.
    ///
    /// # Errors
    ///
    /// - [`ColorError::NoPalette`] if the kind has no color table.
    /// - [`ColorError::OutOfRange`] if `index` is past its end.
    /// - [`ColorError::OutOfMemory`] if the copy cannot be allocated.
    pub fn set_color(&mut self, id: WidgetId, index: usize, color: Color) -> Result<(), ColorError> {
        self.validate(id);
        let i = id.idx as usize;
        let defaults = self.kind[i].colors;
        if defaults.is_empty() {
            return Err(ColorError::NoPalette);
        }
        if index >= defaults.len() {
            return Err(ColorError::OutOfRange {
                index,
                len: defaults.len(),
            });
        }
        if self.colors[i].is_none() {
            let mut table = Vec::new();
            table
                .try_reserve_exact(defaults.len())
                .map_err(|_| ColorError::OutOfMemory)?;
            table.extend_from_slice(defaults);
            self.colors[i] = Some(table.into_boxed_slice());
        }
        if let Some(table) = &mut self.colors[i]
            && table[index] != color
        {
            table[index] = color;
            self.invalidate_at(id.idx);
        }
        Ok(())
    }

    /// Color at `index`: the override if set, else the kind default.
    #[must_use]
    pub fn color(&self, id: WidgetId, index: usize) -> Option<Color> {
        self.validate(id);
        let i = id.idx as usize;
        match &self.colors[i] {
            Some(table) => table.get(index).copied(),
            None => self.kind[i].colors.get(index).copied(),
        }
    }

    // -- Opaque slots --

    /// Attaches an external timer handle. The previous one is returned.
    ///
    /// A timer still attached when the widget is freed is reported in
    /// [`TreeChanges::released_timers`](super::TreeChanges::released_timers).
    pub fn set_timer(&mut self, id: WidgetId, timer: Option<TimerId>) -> Option<TimerId> {
        self.validate(id);
        core::mem::replace(&mut self.timer[id.idx as usize], timer)
    }

    /// The attached timer handle.
    #[must_use]
    pub fn timer(&self, id: WidgetId) -> Option<TimerId> {
        self.validate(id);
        self.timer[id.idx as usize]
    }

    /// Stores an application cookie. The tree never interprets it.
    pub fn set_user_data(&mut self, id: WidgetId, data: Option<u64>) {
        self.validate(id);
        self.user_data[id.idx as usize] = data;
    }

    /// The application cookie.
    #[must_use]
    pub fn user_data(&self, id: WidgetId) -> Option<u64> {
        self.validate(id);
        self.user_data[id.idx as usize]
    }

    // -- Parameters --

    /// Forwards a custom parameter to the widget's callback, then
    /// invalidates it (and its parent when `invalidate_parent` is set).
    ///
    /// Returns whether the callback handled it.
    pub fn set_param(
        &mut self,
        id: WidgetId,
        key: u16,
        value: i32,
        invalidate: bool,
        invalidate_parent: bool,
    ) -> bool {
        self.validate(id);
        let mut reply = Reply::None;
        let handled = self.dispatch_at(
            id.idx,
            ControlCode::SetParam,
            &Param::Custom { key, value },
            &mut reply,
        );
        if invalidate_parent {
            self.invalidate_with_parent_at(id.idx);
        } else if invalidate {
            self.invalidate_at(id.idx);
        }
        handled
    }

    /// Asks the widget's callback for a custom parameter.
    #[must_use]
    pub fn get_param(&mut self, id: WidgetId, key: u16) -> Option<i32> {
        self.validate(id);
        let mut reply = Reply::None;
        self.dispatch_at(
            id.idx,
            ControlCode::GetParam,
            &Param::Custom { key, value: 0 },
            &mut reply,
        );
        match reply {
            Reply::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Asks a list-like widget to move its selection by `step`.
    pub fn inc_selection(&mut self, id: WidgetId, step: i16) -> bool {
        self.validate(id);
        let mut reply = Reply::None;
        self.dispatch_at(id.idx, ControlCode::IncSelection, &Param::Step(step), &mut reply)
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::truncate;
    use crate::config::TreeConfig;
    use crate::error::{ColorError, TextError};
    use crate::widget::kind::{CONTAINER_NODE_SIZE, ControlCode, Param, Reply, WidgetKind};
    use crate::widget::{Bounds, CreateFlags, TimerId, WINDOW, WidgetFlags, WidgetId, WidgetTree};

    fn slider(t: &mut WidgetTree, w: WidgetId, code: ControlCode, p: &Param, r: &mut Reply) -> bool {
        let data = t.instance_data_mut(w);
        match (code, *p) {
            (ControlCode::SetParam, Param::Custom { key: 1, value }) => {
                data[..4].copy_from_slice(&value.to_le_bytes());
                true
            }
            (ControlCode::GetParam, Param::Custom { key: 1, .. }) => {
                let mut raw = [0_u8; 4];
                raw.copy_from_slice(&data[..4]);
                *r = Reply::Int(i32::from_le_bytes(raw));
                true
            }
            (ControlCode::IncSelection, Param::Step(s)) => {
                data[4] = data[4].wrapping_add_signed(i8::try_from(s).unwrap_or(0));
                true
            }
            _ => false,
        }
    }

    static SLIDER: WidgetKind = WidgetKind {
        name: "slider",
        size: CONTAINER_NODE_SIZE + 8,
        flags: WidgetFlags::ALLOW_CHILDREN,
        callback: slider,
        colors: &[0xFF00_0000, 0xFFFF_FFFF],
    };

    fn tree_with(kind: &'static WidgetKind) -> (WidgetTree, WidgetId) {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let w = t
            .create(kind, 1, Bounds::px(0, 0, 10, 10), None, None, CreateFlags::empty())
            .unwrap();
        (t, w)
    }

    #[test]
    fn owned_text_truncates_to_capacity() {
        let (mut t, w) = tree_with(&WINDOW);
        assert_eq!(t.set_text(w, "hi"), Err(TextError::NoBuffer));
        t.alloc_text(w, 5).unwrap();
        assert!(t.flags(w).contains(WidgetFlags::DYNAMIC_TEXT));
        t.set_text(w, "abcdef").unwrap();
        assert_eq!(t.text(w), Some("abcd"));
        t.free_text(w);
        assert_eq!(t.text(w), None);
        assert!(!t.flags(w).contains(WidgetFlags::DYNAMIC_TEXT));
    }

    #[test]
    fn static_text_is_borrowed_without_buffer() {
        let (mut t, w) = tree_with(&WINDOW);
        t.set_static_text(w, "title");
        assert_eq!(t.text(w), Some("title"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("héllo", 3), "hé");
        assert_eq!(truncate("ok", 0), "");
    }

    #[test]
    fn color_override_copies_defaults() {
        let (mut t, w) = tree_with(&SLIDER);
        assert_eq!(t.color(w, 1), Some(0xFFFF_FFFF));
        t.set_color(w, 0, 0xFF12_3456).unwrap();
        assert_eq!(t.color(w, 0), Some(0xFF12_3456));
        assert_eq!(t.color(w, 1), Some(0xFFFF_FFFF), "other entries keep defaults");
        assert_eq!(
            t.set_color(w, 2, 0),
            Err(ColorError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(SLIDER.colors[0], 0xFF00_0000, "kind table untouched");
    }

    #[test]
    fn params_round_trip_through_instance_storage() {
        let (mut t, w) = tree_with(&SLIDER);
        assert!(t.set_param(w, 1, 42, true, false));
        assert_eq!(t.get_param(w, 1), Some(42));
        assert_eq!(t.get_param(w, 7), None);
        assert!(t.inc_selection(w, 3));
        assert_eq!(t.instance_data(w)[4], 3);
    }

    #[test]
    fn timer_released_on_free() {
        let (mut t, w) = tree_with(&WINDOW);
        assert_eq!(t.set_timer(w, Some(TimerId(9))), None);
        assert_eq!(t.timer(w), Some(TimerId(9)));
        t.set_user_data(w, Some(77));
        assert_eq!(t.user_data(w), Some(77));
        t.remove(w).unwrap();
        t.execute_remove();
        assert_eq!(t.take_changes().released_timers, [TimerId(9)]);
    }
}
