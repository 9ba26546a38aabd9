// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-wide configuration.

/// Settings fixed when a [`WidgetTree`](crate::widget::WidgetTree) is built.
///
/// Use one of the presets or construct the struct directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Screen width in pixels; the clip rectangle of parentless widgets.
    pub screen_width: i32,
    /// Screen height in pixels.
    pub screen_height: i32,
    /// Numeric id given to the desktop widget.
    pub desktop_tag: u32,
    /// Maximum number of live widgets, desktop included.
    ///
    /// Creation beyond this fails with
    /// [`CreateError::OutOfMemory`](crate::CreateError::OutOfMemory).
    pub max_widgets: u32,
}

impl TreeConfig {
    /// 320×240 panel with a small widget budget.
    #[must_use]
    pub const fn qvga() -> Self {
        Self {
            screen_width: 320,
            screen_height: 240,
            desktop_tag: 0,
            max_widgets: 64,
        }
    }

    /// 800×480 panel.
    #[must_use]
    pub const fn wvga() -> Self {
        Self {
            screen_width: 800,
            screen_height: 480,
            desktop_tag: 0,
            max_widgets: 1024,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::wvga()
    }
}
