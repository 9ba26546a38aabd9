// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget geometry: lengths, padding, and rectangle helpers.
//!
//! Widget positions and sizes are integer pixels relative to the parent's
//! inner area (parent position plus padding, minus scroll). Rectangles handed
//! to renderers and accumulated as dirty regions are [`kurbo::Rect`] in
//! absolute screen pixels.

use kurbo::Rect;

/// A widget coordinate or size, either absolute or relative to the parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Pixels(i32),
    /// Percentage of the parent's inner width or height.
    Percent(f32),
}

impl Default for Length {
    fn default() -> Self {
        Self::Pixels(0)
    }
}

impl Length {
    /// Resolves against the parent's inner extent along the same axis.
    ///
    /// Percentages round half away from zero.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation after the half offset is the rounding step"
    )]
    #[must_use]
    pub fn resolve(self, parent_extent: i32) -> i32 {
        match self {
            Self::Pixels(px) => px,
            Self::Percent(pct) => {
                let scaled = pct * parent_extent as f32 / 100.0;
                let rounded = if scaled >= 0.0 {
                    scaled + 0.5
                } else {
                    scaled - 0.5
                };
                rounded as i32
            }
        }
    }
}

/// Position and size of a widget as requested by its creator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// Left edge relative to the parent's inner area.
    pub x: Length,
    /// Top edge relative to the parent's inner area.
    pub y: Length,
    /// Width.
    pub width: Length,
    /// Height.
    pub height: Length,
}

impl Bounds {
    /// Bounds in absolute pixels.
    #[must_use]
    pub const fn px(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x: Length::Pixels(x),
            y: Length::Pixels(y),
            width: Length::Pixels(width),
            height: Length::Pixels(height),
        }
    }
}

/// Inner spacing between a container's edge and its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Padding {
    /// Top inset.
    pub top: i32,
    /// Right inset.
    pub right: i32,
    /// Bottom inset.
    pub bottom: i32,
    /// Left inset.
    pub left: i32,
}

impl Padding {
    /// The same inset on every side.
    #[must_use]
    pub const fn uniform(v: i32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Sum of left and right insets.
    #[inline]
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of top and bottom insets.
    #[inline]
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// Builds a rectangle from an integer origin and size.
#[inline]
#[must_use]
pub(crate) fn rect_from_xywh(x: i32, y: i32, w: i32, h: i32) -> Rect {
    Rect::new(
        f64::from(x),
        f64::from(y),
        f64::from(x) + f64::from(w.max(0)),
        f64::from(y) + f64::from(h.max(0)),
    )
}

/// Returns `true` when the two rectangles share a region of positive area.
#[inline]
#[must_use]
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_zero_area()
}

/// Grows `acc` to cover `r`. Zero-area rectangles are ignored.
pub(crate) fn grow(acc: &mut Option<Rect>, r: Rect) {
    if r.is_zero_area() {
        return;
    }
    *acc = Some(match *acc {
        Some(prev) => prev.union(r),
        None => r,
    });
}
