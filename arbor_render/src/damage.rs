// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial repaints.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

/// A region of the screen that needs repainting.
///
/// Display drivers can use this to flush only the areas that changed since
/// the last pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The entire screen needs repainting.
    #[default]
    Full,
    /// A list of axis-aligned rectangles that need repainting.
    ///
    /// Each rectangle is `[x, y, width, height]` in screen pixels.
    Rects(Vec<[f32; 4]>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Damage for one pass, from the tree's accumulated dirty rectangle.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "dirty rectangles hold integer pixel coordinates"
    )]
    pub fn from_dirty_rect(rect: Option<Rect>) -> Self {
        match rect {
            Some(r) if r.area() > 0.0 => Self::Rects(vec![[
                r.x0 as f32,
                r.y0 as f32,
                r.width() as f32,
                r.height() as f32,
            ]]),
            _ => Self::None,
        }
    }

    /// Returns `true` if no region needs repainting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_rect_becomes_xywh() {
        let d = DamageRegion::from_dirty_rect(Some(Rect::new(10.0, 20.0, 40.0, 25.0)));
        assert_eq!(d, DamageRegion::Rects(vec![[10.0, 20.0, 30.0, 5.0]]));
        assert!(DamageRegion::from_dirty_rect(None).is_empty());
        assert!(
            DamageRegion::from_dirty_rect(Some(Rect::new(5.0, 5.0, 5.0, 9.0))).is_empty(),
            "zero-width rect is no damage"
        );
    }

    #[test]
    fn merge_rules() {
        let mut d = DamageRegion::None;
        d.merge(&DamageRegion::Rects(vec![[0.0, 0.0, 1.0, 1.0]]));
        d.merge(&DamageRegion::Rects(vec![[2.0, 2.0, 1.0, 1.0]]));
        assert_eq!(
            d,
            DamageRegion::Rects(vec![[0.0, 0.0, 1.0, 1.0], [2.0, 2.0, 1.0, 1.0]])
        );
        d.merge(&DamageRegion::None);
        assert!(matches!(d, DamageRegion::Rects(ref r) if r.len() == 2), "None is identity");
        d.merge(&DamageRegion::Full);
        assert_eq!(d, DamageRegion::Full);
    }
}
