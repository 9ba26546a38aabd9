// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint planning and damage tracking for arbor widget trees.
//!
//! This crate is the renderer's side of the hand-off from
//! [`arbor_core`]: it reads redraw flags and the dirty rectangle and turns
//! them into work a rasterizer can execute. It defines:
//!
//! - [`RepaintItem`]: one widget to repaint and the area to repaint
//! - [`RepaintPlan`]: repaint items in back-to-front order for one pass
//! - [`DamageRegion`]: the screen area touched by a pass

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod plan;

pub use damage::DamageRegion;
pub use plan::{RepaintItem, RepaintPlan};
