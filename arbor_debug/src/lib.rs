// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and tree dumps for arbor diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](arbor_core::trace::TraceSink)
//!   that writes one human-readable line per event.
//! - [`dump`]: the whole widget tree as JSON, with resolved geometry and
//!   flags, in paint order.

pub mod dump;
pub mod pretty;
