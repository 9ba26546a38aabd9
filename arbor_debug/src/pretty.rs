// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use arbor_core::trace::{
    ActiveChangeEvent, DialogEvent, DialogPhase, FocusChangeEvent, InvalidateEvent,
    RemovalSweepEvent, RemovalVetoedEvent, TraceSink, WidgetCreatedEvent, ZOrderDirection,
    ZOrderEvent,
};
use arbor_core::widget::WidgetId;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write + Send>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// `-` for "none", else the handle's debug form.
fn opt(id: Option<WidgetId>) -> String {
    id.map_or_else(|| "-".to_owned(), |id| format!("{id:?}"))
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_widget_created(&mut self, e: &WidgetCreatedEvent) {
        let _ = writeln!(
            self.writer,
            "[create] {:?} tag={} kind={} parent={}",
            e.widget,
            e.tag,
            e.kind,
            opt(e.parent),
        );
    }

    fn on_removal_vetoed(&mut self, e: &RemovalVetoedEvent) {
        let _ = writeln!(
            self.writer,
            "[remove:veto] {:?} by={:?}",
            e.widget, e.vetoed_by,
        );
    }

    fn on_removal_sweep(&mut self, e: &RemovalSweepEvent) {
        let _ = writeln!(self.writer, "[sweep] freed={}", e.freed);
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[focus] {} -> {}",
            opt(e.from),
            opt(e.to),
        );
    }

    fn on_active_change(&mut self, e: &ActiveChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[active] {} -> {}",
            opt(e.from),
            opt(e.to),
        );
    }

    fn on_zorder(&mut self, e: &ZOrderEvent) {
        let dir = match e.direction {
            ZOrderDirection::ToBottom => "bottom",
            ZOrderDirection::ToTop => "top",
        };
        let _ = writeln!(
            self.writer,
            "[zorder] {:?} to={dir} moves={}",
            e.widget, e.moves,
        );
    }

    fn on_dialog(&mut self, e: &DialogEvent) {
        let phase = match e.phase {
            DialogPhase::Registered => "registered".to_owned(),
            DialogPhase::Dismissed(status) => format!("dismissed status={status}"),
            DialogPhase::Cancelled => "cancelled".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[dialog] {:?} tag={} {phase}",
            e.widget, e.tag,
        );
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        let r = e.rect;
        let _ = writeln!(
            self.writer,
            "[invalidate] {:?} rect=({}, {}, {}, {})",
            e.widget, r.x0, r.y0, r.x1, r.y1,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use arbor_core::TreeConfig;
    use arbor_core::widget::{Bounds, CreateFlags, WINDOW, WidgetTree};

    #[test]
    fn pretty_print_sweep() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_removal_sweep(&RemovalSweepEvent { freed: 3 });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(output, "[sweep] freed=3\n");
    }

    /// Writer whose buffer outlives the boxed sink.
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tree_events_reach_the_sink() {
        let out = Shared::default();
        let mut t = WidgetTree::new(TreeConfig::qvga());
        t.set_trace_sink(Box::new(PrettyPrintSink::with_writer(out.clone())));
        let w = t
            .create(&WINDOW, 5, Bounds::px(0, 0, 10, 10), None, None, CreateFlags::empty())
            .unwrap();
        t.set_focus(Some(w));
        t.remove(w).unwrap();
        t.execute_remove();

        let output = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("tag=5 kind=window"), "got: {output}");
        assert!(output.contains("[focus] - -> "), "got: {output}");
        assert!(output.contains("[invalidate] "), "got: {output}");
        assert!(output.ends_with("[sweep] freed=1\n"), "got: {output}");
    }

    #[test]
    fn dialog_phases_are_spelled_out() {
        let mut t = WidgetTree::new(TreeConfig::qvga());
        let w = t
            .create(&WINDOW, 9, Bounds::px(0, 0, 10, 10), None, None, CreateFlags::empty())
            .unwrap();
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_dialog(&DialogEvent {
            widget: w,
            tag: 9,
            phase: DialogPhase::Dismissed(42),
        });
        sink.on_focus_change(&FocusChangeEvent { from: None, to: Some(w) });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("tag=9 dismissed status=42"), "got: {output}");
        assert!(output.contains("[focus] - -> WidgetId("), "got: {output}");
    }
}
