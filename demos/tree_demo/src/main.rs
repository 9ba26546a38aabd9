// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated widget session that exercises the tree and its diagnostics.
//!
//! Builds a small window hierarchy, moves and focuses widgets, opens a
//! blocking dialog from a worker thread and dismisses it from the main
//! thread, sweeps removals, and runs a repaint pass after each step. Trace
//! events go to stdout through a
//! [`PrettyPrintSink`](arbor_debug::pretty::PrettyPrintSink); the final tree
//! is dumped as JSON.

use std::thread;
use std::time::Duration;

use arbor_core::TreeConfig;
use arbor_core::sync::{ChannelNotifier, SharedTree, create_blocking};
use arbor_core::widget::{
    BASE_NODE_SIZE, Bounds, ControlCode, CreateFlags, Length, Padding, Param, Reply, WINDOW,
    WidgetFlags, WidgetId, WidgetKind, WidgetTree,
};
use arbor_debug::dump;
use arbor_debug::pretty::PrettyPrintSink;
use arbor_render::RepaintPlan;

const DIALOG_TAG: u32 = 100;

fn button(tree: &mut WidgetTree, w: WidgetId, code: ControlCode, _: &Param, _: &mut Reply) -> bool {
    match code {
        ControlCode::FocusIn => {
            println!("  button {} got focus", tree.tag(w));
            true
        }
        _ => false,
    }
}

static BUTTON: WidgetKind = WidgetKind {
    name: "button",
    size: BASE_NODE_SIZE,
    flags: WidgetFlags::empty(),
    callback: button,
    colors: &[0xFF30_6090, 0xFFFF_FFFF],
};

fn repaint(tree: &SharedTree, step: &str) {
    let mut t = tree.lock();
    let changes = t.take_changes();
    let plan = RepaintPlan::build(&t, &changes);
    println!(
        "-- {step}: repaint {} widget(s), damage {:?}",
        plan.items.len(),
        plan.damage
    );
    plan.commit(&mut t);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tree = SharedTree::new(WidgetTree::new(TreeConfig::qvga()));
    let (notifier, wake) = ChannelNotifier::new(16);
    {
        let mut t = tree.lock();
        t.set_trace_sink(Box::new(PrettyPrintSink::new(Box::new(std::io::stdout()))));
        let _ = t.set_notifier(Some(Box::new(notifier)));
    }

    // -- build -------------------------------------------------------------
    let (main_win, ok) = {
        let mut t = tree.lock();
        let f = CreateFlags::empty();
        let main_win = t.create(&WINDOW, 1, Bounds::px(0, 0, 320, 200), None, None, f)?;
        t.set_padding(main_win, Padding::uniform(4));
        let ok_bounds = Bounds {
            x: Length::Percent(10.0),
            y: Length::Pixels(150),
            width: Length::Percent(30.0),
            height: Length::Pixels(30),
        };
        let ok = t.create(&BUTTON, 2, ok_bounds, Some(main_win), None, f)?;
        t.create(&BUTTON, 3, Bounds::px(180, 150, 90, 30), Some(main_win), None, f)?;
        t.create(&WINDOW, 4, Bounds::px(200, 20, 100, 80), None, None, f)?;
        (main_win, ok)
    };
    repaint(&tree, "build");

    // -- focus and z-order -------------------------------------------------
    {
        let mut t = tree.lock();
        t.set_focus(Some(ok));
        t.put_on_front(main_win);
        t.set_z_index(ok, 5);
    }
    repaint(&tree, "focus");

    // -- blocking dialog ---------------------------------------------------
    let opener = {
        let tree = tree.clone();
        thread::spawn(move || {
            create_blocking(
                &tree,
                &WINDOW,
                DIALOG_TAG,
                Bounds::px(60, 60, 200, 100),
                None,
                CreateFlags::empty(),
            )
        })
    };
    let dialog = loop {
        if let Some(id) = tree.lock().find_by_tag(DIALOG_TAG) {
            break id;
        }
        thread::sleep(Duration::from_millis(1));
    };
    repaint(&tree, "dialog open");
    tree.lock().dismiss_dialog(dialog, 42);
    let status = opener.join().map_err(|_| "dialog opener panicked")?;
    println!("-- dialog returned {status}");

    // -- removal -----------------------------------------------------------
    {
        let mut t = tree.lock();
        if let Some(panel) = t.find_by_tag(4) {
            t.remove(panel)?;
        }
        let freed = t.execute_remove();
        println!("-- swept {freed} widget(s)");
    }
    repaint(&tree, "removal");

    println!("-- {} wake message(s) queued", wake.try_iter().count());

    let t = tree.lock();
    dump::write_tree(&t, &mut std::io::stdout())?;
    Ok(())
}
