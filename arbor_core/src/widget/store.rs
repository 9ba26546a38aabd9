// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays widget storage with allocation, topology, and queries.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::flags::WidgetFlags;
use super::geometry::{Bounds, Padding};
use super::id::{INVALID, TimerId, WidgetId};
use super::kind::{Color, ControlCode, DESKTOP, Param, Reply, WidgetCallback, WidgetKind};
use super::list::{self, Link, SiblingList};
use super::traverse::Children;
use crate::config::TreeConfig;
use crate::dialog::DialogRegistry;
use crate::dirty;
use crate::notify::{Notifier, WakeMessage};
use crate::trace::{TraceSink, Tracer};

/// Transparency value of a fully opaque widget.
pub const OPAQUE: u8 = 0xFF;

/// Text attached to a widget.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Text {
    #[default]
    None,
    /// Borrowed text, never copied.
    Static(&'static str),
    /// Owned buffer; holds at most `capacity - 1` bytes.
    Owned { buf: String, capacity: usize },
}

/// Struct-of-arrays storage for every widget plus the tree-wide state.
///
/// Widgets are addressed by [`WidgetId`] handles. Each widget occupies a slot
/// in parallel arrays; slots freed by a removal sweep are recycled via a free
/// list, and generation counters make old handles fail validation.
///
/// The tree is the single context object of the engine: focus, active and
/// dialog state, the dirty rectangle, and the removal schedule live here
/// rather than in globals. Share it across threads with
/// [`SharedTree`](crate::sync::SharedTree) (feature `std`).
pub struct WidgetTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) links: Vec<Link>,
    pub(crate) children: Vec<SiblingList>,
    pub(crate) root: SiblingList,
    /// Widgets that opted out of their parent's list at creation.
    pub(crate) excluded: Vec<u32>,

    // -- Identity and behavior --
    pub(crate) kind: Vec<&'static WidgetKind>,
    pub(crate) tag: Vec<u32>,
    pub(crate) callback: Vec<Option<WidgetCallback>>,
    pub(crate) flags: Vec<WidgetFlags>,

    // -- Geometry --
    pub(crate) bounds: Vec<Bounds>,
    pub(crate) padding: Vec<Padding>,
    pub(crate) scroll: Vec<(i32, i32)>,
    pub(crate) z_index: Vec<i32>,
    pub(crate) transparency: Vec<u8>,

    // -- Auxiliary resources --
    pub(crate) text: Vec<Text>,
    pub(crate) colors: Vec<Option<Box<[Color]>>>,
    pub(crate) timer: Vec<Option<TimerId>>,
    pub(crate) user_data: Vec<Option<u64>>,
    pub(crate) instance: Vec<Vec<u8>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    pub(crate) live: u32,

    // -- Invalidation --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) dirty_rect: Option<Rect>,
    pub(crate) needs_redraw: bool,

    // -- Lifecycle --
    pub(crate) removal_pending: bool,
    pub(crate) sweeping: bool,
    pub(crate) pending_created: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    pub(crate) released_timers: Vec<TimerId>,

    // -- Focus and input ownership --
    pub(crate) focused: u32,
    pub(crate) focused_prev: u32,
    pub(crate) active: u32,
    pub(crate) active_prev: u32,
    pub(crate) window_active: u32,
    pub(crate) desktop: u32,

    // -- Services --
    pub(crate) dialogs: DialogRegistry,
    pub(crate) notifier: Option<Box<dyn Notifier + Send>>,
    pub(crate) tracer: Tracer,
    pub(crate) config: TreeConfig,
}

impl core::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("live", &self.live)
            .field("slots", &self.len)
            .field("focused", &self.focused_at())
            .field("active", &self.active_at())
            .field("dirty_rect", &self.dirty_rect)
            .field("removal_pending", &self.removal_pending)
            .field("dialogs", &self.dialogs)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl WidgetTree {
    /// Creates a tree holding only the desktop widget.
    ///
    /// The desktop is the sole member of the process-root list, fills the
    /// screen, and is the initial active window.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_widgets` is zero.
    #[must_use]
    pub fn new(config: TreeConfig) -> Self {
        assert!(
            config.max_widgets > 0,
            "widget budget must include the desktop"
        );
        let mut tree = Self {
            parent: Vec::new(),
            links: Vec::new(),
            children: Vec::new(),
            root: SiblingList::EMPTY,
            excluded: Vec::new(),
            kind: Vec::new(),
            tag: Vec::new(),
            callback: Vec::new(),
            flags: Vec::new(),
            bounds: Vec::new(),
            padding: Vec::new(),
            scroll: Vec::new(),
            z_index: Vec::new(),
            transparency: Vec::new(),
            text: Vec::new(),
            colors: Vec::new(),
            timer: Vec::new(),
            user_data: Vec::new(),
            instance: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            live: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            dirty_rect: None,
            needs_redraw: false,
            removal_pending: false,
            sweeping: false,
            pending_created: Vec::new(),
            pending_removed: Vec::new(),
            released_timers: Vec::new(),
            focused: INVALID,
            focused_prev: INVALID,
            active: INVALID,
            active_prev: INVALID,
            window_active: INVALID,
            desktop: INVALID,
            dialogs: DialogRegistry::new(),
            notifier: None,
            tracer: Tracer::none(),
            config,
        };

        let idx = tree.alloc_slot(&DESKTOP, config.desktop_tag, INVALID, None, Vec::new());
        tree.flags[idx as usize] |= WidgetFlags::EXPANDED;
        tree.root.push_back(&mut tree.links, idx);
        tree.desktop = idx;
        tree.window_active = idx;
        tree.invalidate_inner(idx, true);
        tree
    }

    /// Returns the configuration the tree was built with.
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Installs the wake-up notifier, returning the previous one.
    pub fn set_notifier(
        &mut self,
        notifier: Option<Box<dyn Notifier + Send>>,
    ) -> Option<Box<dyn Notifier + Send>> {
        core::mem::replace(&mut self.notifier, notifier)
    }

    /// Installs a trace sink.
    ///
    /// Without the `trace` feature the sink is dropped and nothing is emitted.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink + Send>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink + Send>> {
        self.tracer.take_sink()
    }

    // -- Allocation --

    /// Reserves a slot and resets every per-widget array for it.
    ///
    /// The caller checks the widget budget and links the slot.
    pub(crate) fn alloc_slot(
        &mut self,
        kind: &'static WidgetKind,
        tag: u32,
        parent: u32,
        callback: Option<WidgetCallback>,
        instance: Vec<u8>,
    ) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = parent;
            self.links[i] = Link::DETACHED;
            self.children[i] = SiblingList::EMPTY;
            self.kind[i] = kind;
            self.tag[i] = tag;
            self.callback[i] = callback;
            self.flags[i] = kind.flags;
            self.bounds[i] = Bounds::default();
            self.padding[i] = Padding::default();
            self.scroll[i] = (0, 0);
            self.z_index[i] = 0;
            self.transparency[i] = OPAQUE;
            self.text[i] = Text::None;
            self.colors[i] = None;
            self.timer[i] = None;
            self.user_data[i] = None;
            self.instance[i] = instance;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(parent);
            self.links.push(Link::DETACHED);
            self.children.push(SiblingList::EMPTY);
            self.kind.push(kind);
            self.tag.push(tag);
            self.callback.push(callback);
            self.flags.push(kind.flags);
            self.bounds.push(Bounds::default());
            self.padding.push(Padding::default());
            self.scroll.push((0, 0));
            self.z_index.push(0);
            self.transparency.push(OPAQUE);
            self.text.push(Text::None);
            self.colors.push(None);
            self.timer.push(None);
            self.user_data.push(None);
            self.instance.push(instance);
            self.generation.push(0);
            idx
        };
        self.live += 1;
        idx
    }

    /// Returns a slot to the free list and drops its owned resources.
    ///
    /// The slot must already be unlinked.
    pub(crate) fn release_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.dirty.remove_key(idx);
        self.generation[i] += 1;
        self.text[i] = Text::None;
        self.colors[i] = None;
        self.instance[i] = Vec::new();
        self.callback[i] = None;
        self.parent[i] = INVALID;
        self.children[i] = SiblingList::EMPTY;
        if let Some(timer) = self.timer[i].take() {
            self.released_timers.push(timer);
        }
        self.free_list.push(idx);
        self.live -= 1;
    }

    /// Returns whether the given handle refers to a live widget.
    ///
    /// A slot's generation is even while it is live and odd while it sits on
    /// the free list; allocation and release each bump it once.
    #[must_use]
    pub fn is_alive(&self, id: WidgetId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && id.generation & 1 == 0
    }

    /// Number of live widgets, desktop included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live as usize
    }

    /// Always `false`: the desktop is never freed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    // -- Topology queries --

    /// The desktop widget.
    #[must_use]
    pub fn desktop(&self) -> WidgetId {
        self.handle(self.desktop)
    }

    /// Returns the parent of a widget, if any.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.validate(id);
        self.opt_handle(self.parent[id.idx as usize])
    }

    /// Iterates the children of a widget in paint order.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.children[id.idx as usize].first)
    }

    /// Iterates the process-root list in paint order.
    #[must_use]
    pub fn roots(&self) -> Children<'_> {
        Children::new(self, self.root.first)
    }

    /// The `k`-th child of `parent` in paint order.
    #[must_use]
    pub fn nth_child(&self, parent: WidgetId, k: usize) -> Option<WidgetId> {
        self.validate(parent);
        let idx = self.children[parent.idx as usize].nth(&self.links, k);
        idx.map(|i| self.handle(i))
    }

    /// Head of `parent`'s child list, painted first.
    #[must_use]
    pub fn first_child(&self, parent: WidgetId) -> Option<WidgetId> {
        self.validate(parent);
        self.children[parent.idx as usize]
            .first()
            .map(|i| self.handle(i))
    }

    /// Tail of `parent`'s child list, painted last.
    #[must_use]
    pub fn last_child(&self, parent: WidgetId) -> Option<WidgetId> {
        self.validate(parent);
        self.children[parent.idx as usize]
            .last()
            .map(|i| self.handle(i))
    }

    /// Sibling after `current`, or the first child of `parent` when `current`
    /// is `None`. Returns `None` when both are `None`.
    #[must_use]
    pub fn next_sibling(
        &self,
        parent: Option<WidgetId>,
        current: Option<WidgetId>,
    ) -> Option<WidgetId> {
        let list = parent.map(|p| {
            self.validate(p);
            &self.children[p.idx as usize]
        });
        let element = current.map(|c| {
            self.validate(c);
            c.idx
        });
        list::next_in(list, &self.links, element).map(|i| self.handle(i))
    }

    /// Mirror of [`next_sibling`](Self::next_sibling) walking toward the head.
    #[must_use]
    pub fn prev_sibling(
        &self,
        parent: Option<WidgetId>,
        current: Option<WidgetId>,
    ) -> Option<WidgetId> {
        let list = parent.map(|p| {
            self.validate(p);
            &self.children[p.idx as usize]
        });
        let element = current.map(|c| {
            self.validate(c);
            c.idx
        });
        list::prev_in(list, &self.links, element).map(|i| self.handle(i))
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_child_of(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        self.validate(id);
        self.validate(ancestor);
        self.is_descendant_at(id.idx, ancestor.idx)
    }

    /// Depth-first search of the whole tree for the first widget with `tag`.
    #[must_use]
    pub fn find_by_tag(&self, tag: u32) -> Option<WidgetId> {
        self.find_in(self.root, tag)
    }

    /// Depth-first search below `parent` for the first widget with `tag`.
    #[must_use]
    pub fn find_child_by_tag(&self, parent: WidgetId, tag: u32) -> Option<WidgetId> {
        self.validate(parent);
        self.find_in(self.children[parent.idx as usize], tag)
    }

    fn find_in(&self, list: SiblingList, tag: u32) -> Option<WidgetId> {
        let mut stack: Vec<u32> = list.iter(&self.links).collect();
        stack.reverse();
        while let Some(idx) = stack.pop() {
            if self.tag[idx as usize] == tag {
                return Some(self.handle(idx));
            }
            let before = stack.len();
            stack.extend(self.children[idx as usize].iter(&self.links));
            stack[before..].reverse();
        }
        None
    }

    // -- Property getters --

    /// Numeric id given at creation.
    #[must_use]
    pub fn tag(&self, id: WidgetId) -> u32 {
        self.validate(id);
        self.tag[id.idx as usize]
    }

    /// The widget's kind.
    #[must_use]
    pub fn kind(&self, id: WidgetId) -> &'static WidgetKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Current state bits.
    #[must_use]
    pub fn flags(&self, id: WidgetId) -> WidgetFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Z-index used to order siblings within a group.
    #[must_use]
    pub fn z_index(&self, id: WidgetId) -> i32 {
        self.validate(id);
        self.z_index[id.idx as usize]
    }

    /// Transparency, where [`OPAQUE`] is fully opaque.
    #[must_use]
    pub fn transparency(&self, id: WidgetId) -> u8 {
        self.validate(id);
        self.transparency[id.idx as usize]
    }

    /// Requested position and size.
    #[must_use]
    pub fn bounds(&self, id: WidgetId) -> Bounds {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    /// Inner padding.
    #[must_use]
    pub fn padding(&self, id: WidgetId) -> Padding {
        self.validate(id);
        self.padding[id.idx as usize]
    }

    /// Whether the widget is hidden.
    #[must_use]
    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.flags(id).contains(WidgetFlags::HIDDEN)
    }

    /// Whether any widget is waiting for a repaint.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Union of the visible rectangles invalidated since the last
    /// [`take_changes`](Self::take_changes).
    #[must_use]
    pub fn dirty_rect(&self) -> Option<Rect> {
        self.dirty_rect
    }

    // -- Raw index accessors (for renderers) --

    /// Flags by raw slot index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn flags_at(&self, idx: u32) -> WidgetFlags {
        self.flags[idx as usize]
    }

    /// Tag by raw slot index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn tag_at(&self, idx: u32) -> u32 {
        self.tag[idx as usize]
    }

    /// Kind by raw slot index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn kind_at(&self, idx: u32) -> &'static WidgetKind {
        self.kind[idx as usize]
    }

    /// Handle for a raw slot index, if the slot is live.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<WidgetId> {
        if idx >= self.len {
            return None;
        }
        let id = self.handle(idx);
        self.is_alive(id).then_some(id)
    }

    // -- Callback dispatch --

    /// Delivers a message to a widget.
    ///
    /// The per-instance override sees the message first; if it does not
    /// handle it, the kind's callback does. Returns whether either handled
    /// it.
    pub fn dispatch(
        &mut self,
        id: WidgetId,
        code: ControlCode,
        param: &Param,
        reply: &mut Reply,
    ) -> bool {
        self.validate(id);
        self.dispatch_at(id.idx, code, param, reply)
    }

    /// Delivers a message with no argument, discarding any reply.
    pub(crate) fn notify_at(&mut self, idx: u32, code: ControlCode) {
        let mut reply = Reply::None;
        self.dispatch_at(idx, code, &Param::None, &mut reply);
    }

    pub(crate) fn dispatch_at(
        &mut self,
        idx: u32,
        code: ControlCode,
        param: &Param,
        reply: &mut Reply,
    ) -> bool {
        let id = self.handle(idx);
        if let Some(cb) = self.callback[idx as usize]
            && cb(self, id, code, param, reply)
        {
            return true;
        }
        let kind_cb = self.kind[idx as usize].callback;
        kind_cb(self, id, code, param, reply)
    }

    /// Replaces the per-instance callback override.
    pub fn set_callback(&mut self, id: WidgetId, callback: Option<WidgetCallback>) {
        self.validate(id);
        self.callback[id.idx as usize] = callback;
    }

    // -- Internal helpers --

    pub(crate) fn post(&mut self, msg: WakeMessage) {
        if let Some(n) = &mut self.notifier {
            n.post(msg);
        }
    }

    pub(crate) fn handle(&self, idx: u32) -> WidgetId {
        WidgetId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn opt_handle(&self, idx: u32) -> Option<WidgetId> {
        (idx != INVALID).then(|| self.handle(idx))
    }

    pub(crate) fn focused_at(&self) -> Option<WidgetId> {
        self.opt_handle(self.focused)
    }

    pub(crate) fn active_at(&self) -> Option<WidgetId> {
        self.opt_handle(self.active)
    }

    /// Sibling list that contains `idx`: its parent's children, or the
    /// process-root list.
    pub(crate) fn list_of(&self, idx: u32) -> SiblingList {
        let p = self.parent[idx as usize];
        if p == INVALID {
            self.root
        } else {
            self.children[p as usize]
        }
    }

    /// Writes back a list obtained from [`list_of`](Self::list_of).
    pub(crate) fn store_list_of(&mut self, idx: u32, list: SiblingList) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            self.root = list;
        } else {
            self.children[p as usize] = list;
            self.dirty.mark(p, dirty::TOPOLOGY);
        }
    }

    pub(crate) fn is_descendant_at(&self, idx: u32, ancestor: u32) -> bool {
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            if p == ancestor {
                return true;
            }
            p = self.parent[p as usize];
        }
        false
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: WidgetId) {
        assert!(self.is_alive(id), "stale WidgetId: {id:?}");
    }
}
