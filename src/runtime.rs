//! The event loop.
//!
//! A [`Runtime`] owns the widget tree, a [`Backend`] and the timer pool,
//! and advances the interface one event at a time. Each [`Runtime::step`]
//! dispatches at most one event, re-runs layout if something asked for it
//! and repaints whatever became dirty, flipping the damaged region to the
//! screen. The tree is only ever mutated during dispatch and the
//! backbuffer only ever written during the render pass, so a step leaves
//! both in a consistent state.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::backend::Backend;
use crate::event::{AppEvent, BackendEvent, InputEvent, Key};
use crate::geometry::Rect;
use crate::ops;
use crate::render::{Damage, RenderCtx};
use crate::timer::TimerPool;
use crate::widget::{Widget, WidgetId, WidgetTree};

/// Bounds for the zoomable padding unit.
const PADD_MIN: u32 = 1;
const PADD_MAX: u32 = 16;

pub struct Runtime<B> {
    backend: B,
    tree: WidgetTree,
    root: WidgetId,
    ctx: RenderCtx,
    timers: TimerPool,
    injected: VecDeque<InputEvent>,
    damage: Damage,
    quit: bool,
}

impl<B: Backend> Runtime<B> {
    /// Takes over a built tree and performs the initial layout and paint,
    /// so the surface is complete before the first event arrives.
    pub fn new(backend: B, ctx: RenderCtx, tree: WidgetTree, root: WidgetId) -> Self {
        let mut runtime = Self {
            backend,
            tree,
            root,
            ctx,
            timers: TimerPool::new(),
            injected: VecDeque::new(),
            damage: Damage::default(),
            quit: false,
        };

        runtime.relayout();
        runtime
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn ctx(&self) -> &RenderCtx {
        &self.ctx
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Queues a synthetic input event. Injected events are dispatched
    /// before anything the backend has pending.
    pub fn push_event(&mut self, ev: InputEvent) {
        self.injected.push_back(ev);
    }

    /// Events the widgets emitted for the application, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = AppEvent> + '_ {
        self.tree.drain_events()
    }

    /// Makes the current [`Runtime::step`] the last one.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Swaps the visible tree root and returns the previous one. The old
    /// subtree stays in the tree so the caller can show it again later, or
    /// remove it.
    pub fn replace_layout(&mut self, root: WidgetId) -> WidgetId {
        let old = std::mem::replace(&mut self.root, root);
        self.relayout();
        old
    }

    /// Runs until a quit event arrives, discarding application events.
    /// Callers that consume [`Runtime::drain_events`] should drive
    /// [`Runtime::step`] themselves.
    pub fn run(&mut self) {
        while self.step() {
            self.tree.drain_events().for_each(drop);
        }
    }

    /// Advances the loop by one event: dispatch, layout, paint, flip.
    /// Returns `false` once a quit has been requested.
    pub fn step(&mut self) -> bool {
        self.arm_timers();
        self.dispatch_one();
        self.layout_if_needed();
        self.render_pass(false);

        !self.quit
    }

    /// Moves timer requests the widgets filed during dispatch into the
    /// pool, so the next wait honours them.
    fn arm_timers(&mut self) {
        let now = Instant::now();

        for req in self.tree.drain_timer_requests() {
            self.timers
                .arm(req.widget, now + Duration::from_millis(req.after_ms));
        }
    }

    /// Dispatches at most one event. Application-injected events win over
    /// expired timers, which win over backend input; the backend wait is
    /// capped by the nearest timer deadline so an idle loop still fires
    /// timers on time.
    fn dispatch_one(&mut self) {
        if let Some(ev) = self.injected.pop_front() {
            self.dispatch_input(&ev);
            return;
        }

        let now = Instant::now();
        if let Some(owner) = self.timers.pop_expired(now) {
            ops::event(&mut self.tree, &self.ctx, owner, &InputEvent::timer());
            return;
        }

        let timeout = self
            .timers
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now));

        match self.backend.poll_event(timeout) {
            Some(BackendEvent::Input(ev)) => self.dispatch_input(&ev),
            Some(BackendEvent::Resize(size)) => {
                debug!("Backend resized to {size:?}");
                self.relayout();
            }
            Some(BackendEvent::Quit) => self.quit = true,
            None => {}
        }
    }

    /// Routes raw input into the tree, after peeling off the zoom chords
    /// the runtime reserves for itself.
    fn dispatch_input(&mut self, ev: &InputEvent) {
        if ev.mods.ctrl {
            match ev.pressed() {
                Some(Key::Char('+')) => {
                    self.zoom(1);
                    return;
                }
                Some(Key::Char('-')) => {
                    self.zoom(-1);
                    return;
                }
                _ => {}
            }
        }

        // The cursor arrives in surface coordinates; the root sits wherever
        // its alignment put it.
        let origin = self.tree.get(self.root).map(Widget::pos).unwrap_or_default();
        ops::input_event(&mut self.tree, &self.ctx, self.root, &ev.relative_to(origin));
    }

    /// Grows or shrinks the base padding unit and rebuilds the layout; the
    /// closest thing a pixel toolkit has to a zoom level.
    fn zoom(&mut self, dir: i32) {
        let padd = self
            .ctx
            .padd
            .saturating_add_signed(dir)
            .clamp(PADD_MIN, PADD_MAX);
        if padd == self.ctx.padd {
            return;
        }

        debug!("Zoom: padding unit {} -> {padd}", self.ctx.padd);
        self.ctx.padd = padd;
        self.relayout();
    }

    /// Forced full pass: sizes the tree to the backend surface and
    /// repaints everything, background included.
    fn relayout(&mut self) {
        let size = self.backend.size();
        ops::calc_size(&mut self.tree, &self.ctx, self.root, size.w, size.h, true);
        self.render_pass(true);
    }

    /// Re-runs layout when something called [`WidgetTree::resize`] since
    /// the last pass. The surface size is unchanged; only the distribution
    /// inside it is.
    fn layout_if_needed(&mut self) {
        let stale = self.tree.get(self.root).is_some_and(|w| !w.no_resize);
        if !stale {
            return;
        }

        let size = self.backend.size();
        ops::calc_size(&mut self.tree, &self.ctx, self.root, size.w, size.h, false);
    }

    fn render_pass(&mut self, force: bool) {
        if force {
            let size = self.backend.size();
            let area = Rect::new(0, 0, size.w, size.h);
            self.backend.canvas().fill_rect(area, self.ctx.palette.bg);
            self.damage.add(area);
        }

        // The root is placed within the surface by its own alignment, so
        // rendering starts at its position rather than at the corner.
        let origin = match self.tree.get(self.root) {
            Some(widget) => widget.pos(),
            None => {
                error!("Stale root widget {:?}", self.root);
                return;
            }
        };

        let canvas = self.backend.canvas();
        ops::render(
            &mut self.tree, &self.ctx, self.root, canvas, origin, force, &mut self.damage,
        );

        if let Some(rect) = self.damage.take() {
            self.backend.flip(rect);
        }
    }
}
