//! A deck of layouts with exactly one visible at a time.
//!
//! Unlike tabs there is no chrome at all; the application switches layouts
//! programmatically. All layouts are laid out into the full widget area and
//! the minimal size covers the largest one, so switching never resizes
//! anything above the deck.

use crate::canvas::Canvas;
use crate::event::InputEvent;
use crate::geometry::{Point, Rect};
use crate::ops::{self, SelectOp};
use crate::render::{Damage, RenderCtx};
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Switch {
    pub(crate) layouts: Vec<Option<WidgetId>>,
    pub(crate) active: usize,
}

impl Switch {
    pub fn new(tree: &mut WidgetTree, layouts: usize) -> WidgetId {
        let switch = Switch {
            layouts: vec![None; layouts],
            active: 0,
        };

        tree.insert(Widget::new(WidgetPayload::Switch(switch)))
    }

    pub fn active_layout(&self) -> usize {
        self.active
    }

    pub(crate) fn active_child(&self) -> Option<WidgetId> {
        self.layouts.get(self.active).copied().flatten()
    }

    /// Puts a child into a layout slot, displacing and returning the
    /// previous occupant (detached, not removed).
    pub fn put(
        tree: &mut WidgetTree, id: WidgetId, layout: usize, child: WidgetId,
    ) -> Option<WidgetId> {
        let valid = match tree.get(id).and_then(|w| w.as_switch()) {
            Some(s) => layout < s.layouts.len(),
            None => false,
        };

        if !valid {
            error!("Invalid layout index {layout} for {id:?}");
            return None;
        }

        if !tree.set_parent(child, id) {
            return None;
        }

        let displaced = tree
            .get_mut(id)
            .and_then(|w| w.as_switch_mut())
            .and_then(|s| s.layouts[layout].replace(child));

        if let Some(old) = displaced {
            tree.clear_parent(old);
        }

        tree.resize(id);
        displaced
    }

    pub fn switch_to(tree: &mut WidgetTree, id: WidgetId, layout: usize) {
        let valid = tree
            .get(id)
            .and_then(|w| w.as_switch())
            .is_some_and(|s| layout < s.layouts.len());

        if !valid {
            warn!("Invalid layout index {layout} for {id:?}");
            return;
        }

        if let Some(switch) = tree.get_mut(id).and_then(|w| w.as_switch_mut()) {
            switch.active = layout;
        }
        tree.redraw_subtree(id);
        tree.redraw(id);
    }

    /// Moves the active layout by a relative amount, wrapping at both ends.
    pub fn switch_move(tree: &mut WidgetTree, id: WidgetId, delta: i32) {
        let Some(switch) = tree.get(id).and_then(|w| w.as_switch()) else {
            return;
        };

        if switch.layouts.is_empty() {
            return;
        }

        let count = switch.layouts.len() as i32;
        let layout = (switch.active as i32 + delta).rem_euclid(count) as usize;
        Self::switch_to(tree, id, layout);
    }
}

pub(crate) fn min_w(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(switch) = tree.get(id).and_then(|w| w.as_switch()) else {
        return 0;
    };
    let children: Vec<WidgetId> = switch.layouts.iter().flatten().copied().collect();

    let mut widest = 0;
    for child in children {
        widest = widest.max(ops::min_w(tree, ctx, child));
    }

    widest
}

pub(crate) fn min_h(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(switch) = tree.get(id).and_then(|w| w.as_switch()) else {
        return 0;
    };
    let children: Vec<WidgetId> = switch.layouts.iter().flatten().copied().collect();

    let mut tallest = 0;
    for child in children {
        tallest = tallest.max(ops::min_h(tree, ctx, child));
    }

    tallest
}

pub(crate) fn distribute(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let (w, h) = (widget.w, widget.h);
    let Some(switch) = widget.as_switch() else {
        return;
    };
    let children: Vec<WidgetId> = switch.layouts.iter().flatten().copied().collect();

    // Inactive layouts are laid out too, so switching is just a repaint.
    let cell = Rect::new(0, 0, w, h);
    for child in children {
        ops::distribute_to(tree, ctx, child, cell, true);
    }
}

pub(crate) fn render(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, canvas: &mut dyn Canvas, origin: Point,
    force: bool, damage: &mut Damage,
) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let own = force || widget.redraw;
    let (w, h) = (widget.w, widget.h);
    let Some(switch) = widget.as_switch() else {
        return;
    };

    let child = switch.active_child();
    let child_box = child.and_then(|c| tree.get(c)).map(Widget::bounds);

    if own {
        let bg = ctx.palette.bg;
        match child_box {
            None => canvas.fill_rect(Rect::new(origin.x, origin.y, w, h), bg),
            Some(b) => {
                canvas.fill_rect(Rect::new(0, 0, w, b.y.max(0) as u32).translate(origin), bg);
                canvas.fill_rect(
                    Rect::new(0, b.y, b.x.max(0) as u32, b.h).translate(origin),
                    bg,
                );
                canvas.fill_rect(
                    Rect::new(b.right(), b.y, w.saturating_sub(b.right().max(0) as u32), b.h)
                        .translate(origin),
                    bg,
                );
                canvas.fill_rect(
                    Rect::new(0, b.bottom(), w, h.saturating_sub(b.bottom().max(0) as u32))
                        .translate(origin),
                    bg,
                );
            }
        }
    }

    if let (Some(child), Some(b)) = (child, child_box) {
        let child_origin = Point::new(origin.x + b.x, origin.y + b.y);
        ops::render(tree, ctx, child, canvas, child_origin, force, damage);
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(child) = tree
        .get(id)
        .and_then(|w| w.as_switch())
        .and_then(Switch::active_child)
    else {
        return false;
    };
    let Some(pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    ops::event(tree, ctx, child, &ev.relative_to(pos))
}

pub(crate) fn select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(child) = tree
        .get(id)
        .and_then(|w| w.as_switch())
        .and_then(Switch::active_child)
    else {
        return false;
    };

    ops::select(tree, child, op)
}

pub(crate) fn select_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(child) = tree
        .get(id)
        .and_then(|w| w.as_switch())
        .and_then(Switch::active_child)
    else {
        return false;
    };
    let Some(child_pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    ops::select_xy(
        tree,
        ctx,
        child,
        pos.offset(Point::new(-child_pos.x, -child_pos.y)),
    )
}
