//! The single dispatch site for widget operations.
//!
//! Everything the engine does to a widget goes through here: minimal-size
//! queries, size distribution, rendering, focus moves and input delivery.
//! No widget-specific branching exists outside this module and the widget
//! modules themselves. Stale ids are reported and degrade to safe defaults.

use crate::canvas::Canvas;
use crate::event::{InputEvent, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::{Damage, RenderCtx};
use crate::widget::{WidgetId, WidgetKind, WidgetPayload, WidgetTree};
use crate::widgets::{
    button, checkbox, choice, grid, overlay, pixmap, scroll, slider, spinner, switch, table, tabs,
    textbox,
};

/// Focus-machine alphabet handled by [`select`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOp {
    /// Focus leaves the widget (and its subtree).
    Out,
    /// Focus (re-)enters the widget.
    In,
    /// Tab order, forward.
    Next,
    /// Tab order, backward.
    Prev,
    Left,
    Right,
    Up,
    Down,
}

/// Types without an input hook cannot take focus or consume events.
fn handles_input(kind: WidgetKind) -> bool {
    !matches!(kind, WidgetKind::Label | WidgetKind::ProgressBar)
}

/// Minimal width of a widget, computed bottom-up and cached until a resize
/// request invalidates it.
pub fn min_w(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(widget) = tree.get(id) else {
        error!("Stale widget {id:?}");
        return 0;
    };

    if widget.no_resize {
        return widget.min_w;
    }

    let value = match widget.kind() {
        WidgetKind::Grid => grid::min_w(tree, ctx, id),
        WidgetKind::Tabs => tabs::min_w(tree, ctx, id),
        WidgetKind::Switch => switch::min_w(tree, ctx, id),
        WidgetKind::Overlay => overlay::min_w(tree, ctx, id),
        WidgetKind::ScrollArea => scroll::min_w(tree, ctx, id),
        _ => leaf_min_w(tree, ctx, id),
    };

    if let Some(widget) = tree.get_mut(id) {
        widget.min_w = value;
    }

    value
}

/// Minimal height counterpart of [`min_w`].
pub fn min_h(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(widget) = tree.get(id) else {
        error!("Stale widget {id:?}");
        return 0;
    };

    if widget.no_resize {
        return widget.min_h;
    }

    let value = match widget.kind() {
        WidgetKind::Grid => grid::min_h(tree, ctx, id),
        WidgetKind::Tabs => tabs::min_h(tree, ctx, id),
        WidgetKind::Switch => switch::min_h(tree, ctx, id),
        WidgetKind::Overlay => overlay::min_h(tree, ctx, id),
        WidgetKind::ScrollArea => scroll::min_h(tree, ctx, id),
        _ => leaf_min_h(tree, ctx, id),
    };

    if let Some(widget) = tree.get_mut(id) {
        widget.min_h = value;
    }

    value
}

fn leaf_min_w(tree: &WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(widget) = tree.get(id) else {
        return 0;
    };

    match &widget.payload {
        WidgetPayload::Button(b) => b.min_w(ctx),
        WidgetPayload::Checkbox(c) => c.min_w(ctx),
        WidgetPayload::Label(l) => l.min_w(ctx),
        WidgetPayload::ProgressBar(p) => p.min_w(ctx),
        WidgetPayload::Spinner(s) => s.min_w(ctx),
        WidgetPayload::Slider(s) => s.min_w(ctx),
        WidgetPayload::TextBox(t) => t.min_w(ctx),
        WidgetPayload::Choice(c) => c.min_w(ctx),
        WidgetPayload::Table(t) => t.min_w(ctx),
        WidgetPayload::Pixmap(p) => p.min_w(ctx),
        _ => 0,
    }
}

fn leaf_min_h(tree: &WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(widget) = tree.get(id) else {
        return 0;
    };

    match &widget.payload {
        WidgetPayload::Button(b) => b.min_h(ctx),
        WidgetPayload::Checkbox(c) => c.min_h(ctx),
        WidgetPayload::Label(l) => l.min_h(ctx),
        WidgetPayload::ProgressBar(p) => p.min_h(ctx),
        WidgetPayload::Spinner(s) => s.min_h(ctx),
        WidgetPayload::Slider(s) => s.min_h(ctx),
        WidgetPayload::TextBox(t) => t.min_h(ctx),
        WidgetPayload::Choice(c) => c.min_h(ctx),
        WidgetPayload::Table(t) => t.min_h(ctx),
        WidgetPayload::Pixmap(p) => p.min_h(ctx),
        _ => 0,
    }
}

/// Places a widget into a cell the parent allotted (in the parent's
/// coordinates) and redistributes the widget's own children.
///
/// Skipped entirely when the cached layout is still valid and `force` is
/// unset. The cell is clamped up to the widget's minimal size with a
/// warning; alignment decides how much of the remainder the widget takes.
pub(crate) fn distribute_to(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, cell: Rect, force: bool,
) {
    let Some(widget) = tree.get_mut(id) else {
        error!("Stale widget {id:?}");
        return;
    };

    if widget.no_resize && !force {
        return;
    }

    widget.no_resize = true;

    let mut w = cell.w;
    let mut h = cell.h;

    if widget.min_w > w {
        warn!(
            "Widget {:?} ({}) min_w={} > allotted w={}",
            id,
            widget.kind(),
            widget.min_w,
            w
        );
        w = widget.min_w;
    }

    if widget.min_h > h {
        warn!(
            "Widget {:?} ({}) min_h={} > allotted h={}",
            id,
            widget.kind(),
            widget.min_h,
            h
        );
        h = widget.min_h;
    }

    let old = widget.size();

    let (off_x, new_w) = widget.align.place_h(w, widget.min_w);
    let (off_y, new_h) = widget.align.place_v(h, widget.min_h);

    widget.x = cell.x + off_x as i32;
    widget.y = cell.y + off_y as i32;
    widget.w = new_w;
    widget.h = new_h;
    widget.redraw = true;

    let kind = widget.kind();
    let size = widget.size();

    if size != old {
        tree.send_event(id, WidgetEvent::Resize(size));
    }

    // Once a widget redistributes, its whole subtree does.
    match kind {
        WidgetKind::Grid => grid::distribute(tree, ctx, id),
        WidgetKind::Tabs => tabs::distribute(tree, ctx, id),
        WidgetKind::Switch => switch::distribute(tree, ctx, id),
        WidgetKind::Overlay => overlay::distribute(tree, ctx, id),
        WidgetKind::ScrollArea => scroll::distribute(tree, ctx, id),
        WidgetKind::Table => table::distribute(tree, ctx, id),
        _ => {}
    }
}

/// Computes a full layout for `id` as the tree root: bottom-up minimal
/// sizes, then top-down distribution into `max(min, requested)`, at least
/// 1x1 so an empty layout cannot collapse to nothing.
pub fn calc_size(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, w: u32, h: u32, new_wh: bool,
) {
    let Some(widget) = tree.get(id) else {
        error!("Stale widget {id:?}");
        return;
    };

    if widget.no_resize && !new_wh {
        return;
    }

    debug!("Recalculating layout {id:?}");

    min_w(tree, ctx, id);
    min_h(tree, ctx, id);

    let Some(widget) = tree.get(id) else {
        return;
    };

    let w = w.max(widget.min_w).max(1);
    let h = h.max(widget.min_h).max(1);

    distribute_to(tree, ctx, id, Rect::new(0, 0, w, h), new_wh);
}

/// Renders a widget subtree rooted at `id` with its top-left corner at
/// `origin` (absolute canvas coordinates).
///
/// A widget repaints its own pixels when dirty or forced, and descends when
/// some child is dirty; both flags clear afterwards. A pending
/// `redraw_subtree` upgrades the call to a forced one and auto-clears.
pub fn render(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, canvas: &mut dyn Canvas, origin: Point,
    mut force: bool, damage: &mut Damage,
) {
    let Some(widget) = tree.get_mut(id) else {
        error!("Stale widget {id:?}");
        return;
    };

    if widget.redraw_subtree {
        widget.redraw_subtree = false;
        force = true;
    }

    if !force && !widget.redraw && !widget.redraw_child {
        return;
    }

    let kind = widget.payload.kind();
    let own = force || widget.redraw;
    let area = Rect::new(origin.x, origin.y, widget.w, widget.h);

    debug!("Rendering {id:?} ({kind}) at {area:?} force={force}");

    match kind {
        WidgetKind::Grid => grid::render(tree, ctx, id, canvas, origin, force, damage),
        WidgetKind::Tabs => tabs::render(tree, ctx, id, canvas, origin, force, damage),
        WidgetKind::Switch => switch::render(tree, ctx, id, canvas, origin, force, damage),
        WidgetKind::Overlay => overlay::render(tree, ctx, id, canvas, origin, force, damage),
        WidgetKind::ScrollArea => scroll::render(tree, ctx, id, canvas, origin, force, damage),
        WidgetKind::Pixmap => pixmap::render(tree, ctx, id, canvas, origin),
        // The table render walks its row cursor, so it needs the tree.
        WidgetKind::Table => table::render(tree, ctx, id, canvas, origin),
        _ => leaf_render(tree, ctx, id, canvas, origin),
    }

    if own {
        damage.add(area);
    }

    if let Some(widget) = tree.get_mut(id) {
        widget.redraw = false;
        widget.redraw_child = false;
    }
}

fn leaf_render(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, canvas: &mut dyn Canvas, origin: Point,
) {
    let Some(widget) = tree.get(id) else {
        return;
    };

    match &widget.payload {
        WidgetPayload::Button(b) => b.render(widget, ctx, canvas, origin),
        WidgetPayload::Checkbox(c) => c.render(widget, ctx, canvas, origin),
        WidgetPayload::Label(l) => l.render(widget, ctx, canvas, origin),
        WidgetPayload::ProgressBar(p) => p.render(widget, ctx, canvas, origin),
        WidgetPayload::Spinner(s) => s.render(widget, ctx, canvas, origin),
        WidgetPayload::Slider(s) => s.render(widget, ctx, canvas, origin),
        WidgetPayload::TextBox(t) => t.render(widget, ctx, canvas, origin),
        WidgetPayload::Choice(c) => c.render(widget, ctx, canvas, origin),
        _ => {}
    }
}

/// Entry point for raw input: focus-navigation chords first, then delivery
/// to the focused widget.
pub fn input_event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    if handle_select(tree, ctx, id, ev) {
        return true;
    }

    event(tree, ctx, id, ev)
}

/// Focus-navigation chords. Tab and Shift+arrow moves are consumed here; a
/// left button press moves focus but falls through so the click also
/// reaches the widget under the cursor.
fn handle_select(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(key) = ev.pressed() else {
        return false;
    };

    match key {
        Key::Tab => {
            if ev.mods.shift {
                select(tree, id, SelectOp::Prev);
            } else {
                select(tree, id, SelectOp::Next);
            }
            true
        }
        Key::BtnLeft => {
            select_xy(tree, ctx, id, ev.cursor);
            false
        }
        Key::Left if ev.mods.shift => {
            select(tree, id, SelectOp::Left);
            true
        }
        Key::Right if ev.mods.shift => {
            select(tree, id, SelectOp::Right);
            true
        }
        Key::Up if ev.mods.shift => {
            select(tree, id, SelectOp::Up);
            true
        }
        Key::Down if ev.mods.shift => {
            select(tree, id, SelectOp::Down);
            true
        }
        _ => false,
    }
}

/// Delivers an input event to a widget. Containers forward to their
/// selected child with the cursor re-expressed in the child's coordinates.
/// Input the widget does not consume is queued to the application as an
/// `Input` observation, subject to the widget's event mask.
pub fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(widget) = tree.get(id) else {
        error!("Stale widget {id:?}");
        return false;
    };

    let kind = widget.kind();
    if !handles_input(kind) {
        return false;
    }

    let handled = match kind {
        WidgetKind::Grid => grid::event(tree, ctx, id, ev),
        WidgetKind::Tabs => tabs::event(tree, ctx, id, ev),
        WidgetKind::Switch => switch::event(tree, ctx, id, ev),
        WidgetKind::Overlay => overlay::event(tree, ctx, id, ev),
        WidgetKind::ScrollArea => scroll::event(tree, ctx, id, ev),
        WidgetKind::Button => button::event(tree, ctx, id, ev),
        WidgetKind::Checkbox => checkbox::event(tree, ctx, id, ev),
        WidgetKind::Spinner => spinner::event(tree, ctx, id, ev),
        WidgetKind::Slider => slider::event(tree, ctx, id, ev),
        WidgetKind::TextBox => textbox::event(tree, ctx, id, ev),
        WidgetKind::Choice => choice::event(tree, ctx, id, ev),
        WidgetKind::Table => table::event(tree, ctx, id, ev),
        // Raw input on a pixmap goes to the application below.
        WidgetKind::Pixmap => false,
        _ => false,
    };

    if !handled {
        tree.send_event(id, WidgetEvent::Input(*ev));
    }

    handled
}

/// Moves focus according to `op`. Returns whether the move was claimed;
/// an unclaimed `Next`/`Prev` at a boundary lets the caller continue in an
/// enclosing container.
pub fn select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(widget) = tree.get(id) else {
        return false;
    };

    debug!("Select {op:?} on {id:?} ({})", widget.kind());

    let kind = widget.kind();
    if !handles_input(kind) {
        return false;
    }

    match kind {
        WidgetKind::Grid => grid::select(tree, id, op),
        WidgetKind::Tabs => tabs::select(tree, id, op),
        WidgetKind::Switch => switch::select(tree, id, op),
        WidgetKind::Overlay => overlay::select(tree, id, op),
        WidgetKind::ScrollArea => scroll::select(tree, id, op),
        _ => default_select(tree, id, op),
    }
}

/// Leaf focus default: take focus on any entering op unless already
/// focused, always release on `Out`.
fn default_select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    if op == SelectOp::Out {
        set_selected(tree, id, false);
        return true;
    }

    if tree.get(id).is_some_and(|w| w.selected) {
        return false;
    }

    set_selected(tree, id, true);
    true
}

/// Moves focus to the widget under `pos` (coordinates relative to the
/// target widget's origin). Containers recurse into the matching child.
pub fn select_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(widget) = tree.get(id) else {
        return false;
    };

    debug!("Select {pos:?} on {id:?} ({})", widget.kind());

    let kind = widget.kind();
    if !handles_input(kind) {
        return false;
    }

    match kind {
        WidgetKind::Grid => grid::select_xy(tree, ctx, id, pos),
        WidgetKind::Tabs => tabs::select_xy(tree, ctx, id, pos),
        WidgetKind::Switch => switch::select_xy(tree, ctx, id, pos),
        WidgetKind::Overlay => overlay::select_xy(tree, ctx, id, pos),
        WidgetKind::ScrollArea => scroll::select_xy(tree, ctx, id, pos),
        _ => {
            if tree.get(id).is_some_and(|w| w.selected) {
                return false;
            }

            set_selected(tree, id, true);
            true
        }
    }
}

/// Flips a widget's focus flag, redrawing only on an actual change.
pub(crate) fn set_selected(tree: &mut WidgetTree, id: WidgetId, on: bool) {
    let Some(widget) = tree.get_mut(id) else {
        return;
    };

    if widget.selected == on {
        return;
    }

    widget.selected = on;
    tree.redraw(id);
}
