//! A viewport over a single larger child.
//!
//! The configured minimal size caps how much room the child gets per axis; a
//! zero means the axis never scrolls and passes the child minimum through.
//! When the child overhangs the viewport a scrollbar appears on that axis,
//! the vertical one on the right edge, the horizontal one at the bottom, and
//! each takes one `ascent + padd` strip out of the viewport.
//!
//! The child is rendered shifted by the scroll offsets through a clip on the
//! visible region, so its own rendering never learns about the viewport.
//! Focus walks two stops: the child's content first, the scrollbars second.
//! While the scrollbars are focused, plain arrows pan by ten pixels.

use crate::canvas::Canvas;
use crate::event::{InputEvent, Key};
use crate::geometry::{Point, Rect, Size};
use crate::ops::{self, SelectOp};
use crate::render::{Damage, RenderCtx};
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

/// Keyboard pan distance in pixels.
const SCROLL_STEP: i32 = 10;

pub struct ScrollArea {
    pub(crate) min: Size,
    pub(crate) child: Option<WidgetId>,
    pub(crate) x_off: u32,
    pub(crate) y_off: u32,
    /// Viewport left after the scrollbars take their strips, set during
    /// layout. Offsets clamp against the child overhang past this.
    pub(crate) vis: Size,
    /// Horizontal bar at the bottom edge.
    pub(crate) bar_x: bool,
    /// Vertical bar at the right edge.
    pub(crate) bar_y: bool,
    pub(crate) area_selected: bool,
    pub(crate) child_selected: bool,
}

impl ScrollArea {
    pub fn new(tree: &mut WidgetTree, min: Size) -> WidgetId {
        if min.w == 0 && min.h == 0 {
            warn!("Scroll area without a scrollable axis");
        }

        let scroll = ScrollArea {
            min,
            child: None,
            x_off: 0,
            y_off: 0,
            vis: Size::new(0, 0),
            bar_x: false,
            bar_y: false,
            area_selected: false,
            child_selected: false,
        };

        tree.insert(Widget::new(WidgetPayload::ScrollArea(scroll)))
    }

    pub fn offset(&self) -> Point {
        Point::new(self.x_off as i32, self.y_off as i32)
    }

    /// Puts the child, displacing and returning the previous one (detached,
    /// not removed).
    pub fn put(tree: &mut WidgetTree, id: WidgetId, child: WidgetId) -> Option<WidgetId> {
        if !tree.get(id).is_some_and(|w| w.as_scroll().is_some()) {
            error!("Not a scroll area: {id:?}");
            return None;
        }

        if !tree.set_parent(child, id) {
            return None;
        }

        let displaced = tree
            .get_mut(id)
            .and_then(|w| w.as_scroll_mut())
            .and_then(|s| s.child.replace(child));

        if let Some(old) = displaced {
            tree.clear_parent(old);
        }

        tree.resize(id);
        displaced
    }

    /// Scrolls to an absolute x offset, clamped to the child overhang.
    pub fn set_x_offset(tree: &mut WidgetTree, id: WidgetId, off: u32) {
        let (max_x, _) = max_offsets(tree, id);
        let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
            return;
        };
        let y = scroll.y_off;

        if off > max_x {
            warn!("X offset {off} > max {max_x} for {id:?}");
        }

        apply_offsets(tree, id, off.min(max_x), y);
    }

    /// Scrolls to an absolute y offset, clamped to the child overhang.
    pub fn set_y_offset(tree: &mut WidgetTree, id: WidgetId, off: u32) {
        let (_, max_y) = max_offsets(tree, id);
        let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
            return;
        };
        let x = scroll.x_off;

        if off > max_y {
            warn!("Y offset {off} > max {max_y} for {id:?}");
        }

        apply_offsets(tree, id, x, off.min(max_y));
    }

    /// Pans by a relative amount, silently clamped. Returns whether the
    /// content moved at all.
    pub fn scroll_by(tree: &mut WidgetTree, id: WidgetId, dx: i32, dy: i32) -> bool {
        let (max_x, max_y) = max_offsets(tree, id);
        let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
            return false;
        };

        let x = clamp_off(scroll.x_off, dx, max_x);
        let y = clamp_off(scroll.y_off, dy, max_y);

        apply_offsets(tree, id, x, y)
    }
}

fn clamp_off(off: u32, delta: i32, max: u32) -> u32 {
    (i64::from(off) + i64::from(delta)).clamp(0, i64::from(max)) as u32
}

fn apply_offsets(tree: &mut WidgetTree, id: WidgetId, x: u32, y: u32) -> bool {
    let Some(scroll) = tree.get_mut(id).and_then(|w| w.as_scroll_mut()) else {
        return false;
    };

    if scroll.x_off == x && scroll.y_off == y {
        return false;
    }

    scroll.x_off = x;
    scroll.y_off = y;

    tree.redraw(id);
    tree.redraw_subtree(id);
    true
}

fn max_offsets(tree: &WidgetTree, id: WidgetId) -> (u32, u32) {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return (0, 0);
    };
    let vis = scroll.vis;
    let Some(child) = scroll.child.and_then(|c| tree.get(c)) else {
        return (0, 0);
    };

    (child.w.saturating_sub(vis.w), child.h.saturating_sub(vis.h))
}

fn scrollbar_size(ctx: &RenderCtx) -> u32 {
    ctx.font.ascent() + ctx.padd
}

fn scrolls_x(min: Size, child_min_w: u32) -> bool {
    min.w != 0 && child_min_w > min.w
}

fn scrolls_y(min: Size, child_min_h: u32) -> bool {
    min.h != 0 && child_min_h > min.h
}

pub(crate) fn min_w(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return 0;
    };
    let min = scroll.min;
    let child = scroll.child;

    let child_w = child.map_or(0, |c| ops::min_w(tree, ctx, c));
    let child_h = child.map_or(0, |c| ops::min_h(tree, ctx, c));

    let mut w = if min.w == 0 { child_w } else { min.w.min(child_w) };

    if scrolls_y(min, child_h) {
        w += scrollbar_size(ctx);
    }

    w
}

pub(crate) fn min_h(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return 0;
    };
    let min = scroll.min;
    let child = scroll.child;

    let child_w = child.map_or(0, |c| ops::min_w(tree, ctx, c));
    let child_h = child.map_or(0, |c| ops::min_h(tree, ctx, c));

    let mut h = if min.h == 0 { child_h } else { min.h.min(child_h) };

    if scrolls_x(min, child_w) {
        h += scrollbar_size(ctx);
    }

    h
}

pub(crate) fn distribute(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let (w, h) = (widget.w, widget.h);
    let Some(scroll) = widget.as_scroll() else {
        return;
    };
    let min = scroll.min;
    let (x_off, y_off) = (scroll.x_off, scroll.y_off);
    let Some(child) = scroll.child else {
        return;
    };

    let child_min_w = ops::min_w(tree, ctx, child);
    let child_min_h = ops::min_h(tree, ctx, child);

    let size = scrollbar_size(ctx);
    let mut vis = Size::new(w, h);
    if scrolls_y(min, child_min_h) {
        vis.w = vis.w.saturating_sub(size);
    }
    if scrolls_x(min, child_min_w) {
        vis.h = vis.h.saturating_sub(size);
    }

    let child_w = child_min_w.max(vis.w);
    let child_h = child_min_h.max(vis.h);

    // Content can only move as far as its overhang past the viewport.
    let max_x = child_w - vis.w;
    let max_y = child_h - vis.h;

    if let Some(scroll) = tree.get_mut(id).and_then(|w| w.as_scroll_mut()) {
        scroll.vis = vis;
        scroll.x_off = x_off.min(max_x);
        scroll.y_off = y_off.min(max_y);
        scroll.bar_x = max_x > 0;
        scroll.bar_y = max_y > 0;
    }

    ops::distribute_to(tree, ctx, child, Rect::new(0, 0, child_w, child_h), true);
}

fn draw_vertical_bar(
    canvas: &mut dyn Canvas, ctx: &RenderCtx, at: Point, strip_h: u32, track: u32, off: u32,
    max: u32, focused: bool,
) {
    let asc = ctx.font.ascent();

    canvas.fill_rect(Rect::new(at.x, at.y, scrollbar_size(ctx), strip_h), ctx.palette.bg);
    canvas.vline(at.x + (ctx.padd + asc / 2) as i32, at.y, track, ctx.palette.text);

    let span = track.saturating_sub(asc);
    let pos = if max == 0 {
        0
    } else {
        ((u64::from(span) * u64::from(off) + u64::from(max) / 2) / u64::from(max)) as i32
    };

    let frame = if focused { ctx.palette.sel } else { ctx.palette.text };
    canvas.fill_rrect(
        Rect::new(at.x + ctx.padd as i32, at.y + pos, asc, asc),
        ctx.palette.bg,
        ctx.palette.fg,
        frame,
    );
}

fn draw_horizontal_bar(
    canvas: &mut dyn Canvas, ctx: &RenderCtx, at: Point, track: u32, off: u32, max: u32,
    focused: bool,
) {
    let asc = ctx.font.ascent();

    canvas.fill_rect(Rect::new(at.x, at.y, track, scrollbar_size(ctx)), ctx.palette.bg);
    canvas.hline(at.x, at.y + (ctx.padd + asc / 2) as i32, track, ctx.palette.text);

    let span = track.saturating_sub(asc);
    let pos = if max == 0 {
        0
    } else {
        ((u64::from(span) * u64::from(off) + u64::from(max) / 2) / u64::from(max)) as i32
    };

    let frame = if focused { ctx.palette.sel } else { ctx.palette.text };
    canvas.fill_rrect(
        Rect::new(at.x + pos, at.y + ctx.padd as i32, asc, asc),
        ctx.palette.bg,
        ctx.palette.fg,
        frame,
    );
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
    let Some(scroll) = widget.as_scroll() else {
        return;
    };
    let (bar_x, bar_y) = (scroll.bar_x, scroll.bar_y);
    let (x_off, y_off) = (scroll.x_off, scroll.y_off);
    let focused = scroll.area_selected;
    let child = scroll.child;
    let (max_x, max_y) = max_offsets(tree, id);

    let size = scrollbar_size(ctx);
    let vw = if bar_y { w.saturating_sub(size) } else { w };
    let vh = if bar_x { h.saturating_sub(size) } else { h };

    if own {
        if bar_y {
            let at = Point::new(origin.x + vw as i32, origin.y);
            draw_vertical_bar(canvas, ctx, at, h, vh, y_off, max_y, focused);
        }
        if bar_x {
            let at = Point::new(origin.x, origin.y + vh as i32);
            draw_horizontal_bar(canvas, ctx, at, vw, x_off, max_x, focused);
        }
    }

    if let Some(child) = child {
        if let Some(pos) = tree.get(child).map(Widget::pos) {
            let visible = Rect::new(origin.x, origin.y, vw, vh);
            let prev = canvas.clip();
            let clip = match prev {
                Some(p) => p.intersection(visible),
                None => visible,
            };

            canvas.set_clip(Some(clip));
            let child_origin = Point::new(
                origin.x + pos.x - x_off as i32,
                origin.y + pos.y - y_off as i32,
            );
            ops::render(tree, ctx, child, canvas, child_origin, force, damage);
            canvas.set_clip(prev);
        }
    }

    if own {
        canvas.rect(Rect::new(origin.x, origin.y, vw, vh), ctx.palette.text);
    }
}

fn seek_x(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, x: i32) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let w = widget.w;
    let Some(scroll) = widget.as_scroll() else {
        return;
    };
    let both = scroll.bar_x && scroll.bar_y;
    let (max_x, _) = max_offsets(tree, id);

    let asc = ctx.font.ascent();
    let bar = if both { w.saturating_sub(scrollbar_size(ctx)) } else { w };
    let track = bar.saturating_sub(asc);
    if track == 0 || max_x == 0 {
        return;
    }

    let pos = (x - (asc / 2) as i32).clamp(0, track as i32) as u64;
    let off = (pos * u64::from(max_x) + u64::from(track) / 2) / u64::from(track);

    ScrollArea::set_x_offset(tree, id, off as u32);
}

fn seek_y(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, y: i32) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let h = widget.h;
    let Some(scroll) = widget.as_scroll() else {
        return;
    };
    let both = scroll.bar_x && scroll.bar_y;
    let (_, max_y) = max_offsets(tree, id);

    let asc = ctx.font.ascent();
    let bar = if both { h.saturating_sub(scrollbar_size(ctx)) } else { h };
    let track = bar.saturating_sub(asc);
    if track == 0 || max_y == 0 {
        return;
    }

    let pos = (y - (asc / 2) as i32).clamp(0, track as i32) as u64;
    let off = (pos * u64::from(max_y) + u64::from(track) / 2) / u64::from(track);

    ScrollArea::set_y_offset(tree, id, off as u32);
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(widget) = tree.get(id) else {
        return false;
    };
    let (w, h) = (widget.w, widget.h);
    let Some(scroll) = widget.as_scroll() else {
        return false;
    };
    let (bar_x, bar_y) = (scroll.bar_x, scroll.bar_y);
    let (x_off, y_off) = (scroll.x_off, scroll.y_off);
    let area_selected = scroll.area_selected;
    let child = scroll.child;

    if ev.pressed() == Some(Key::BtnLeft) {
        let size = scrollbar_size(ctx) as i32;
        if bar_x && ev.cursor.y > h as i32 - size {
            seek_x(tree, ctx, id, ev.cursor.x);
            return true;
        }
        if bar_y && ev.cursor.x > w as i32 - size {
            seek_y(tree, ctx, id, ev.cursor.y);
            return true;
        }
    }

    if area_selected {
        return match ev.pressed() {
            Some(Key::Left) => ScrollArea::scroll_by(tree, id, -SCROLL_STEP, 0),
            Some(Key::Right) => ScrollArea::scroll_by(tree, id, SCROLL_STEP, 0),
            Some(Key::Up) => ScrollArea::scroll_by(tree, id, 0, -SCROLL_STEP),
            Some(Key::Down) => ScrollArea::scroll_by(tree, id, 0, SCROLL_STEP),
            _ => false,
        };
    }

    let Some(child) = child else {
        return false;
    };
    let Some(pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    // The child sees content coordinates, shifted back by the offsets.
    let origin = Point::new(pos.x - x_off as i32, pos.y - y_off as i32);
    ops::event(tree, ctx, child, &ev.relative_to(origin))
}

fn set_focus(tree: &mut WidgetTree, id: WidgetId, area: bool, child: bool) {
    if let Some(scroll) = tree.get_mut(id).and_then(|w| w.as_scroll_mut()) {
        scroll.area_selected = area;
        scroll.child_selected = child;
    }
    tree.redraw(id);
}

fn select_out(tree: &mut WidgetTree, id: WidgetId) -> bool {
    if let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) {
        if scroll.area_selected {
            set_focus(tree, id, false, false);
        }
    }

    false
}

fn select_next(tree: &mut WidgetTree, id: WidgetId) -> bool {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return false;
    };
    let child = scroll.child;
    let scrollable = scroll.bar_x || scroll.bar_y;

    if scroll.area_selected {
        return false;
    }

    if scroll.child_selected {
        if !scrollable {
            return false;
        }

        if let Some(child) = child {
            ops::select(tree, child, SelectOp::Out);
        }
        set_focus(tree, id, true, false);
        return true;
    }

    if let Some(child) = child {
        if ops::select(tree, child, SelectOp::In) {
            set_focus(tree, id, false, true);
            return true;
        }
    }

    if scrollable {
        set_focus(tree, id, true, false);
        return true;
    }

    false
}

fn select_prev(tree: &mut WidgetTree, id: WidgetId) -> bool {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return false;
    };
    let child = scroll.child;
    let scrollable = scroll.bar_x || scroll.bar_y;

    if scroll.child_selected {
        return false;
    }

    if scroll.area_selected {
        let entered = match child {
            Some(child) => ops::select(tree, child, SelectOp::In),
            None => false,
        };

        if !entered {
            return false;
        }

        set_focus(tree, id, false, true);
        return true;
    }

    // Entering backwards: the scrollbars are the last forward stop.
    if scrollable {
        set_focus(tree, id, true, false);
        return true;
    }

    if let Some(child) = child {
        if ops::select(tree, child, SelectOp::In) {
            set_focus(tree, id, false, true);
            return true;
        }
    }

    false
}

pub(crate) fn select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return false;
    };

    if scroll.child_selected {
        if let Some(child) = scroll.child {
            if ops::select(tree, child, op) {
                return true;
            }
        }
    }

    match op {
        SelectOp::Out => select_out(tree, id),
        SelectOp::Left | SelectOp::Right => false,
        SelectOp::Up | SelectOp::Prev => select_prev(tree, id),
        SelectOp::In | SelectOp::Down | SelectOp::Next => select_next(tree, id),
    }
}

fn select_scrollbar(tree: &mut WidgetTree, id: WidgetId) -> bool {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return false;
    };

    if scroll.area_selected {
        return true;
    }

    if scroll.child_selected {
        if let Some(child) = scroll.child {
            ops::select(tree, child, SelectOp::Out);
        }
    }

    set_focus(tree, id, true, false);
    true
}

fn select_widget_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(scroll) = tree.get(id).and_then(|w| w.as_scroll()) else {
        return false;
    };
    let Some(child) = scroll.child else {
        return false;
    };
    let (x_off, y_off) = (scroll.x_off, scroll.y_off);
    let Some(child_pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    let target = Point::new(
        pos.x - child_pos.x + x_off as i32,
        pos.y - child_pos.y + y_off as i32,
    );

    if !ops::select_xy(tree, ctx, child, target) {
        return false;
    }

    let mut was_area = false;
    if let Some(scroll) = tree.get_mut(id).and_then(|w| w.as_scroll_mut()) {
        was_area = scroll.area_selected;
        scroll.area_selected = false;
        scroll.child_selected = true;
    }
    if was_area {
        tree.redraw(id);
    }

    true
}

pub(crate) fn select_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(widget) = tree.get(id) else {
        return false;
    };
    let (w, h) = (widget.w, widget.h);
    let Some(scroll) = widget.as_scroll() else {
        return false;
    };
    let size = scrollbar_size(ctx) as i32;

    let in_bar = (scroll.bar_x && pos.y > h as i32 - size)
        || (scroll.bar_y && pos.x > w as i32 - size);

    if in_bar {
        return select_scrollbar(tree, id);
    }

    select_widget_xy(tree, ctx, id, pos)
}
