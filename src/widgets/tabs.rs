//! Labeled tabs over a stack of child layouts.
//!
//! Every tab's child is laid out into the same payload cell below the title
//! row, so switching tabs never triggers a relayout, only a forced subtree
//! repaint. Tab slots are sized by the bold label width even when inactive,
//! which keeps the title row stable as the active tab changes.
//!
//! Focus walks two stops: the title row first, the active child second.
//! While the title row is focused, plain Left/Right switch the active tab
//! directly, wrapping at both ends.

use crate::canvas::Canvas;
use crate::event::{InputEvent, Key};
use crate::font::Font;
use crate::geometry::{Point, Rect};
use crate::ops::{self, SelectOp};
use crate::render::{Damage, RenderCtx};
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Tabs {
    pub(crate) labels: Vec<String>,
    pub(crate) children: Vec<Option<WidgetId>>,
    pub(crate) active: usize,
    pub(crate) title_selected: bool,
    pub(crate) child_selected: bool,
}

impl Tabs {
    pub fn new(tree: &mut WidgetTree, labels: &[&str], active: usize) -> WidgetId {
        let mut active = active;
        if active >= labels.len() {
            warn!("Active tab {active} >= tabs {}", labels.len());
            active = 0;
        }

        let tabs = Tabs {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            children: vec![None; labels.len()],
            active,
            title_selected: false,
            child_selected: false,
        };

        tree.insert(Widget::new(WidgetPayload::Tabs(tabs)))
    }

    pub fn active_tab(&self) -> usize {
        self.active
    }

    pub(crate) fn active_child(&self) -> Option<WidgetId> {
        self.children.get(self.active).copied().flatten()
    }

    /// Puts a child into a tab, displacing and returning the previous
    /// occupant (detached, not removed).
    pub fn put(
        tree: &mut WidgetTree, id: WidgetId, tab: usize, child: WidgetId,
    ) -> Option<WidgetId> {
        let valid = match tree.get(id).and_then(|w| w.as_tabs()) {
            Some(t) => tab < t.children.len(),
            None => false,
        };

        if !valid {
            error!("Invalid tab index {tab} for {id:?}");
            return None;
        }

        if !tree.set_parent(child, id) {
            return None;
        }

        let displaced = tree
            .get_mut(id)
            .and_then(|w| w.as_tabs_mut())
            .and_then(|t| t.children[tab].replace(child));

        if let Some(old) = displaced {
            tree.clear_parent(old);
        }

        tree.resize(id);
        displaced
    }

    pub fn set_active(tree: &mut WidgetTree, id: WidgetId, tab: usize) {
        let valid = tree
            .get(id)
            .and_then(|w| w.as_tabs())
            .is_some_and(|t| tab < t.labels.len());

        if !valid {
            warn!("Invalid tab index {tab} for {id:?}");
            return;
        }

        set_tab(tree, id, tab);
    }
}

fn set_tab(tree: &mut WidgetTree, id: WidgetId, tab: usize) {
    let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) else {
        return;
    };

    if tabs.active == tab {
        return;
    }

    tabs.active = tab;
    tree.redraw_subtree(id);
    tree.redraw(id);
}

fn tab_w(ctx: &RenderCtx, label: &str) -> u32 {
    ctx.font_bold.width(label) + 2 * ctx.padd
}

fn title_h(ctx: &RenderCtx) -> u32 {
    ctx.font.ascent() + 2 * ctx.padd
}

fn payload_area(ctx: &RenderCtx, w: u32, h: u32) -> Rect {
    Rect::new(
        ctx.padd as i32,
        (title_h(ctx) + ctx.padd) as i32,
        w.saturating_sub(2 * ctx.padd),
        h.saturating_sub(title_h(ctx) + 2 * ctx.padd),
    )
}

pub(crate) fn min_w(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return 0;
    };

    let children: Vec<WidgetId> = tabs.children.iter().flatten().copied().collect();
    let titles: u32 = tabs.labels.iter().map(|l| tab_w(ctx, l)).sum();

    let mut widest = 0;
    for child in children {
        widest = widest.max(ops::min_w(tree, ctx, child));
    }

    (widest + 2 * ctx.padd).max(titles)
}

pub(crate) fn min_h(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return 0;
    };

    let children: Vec<WidgetId> = tabs.children.iter().flatten().copied().collect();

    let mut tallest = 0;
    for child in children {
        tallest = tallest.max(ops::min_h(tree, ctx, child));
    }

    tallest + title_h(ctx) + 2 * ctx.padd
}

pub(crate) fn distribute(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let (w, h) = (widget.w, widget.h);
    let Some(tabs) = widget.as_tabs() else {
        return;
    };
    let children: Vec<WidgetId> = tabs.children.iter().flatten().copied().collect();

    let cell = payload_area(ctx, w, h);
    for child in children {
        ops::distribute_to(tree, ctx, child, cell, true);
    }
}

fn render_title(
    canvas: &mut dyn Canvas, ctx: &RenderCtx, origin: Point, w: u32, labels: &[String],
    active: usize, focused: bool,
) {
    let th = title_h(ctx) as i32;
    let baseline_y = origin.y + th;

    if labels.is_empty() {
        canvas.hline(origin.x, baseline_y, w, ctx.palette.text);
        return;
    }

    let mut x = origin.x;
    let mut act = (origin.x, 0u32);

    for (i, label) in labels.iter().enumerate() {
        let tw = tab_w(ctx, label);
        let is_active = i == active;
        let font: &dyn Font = if is_active {
            ctx.font_bold.as_ref()
        } else {
            ctx.font.as_ref()
        };

        if is_active {
            act = (x, tw);
            if focused {
                canvas.hline(
                    x + (ctx.padd / 2) as i32,
                    origin.y + th - ctx.padd as i32,
                    tw - ctx.padd,
                    ctx.palette.sel,
                );
            }
        }

        let text_x = x + (tw.saturating_sub(font.width(label)) / 2) as i32;
        canvas.text(
            font,
            Point::new(text_x, origin.y + ctx.padd as i32),
            ctx.palette.text,
            label,
        );

        x += tw as i32;

        if x < origin.x + w as i32 {
            canvas.vline(x - 1, origin.y + 1, title_h(ctx) - 1, ctx.palette.text);
        }
    }

    // The baseline stays open under the active tab.
    let (act_x, act_w) = act;
    if act_x > origin.x {
        canvas.hline(origin.x, baseline_y, (act_x - origin.x) as u32, ctx.palette.text);
    }

    let right = origin.x + w as i32;
    let open_end = act_x + act_w as i32 - 1;
    if open_end < right {
        canvas.hline(open_end, baseline_y, (right - open_end) as u32, ctx.palette.text);
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
    let Some(tabs) = widget.as_tabs() else {
        return;
    };

    let labels = tabs.labels.clone();
    let active = tabs.active;
    let title_focus = tabs.title_selected;
    let child = tabs.active_child();
    let child_box = child.and_then(|c| tree.get(c)).map(Widget::bounds);

    if own {
        let bg = ctx.palette.bg;
        match child_box {
            None => canvas.fill_rect(Rect::new(origin.x, origin.y, w, h), bg),
            Some(b) => {
                // Background strips around the active child.
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

        render_title(canvas, ctx, origin, w, &labels, active, title_focus);
        canvas.rect(Rect::new(origin.x, origin.y, w, h), ctx.palette.text);
    }

    if let (Some(child), Some(b)) = (child, child_box) {
        let child_origin = Point::new(origin.x + b.x, origin.y + b.y);
        ops::render(tree, ctx, child, canvas, child_origin, force, damage);
    }
}

fn tab_left(tree: &mut WidgetTree, id: WidgetId) {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return;
    };
    if tabs.labels.is_empty() {
        return;
    }

    let tab = if tabs.active > 0 {
        tabs.active - 1
    } else {
        tabs.labels.len() - 1
    };

    set_tab(tree, id, tab);
}

fn tab_right(tree: &mut WidgetTree, id: WidgetId) {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return;
    };
    if tabs.labels.is_empty() {
        return;
    }

    let tab = if tabs.active + 1 < tabs.labels.len() {
        tabs.active + 1
    } else {
        0
    };

    set_tab(tree, id, tab);
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return false;
    };

    if tabs.child_selected {
        let Some(child) = tabs.active_child() else {
            return false;
        };
        let Some(pos) = tree.get(child).map(Widget::pos) else {
            return false;
        };
        return ops::event(tree, ctx, child, &ev.relative_to(pos));
    }

    if !tabs.title_selected {
        return false;
    }

    match ev.pressed() {
        Some(Key::Left) => {
            tab_left(tree, id);
            true
        }
        Some(Key::Right) => {
            tab_right(tree, id);
            true
        }
        _ => false,
    }
}

fn select_out(tree: &mut WidgetTree, id: WidgetId) -> bool {
    if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
        if tabs.title_selected {
            tabs.title_selected = false;
            tree.redraw(id);
        }
    }

    false
}

fn select_prev(tree: &mut WidgetTree, id: WidgetId) -> bool {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return false;
    };
    let child = tabs.active_child();

    if tabs.title_selected {
        return false;
    }

    if tabs.child_selected {
        if let Some(child) = child {
            ops::select(tree, child, SelectOp::Out);
        }
        if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
            tabs.child_selected = false;
            tabs.title_selected = true;
        }
        tree.redraw(id);
        return true;
    }

    // Entering backwards: the child is the last stop, the title the first.
    if let Some(child) = child {
        if ops::select(tree, child, SelectOp::In) {
            if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
                tabs.child_selected = true;
            }
            return true;
        }
    }

    if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
        tabs.title_selected = true;
    }
    tree.redraw(id);
    true
}

fn select_next(tree: &mut WidgetTree, id: WidgetId) -> bool {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return false;
    };
    let child = tabs.active_child();

    if tabs.title_selected {
        let entered = match child {
            Some(child) => ops::select(tree, child, SelectOp::In),
            None => false,
        };

        if !entered {
            return false;
        }

        if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
            tabs.title_selected = false;
            tabs.child_selected = true;
        }
        tree.redraw(id);
        return true;
    }

    if tabs.child_selected {
        return false;
    }

    if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
        tabs.title_selected = true;
    }
    tree.redraw(id);
    true
}

pub(crate) fn select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return false;
    };

    if tabs.child_selected {
        if let Some(child) = tabs.active_child() {
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

fn select_title_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, x: i32) -> bool {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return false;
    };
    let child = tabs.active_child();
    let was_child = tabs.child_selected;
    let was_title = tabs.title_selected;
    let labels = tabs.labels.clone();

    if was_child {
        if let Some(child) = child {
            ops::select(tree, child, SelectOp::Out);
        }
    }

    if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
        tabs.title_selected = true;
        tabs.child_selected = false;
    }
    if !was_title {
        tree.redraw(id);
    }

    let mut cx = 0i32;
    for (i, label) in labels.iter().enumerate() {
        let tw = tab_w(ctx, label) as i32;
        if x <= cx + tw {
            set_tab(tree, id, i);
            break;
        }
        cx += tw;
    }

    true
}

fn select_widget_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(tabs) = tree.get(id).and_then(|w| w.as_tabs()) else {
        return false;
    };
    let Some(child) = tabs.active_child() else {
        return false;
    };
    let was_title = tabs.title_selected;
    let Some(child_pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    if !ops::select_xy(
        tree,
        ctx,
        child,
        pos.offset(Point::new(-child_pos.x, -child_pos.y)),
    ) {
        return false;
    }

    if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
        tabs.title_selected = false;
        tabs.child_selected = true;
    }
    if was_title {
        tree.redraw(id);
    }

    true
}

pub(crate) fn select_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    if pos.y > title_h(ctx) as i32 {
        select_widget_xy(tree, ctx, id, pos)
    } else {
        select_title_xy(tree, ctx, id, pos.x)
    }
}
