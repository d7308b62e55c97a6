//! A horizontal slider over an integer range.
//!
//! Shares the spinner's value model and its alert flash when a step runs
//! into a bound.

use crate::canvas::Canvas;
use crate::event::{InputEvent, InputEventKind, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::utils::error::Result;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};
use crate::widgets::spinner::{check_range, ALERT_MS};

const BIG_STEP: i64 = 10;

pub struct Slider {
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) val: i64,
    pub(crate) alert: bool,
}

impl Slider {
    pub fn new(tree: &mut WidgetTree, min: i64, max: i64, val: i64) -> Result<WidgetId> {
        check_range(min, max, val)?;

        let slider = Slider {
            min,
            max,
            val,
            alert: false,
        };

        Ok(tree.insert(Widget::new(WidgetPayload::Slider(slider))))
    }

    pub fn value(&self) -> i64 {
        self.val
    }

    /// Sets the value from application code; out-of-range values are
    /// rejected with a warning.
    pub fn set(tree: &mut WidgetTree, id: WidgetId, val: i64) {
        let Some(slider) = tree.get_mut(id).and_then(|w| w.as_slider_mut()) else {
            return;
        };

        if val < slider.min || val > slider.max {
            warn!(
                "Slider value {val} outside of {}..={}",
                slider.min, slider.max
            );
            return;
        }

        if slider.val == val {
            return;
        }

        slider.val = val;
        tree.redraw(id);
    }

    fn handle_w(ctx: &RenderCtx) -> u32 {
        ctx.font.ascent()
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        // Enough travel to be usable plus the handle itself.
        2 * ctx.padd + 4 * Self::handle_w(ctx)
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.ascent()
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let (w, h) = (widget.w, widget.h);
        let handle = Self::handle_w(ctx);

        let frame = if self.alert {
            ctx.palette.alert
        } else if widget.is_selected() {
            ctx.palette.sel
        } else {
            ctx.palette.text
        };

        canvas.fill_rrect(
            Rect::new(origin.x, origin.y, w, h),
            ctx.palette.bg,
            ctx.palette.fg,
            frame,
        );

        // Handle position proportional to the value over the usable travel.
        let travel = w.saturating_sub(2 * ctx.padd + handle) as i64;
        let range = self.max - self.min;
        let along = (self.val - self.min) * travel / range;

        let handle_x = origin.x + ctx.padd as i32 + along as i32;
        let handle_y = origin.y + (h.saturating_sub(handle) / 2) as i32;
        canvas.fill_rrect(
            Rect::new(handle_x, handle_y, handle, handle),
            ctx.palette.fg,
            ctx.palette.fg2,
            ctx.palette.text,
        );
    }
}

fn step(tree: &mut WidgetTree, id: WidgetId, by: i64) {
    let Some(slider) = tree.get_mut(id).and_then(|w| w.as_slider_mut()) else {
        return;
    };

    let val = slider.val.saturating_add(by).clamp(slider.min, slider.max);

    if val == slider.val {
        if let Some(slider) = tree.get_mut(id).and_then(|w| w.as_slider_mut()) {
            slider.alert = true;
        }
        tree.redraw(id);
        tree.schedule_timer(id, ALERT_MS);
        return;
    }

    slider.val = val;
    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn set_from_user(tree: &mut WidgetTree, id: WidgetId, val: i64) {
    let Some(slider) = tree.get_mut(id).and_then(|w| w.as_slider_mut()) else {
        return;
    };

    if val == slider.val {
        return;
    }

    slider.val = val;
    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn jump(tree: &mut WidgetTree, id: WidgetId, to_max: bool) {
    let Some(slider) = tree.get(id).and_then(|w| w.as_slider()) else {
        return;
    };

    let val = if to_max { slider.max } else { slider.min };
    set_from_user(tree, id, val);
}

/// Seeks to the clicked position along the travel.
fn click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, cursor: Point) {
    let Some(widget) = tree.get(id) else {
        return;
    };

    let Some(slider) = widget.as_slider() else {
        return;
    };

    let handle = Slider::handle_w(ctx) as i64;
    let travel = widget.w.saturating_sub(2 * ctx.padd + handle as u32) as i64;
    if travel == 0 {
        return;
    }

    let along = (cursor.x as i64 - ctx.padd as i64 - handle / 2).clamp(0, travel);
    let range = slider.max - slider.min;
    let val = slider.min + (along * range + travel / 2) / travel;

    set_from_user(tree, id, val);
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    if ev.kind == InputEventKind::Timer {
        if let Some(slider) = tree.get_mut(id).and_then(|w| w.as_slider_mut()) {
            slider.alert = false;
        }
        tree.redraw(id);
        return true;
    }

    match ev.pressed() {
        Some(Key::Right) => {
            step(tree, id, 1);
            true
        }
        Some(Key::Left) => {
            step(tree, id, -1);
            true
        }
        Some(Key::PageUp) => {
            step(tree, id, BIG_STEP);
            true
        }
        Some(Key::PageDown) => {
            step(tree, id, -BIG_STEP);
            true
        }
        Some(Key::Home) => {
            jump(tree, id, false);
            true
        }
        Some(Key::End) => {
            jump(tree, id, true);
            true
        }
        Some(Key::BtnLeft) => {
            click(tree, ctx, id, ev.cursor);
            true
        }
        _ => false,
    }
}
