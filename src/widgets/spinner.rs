//! An integer entry with a pair of increment/decrement arrows.
//!
//! Stepping past either bound does not change the value; instead the frame
//! flashes in the alert color for a moment, driven by a widget timer.

use crate::canvas::Canvas;
use crate::event::{InputEvent, InputEventKind, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::utils::error::{Result, TrellisError};
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

/// How long the alert flash lasts.
pub(crate) const ALERT_MS: u64 = 500;

pub struct Spinner {
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) val: i64,
    pub(crate) alert: bool,
}

pub(crate) fn check_range(min: i64, max: i64, val: i64) -> Result<()> {
    if min >= max {
        return Err(TrellisError::InvalidValue(format!(
            "empty range {min}..={max}"
        )));
    }

    if val < min || val > max {
        return Err(TrellisError::InvalidValue(format!(
            "value {val} outside of {min}..={max}"
        )));
    }

    Ok(())
}

fn digits(v: i64) -> u32 {
    v.to_string().len() as u32
}

/// Width of the arrow column, odd so the triangles center on a pixel.
fn arrows_w(ctx: &RenderCtx) -> u32 {
    ctx.font.max_width(1) | 1
}

impl Spinner {
    pub fn new(tree: &mut WidgetTree, min: i64, max: i64, val: i64) -> Result<WidgetId> {
        check_range(min, max, val)?;

        let spinner = Spinner {
            min,
            max,
            val,
            alert: false,
        };

        Ok(tree.insert(Widget::new(WidgetPayload::Spinner(spinner))))
    }

    pub fn value(&self) -> i64 {
        self.val
    }

    /// Sets the value from application code; out-of-range values are
    /// rejected with a warning.
    pub fn set(tree: &mut WidgetTree, id: WidgetId, val: i64) {
        let Some(spinner) = tree.get_mut(id).and_then(|w| w.as_spinner_mut()) else {
            return;
        };

        if val < spinner.min || val > spinner.max {
            warn!(
                "Spinner value {val} outside of {}..={}",
                spinner.min, spinner.max
            );
            return;
        }

        if spinner.val == val {
            return;
        }

        spinner.val = val;
        tree.redraw(id);
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        let digits = digits(self.min).max(digits(self.max));

        2 * ctx.padd + ctx.font.max_width_chars("-0123456789", digits) + arrows_w(ctx)
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.ascent()
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let (w, h) = (widget.w, widget.h);
        let s = arrows_w(ctx);

        canvas.fill_rect(Rect::new(origin.x, origin.y, w, h), ctx.palette.fg);

        let value = self.val.to_string();
        let text_x = origin.x + (w - s - ctx.padd) as i32 - ctx.font.width(&value) as i32;
        canvas.text(
            &*ctx.font,
            Point::new(text_x, origin.y + ctx.padd as i32),
            ctx.palette.text,
            &value,
        );

        let frame = if self.alert {
            ctx.palette.alert
        } else if widget.is_selected() {
            ctx.palette.sel
        } else {
            ctx.palette.text
        };

        canvas.rect(Rect::new(origin.x, origin.y, w, h), frame);

        // Arrow column separator and the up/down split.
        let ax = origin.x + (w - s) as i32;
        canvas.vline(ax - 1, origin.y, h, frame);
        canvas.hline(ax, origin.y + h as i32 / 2, s, frame);

        let cx = origin.x + w as i32 - s as i32 / 2 - 1;
        canvas.triangle_up(
            Point::new(cx, origin.y + h as i32 / 4),
            s / 2,
            ctx.palette.text,
        );
        canvas.triangle_down(
            Point::new(cx, origin.y + 3 * (h as i32 / 4)),
            s / 2,
            ctx.palette.text,
        );
    }
}

pub(crate) fn alert(tree: &mut WidgetTree, id: WidgetId) {
    if let Some(spinner) = tree.get_mut(id).and_then(|w| w.as_spinner_mut()) {
        spinner.alert = true;
    }

    tree.redraw(id);
    tree.schedule_timer(id, ALERT_MS);
}

fn step(tree: &mut WidgetTree, id: WidgetId, by: i64) {
    let Some(spinner) = tree.get_mut(id).and_then(|w| w.as_spinner_mut()) else {
        return;
    };

    let val = spinner.val.saturating_add(by).clamp(spinner.min, spinner.max);

    if val == spinner.val {
        alert(tree, id);
        return;
    }

    spinner.val = val;
    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn jump(tree: &mut WidgetTree, id: WidgetId, to_max: bool) {
    let Some(spinner) = tree.get_mut(id).and_then(|w| w.as_spinner_mut()) else {
        return;
    };

    let val = if to_max { spinner.max } else { spinner.min };

    if val == spinner.val {
        return;
    }

    spinner.val = val;
    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, cursor: Point) {
    let Some(widget) = tree.get(id) else {
        return;
    };

    let s = arrows_w(ctx) as i32;
    let padd = ctx.padd as i32;
    let (w, h) = (widget.w as i32, widget.h as i32);

    if cursor.x < w - padd - s || cursor.x > w - padd {
        return;
    }
    if cursor.y < padd || cursor.y > h - padd {
        return;
    }

    if cursor.y < h / 2 {
        step(tree, id, 1);
    } else {
        step(tree, id, -1);
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    if ev.kind == InputEventKind::Timer {
        if let Some(spinner) = tree.get_mut(id).and_then(|w| w.as_spinner_mut()) {
            spinner.alert = false;
        }
        tree.redraw(id);
        return true;
    }

    match ev.pressed() {
        Some(Key::Up) => {
            step(tree, id, 1);
            true
        }
        Some(Key::Down) => {
            step(tree, id, -1);
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
