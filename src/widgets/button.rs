//! A push button. Pressing it fires `Action` and shows the pressed look
//! for a short moment, released by a timer.

use crate::canvas::Canvas;
use crate::event::{InputEvent, InputEventKind, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

/// How long the pressed look lasts.
const RELEASE_MS: u64 = 200;

pub struct Button {
    pub label: String,
    pub(crate) pressed: bool,
}

impl Button {
    pub fn new(tree: &mut WidgetTree, label: impl Into<String>) -> WidgetId {
        let button = Button {
            label: label.into(),
            pressed: false,
        };

        tree.insert(Widget::new(WidgetPayload::Button(button)))
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.width(&self.label)
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.ascent()
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let body = if self.pressed {
            ctx.palette.bg
        } else {
            ctx.palette.fg
        };
        let frame = if widget.is_selected() {
            ctx.palette.sel
        } else {
            ctx.palette.text
        };

        canvas.fill_rrect(
            Rect::new(origin.x, origin.y, widget.w, widget.h),
            ctx.palette.bg,
            body,
            frame,
        );

        let ascent = ctx.font.ascent();
        let text_x = origin.x + widget.w as i32 / 2 - ctx.font.width(&self.label) as i32 / 2;
        let text_y = origin.y + widget.h as i32 / 2 - ascent as i32 / 2;
        canvas.text(
            &*ctx.font,
            Point::new(text_x, text_y),
            ctx.palette.text,
            &self.label,
        );
    }
}

fn press(tree: &mut WidgetTree, id: WidgetId) {
    let Some(button) = tree.get_mut(id).and_then(|w| w.as_button_mut()) else {
        return;
    };

    if button.pressed {
        return;
    }

    button.pressed = true;
    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Action);
    tree.schedule_timer(id, RELEASE_MS);
}

fn click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, cursor: Point) {
    let Some(widget) = tree.get(id) else {
        return;
    };

    let padd = ctx.padd as i32;
    let inside = cursor.x >= padd
        && cursor.x <= widget.w as i32 - padd
        && cursor.y >= padd
        && cursor.y <= widget.h as i32 - padd;

    if inside {
        press(tree, id);
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    if ev.kind == InputEventKind::Timer {
        if let Some(button) = tree.get_mut(id).and_then(|w| w.as_button_mut()) {
            button.pressed = false;
        }
        tree.redraw(id);
        return true;
    }

    match ev.pressed() {
        Some(Key::Enter | Key::Char(' ')) => {
            press(tree, id);
            true
        }
        Some(Key::BtnLeft) => {
            click(tree, ctx, id, ev.cursor);
            true
        }
        _ => false,
    }
}
