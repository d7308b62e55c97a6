//! A check box with an optional label to its right.

use crate::canvas::Canvas;
use crate::event::{InputEvent, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Checkbox {
    pub label: Option<String>,
    pub(crate) checked: bool,
}

impl Checkbox {
    pub fn new(tree: &mut WidgetTree, label: Option<String>) -> WidgetId {
        let checkbox = Checkbox {
            label,
            checked: false,
        };

        tree.insert(Widget::new(WidgetPayload::Checkbox(checkbox)))
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Sets the state, firing `Action` only on an actual change.
    pub fn set(tree: &mut WidgetTree, id: WidgetId, checked: bool) {
        let Some(checkbox) = tree.get(id).and_then(|w| w.as_checkbox()) else {
            return;
        };

        if checkbox.checked == checked {
            return;
        }

        toggle(tree, id);
    }

    pub fn toggle(tree: &mut WidgetTree, id: WidgetId) {
        if tree.get(id).and_then(|w| w.as_checkbox()).is_some() {
            toggle(tree, id);
        }
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        let label_w = match &self.label {
            Some(label) => ctx.font.width(label) + ctx.padd,
            None => 0,
        };

        ctx.font.ascent() + label_w
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        ctx.font.ascent() + 2 * ctx.padd
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let ascent = ctx.font.ascent();
        let frame = if widget.is_selected() {
            ctx.palette.sel
        } else {
            ctx.palette.text
        };

        canvas.fill_rect(
            Rect::new(origin.x, origin.y, widget.w, widget.h),
            ctx.palette.bg,
        );

        let box_y = origin.y + ctx.padd as i32;
        canvas.fill_rrect(
            Rect::new(origin.x, box_y, ascent, ascent),
            ctx.palette.bg,
            ctx.palette.fg,
            frame,
        );

        if self.checked {
            let (near, far) = (3, ascent as i32 - 4);
            canvas.line(
                Point::new(origin.x + near, box_y + near),
                Point::new(origin.x + far, box_y + far),
                ctx.palette.text,
            );
            canvas.line(
                Point::new(origin.x + near, box_y + far),
                Point::new(origin.x + far, box_y + near),
                ctx.palette.text,
            );
        }

        if let Some(label) = &self.label {
            canvas.text(
                &*ctx.font,
                Point::new(origin.x + (ascent + ctx.padd) as i32, box_y),
                ctx.palette.text,
                label,
            );
        }
    }
}

fn toggle(tree: &mut WidgetTree, id: WidgetId) {
    if let Some(checkbox) = tree.get_mut(id).and_then(|w| w.as_checkbox_mut()) {
        checkbox.checked = !checkbox.checked;
    }

    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Action);
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
        toggle(tree, id);
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    match ev.pressed() {
        Some(Key::Enter) => {
            toggle(tree, id);
            true
        }
        Some(Key::BtnLeft) => {
            click(tree, ctx, id, ev.cursor);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops;

    #[test]
    fn enter_toggles_and_fires_action() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let checkbox = Checkbox::new(&mut tree, None);
        ops::calc_size(&mut tree, &ctx, checkbox, 0, 0, true);

        ops::event(&mut tree, &ctx, checkbox, &InputEvent::key_down(Key::Enter));
        assert!(tree.get(checkbox).unwrap().as_checkbox().unwrap().is_checked());
        assert_eq!(tree.drain_events().count(), 1);

        ops::event(&mut tree, &ctx, checkbox, &InputEvent::key_down(Key::Enter));
        assert!(!tree.get(checkbox).unwrap().as_checkbox().unwrap().is_checked());
        assert_eq!(tree.drain_events().count(), 1);
    }

    #[test]
    fn set_is_quiet_when_nothing_changes() {
        let mut tree = WidgetTree::new();
        let checkbox = Checkbox::new(&mut tree, None);

        Checkbox::set(&mut tree, checkbox, false);
        assert_eq!(tree.drain_events().count(), 0);

        Checkbox::set(&mut tree, checkbox, true);
        assert_eq!(tree.drain_events().count(), 1);
        assert!(tree.get(checkbox).unwrap().as_checkbox().unwrap().is_checked());
    }

    #[test]
    fn label_extends_the_minimal_width() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let bare = Checkbox::new(&mut tree, None);
        let labeled = Checkbox::new(&mut tree, Some("on".into()));

        // Box is ascent (10) wide; the label adds a padd gap plus 2 glyphs.
        assert_eq!(ops::min_w(&mut tree, &ctx, bare), 10);
        assert_eq!(ops::min_w(&mut tree, &ctx, labeled), 30);
    }

    #[test]
    fn clicks_outside_the_face_do_not_toggle() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let checkbox = Checkbox::new(&mut tree, Some("on".into()));
        ops::calc_size(&mut tree, &ctx, checkbox, 0, 0, true);

        let miss = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(0, 0));
        assert!(ops::event(&mut tree, &ctx, checkbox, &miss));
        assert!(!tree.get(checkbox).unwrap().as_checkbox().unwrap().is_checked());

        let hit = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(8, 9));
        ops::event(&mut tree, &ctx, checkbox, &hit);
        assert!(tree.get(checkbox).unwrap().as_checkbox().unwrap().is_checked());
    }
}
