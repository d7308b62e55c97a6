//! A radio group: one choice out of a fixed list of options.

use crate::canvas::Canvas;
use crate::event::{InputEvent, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Choice {
    pub(crate) options: Vec<String>,
    pub(crate) selected: usize,
}

impl Choice {
    pub fn new(tree: &mut WidgetTree, options: Vec<String>, selected: usize) -> WidgetId {
        let selected = if selected < options.len() {
            selected
        } else {
            warn!("Selected option {selected} out of range, using 0");
            0
        };

        let choice = Choice { options, selected };

        tree.insert(Widget::new(WidgetPayload::Choice(choice)))
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    /// Selects an option by index, firing `Action` on change. Selecting an
    /// index past the options is an application bug and is only logged.
    pub fn select(tree: &mut WidgetTree, id: WidgetId, index: usize) {
        select_option(tree, id, index);
    }

    fn row_h(ctx: &RenderCtx) -> u32 {
        ctx.font.ascent() + ctx.padd
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        let widest = self
            .options
            .iter()
            .map(|option| ctx.font.width(option))
            .max()
            .unwrap_or(0);

        ctx.padd + ctx.font.ascent() + widest
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        ctx.padd + self.options.len() as u32 * Self::row_h(ctx)
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let ascent = ctx.font.ascent();
        let ring = if widget.is_selected() {
            ctx.palette.sel
        } else {
            ctx.palette.text
        };

        canvas.fill_rect(
            Rect::new(origin.x, origin.y, widget.w, widget.h),
            ctx.palette.bg,
        );

        let mut y = origin.y + ctx.padd as i32;
        let r = ascent / 2;

        for (i, option) in self.options.iter().enumerate() {
            let center = Point::new(origin.x + r as i32, y + r as i32);

            canvas.fill_circle(center, r, ctx.palette.fg);
            canvas.circle(center, r, ring);

            if i == self.selected {
                canvas.fill_circle(center, r.saturating_sub(3), ctx.palette.text);
            }

            canvas.text(
                &*ctx.font,
                Point::new(origin.x + (ctx.padd + ascent) as i32, y),
                ctx.palette.text,
                option,
            );

            y += Self::row_h(ctx) as i32;
        }
    }
}

fn select_option(tree: &mut WidgetTree, id: WidgetId, index: usize) {
    let Some(choice) = tree.get_mut(id).and_then(|w| w.as_choice_mut()) else {
        return;
    };

    if choice.selected == index {
        return;
    }

    if index >= choice.options.len() {
        error!("Choice {id:?} selecting option {index} of {}", choice.options.len());
        return;
    }

    choice.selected = index;
    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Action);
}

fn move_up(tree: &mut WidgetTree, id: WidgetId) {
    let Some(choice) = tree.get(id).and_then(|w| w.as_choice()) else {
        return;
    };

    if choice.options.is_empty() {
        return;
    }

    let target = match choice.selected {
        0 => choice.options.len() - 1,
        n => n - 1,
    };
    select_option(tree, id, target);
}

fn move_down(tree: &mut WidgetTree, id: WidgetId) {
    let Some(choice) = tree.get(id).and_then(|w| w.as_choice()) else {
        return;
    };

    if choice.options.is_empty() {
        return;
    }

    let target = if choice.selected + 1 >= choice.options.len() {
        0
    } else {
        choice.selected + 1
    };
    select_option(tree, id, target);
}

fn click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, cursor: Point) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let count = widget.as_choice().map_or(0, |c| c.options.len());

    let padd = ctx.padd as i32;
    let (w, h) = (widget.w as i32, widget.h as i32);

    if cursor.x < 0 || cursor.x > w {
        return;
    }
    if cursor.y < padd || cursor.y > h - padd {
        return;
    }

    // A stretched widget has dead space below the last row; clicks there
    // land on no option.
    let row = ((cursor.y - padd) as u32 / Choice::row_h(ctx)) as usize;
    if row < count {
        select_option(tree, id, row);
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(last) = tree
        .get(id)
        .and_then(|w| w.as_choice())
        .map(|c| c.options.len().saturating_sub(1))
    else {
        return false;
    };

    match ev.pressed() {
        Some(Key::Up) => {
            move_up(tree, id);
            true
        }
        Some(Key::Down) => {
            move_down(tree, id);
            true
        }
        Some(Key::Home) => {
            select_option(tree, id, 0);
            true
        }
        Some(Key::End) => {
            select_option(tree, id, last);
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

    fn radio(tree: &mut WidgetTree, ctx: &RenderCtx) -> WidgetId {
        let options = vec!["left".into(), "center".into(), "right".into()];
        let id = Choice::new(tree, options, 0);
        ops::calc_size(tree, ctx, id, 0, 0, true);
        id
    }

    fn selected(tree: &WidgetTree, id: WidgetId) -> usize {
        tree.get(id).unwrap().as_choice().unwrap().selected_index()
    }

    #[test]
    fn arrows_wrap_around_both_ends() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let id = radio(&mut tree, &ctx);

        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Up));
        assert_eq!(selected(&tree, id), 2);

        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Down));
        assert_eq!(selected(&tree, id), 0);
    }

    #[test]
    fn changes_fire_action_and_repeats_stay_quiet() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let id = radio(&mut tree, &ctx);

        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::End));
        assert_eq!(selected(&tree, id), 2);
        assert_eq!(tree.drain_events().count(), 1);

        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::End));
        assert_eq!(tree.drain_events().count(), 0);
    }

    #[test]
    fn clicks_pick_the_row_under_the_cursor() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let id = radio(&mut tree, &ctx);

        // Rows are ascent + padd = 14 tall below the top padding.
        let second = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(5, 4 + 14 + 3));
        ops::event(&mut tree, &ctx, id, &second);
        assert_eq!(selected(&tree, id), 1);

        let above = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(5, 1));
        ops::event(&mut tree, &ctx, id, &above);
        assert_eq!(selected(&tree, id), 1);
    }

    #[test]
    fn out_of_range_select_is_ignored() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let id = radio(&mut tree, &ctx);

        Choice::select(&mut tree, id, 17);
        assert_eq!(selected(&tree, id), 0);
        assert_eq!(tree.drain_events().count(), 0);
    }

    #[test]
    fn sizes_cover_the_widest_option_and_all_rows() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let id = radio(&mut tree, &ctx);

        // "center" is 6 glyphs: padd + ascent + 48.
        assert_eq!(ops::min_w(&mut tree, &ctx, id), 62);
        // Top padding plus three 14px rows.
        assert_eq!(ops::min_h(&mut tree, &ctx, id), 46);
    }
}
