//! A read-only percentage bar with a centered numeric readout.

use crate::canvas::Canvas;
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct ProgressBar {
    pub(crate) val: f32,
}

fn clamp_val(val: f32) -> f32 {
    if val.is_nan() {
        warn!("Progress value is NaN, using 0");
        return 0.0;
    }

    if !(0.0..=100.0).contains(&val) {
        warn!("Progress value {val} out of range, clamping");
        return val.clamp(0.0, 100.0);
    }

    val
}

impl ProgressBar {
    pub fn new(tree: &mut WidgetTree, val: f32) -> WidgetId {
        let pbar = ProgressBar {
            val: clamp_val(val),
        };

        tree.insert(Widget::new(WidgetPayload::ProgressBar(pbar)))
    }

    pub fn value(&self) -> f32 {
        self.val
    }

    /// Sets the percentage, clamped into `0..=100`. Repaints only when the
    /// value actually changed.
    pub fn set(tree: &mut WidgetTree, id: WidgetId, val: f32) {
        let val = clamp_val(val);

        let Some(pbar) = tree.get_mut(id).and_then(|w| w.as_pbar_mut()) else {
            return;
        };

        if pbar.val == val {
            return;
        }

        pbar.val = val;
        tree.redraw(id);
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        // Room for "100.00%".
        2 * ctx.padd + ctx.font.max_width(7)
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.ascent()
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let (w, h) = (widget.w, widget.h);
        let whole = Rect::new(origin.x, origin.y, w, h);
        let done = (self.val * w as f32 / 100.0) as u32;

        let prev = canvas.clip();
        let clipped = |region: Rect| match prev {
            Some(p) => p.intersection(region),
            None => region,
        };

        // Both halves draw the same rounded box, clipped to their side, so
        // the outline spans the full width.
        if done > 0 {
            canvas.set_clip(Some(clipped(Rect::new(origin.x, origin.y, done, h))));
            canvas.fill_rrect(whole, ctx.palette.bg, ctx.palette.fg2, ctx.palette.text);
        }
        if done < w {
            canvas.set_clip(Some(clipped(Rect::new(
                origin.x + done as i32,
                origin.y,
                w - done,
                h,
            ))));
            canvas.fill_rrect(whole, ctx.palette.bg, ctx.palette.fg, ctx.palette.text);
        }
        canvas.set_clip(prev);

        let readout = format!("{:.2}%", self.val);
        let text_x = origin.x + w as i32 / 2 - ctx.font.width(&readout) as i32 / 2;
        canvas.text(
            &*ctx.font,
            Point::new(text_x, origin.y + ctx.padd as i32),
            ctx.palette.text,
            &readout,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::Pixmap;
    use crate::ops;
    use crate::render::Damage;

    #[test]
    fn set_redraws_only_on_change() {
        let mut tree = WidgetTree::new();
        let pbar = ProgressBar::new(&mut tree, 25.0);
        tree.get_mut(pbar).unwrap().redraw = false;

        ProgressBar::set(&mut tree, pbar, 25.0);
        assert!(!tree.get(pbar).unwrap().needs_redraw());

        ProgressBar::set(&mut tree, pbar, 26.0);
        assert!(tree.get(pbar).unwrap().needs_redraw());
    }

    #[test]
    fn out_of_range_values_clamp() {
        let mut tree = WidgetTree::new();
        let pbar = ProgressBar::new(&mut tree, 120.0);
        assert_eq!(tree.get(pbar).unwrap().as_pbar().unwrap().value(), 100.0);

        ProgressBar::set(&mut tree, pbar, -5.0);
        assert_eq!(tree.get(pbar).unwrap().as_pbar().unwrap().value(), 0.0);
    }

    #[test]
    fn filled_fraction_matches_the_value() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let pbar = ProgressBar::new(&mut tree, 50.0);
        ops::calc_size(&mut tree, &ctx, pbar, 0, 0, true);

        let mut screen = Pixmap::new(64, 18);
        let mut damage = Damage::default();
        ops::render(&mut tree, &ctx, pbar, &mut screen, Point::default(), false, &mut damage);

        // min_w 64, min_h 18; half of the box is done at 50%.
        assert_eq!(screen.pixel(2, 9), ctx.palette.fg2);
        assert_eq!(screen.pixel(61, 9), ctx.palette.fg);
    }
}
