//! An application-painted drawing area.
//!
//! The widget owns an offscreen [`Pixmap`] matching its current layout size
//! and blits it to the screen on render. Whenever the backing store is
//! (re)allocated after a size change, a [`WidgetEvent::Redraw`] is queued so
//! the application knows its pixels are gone and paints the fresh buffer.

use crate::canvas::{Canvas, Pixmap};
use crate::event::WidgetEvent;
use crate::geometry::{Point, Rect, Size};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct PixmapArea {
    pub(crate) min: Size,
    pub(crate) buffer: Option<Pixmap>,
}

impl PixmapArea {
    /// Inserts a drawing area that asks the layout for at least `min`.
    pub fn new(tree: &mut WidgetTree, min: Size) -> WidgetId {
        let pixmap = PixmapArea { min, buffer: None };
        tree.insert(Widget::new(WidgetPayload::Pixmap(pixmap)))
    }

    pub(crate) fn min_w(&self, _ctx: &RenderCtx) -> u32 {
        self.min.w
    }

    pub(crate) fn min_h(&self, _ctx: &RenderCtx) -> u32 {
        self.min.h
    }

    /// Read access to the backing store. `None` until the first render
    /// allocates it.
    pub fn canvas(&self) -> Option<&Pixmap> {
        self.buffer.as_ref()
    }

    /// Write access to the backing store, marking the widget dirty so the
    /// new content reaches the screen on the next render pass.
    pub fn writable(tree: &mut WidgetTree, id: WidgetId) -> Option<&mut Pixmap> {
        tree.redraw(id);
        tree.get_mut(id)?.as_pixmap_mut()?.buffer.as_mut()
    }
}

pub(crate) fn render(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, canvas: &mut dyn Canvas, origin: Point,
) {
    let Some(widget) = tree.get_mut(id) else {
        return;
    };
    let size = widget.size();
    let Some(pixmap) = widget.as_pixmap_mut() else {
        return;
    };

    let stale = pixmap.buffer.as_ref().map_or(true, |b| b.size() != size);

    if stale {
        let mut fresh = Pixmap::new(size.w, size.h);
        fresh.fill(ctx.palette.bg);
        pixmap.buffer = Some(fresh);
        tree.send_event(id, WidgetEvent::Redraw);
    }

    if let Some(buffer) = tree.get(id).and_then(|w| w.as_pixmap()).and_then(PixmapArea::canvas) {
        canvas.blit(buffer, Rect::from_size(size), origin);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::AppEvent;
    use crate::ops;
    use crate::render::Damage;

    #[test]
    fn first_render_allocates_and_requests_a_repaint() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let area = PixmapArea::new(&mut tree, Size::new(16, 16));
        ops::calc_size(&mut tree, &ctx, area, 16, 16, true);

        let mut screen = Pixmap::new(16, 16);
        let mut damage = Damage::default();
        ops::render(&mut tree, &ctx, area, &mut screen, Point::default(), false, &mut damage);

        assert!(tree.get(area).unwrap().as_pixmap().unwrap().canvas().is_some());
        let events: Vec<AppEvent> = tree.drain_events().collect();
        assert_eq!(
            events,
            vec![AppEvent {
                widget: area,
                event: WidgetEvent::Redraw
            }]
        );
    }

    #[test]
    fn clean_rerender_keeps_the_buffer_quiet() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let area = PixmapArea::new(&mut tree, Size::new(16, 16));
        ops::calc_size(&mut tree, &ctx, area, 16, 16, true);

        let mut screen = Pixmap::new(16, 16);
        let mut damage = Damage::default();
        ops::render(&mut tree, &ctx, area, &mut screen, Point::default(), false, &mut damage);
        tree.drain_events().count();

        tree.redraw(area);
        ops::render(&mut tree, &ctx, area, &mut screen, Point::default(), false, &mut damage);

        assert_eq!(tree.drain_events().count(), 0);
    }

    #[test]
    fn application_pixels_reach_the_screen() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let area = PixmapArea::new(&mut tree, Size::new(4, 4));
        ops::calc_size(&mut tree, &ctx, area, 4, 4, true);

        let mut screen = Pixmap::new(4, 4);
        let mut damage = Damage::default();
        ops::render(&mut tree, &ctx, area, &mut screen, Point::default(), false, &mut damage);

        let buffer = PixmapArea::writable(&mut tree, area).unwrap();
        buffer.fill(0xff0000);
        assert!(tree.get(area).unwrap().needs_redraw());

        ops::render(&mut tree, &ctx, area, &mut screen, Point::default(), false, &mut damage);
        assert_eq!(screen.count_pixels(0xff0000), 16);
    }
}
