//! A stack of layers sharing one area.
//!
//! Every layer is laid out into the full widget area, so a layer whose child
//! is not set to fill floats at its minimal size over whatever is below. The
//! usual shape is a filling base layer with dialog layers above it that are
//! hidden until needed.
//!
//! Rendering walks the stack bottom up. Layers overlap, so once any level
//! repaints, every level above it is repainted too.

use crate::canvas::Canvas;
use crate::event::InputEvent;
use crate::geometry::{Point, Rect};
use crate::ops::{self, SelectOp};
use crate::render::{Damage, RenderCtx};
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Layer {
    pub(crate) widget: Option<WidgetId>,
    pub(crate) hidden: bool,
}

pub struct Overlay {
    pub(crate) layers: Vec<Layer>,
    /// Index of the layer keyboard input is routed to.
    pub(crate) selected: usize,
}

impl Overlay {
    pub fn new(tree: &mut WidgetTree, layers: usize) -> WidgetId {
        let overlay = Overlay {
            layers: (0..layers)
                .map(|_| Layer {
                    widget: None,
                    hidden: false,
                })
                .collect(),
            selected: 0,
        };

        tree.insert(Widget::new(WidgetPayload::Overlay(overlay)))
    }

    pub fn is_hidden(&self, layer: usize) -> bool {
        self.layers.get(layer).is_some_and(|l| l.hidden)
    }

    pub(crate) fn selected_child(&self) -> Option<WidgetId> {
        let layer = self.layers.get(self.selected)?;
        if layer.hidden {
            return None;
        }
        layer.widget
    }

    /// Puts a child into a layer, displacing and returning the previous
    /// occupant (detached, not removed).
    pub fn put(
        tree: &mut WidgetTree, id: WidgetId, layer: usize, child: WidgetId,
    ) -> Option<WidgetId> {
        let valid = match tree.get(id).and_then(|w| w.as_overlay()) {
            Some(o) => layer < o.layers.len(),
            None => false,
        };

        if !valid {
            error!("Invalid layer index {layer} for {id:?}");
            return None;
        }

        if !tree.set_parent(child, id) {
            return None;
        }

        let displaced = tree
            .get_mut(id)
            .and_then(|w| w.as_overlay_mut())
            .and_then(|o| o.layers[layer].widget.replace(child));

        if let Some(old) = displaced {
            tree.clear_parent(old);
        }

        tree.resize(id);
        displaced
    }

    pub fn show(tree: &mut WidgetTree, id: WidgetId, layer: usize) {
        set_hidden(tree, id, layer, false);
    }

    pub fn hide(tree: &mut WidgetTree, id: WidgetId, layer: usize) {
        set_hidden(tree, id, layer, true);
    }

    /// Routes keyboard input to a layer. The previously selected layer's
    /// widget loses focus; the new one is not focused until the user moves
    /// into it.
    pub fn select_layer(tree: &mut WidgetTree, id: WidgetId, layer: usize) {
        let Some(overlay) = tree.get(id).and_then(|w| w.as_overlay()) else {
            return;
        };

        if layer >= overlay.layers.len() {
            warn!("Invalid layer index {layer} for {id:?}");
            return;
        }

        if overlay.selected == layer {
            return;
        }

        let old = overlay.selected_child();
        if let Some(old) = old {
            ops::select(tree, old, SelectOp::Out);
        }

        if let Some(overlay) = tree.get_mut(id).and_then(|w| w.as_overlay_mut()) {
            overlay.selected = layer;
        }
    }
}

fn set_hidden(tree: &mut WidgetTree, id: WidgetId, layer: usize, hidden: bool) {
    let Some(overlay) = tree.get(id).and_then(|w| w.as_overlay()) else {
        return;
    };

    let Some(l) = overlay.layers.get(layer) else {
        warn!("Invalid layer index {layer} for {id:?}");
        return;
    };

    if l.hidden == hidden {
        return;
    }

    // Hiding the input target drops its focus with it.
    let drop_focus = hidden && layer == overlay.selected;
    let child = l.widget;

    if let Some(overlay) = tree.get_mut(id).and_then(|w| w.as_overlay_mut()) {
        overlay.layers[layer].hidden = hidden;
    }
    tree.redraw(id);

    if drop_focus {
        if let Some(child) = child {
            ops::select(tree, child, SelectOp::Out);
        }
    }
}

pub(crate) fn min_w(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(overlay) = tree.get(id).and_then(|w| w.as_overlay()) else {
        return 0;
    };

    // Hidden layers count too; showing one must not trigger a relayout.
    let children: Vec<WidgetId> = overlay.layers.iter().filter_map(|l| l.widget).collect();

    let mut widest = 0;
    for child in children {
        widest = widest.max(ops::min_w(tree, ctx, child));
    }

    widest
}

pub(crate) fn min_h(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(overlay) = tree.get(id).and_then(|w| w.as_overlay()) else {
        return 0;
    };
    let children: Vec<WidgetId> = overlay.layers.iter().filter_map(|l| l.widget).collect();

    let mut tallest = 0;
    for child in children {
        tallest = tallest.max(ops::min_h(tree, ctx, child));
    }

    tallest
}

pub(crate) fn distribute(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let (w, h) = (widget.w, widget.h);
    let Some(overlay) = widget.as_overlay() else {
        return;
    };
    let children: Vec<WidgetId> = overlay.layers.iter().filter_map(|l| l.widget).collect();

    let cell = Rect::new(0, 0, w, h);
    for child in children {
        ops::distribute_to(tree, ctx, child, cell, true);
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
    let Some(overlay) = widget.as_overlay() else {
        return;
    };

    let layers: Vec<WidgetId> = overlay
        .layers
        .iter()
        .filter(|l| !l.hidden)
        .filter_map(|l| l.widget)
        .collect();

    if own {
        canvas.fill_rect(Rect::new(origin.x, origin.y, w, h), ctx.palette.bg);
    }

    let mut repaint = own;
    for child in layers {
        let Some(widget) = tree.get(child) else {
            continue;
        };
        repaint = repaint || widget.redraw || widget.redraw_child || widget.redraw_subtree;

        let pos = widget.pos();
        let child_origin = Point::new(origin.x + pos.x, origin.y + pos.y);
        ops::render(tree, ctx, child, canvas, child_origin, repaint, damage);
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(child) = tree
        .get(id)
        .and_then(|w| w.as_overlay())
        .and_then(Overlay::selected_child)
    else {
        return false;
    };
    let Some(pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    ops::event(tree, ctx, child, &ev.relative_to(pos))
}

pub(crate) fn select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(child) = tree
        .get(id)
        .and_then(|w| w.as_overlay())
        .and_then(Overlay::selected_child)
    else {
        return false;
    };

    ops::select(tree, child, op)
}

pub(crate) fn select_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(overlay) = tree.get(id).and_then(|w| w.as_overlay()) else {
        return false;
    };
    let selected = overlay.selected;

    let layers: Vec<(usize, WidgetId)> = overlay
        .layers
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.hidden)
        .filter_map(|(i, l)| l.widget.map(|w| (i, w)))
        .collect();

    // The topmost visible layer under the pointer occludes everything
    // below it, whether or not its widget takes the focus.
    for (layer, child) in layers.into_iter().rev() {
        let Some(b) = tree.get(child).map(Widget::bounds) else {
            continue;
        };

        if pos.x < b.x || pos.x > b.right() || pos.y < b.y || pos.y > b.bottom() {
            continue;
        }

        if !ops::select_xy(tree, ctx, child, pos.offset(Point::new(-b.x, -b.y))) {
            return false;
        }

        if layer != selected {
            let old = tree
                .get(id)
                .and_then(|w| w.as_overlay())
                .and_then(Overlay::selected_child);
            if let Some(old) = old {
                ops::select(tree, old, SelectOp::Out);
            }

            if let Some(overlay) = tree.get_mut(id).and_then(|w| w.as_overlay_mut()) {
                overlay.selected = layer;
            }
        }

        return true;
    }

    false
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::align::Align;
    use crate::canvas::Pixmap;
    use crate::event::Key;
    use crate::geometry::Size;
    use crate::widgets::button::Button;
    use crate::widgets::pixmap::PixmapArea;

    fn layered_pixmaps(tree: &mut WidgetTree) -> (WidgetId, WidgetId, WidgetId) {
        let overlay = Overlay::new(tree, 2);
        let base = PixmapArea::new(tree, Size::new(40, 30));
        let top = PixmapArea::new(tree, Size::new(40, 30));
        tree.set_align(base, Align::FILL);
        tree.set_align(top, Align::FILL);
        Overlay::put(tree, overlay, 0, base);
        Overlay::put(tree, overlay, 1, top);
        (overlay, base, top)
    }

    #[test]
    fn min_size_covers_hidden_layers_too() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let overlay = Overlay::new(&mut tree, 2);
        let base = PixmapArea::new(&mut tree, Size::new(50, 20));
        let dialog = PixmapArea::new(&mut tree, Size::new(30, 40));
        Overlay::put(&mut tree, overlay, 0, base);
        Overlay::put(&mut tree, overlay, 1, dialog);
        Overlay::hide(&mut tree, overlay, 1);

        assert_eq!(ops::min_w(&mut tree, &ctx, overlay), 50);
        assert_eq!(ops::min_h(&mut tree, &ctx, overlay), 40);
    }

    #[test]
    fn layers_stack_bottom_up_and_hiding_uncovers() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (overlay, base, top) = layered_pixmaps(&mut tree);
        ops::calc_size(&mut tree, &ctx, overlay, 40, 30, true);

        let mut screen = Pixmap::new(40, 30);
        let mut damage = Damage::default();
        ops::render(&mut tree, &ctx, overlay, &mut screen, Point::default(), false, &mut damage);

        PixmapArea::writable(&mut tree, base).unwrap().fill(0xff0000);
        PixmapArea::writable(&mut tree, top).unwrap().fill(0x0000ff);
        ops::render(&mut tree, &ctx, overlay, &mut screen, Point::default(), false, &mut damage);
        assert_eq!(screen.count_pixels(0x0000ff), 40 * 30);

        Overlay::hide(&mut tree, overlay, 1);
        ops::render(&mut tree, &ctx, overlay, &mut screen, Point::default(), false, &mut damage);
        assert_eq!(screen.count_pixels(0xff0000), 40 * 30);
    }

    #[test]
    fn a_dirty_lower_layer_repaints_the_layers_above() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (overlay, base, top) = layered_pixmaps(&mut tree);
        ops::calc_size(&mut tree, &ctx, overlay, 40, 30, true);

        let mut screen = Pixmap::new(40, 30);
        let mut damage = Damage::default();
        ops::render(&mut tree, &ctx, overlay, &mut screen, Point::default(), false, &mut damage);
        PixmapArea::writable(&mut tree, top).unwrap().fill(0x0000ff);
        ops::render(&mut tree, &ctx, overlay, &mut screen, Point::default(), false, &mut damage);

        // Only the base goes dirty, yet the top layer must stay on top.
        PixmapArea::writable(&mut tree, base).unwrap().fill(0xff0000);
        ops::render(&mut tree, &ctx, overlay, &mut screen, Point::default(), false, &mut damage);
        assert_eq!(screen.count_pixels(0x0000ff), 40 * 30);
    }

    #[test]
    fn clicks_land_on_the_topmost_visible_layer() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let overlay = Overlay::new(&mut tree, 2);
        let lower = Button::new(&mut tree, "lower");
        let upper = Button::new(&mut tree, "upper");
        tree.set_align(lower, Align::FILL);
        tree.set_align(upper, Align::FILL);
        Overlay::put(&mut tree, overlay, 0, lower);
        Overlay::put(&mut tree, overlay, 1, upper);
        ops::calc_size(&mut tree, &ctx, overlay, 100, 40, true);

        assert!(ops::select_xy(&mut tree, &ctx, overlay, Point::new(5, 5)));
        assert!(tree.get(upper).unwrap().is_selected());
        assert_eq!(tree.get(overlay).unwrap().as_overlay().unwrap().selected, 1);

        Overlay::hide(&mut tree, overlay, 1);
        assert!(ops::select_xy(&mut tree, &ctx, overlay, Point::new(5, 5)));
        assert!(tree.get(lower).unwrap().is_selected());
        assert!(!tree.get(upper).unwrap().is_selected());
        assert_eq!(tree.get(overlay).unwrap().as_overlay().unwrap().selected, 0);
    }

    #[test]
    fn keyboard_input_follows_the_selected_layer() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let overlay = Overlay::new(&mut tree, 2);
        let button = Button::new(&mut tree, "ok");
        Overlay::put(&mut tree, overlay, 0, button);

        assert!(ops::select(&mut tree, overlay, SelectOp::In));
        assert!(ops::event(&mut tree, &ctx, overlay, &InputEvent::key_down(Key::Enter)));

        // A hidden layer receives nothing.
        Overlay::hide(&mut tree, overlay, 0);
        assert!(!ops::event(&mut tree, &ctx, overlay, &InputEvent::key_down(Key::Enter)));

        Overlay::select_layer(&mut tree, overlay, 7);
        assert_eq!(tree.get(overlay).unwrap().as_overlay().unwrap().selected, 0);
    }
}
