//! End-to-end layout passes over real widget trees.

use trellis::widgets::{Button, Checkbox, Grid, Label, ProgressBar, Spinner, TextBox};
use trellis::{
    ops, Align, Damage, HAlign, Pixmap, Point, Rect, RenderCtx, Size, VAlign, WidgetId, WidgetTree,
};

use crate::util::{ctx_with_padd, fill_box, subtree};

fn bounds_of(tree: &WidgetTree, ids: &[WidgetId]) -> Vec<Rect> {
    ids.iter().map(|id| tree.get(*id).unwrap().bounds()).collect()
}

#[test]
fn four_fill_cells_split_a_square_surface() {
    let mut tree = WidgetTree::new();
    let ctx = ctx_with_padd(10);

    let grid = Grid::new(&mut tree, 2, 2);
    tree.set_align(grid, Align::FILL);
    Grid::set_border(&mut tree, grid, 0);

    let mut children = Vec::new();
    for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let child = fill_box(&mut tree, 10, 10);
        Grid::put(&mut tree, grid, col, row, child);
        children.push(child);
    }

    ops::calc_size(&mut tree, &ctx, grid, 100, 100, true);

    // Minimal layout is 10+10 of content plus the single inner gap; the
    // rest splits evenly across the four unit fill ratios.
    assert_eq!(tree.get(grid).unwrap().size(), Size::new(100, 100));
    assert_eq!(
        bounds_of(&tree, &children),
        vec![
            Rect::new(0, 0, 45, 45),
            Rect::new(55, 0, 45, 45),
            Rect::new(0, 55, 45, 45),
            Rect::new(55, 55, 45, 45),
        ]
    );
}

#[test]
fn fill_ratios_partition_the_slack() {
    let mut tree = WidgetTree::new();
    let ctx = ctx_with_padd(0);

    let grid = Grid::new(&mut tree, 3, 1);
    tree.set_align(grid, Align::FILL);
    Grid::set_col_fill(&mut tree, grid, 1, 2);

    let mut children = Vec::new();
    for col in 0..3 {
        let child = fill_box(&mut tree, 10, 10);
        Grid::put(&mut tree, grid, col, 0, child);
        children.push(child);
    }

    // 80 pixels of slack over ratios 1:2:1.
    ops::calc_size(&mut tree, &ctx, grid, 110, 10, true);
    assert_eq!(
        bounds_of(&tree, &children),
        vec![
            Rect::new(0, 0, 30, 10),
            Rect::new(30, 0, 50, 10),
            Rect::new(80, 0, 30, 10),
        ]
    );

    // With 83 the integer shares leave 2 pixels, which sit after the last
    // column instead of being redistributed.
    ops::calc_size(&mut tree, &ctx, grid, 113, 10, true);
    let bounds = bounds_of(&tree, &children);
    assert_eq!(
        bounds,
        vec![
            Rect::new(0, 0, 30, 10),
            Rect::new(30, 0, 51, 10),
            Rect::new(81, 0, 30, 10),
        ]
    );
    assert_eq!(tree.get(grid).unwrap().size().w, 113);
    assert_eq!(bounds[2].right(), 111);
}

#[test]
fn layout_is_idempotent_for_a_fixed_surface() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 2, 2);
    tree.set_align(grid, Align::FILL);
    let label = Label::new(&mut tree, "Name:");
    let tbox = TextBox::new(&mut tree, "", 8);
    let check = Checkbox::new(&mut tree, Some("Beep".into()));
    let button = Button::new(&mut tree, "OK");
    Grid::put(&mut tree, grid, 0, 0, label);
    Grid::put(&mut tree, grid, 1, 0, tbox);
    Grid::put(&mut tree, grid, 0, 1, check);
    Grid::put(&mut tree, grid, 1, 1, button);

    ops::calc_size(&mut tree, &ctx, grid, 240, 120, true);
    let ids = subtree(&tree, grid);
    let first = bounds_of(&tree, &ids);

    // A forced recomputation lands on the same answer.
    ops::calc_size(&mut tree, &ctx, grid, 240, 120, true);
    assert_eq!(bounds_of(&tree, &ids), first);

    // An unforced one is a no-op while nothing requested a resize.
    ops::calc_size(&mut tree, &ctx, grid, 240, 120, false);
    assert_eq!(bounds_of(&tree, &ids), first);
}

#[test]
fn no_widget_shrinks_below_its_minimum() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 2, 2);
    let button = Button::new(&mut tree, "a button");
    let label = Label::new(&mut tree, "some label");
    let tbox = TextBox::new(&mut tree, "text", 12);
    let spinner = Spinner::new(&mut tree, 0, 100, 50).unwrap();
    Grid::put(&mut tree, grid, 0, 0, button);
    Grid::put(&mut tree, grid, 1, 0, label);
    Grid::put(&mut tree, grid, 0, 1, tbox);
    Grid::put(&mut tree, grid, 1, 1, spinner);

    // Asking for a 1x1 surface cannot squeeze anything below its minimum.
    ops::calc_size(&mut tree, &ctx, grid, 1, 1, true);

    for id in subtree(&tree, grid) {
        let widget = tree.get(id).unwrap();
        let (size, min) = (widget.size(), widget.min_size());
        assert!(size.w >= min.w, "{:?} w {} < min {}", id, size.w, min.w);
        assert!(size.h >= min.h, "{:?} h {} < min {}", id, size.h, min.h);
    }
}

#[test]
fn alignment_positions_children_within_cells() {
    let mut tree = WidgetTree::new();
    let ctx = ctx_with_padd(0);

    let grid = Grid::new(&mut tree, 1, 1);
    tree.set_align(grid, Align::FILL);
    let child = fill_box(&mut tree, 20, 10);
    Grid::put(&mut tree, grid, 0, 0, child);

    tree.set_align(child, Align::new(HAlign::Right, VAlign::Bottom));
    ops::calc_size(&mut tree, &ctx, grid, 100, 80, true);
    assert_eq!(tree.get(child).unwrap().bounds(), Rect::new(80, 70, 20, 10));

    // Re-aligning invalidates the cached layout, so an unforced pass
    // places the child again.
    tree.set_align(child, Align::new(HAlign::Left, VAlign::Top));
    ops::calc_size(&mut tree, &ctx, grid, 100, 80, false);
    assert_eq!(tree.get(child).unwrap().bounds(), Rect::new(0, 0, 20, 10));

    tree.set_align(child, Align::default());
    ops::calc_size(&mut tree, &ctx, grid, 100, 80, false);
    assert_eq!(tree.get(child).unwrap().bounds(), Rect::new(40, 35, 20, 10));
}

#[test]
fn dirty_flags_clear_after_a_render_pass() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 1, 2);
    tree.set_align(grid, Align::FILL);
    let pbar = ProgressBar::new(&mut tree, 0.0);
    tree.set_align(pbar, Align::FILL);
    let button = Button::new(&mut tree, "OK");
    Grid::put(&mut tree, grid, 0, 0, pbar);
    Grid::put(&mut tree, grid, 0, 1, button);

    ops::calc_size(&mut tree, &ctx, grid, 120, 60, true);

    let mut surface = Pixmap::new(120, 60);
    let mut damage = Damage::default();
    ops::render(&mut tree, &ctx, grid, &mut surface, Point::new(0, 0), true, &mut damage);

    assert_eq!(damage.take(), Some(Rect::new(0, 0, 120, 60)));
    for id in subtree(&tree, grid) {
        assert!(!tree.get(id).unwrap().needs_redraw());
    }

    // A clean tree paints nothing.
    ops::render(&mut tree, &ctx, grid, &mut surface, Point::new(0, 0), false, &mut damage);
    assert_eq!(damage.take(), None);

    // A single dirty leaf repaints exactly its own area.
    ProgressBar::set(&mut tree, pbar, 50.0);
    assert!(tree.get(pbar).unwrap().needs_redraw());
    assert!(!tree.get(grid).unwrap().needs_redraw());

    ops::render(&mut tree, &ctx, grid, &mut surface, Point::new(0, 0), false, &mut damage);
    assert_eq!(damage.take(), Some(tree.get(pbar).unwrap().bounds()));
    for id in subtree(&tree, grid) {
        assert!(!tree.get(id).unwrap().needs_redraw());
    }
}
