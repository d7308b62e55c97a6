//! Focus routing and input delivery across container boundaries.

use trellis::ops::{self, SelectOp};
use trellis::widgets::{Button, Checkbox, Grid, Label, TextBox};
use trellis::{Align, AppEvent, InputEvent, Key, Mods, Point, RenderCtx, WidgetEvent, WidgetTree};

use crate::util::selected_widgets;

#[test]
fn tab_order_visits_every_focusable_leaf() {
    let mut tree = WidgetTree::new();

    // Buttons and static labels mixed over a 2x3 grid.
    let grid = Grid::new(&mut tree, 2, 3);
    let first = Button::new(&mut tree, "a");
    let second = Button::new(&mut tree, "b");
    let skipped = Label::new(&mut tree, "static");
    let third = Button::new(&mut tree, "c");
    let fourth = Button::new(&mut tree, "d");
    let tail = Label::new(&mut tree, "static");
    Grid::put(&mut tree, grid, 0, 0, first);
    Grid::put(&mut tree, grid, 1, 0, second);
    Grid::put(&mut tree, grid, 0, 1, skipped);
    Grid::put(&mut tree, grid, 1, 1, third);
    Grid::put(&mut tree, grid, 0, 2, fourth);
    Grid::put(&mut tree, grid, 1, 2, tail);

    for expected in [first, second, third, fourth] {
        assert!(ops::select(&mut tree, grid, SelectOp::Next));
        assert_eq!(selected_widgets(&tree, grid), vec![expected]);
    }

    // Past the last focusable leaf the move is unclaimed and the focus
    // stays where it was.
    assert!(!ops::select(&mut tree, grid, SelectOp::Next));
    assert_eq!(selected_widgets(&tree, grid), vec![fourth]);
}

#[test]
fn next_terminates_on_trees_without_focusable_leaves() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 2, 1);
    let left = Label::new(&mut tree, "left");
    let right = Label::new(&mut tree, "right");
    Grid::put(&mut tree, grid, 0, 0, left);
    Grid::put(&mut tree, grid, 1, 0, right);

    assert!(!ops::select(&mut tree, grid, SelectOp::Next));
    assert!(!ops::select(&mut tree, grid, SelectOp::Next));
    assert!(selected_widgets(&tree, grid).is_empty());

    // The chord is still consumed so it cannot leak as raw input.
    assert!(ops::input_event(&mut tree, &ctx, grid, &InputEvent::key_down(Key::Tab)));
    assert!(selected_widgets(&tree, grid).is_empty());
}

#[test]
fn shift_arrows_move_focus_spatially() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 2, 2);
    let mut buttons = Vec::new();
    for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let button = Button::new(&mut tree, "x");
        Grid::put(&mut tree, grid, col, row, button);
        buttons.push(button);
    }

    assert!(ops::select(&mut tree, grid, SelectOp::In));
    assert_eq!(selected_widgets(&tree, grid), vec![buttons[0]]);

    for (key, expected) in [
        (Key::Right, buttons[1]),
        (Key::Down, buttons[3]),
        (Key::Left, buttons[2]),
        (Key::Up, buttons[0]),
    ] {
        let chord = InputEvent::key_down(key).with_mods(Mods::SHIFT);
        assert!(ops::input_event(&mut tree, &ctx, grid, &chord));
        assert_eq!(selected_widgets(&tree, grid), vec![expected]);
    }

    // At the edge the move is refused and focus stays put.
    let chord = InputEvent::key_down(Key::Up).with_mods(Mods::SHIFT);
    assert!(ops::input_event(&mut tree, &ctx, grid, &chord));
    assert_eq!(selected_widgets(&tree, grid), vec![buttons[0]]);
}

#[test]
fn clicks_focus_and_activate_the_widget_under_the_cursor() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 2, 1);
    tree.set_align(grid, Align::FILL);
    let left = Button::new(&mut tree, "aa");
    let right = Button::new(&mut tree, "bb");
    Grid::put(&mut tree, grid, 0, 0, left);
    Grid::put(&mut tree, grid, 1, 0, right);
    ops::calc_size(&mut tree, &ctx, grid, 160, 40, true);
    tree.drain_events().for_each(drop);

    let target = tree.get(right).unwrap().bounds();
    let cursor = Point::new(target.x + target.w as i32 / 2, target.y + target.h as i32 / 2);

    let click = InputEvent::key_down(Key::BtnLeft).with_cursor(cursor);
    assert!(ops::input_event(&mut tree, &ctx, grid, &click));

    assert_eq!(selected_widgets(&tree, grid), vec![right]);
    let events: Vec<AppEvent> = tree.drain_events().collect();
    assert!(events.contains(&AppEvent {
        widget: right,
        event: WidgetEvent::Action,
    }));
}

#[test]
fn focus_stays_unique_across_mixed_moves() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let grid = Grid::new(&mut tree, 2, 2);
    tree.set_align(grid, Align::FILL);
    let button = Button::new(&mut tree, "go");
    let tbox = TextBox::new(&mut tree, "", 8);
    let check = Checkbox::new(&mut tree, None);
    let label = Label::new(&mut tree, "static");
    Grid::put(&mut tree, grid, 0, 0, button);
    Grid::put(&mut tree, grid, 1, 0, tbox);
    Grid::put(&mut tree, grid, 0, 1, check);
    Grid::put(&mut tree, grid, 1, 1, label);
    ops::calc_size(&mut tree, &ctx, grid, 200, 100, true);

    let center = |id| {
        let b = tree.get(id).unwrap().bounds();
        Point::new(b.x + b.w as i32 / 2, b.y + b.h as i32 / 2)
    };
    let moves = [
        InputEvent::key_down(Key::Tab),
        InputEvent::key_down(Key::Tab),
        InputEvent::key_down(Key::BtnLeft).with_cursor(center(check)),
        InputEvent::key_down(Key::Left).with_mods(Mods::SHIFT),
        InputEvent::key_down(Key::Tab).with_mods(Mods::SHIFT),
        // A click on a static label is refused and must not drop focus.
        InputEvent::key_down(Key::BtnLeft).with_cursor(center(label)),
        InputEvent::key_down(Key::Tab),
    ];

    for ev in moves {
        ops::input_event(&mut tree, &ctx, grid, &ev);
        let selected = selected_widgets(&tree, grid);
        assert_eq!(selected.len(), 1, "focus split after {ev:?}: {selected:?}");
    }
}

#[test]
fn a_full_filtered_textbox_rejects_the_sixth_key() {
    let mut tree = WidgetTree::new();
    let ctx = RenderCtx::for_tests();

    let tbox = TextBox::new(&mut tree, "", 5);
    TextBox::set_filter(&mut tree, tbox, "0123456789");

    for ch in ['1', '2', '3', '4', '5'] {
        assert!(ops::event(&mut tree, &ctx, tbox, &InputEvent::key_down(Key::Char(ch))));
    }

    let text = |tree: &WidgetTree| tree.get(tbox).unwrap().as_textbox().unwrap().text().to_owned();
    assert_eq!(text(&tree), "12345");

    let edits = tree
        .drain_events()
        .filter(|ev| ev.event == WidgetEvent::Edit)
        .count();
    assert_eq!(edits, 5);

    // The buffer is full; the sixth key is consumed but appends nothing.
    assert!(ops::event(&mut tree, &ctx, tbox, &InputEvent::key_down(Key::Char('6'))));
    assert_eq!(text(&tree), "12345");
    assert_eq!(tree.drain_events().count(), 0);

    // A character outside the filter is vetoed the same way.
    TextBox::clear(&mut tree, tbox);
    tree.drain_events().for_each(drop);
    assert!(ops::event(&mut tree, &ctx, tbox, &InputEvent::key_down(Key::Char('x'))));
    assert_eq!(text(&tree), "");
    assert_eq!(tree.drain_events().count(), 0);
}
