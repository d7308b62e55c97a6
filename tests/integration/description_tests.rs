//! Booting described layouts through a runtime: parse, theme, paint,
//! interact.

use indoc::indoc;
use trellis::{
    AppEvent, InputEvent, Key, Layout, MemoryBackend, Point, Rect, RenderCtx, Runtime,
    WidgetEvent, WidgetId,
};

/// A two-column form: labels on the left, a textbox and a button on the
/// right, the textbox holding the initial focus.
const DIALOG: &str = indoc! {r##"
    [theme]
    bg = "#202020"

    [layout]
    type = "grid"
    cols = 2
    rows = 2
    halign = "fill"
    valign = "fill"

    [[layout.widgets]]
    type = "label"
    text = "Name:"

    [[layout.widgets]]
    type = "textbox"
    uid = "name"
    capacity = 8
    focused = true

    [[layout.widgets]]
    type = "label"
    text = "Port:"

    [[layout.widgets]]
    type = "button"
    uid = "ok"
    label = "OK"
"##};

fn dialog_runtime() -> (Runtime<MemoryBackend>, WidgetId, WidgetId) {
    let layout: Layout = DIALOG.parse().unwrap();
    let name = layout.by_uid("name").unwrap();
    let ok = layout.by_uid("ok").unwrap();

    let mut ctx = RenderCtx::for_tests();
    ctx.palette = layout.palette().unwrap();

    let runtime = Runtime::new(MemoryBackend::new(240, 120), ctx, layout.tree, layout.root);
    (runtime, name, ok)
}

#[test]
fn a_described_dialog_boots_and_paints() {
    let (mut runtime, name, _) = dialog_runtime();

    // The construction pass flips the whole surface, painted in the
    // theme's background.
    assert_eq!(runtime.backend().flips(), &[Rect::new(0, 0, 240, 120)]);
    assert_eq!(runtime.backend().surface().pixel(0, 0), 0x20_20_20);

    let news = runtime
        .drain_events()
        .filter(|ev| ev.event == WidgetEvent::New)
        .count();
    assert_eq!(news, 5);

    assert!(runtime.tree().get(name).unwrap().is_selected());
}

#[test]
fn typed_keys_land_in_the_focused_textbox() {
    let (mut runtime, name, _) = dialog_runtime();
    runtime.drain_events().for_each(drop);

    runtime.push_event(InputEvent::key_down(Key::Char('4')));
    runtime.push_event(InputEvent::key_down(Key::Char('2')));
    runtime.step();
    runtime.step();

    let tbox = runtime.tree().get(name).unwrap().as_textbox().unwrap();
    assert_eq!(tbox.text(), "42");

    let edits: Vec<AppEvent> = runtime
        .drain_events()
        .filter(|ev| ev.event == WidgetEvent::Edit)
        .collect();
    assert_eq!(edits.len(), 2);
    assert!(edits.iter().all(|ev| ev.widget == name));
}

#[test]
fn clicking_the_described_button_fires_action() {
    let (mut runtime, _, ok) = dialog_runtime();
    runtime.drain_events().for_each(drop);

    // The root grid fills the surface, so the button's bounds double as
    // surface coordinates.
    let bounds = runtime.tree().get(ok).unwrap().bounds();
    let center = Point::new(bounds.x + bounds.w as i32 / 2, bounds.y + bounds.h as i32 / 2);
    runtime.push_event(InputEvent::key_down(Key::BtnLeft).with_cursor(center));
    runtime.step();

    assert!(runtime.tree().get(ok).unwrap().is_selected());

    let actions: Vec<AppEvent> = runtime.drain_events().collect();
    assert!(actions.contains(&AppEvent {
        widget: ok,
        event: WidgetEvent::Action,
    }));
}
