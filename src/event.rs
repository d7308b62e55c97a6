//! Input events flowing into the widget tree and widget events flowing back
//! out to the owning application.

use crate::geometry::{Point, Size};
use crate::widget::WidgetId;

/// A key or pointer button. Printable input arrives as [`Key::Char`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Esc,
    /// Left pointer button; the position rides in [`InputEvent::cursor`].
    BtnLeft,
}

/// Modifier keys held while an event fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mods {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Mods {
    pub const SHIFT: Mods = Mods {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Mods = Mods {
        shift: false,
        ctrl: true,
        alt: false,
    };
}

/// What happened, without the where/with-what context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEventKind {
    KeyDown(Key),
    KeyUp(Key),
    /// A widget timer expired; delivered only to the owning widget.
    Timer,
}

/// A single user-input event entering the tree.
///
/// The cursor position is carried along with every event and is re-expressed
/// relative to each widget's origin as the event descends through containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub cursor: Point,
    pub mods: Mods,
}

impl InputEvent {
    pub fn key_down(key: Key) -> Self {
        Self {
            kind: InputEventKind::KeyDown(key),
            cursor: Point::default(),
            mods: Mods::default(),
        }
    }

    pub fn key_up(key: Key) -> Self {
        Self {
            kind: InputEventKind::KeyUp(key),
            cursor: Point::default(),
            mods: Mods::default(),
        }
    }

    pub fn with_cursor(mut self, cursor: Point) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_mods(mut self, mods: Mods) -> Self {
        self.mods = mods;
        self
    }

    pub(crate) fn timer() -> Self {
        Self {
            kind: InputEventKind::Timer,
            cursor: Point::default(),
            mods: Mods::default(),
        }
    }

    /// The same event with the cursor shifted into a child's coordinates.
    pub(crate) fn relative_to(&self, origin: Point) -> Self {
        Self {
            kind: self.kind,
            cursor: Point::new(self.cursor.x - origin.x, self.cursor.y - origin.y),
            mods: self.mods,
        }
    }

    /// Pressed key for key-down events, `None` otherwise.
    pub(crate) fn pressed(&self) -> Option<Key> {
        match self.kind {
            InputEventKind::KeyDown(key) => Some(key),
            _ => None,
        }
    }
}

/// An event a display backend hands to the runtime loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendEvent {
    /// User input to route into the widget tree.
    Input(InputEvent),
    /// The output surface changed size; forces a full relayout.
    Resize(Size),
    /// The backend wants the application to quit.
    Quit,
}

/// Something a widget reports back to the owning application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidgetEvent {
    /// The widget was created; sent by the declarative loader.
    New,
    /// The widget's default action fired, e.g. a button press.
    Action,
    /// The widget's content changed, e.g. a textbox edit.
    Edit,
    /// The widget's on-screen size changed during a layout pass.
    Resize(Size),
    /// Raw input the focused widget did not consume.
    Input(InputEvent),
    /// A pixmap widget's backing store has to be repainted.
    Redraw,
}

impl WidgetEvent {
    pub(crate) fn mask_bit(&self) -> u8 {
        match self {
            WidgetEvent::New => EventMask::NEW,
            WidgetEvent::Action => EventMask::ACTION,
            WidgetEvent::Edit => EventMask::EDIT,
            WidgetEvent::Resize(_) => EventMask::RESIZE,
            WidgetEvent::Input(_) => EventMask::INPUT,
            WidgetEvent::Redraw => EventMask::REDRAW,
        }
    }
}

/// Per-widget filter deciding which [`WidgetEvent`]s reach the application.
///
/// Raw input observations are opt-in; everything else is delivered by
/// default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventMask(u8);

impl EventMask {
    pub const NEW: u8 = 1 << 0;
    pub const ACTION: u8 = 1 << 1;
    pub const EDIT: u8 = 1 << 2;
    pub const RESIZE: u8 = 1 << 3;
    pub const INPUT: u8 = 1 << 4;
    pub const REDRAW: u8 = 1 << 5;

    pub const DEFAULT: EventMask =
        EventMask(Self::NEW | Self::ACTION | Self::EDIT | Self::RESIZE | Self::REDRAW);

    pub fn contains(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    pub fn unmask(&mut self, bit: u8) {
        self.0 |= bit;
    }

    pub fn mask(&mut self, bit: u8) {
        self.0 &= !bit;
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A queued widget event together with the widget that raised it.
///
/// Widgets push these while an input event or render pass runs; the
/// application drains them afterwards, when it is free to mutate the tree
/// again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppEvent {
    pub widget: WidgetId,
    pub event: WidgetEvent,
}
