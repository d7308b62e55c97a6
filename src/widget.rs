//! The widget tree arena.
//!
//! Widgets live in a [`WidgetTree`] slab and reference each other through
//! [`WidgetId`] handles. Ids are generational: removing a widget bumps the
//! slot's generation, so a stale handle fails lookup instead of aliasing
//! whatever reuses the slot. Stale lookups in tree operations are reported
//! as bugs and degrade to no-ops; library code never panics on them.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::align::Align;
use crate::event::{AppEvent, EventMask, WidgetEvent};
use crate::geometry::{Point, Rect, Size};
use crate::timer::TimerRequest;
use crate::utils::error::TrellisError;
use crate::widgets::button::Button;
use crate::widgets::checkbox::Checkbox;
use crate::widgets::choice::Choice;
use crate::widgets::grid::Grid;
use crate::widgets::label::Label;
use crate::widgets::overlay::Overlay;
use crate::widgets::pbar::ProgressBar;
use crate::widgets::pixmap::PixmapArea;
use crate::widgets::scroll::ScrollArea;
use crate::widgets::slider::Slider;
use crate::widgets::spinner::Spinner;
use crate::widgets::switch::Switch;
use crate::widgets::table::Table;
use crate::widgets::tabs::Tabs;
use crate::widgets::textbox::TextBox;

/// Handle to a widget stored in a [`WidgetTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({}v{})", self.index, self.generation)
    }
}

/// Widget type tag, also used as the `type` string in layout descriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Grid,
    Tabs,
    Switch,
    Overlay,
    ScrollArea,
    Button,
    Checkbox,
    Label,
    ProgressBar,
    Spinner,
    Slider,
    TextBox,
    Choice,
    Table,
    Pixmap,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Grid => "grid",
            WidgetKind::Tabs => "tabs",
            WidgetKind::Switch => "switch",
            WidgetKind::Overlay => "overlay",
            WidgetKind::ScrollArea => "scroll_area",
            WidgetKind::Button => "button",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Label => "label",
            WidgetKind::ProgressBar => "progress_bar",
            WidgetKind::Spinner => "spinner",
            WidgetKind::Slider => "slider",
            WidgetKind::TextBox => "textbox",
            WidgetKind::Choice => "choice",
            WidgetKind::Table => "table",
            WidgetKind::Pixmap => "pixmap",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "grid" => WidgetKind::Grid,
            "tabs" => WidgetKind::Tabs,
            "switch" => WidgetKind::Switch,
            "overlay" => WidgetKind::Overlay,
            "scroll_area" => WidgetKind::ScrollArea,
            "button" => WidgetKind::Button,
            "checkbox" => WidgetKind::Checkbox,
            "label" => WidgetKind::Label,
            "progress_bar" => WidgetKind::ProgressBar,
            "spinner" => WidgetKind::Spinner,
            "slider" => WidgetKind::Slider,
            "textbox" => WidgetKind::TextBox,
            "choice" => WidgetKind::Choice,
            "table" => WidgetKind::Table,
            "pixmap" => WidgetKind::Pixmap,
            _ => {
                return Err(TrellisError::InvalidLayout(format!(
                    "unknown widget type '{s}'"
                )));
            }
        };

        Ok(kind)
    }
}

/// Type-specific widget state. The set of widget types is closed; every
/// operation dispatches over this enum in exactly one place.
pub enum WidgetPayload {
    Grid(Grid),
    Tabs(Tabs),
    Switch(Switch),
    Overlay(Overlay),
    ScrollArea(ScrollArea),
    Button(Button),
    Checkbox(Checkbox),
    Label(Label),
    ProgressBar(ProgressBar),
    Spinner(Spinner),
    Slider(Slider),
    TextBox(TextBox),
    Choice(Choice),
    Table(Table),
    Pixmap(PixmapArea),
}

impl WidgetPayload {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetPayload::Grid(_) => WidgetKind::Grid,
            WidgetPayload::Tabs(_) => WidgetKind::Tabs,
            WidgetPayload::Switch(_) => WidgetKind::Switch,
            WidgetPayload::Overlay(_) => WidgetKind::Overlay,
            WidgetPayload::ScrollArea(_) => WidgetKind::ScrollArea,
            WidgetPayload::Button(_) => WidgetKind::Button,
            WidgetPayload::Checkbox(_) => WidgetKind::Checkbox,
            WidgetPayload::Label(_) => WidgetKind::Label,
            WidgetPayload::ProgressBar(_) => WidgetKind::ProgressBar,
            WidgetPayload::Spinner(_) => WidgetKind::Spinner,
            WidgetPayload::Slider(_) => WidgetKind::Slider,
            WidgetPayload::TextBox(_) => WidgetKind::TextBox,
            WidgetPayload::Choice(_) => WidgetKind::Choice,
            WidgetPayload::Table(_) => WidgetKind::Table,
            WidgetPayload::Pixmap(_) => WidgetKind::Pixmap,
        }
    }

    /// Ids of all children currently attached to this widget.
    pub fn children(&self) -> Vec<WidgetId> {
        match self {
            WidgetPayload::Grid(grid) => grid.cells.iter().flatten().copied().collect(),
            WidgetPayload::Tabs(tabs) => tabs.children.iter().flatten().copied().collect(),
            WidgetPayload::Switch(switch) => switch.layouts.iter().flatten().copied().collect(),
            WidgetPayload::Overlay(overlay) => {
                overlay.layers.iter().filter_map(|l| l.widget).collect()
            }
            WidgetPayload::ScrollArea(scroll) => scroll.child.into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

macro_rules! payload_accessor {
    ($as_ref:ident, $as_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $as_ref(&self) -> Option<&$ty> {
            match &self.payload {
                WidgetPayload::$variant(inner) => Some(inner),
                _ => {
                    error!(
                        "Invalid widget type {}, expected {}",
                        self.kind(),
                        WidgetKind::$variant
                    );
                    None
                }
            }
        }

        pub fn $as_mut(&mut self) -> Option<&mut $ty> {
            let kind = self.kind();
            match &mut self.payload {
                WidgetPayload::$variant(inner) => Some(inner),
                _ => {
                    error!(
                        "Invalid widget type {}, expected {}",
                        kind,
                        WidgetKind::$variant
                    );
                    None
                }
            }
        }
    };
}

/// A single widget node: payload plus the geometry, alignment and dirty
/// state every type shares.
pub struct Widget {
    pub payload: WidgetPayload,
    pub align: Align,
    pub event_mask: EventMask,
    pub(crate) parent: Option<WidgetId>,
    /// Position relative to the parent's origin, alignment included.
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) min_w: u32,
    pub(crate) min_h: u32,
    /// Minimal size cache is valid and the subtree needs no redistribution.
    pub(crate) no_resize: bool,
    /// Own pixels are stale.
    pub(crate) redraw: bool,
    /// Some descendant is stale.
    pub(crate) redraw_child: bool,
    /// One-shot: force-render the whole subtree on the next pass.
    pub(crate) redraw_subtree: bool,
    pub(crate) selected: bool,
}

impl Widget {
    pub(crate) fn new(payload: WidgetPayload) -> Self {
        Self {
            payload,
            align: Align::default(),
            event_mask: EventMask::default(),
            parent: None,
            x: 0,
            y: 0,
            w: 0,
            h: 0,
            min_w: 0,
            min_h: 0,
            no_resize: false,
            redraw: true,
            redraw_child: false,
            redraw_subtree: false,
            selected: false,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.payload.kind()
    }

    /// Position relative to the parent's origin.
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_w, self.min_h)
    }

    /// Occupied area in the parent's coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    payload_accessor!(as_grid, as_grid_mut, Grid, Grid);
    payload_accessor!(as_tabs, as_tabs_mut, Tabs, Tabs);
    payload_accessor!(as_switch, as_switch_mut, Switch, Switch);
    payload_accessor!(as_overlay, as_overlay_mut, Overlay, Overlay);
    payload_accessor!(as_scroll, as_scroll_mut, ScrollArea, ScrollArea);
    payload_accessor!(as_button, as_button_mut, Button, Button);
    payload_accessor!(as_checkbox, as_checkbox_mut, Checkbox, Checkbox);
    payload_accessor!(as_label, as_label_mut, Label, Label);
    payload_accessor!(as_pbar, as_pbar_mut, ProgressBar, ProgressBar);
    payload_accessor!(as_spinner, as_spinner_mut, Spinner, Spinner);
    payload_accessor!(as_slider, as_slider_mut, Slider, Slider);
    payload_accessor!(as_textbox, as_textbox_mut, TextBox, TextBox);
    payload_accessor!(as_choice, as_choice_mut, Choice, Choice);
    payload_accessor!(as_table, as_table_mut, Table, Table);
    payload_accessor!(as_pixmap, as_pixmap_mut, Pixmap, PixmapArea);
}

struct Slot {
    generation: u32,
    widget: Option<Widget>,
}

/// Slab arena owning every widget, plus the queues widgets push to while an
/// event or render pass runs.
#[derive(Default)]
pub struct WidgetTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    events: VecDeque<AppEvent>,
    timers: Vec<TimerRequest>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, widget: Widget) -> WidgetId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.widget = Some(widget);
                WidgetId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    widget: Some(widget),
                });
                WidgetId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.widget.as_ref()
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.widget.as_mut()
    }

    /// Removes a widget and, recursively, everything attached below it.
    pub fn remove(&mut self, id: WidgetId) {
        let children = match self.get(id) {
            Some(widget) => widget.payload.children(),
            None => {
                warn!("Removing stale widget {id:?}");
                return;
            }
        };

        for child in children {
            self.remove(child);
        }

        let slot = &mut self.slots[id.index as usize];
        slot.widget = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    /// Attaches a child to a container. Fails when the child is already
    /// attached elsewhere; containers must not share children.
    pub(crate) fn set_parent(&mut self, child: WidgetId, parent: WidgetId) -> bool {
        let Some(widget) = self.get_mut(child) else {
            error!("Stale widget {child:?}");
            return false;
        };

        if let Some(current) = widget.parent {
            error!("Widget {child:?} already has a parent {current:?}");
            return false;
        }

        widget.parent = Some(parent);
        true
    }

    pub(crate) fn clear_parent(&mut self, child: WidgetId) {
        if let Some(widget) = self.get_mut(child) {
            widget.parent = None;
        }
    }

    /// Marks a widget's own pixels stale and walks ancestors to flag the
    /// path for descent. Both walks stop early at already-marked nodes.
    pub fn redraw(&mut self, id: WidgetId) {
        let Some(widget) = self.get_mut(id) else {
            error!("Stale widget {id:?}");
            return;
        };

        if widget.redraw {
            return;
        }

        widget.redraw = true;
        let parent = widget.parent;
        self.redraw_child_up(parent);
    }

    /// Schedules a forced render of the whole subtree on the next pass.
    pub fn redraw_subtree(&mut self, id: WidgetId) {
        let Some(widget) = self.get_mut(id) else {
            error!("Stale widget {id:?}");
            return;
        };

        if widget.redraw_subtree {
            return;
        }

        widget.redraw_subtree = true;
        let parent = widget.parent;
        self.redraw_child_up(parent);
    }

    fn redraw_child_up(&mut self, from: Option<WidgetId>) {
        let mut cursor = from;

        while let Some(id) = cursor {
            let Some(widget) = self.get_mut(id) else {
                return;
            };

            if widget.redraw_child {
                return;
            }

            widget.redraw_child = true;
            cursor = widget.parent;
        }
    }

    /// Invalidates the minimal-size cache from a widget up to the root,
    /// requesting a relayout. Stops early once a cleared node is found.
    pub fn resize(&mut self, id: WidgetId) {
        let mut cursor = Some(id);

        while let Some(id) = cursor {
            let Some(widget) = self.get_mut(id) else {
                error!("Stale widget {id:?}");
                return;
            };

            if !widget.no_resize {
                return;
            }

            widget.no_resize = false;
            cursor = widget.parent;
        }
    }

    /// Queues an event for the application, subject to the widget's event
    /// mask.
    pub fn send_event(&mut self, id: WidgetId, event: WidgetEvent) {
        let Some(widget) = self.get(id) else {
            error!("Stale widget {id:?}");
            return;
        };

        if !widget.event_mask.contains(event.mask_bit()) {
            return;
        }

        self.events.push_back(AppEvent { widget: id, event });
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = AppEvent> + '_ {
        self.events.drain(..)
    }

    /// Arms a one-shot timer for a widget. A pending request for the same
    /// widget is replaced.
    pub fn schedule_timer(&mut self, id: WidgetId, after_ms: u64) {
        self.timers.retain(|req| req.widget != id);
        self.timers.push(TimerRequest {
            widget: id,
            after_ms,
        });
    }

    pub(crate) fn drain_timer_requests(&mut self) -> impl Iterator<Item = TimerRequest> + '_ {
        self.timers.drain(..)
    }

    pub fn set_align(&mut self, id: WidgetId, align: Align) {
        let Some(widget) = self.get_mut(id) else {
            error!("Stale widget {id:?}");
            return;
        };

        if widget.align == align {
            return;
        }

        widget.align = align;
        self.resize(id);
    }

    /// Opts a widget in or out of raw-input observations.
    pub fn set_input_events(&mut self, id: WidgetId, on: bool) {
        let Some(widget) = self.get_mut(id) else {
            error!("Stale widget {id:?}");
            return;
        };

        if on {
            widget.event_mask.unmask(EventMask::INPUT);
        } else {
            widget.event_mask.mask(EventMask::INPUT);
        }
    }
}
