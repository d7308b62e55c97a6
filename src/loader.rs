//! Declarative layout descriptions.
//!
//! A description is a TOML document: a `layout` table holding the widget
//! tree and an optional `theme` table overriding the palette. Every widget
//! table names its `type` plus type-specific attributes; the common
//! attributes `uid`, `align`/`halign`/`valign` and `focused` work on all
//! types. Container children are nested `widgets`/`layouts`/`layers`
//! arrays in slot order.
//!
//! Elements that parse but make no sense (unknown type, button without a
//! label, spinner with a backwards range) are skipped with a warning and
//! leave their slot empty. Syntax and type errors fail the whole document.

use std::path::Path;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::align::{Align, HAlign, VAlign};
use crate::event::WidgetEvent;
use crate::geometry::Size;
use crate::render::{Palette, ThemeConfig};
use crate::utils::error::{Result, TrellisError};
use crate::widget::{WidgetId, WidgetTree};
use crate::widgets::{
    Button, Checkbox, Choice, Grid, Label, Overlay, PixmapArea, ProgressBar, ScrollArea, Slider,
    Spinner, Switch, Tabs, TextBox,
};

/// A widget tree built from a description, plus the uid lookup table and
/// the optional theme that came with it.
///
/// The tree and root are public so they can be handed straight to a
/// runtime; resolve any uids the application needs before moving them out.
pub struct Layout {
    pub tree: WidgetTree,
    pub root: WidgetId,
    uids: HashMap<String, WidgetId>,
    palette: Option<Palette>,
}

impl Layout {
    /// Reads and builds a description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        std::fs::read_to_string(path)?.parse()
    }

    /// Looks up a widget by the `uid` the description assigned to it.
    pub fn by_uid(&self, name: &str) -> Option<WidgetId> {
        self.uids.get(name).copied()
    }

    /// The palette from the `[theme]` table, if the description had one.
    pub fn palette(&self) -> Option<Palette> {
        self.palette
    }
}

impl FromStr for Layout {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self> {
        let raw: RawDoc = toml_edit::de::from_str(s)?;
        let palette = raw.theme.map(|theme| theme.to_palette()).transpose()?;

        let mut tree = WidgetTree::new();
        let mut builder = Builder::default();
        let built = builder
            .build(&mut tree, raw.layout)
            .ok_or_else(|| TrellisError::InvalidLayout("no usable root widget".into()))?;

        // A focus claim only sticks if it survived to the root; one from an
        // inactive tab or a hidden layer was dropped on the way up.
        if built.focused {
            if let Some(focus) = builder.focus {
                if let Some(widget) = tree.get_mut(focus) {
                    widget.selected = true;
                }
            }
        }

        Ok(Layout {
            tree,
            root: built.id,
            uids: builder.uids,
            palette,
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDoc {
    layout: RawWidget,
    theme: Option<ThemeConfig>,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawAlign {
    Center,
    Fill,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawHAlign {
    Center,
    Left,
    Right,
    Fill,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawVAlign {
    Center,
    Top,
    Bottom,
    Fill,
}

/// Attributes every widget table accepts.
#[derive(Deserialize)]
struct RawCommon {
    uid: Option<String>,
    align: Option<RawAlign>,
    halign: Option<RawHAlign>,
    valign: Option<RawVAlign>,
    #[serde(default)]
    focused: bool,
}

impl RawCommon {
    /// `align` sets both axes, `halign`/`valign` override per axis.
    fn align(&self) -> Align {
        let mut align = match self.align {
            Some(RawAlign::Center) => Align::CENTER,
            Some(RawAlign::Fill) => Align::FILL,
            None => Align::default(),
        };

        if let Some(h) = self.halign {
            align.h = match h {
                RawHAlign::Center => HAlign::Center,
                RawHAlign::Left => HAlign::Left,
                RawHAlign::Right => HAlign::Right,
                RawHAlign::Fill => HAlign::Fill,
            };
        }

        if let Some(v) = self.valign {
            align.v = match v {
                RawVAlign::Center => VAlign::Center,
                RawVAlign::Top => VAlign::Top,
                RawVAlign::Bottom => VAlign::Bottom,
                RawVAlign::Fill => VAlign::Fill,
            };
        }

        align
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawWidget {
    Grid(RawGrid),
    Tabs(RawTabs),
    Switch(RawSwitch),
    Overlay(RawOverlay),
    ScrollArea(RawScrollArea),
    Button(RawButton),
    Checkbox(RawCheckbox),
    Label(RawLabel),
    ProgressBar(RawProgressBar),
    Spinner(RawSpinner),
    Slider(RawSlider),
    Choice(RawChoice),
    #[serde(rename = "textbox")]
    TextBox(RawTextBox),
    Pixmap(RawPixmap),
    Table(RawTable),
    /// Unrecognized `type` values land here and are skipped.
    #[serde(other)]
    Unknown,
}

fn one() -> usize {
    1
}

#[derive(Deserialize)]
struct RawGrid {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default = "one")]
    cols: usize,
    #[serde(default = "one")]
    rows: usize,
    /// Every gap and border, in padding-unit ratios.
    pad: Option<u32>,
    /// The four outer gaps only.
    border: Option<u32>,
    cpad: Option<Vec<u32>>,
    rpad: Option<Vec<u32>>,
    cpadf: Option<Vec<u32>>,
    rpadf: Option<Vec<u32>>,
    cfill: Option<Vec<u32>>,
    rfill: Option<Vec<u32>>,
    #[serde(default)]
    uniform: bool,
    #[serde(default)]
    frame: bool,
    /// Row-major cell contents, at most `cols * rows` entries.
    #[serde(default)]
    widgets: Vec<RawWidget>,
}

#[derive(Deserialize)]
struct RawTabs {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    active: usize,
    /// One child per label, in label order.
    #[serde(default)]
    widgets: Vec<RawWidget>,
}

#[derive(Deserialize)]
struct RawSwitch {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default)]
    active: usize,
    #[serde(default)]
    layouts: Vec<RawWidget>,
}

#[derive(Deserialize)]
struct RawOverlay {
    #[serde(flatten)]
    common: RawCommon,
    /// Bottom layer first.
    #[serde(default)]
    layers: Vec<RawWidget>,
    /// Per-layer visibility, missing entries default to shown.
    #[serde(default)]
    hidden: Vec<bool>,
}

#[derive(Deserialize)]
struct RawScrollArea {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default)]
    min_w: u32,
    #[serde(default)]
    min_h: u32,
    widget: Option<Box<RawWidget>>,
}

#[derive(Deserialize)]
struct RawButton {
    #[serde(flatten)]
    common: RawCommon,
    label: Option<String>,
}

#[derive(Deserialize)]
struct RawCheckbox {
    #[serde(flatten)]
    common: RawCommon,
    label: Option<String>,
    #[serde(default)]
    set: bool,
}

#[derive(Deserialize)]
struct RawLabel {
    #[serde(flatten)]
    common: RawCommon,
    text: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    frame: bool,
    #[serde(default)]
    ralign: bool,
}

#[derive(Deserialize)]
struct RawProgressBar {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default)]
    val: f32,
}

#[derive(Deserialize)]
struct RawSpinner {
    #[serde(flatten)]
    common: RawCommon,
    min: Option<i64>,
    max: Option<i64>,
    /// Defaults to `min`.
    val: Option<i64>,
}

#[derive(Deserialize)]
struct RawSlider {
    #[serde(flatten)]
    common: RawCommon,
    min: Option<i64>,
    max: Option<i64>,
    val: Option<i64>,
}

#[derive(Deserialize)]
struct RawChoice {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    selected: usize,
}

#[derive(Deserialize)]
struct RawTextBox {
    #[serde(flatten)]
    common: RawCommon,
    #[serde(default)]
    text: String,
    /// Buffer limit in graphemes; zero sizes the box to the initial text.
    #[serde(default)]
    capacity: usize,
    filter: Option<String>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Deserialize)]
struct RawPixmap {
    #[serde(flatten)]
    common: RawCommon,
    min_w: Option<u32>,
    min_h: Option<u32>,
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(flatten)]
    common: RawCommon,
}

/// Cross-widget state of one build: the uid table and the focus claim.
#[derive(Default)]
struct Builder {
    uids: HashMap<String, WidgetId>,
    focus: Option<WidgetId>,
}

/// A successfully built subtree. `focused` reports a live focus claim
/// below, so the parent can aim its selection memory at this child.
struct Built {
    id: WidgetId,
    focused: bool,
}

impl Builder {
    fn build(&mut self, tree: &mut WidgetTree, raw: RawWidget) -> Option<Built> {
        match raw {
            RawWidget::Grid(raw) => self.grid(tree, raw),
            RawWidget::Tabs(raw) => self.tabs(tree, raw),
            RawWidget::Switch(raw) => self.switch(tree, raw),
            RawWidget::Overlay(raw) => self.overlay(tree, raw),
            RawWidget::ScrollArea(raw) => self.scroll_area(tree, raw),
            RawWidget::Button(raw) => self.button(tree, raw),
            RawWidget::Checkbox(raw) => self.checkbox(tree, raw),
            RawWidget::Label(raw) => self.label(tree, raw),
            RawWidget::ProgressBar(raw) => self.progress_bar(tree, raw),
            RawWidget::Spinner(raw) => self.spinner(tree, raw),
            RawWidget::Slider(raw) => self.slider(tree, raw),
            RawWidget::Choice(raw) => self.choice(tree, raw),
            RawWidget::TextBox(raw) => self.textbox(tree, raw),
            RawWidget::Pixmap(raw) => self.pixmap(tree, raw),
            RawWidget::Table(raw) => {
                warn!(
                    "Tables need a row source, construct them in code (uid {:?})",
                    raw.common.uid
                );
                None
            }
            RawWidget::Unknown => {
                warn!("Unknown widget type, skipping");
                None
            }
        }
    }

    /// Common tail of every element: alignment, uid registration, the
    /// optional focus claim and the `New` notification.
    fn built(
        &mut self, tree: &mut WidgetTree, id: WidgetId, common: &RawCommon, child_focus: bool,
    ) -> Option<Built> {
        tree.set_align(id, common.align());

        if let Some(uid) = &common.uid {
            if self.uids.contains_key(uid) {
                warn!("Duplicate uid '{uid}', keeping the first");
            } else {
                self.uids.insert(uid.clone(), id);
            }
        }

        let mut focused = child_focus;
        if common.focused {
            focused |= self.claim_focus(id);
        }

        tree.send_event(id, WidgetEvent::New);

        Some(Built { id, focused })
    }

    /// At most one element per description may claim focus; later claims
    /// are dropped.
    fn claim_focus(&mut self, id: WidgetId) -> bool {
        if self.focus.is_some() {
            warn!("Multiple focused widgets, keeping the first");
            return false;
        }

        self.focus = Some(id);
        true
    }

    fn grid(&mut self, tree: &mut WidgetTree, raw: RawGrid) -> Option<Built> {
        let id = Grid::new(tree, raw.cols, raw.rows);
        apply_grid_config(tree, id, &raw);

        let cells = raw.cols * raw.rows;
        if raw.widgets.len() > cells {
            warn!("Grid holds {cells} cells, got {} widgets", raw.widgets.len());
        }

        let mut child_focus = false;
        for (i, child) in raw.widgets.into_iter().take(cells).enumerate() {
            let Some(built) = self.build(tree, child) else {
                continue;
            };

            let (col, row) = (i % raw.cols, i / raw.cols);
            Grid::put(tree, id, col, row, built.id);

            if built.focused {
                if let Some(grid) = tree.get_mut(id).and_then(|w| w.as_grid_mut()) {
                    grid.selected_col = col;
                    grid.selected_row = row;
                }
                child_focus = true;
            }
        }

        self.built(tree, id, &raw.common, child_focus)
    }

    fn tabs(&mut self, tree: &mut WidgetTree, raw: RawTabs) -> Option<Built> {
        let labels: Vec<&str> = raw.labels.iter().map(String::as_str).collect();
        let id = Tabs::new(tree, &labels, raw.active);

        let count = raw.labels.len();
        if raw.widgets.len() > count {
            warn!("Tabs hold {count} children, got {}", raw.widgets.len());
        }

        let active = tree.get(id).and_then(|w| w.as_tabs()).map_or(0, |t| t.active);

        let mut child_focus = false;
        for (tab, child) in raw.widgets.into_iter().take(count).enumerate() {
            let Some(built) = self.build(tree, child) else {
                continue;
            };

            Tabs::put(tree, id, tab, built.id);

            if built.focused {
                if tab == active {
                    if let Some(tabs) = tree.get_mut(id).and_then(|w| w.as_tabs_mut()) {
                        tabs.child_selected = true;
                    }
                    child_focus = true;
                } else {
                    warn!("Focused widget in an inactive tab, dropping the claim");
                }
            }
        }

        self.built(tree, id, &raw.common, child_focus)
    }

    fn switch(&mut self, tree: &mut WidgetTree, raw: RawSwitch) -> Option<Built> {
        let id = Switch::new(tree, raw.layouts.len());

        let mut focus_layout = None;
        for (layout, child) in raw.layouts.into_iter().enumerate() {
            let Some(built) = self.build(tree, child) else {
                continue;
            };

            Switch::put(tree, id, layout, built.id);

            if built.focused {
                focus_layout = Some(layout);
            }
        }

        if raw.active != 0 {
            Switch::switch_to(tree, id, raw.active);
        }

        let active = tree
            .get(id)
            .and_then(|w| w.as_switch())
            .map_or(0, |s| s.active);

        let child_focus = match focus_layout {
            Some(layout) if layout == active => true,
            Some(_) => {
                warn!("Focused widget in an inactive layout, dropping the claim");
                false
            }
            None => false,
        };

        self.built(tree, id, &raw.common, child_focus)
    }

    fn overlay(&mut self, tree: &mut WidgetTree, raw: RawOverlay) -> Option<Built> {
        let count = raw.layers.len();
        let id = Overlay::new(tree, count);

        if raw.hidden.len() > count {
            warn!(
                "Overlay holds {count} layers, got {} hidden flags",
                raw.hidden.len()
            );
        }

        let mut focus_layer = None;
        for (layer, child) in raw.layers.into_iter().enumerate() {
            let Some(built) = self.build(tree, child) else {
                continue;
            };

            Overlay::put(tree, id, layer, built.id);

            if built.focused {
                focus_layer = Some(layer);
            }
        }

        for (layer, hidden) in raw.hidden.iter().take(count).enumerate() {
            if *hidden {
                Overlay::hide(tree, id, layer);
            }
        }

        let mut child_focus = false;
        if let Some(layer) = focus_layer {
            let hidden = tree
                .get(id)
                .and_then(|w| w.as_overlay())
                .is_some_and(|o| o.is_hidden(layer));

            if hidden {
                warn!("Focused widget in a hidden layer, dropping the claim");
            } else {
                if let Some(overlay) = tree.get_mut(id).and_then(|w| w.as_overlay_mut()) {
                    overlay.selected = layer;
                }
                child_focus = true;
            }
        }

        self.built(tree, id, &raw.common, child_focus)
    }

    fn scroll_area(&mut self, tree: &mut WidgetTree, raw: RawScrollArea) -> Option<Built> {
        if raw.min_w == 0 && raw.min_h == 0 {
            warn!("Scroll area without a minimum size, skipping");
            return None;
        }

        let id = ScrollArea::new(tree, Size::new(raw.min_w, raw.min_h));

        let mut child_focus = false;
        if let Some(child) = raw.widget {
            if let Some(built) = self.build(tree, *child) {
                ScrollArea::put(tree, id, built.id);

                if built.focused {
                    if let Some(scroll) = tree.get_mut(id).and_then(|w| w.as_scroll_mut()) {
                        scroll.child_selected = true;
                    }
                    child_focus = true;
                }
            }
        }

        self.built(tree, id, &raw.common, child_focus)
    }

    fn button(&mut self, tree: &mut WidgetTree, raw: RawButton) -> Option<Built> {
        let Some(label) = raw.label else {
            warn!("Button without a label, skipping");
            return None;
        };

        let id = Button::new(tree, label);
        self.built(tree, id, &raw.common, false)
    }

    fn checkbox(&mut self, tree: &mut WidgetTree, raw: RawCheckbox) -> Option<Built> {
        let id = Checkbox::new(tree, raw.label);
        if raw.set {
            Checkbox::set(tree, id, true);
        }

        self.built(tree, id, &raw.common, false)
    }

    fn label(&mut self, tree: &mut WidgetTree, raw: RawLabel) -> Option<Built> {
        let Some(text) = raw.text else {
            warn!("Label without text, skipping");
            return None;
        };

        let id = Label::new(tree, text);
        if let Some(label) = tree.get_mut(id).and_then(|w| w.as_label_mut()) {
            label.bold = raw.bold;
            label.width = raw.width;
            label.frame = raw.frame;
            label.ralign = raw.ralign;
        }

        self.built(tree, id, &raw.common, false)
    }

    fn progress_bar(&mut self, tree: &mut WidgetTree, raw: RawProgressBar) -> Option<Built> {
        let id = ProgressBar::new(tree, raw.val);
        self.built(tree, id, &raw.common, false)
    }

    fn spinner(&mut self, tree: &mut WidgetTree, raw: RawSpinner) -> Option<Built> {
        let (Some(min), Some(max)) = (raw.min, raw.max) else {
            warn!("Spinner without a range, skipping");
            return None;
        };

        let id = match Spinner::new(tree, min, max, raw.val.unwrap_or(min)) {
            Ok(id) => id,
            Err(err) => {
                warn!("Invalid spinner: {err}");
                return None;
            }
        };

        self.built(tree, id, &raw.common, false)
    }

    fn slider(&mut self, tree: &mut WidgetTree, raw: RawSlider) -> Option<Built> {
        let (Some(min), Some(max)) = (raw.min, raw.max) else {
            warn!("Slider without a range, skipping");
            return None;
        };

        let id = match Slider::new(tree, min, max, raw.val.unwrap_or(min)) {
            Ok(id) => id,
            Err(err) => {
                warn!("Invalid slider: {err}");
                return None;
            }
        };

        self.built(tree, id, &raw.common, false)
    }

    fn choice(&mut self, tree: &mut WidgetTree, raw: RawChoice) -> Option<Built> {
        if raw.options.is_empty() {
            warn!("Choice without options, skipping");
            return None;
        }

        let id = Choice::new(tree, raw.options, raw.selected);
        self.built(tree, id, &raw.common, false)
    }

    fn textbox(&mut self, tree: &mut WidgetTree, raw: RawTextBox) -> Option<Built> {
        let id = TextBox::new(tree, raw.text, raw.capacity);

        if let Some(filter) = raw.filter {
            TextBox::set_filter(tree, id, filter);
        }

        if raw.hidden {
            if let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) {
                tbox.hidden = true;
            }
        }

        self.built(tree, id, &raw.common, false)
    }

    fn pixmap(&mut self, tree: &mut WidgetTree, raw: RawPixmap) -> Option<Built> {
        let (Some(w), Some(h)) = (raw.min_w, raw.min_h) else {
            warn!("Pixmap without a size, skipping");
            return None;
        };

        let id = PixmapArea::new(tree, Size::new(w, h));
        self.built(tree, id, &raw.common, false)
    }
}

fn apply_grid_config(tree: &mut WidgetTree, id: WidgetId, raw: &RawGrid) {
    let Some(grid) = tree.get_mut(id).and_then(|w| w.as_grid_mut()) else {
        return;
    };

    grid.uniform = raw.uniform;
    grid.frame = raw.frame;

    if let Some(pad) = raw.pad {
        grid.col_padds.fill(pad);
        grid.row_padds.fill(pad);
    }

    if let Some(border) = raw.border {
        grid.col_padds[0] = border;
        grid.col_padds[raw.cols] = border;
        grid.row_padds[0] = border;
        grid.row_padds[raw.rows] = border;
    }

    copy_ratios("cpad", &raw.cpad, &mut grid.col_padds, raw.cols + 1);
    copy_ratios("rpad", &raw.rpad, &mut grid.row_padds, raw.rows + 1);
    copy_ratios("cpadf", &raw.cpadf, &mut grid.col_pfills, raw.cols + 1);
    copy_ratios("rpadf", &raw.rpadf, &mut grid.row_pfills, raw.rows + 1);
    copy_ratios("cfill", &raw.cfill, &mut grid.col_fills, raw.cols);
    copy_ratios("rfill", &raw.rfill, &mut grid.row_fills, raw.rows);
}

/// Copies a ratio array when its length matches, keeps the defaults with a
/// warning otherwise.
fn copy_ratios(attr: &str, src: &Option<Vec<u32>>, dst: &mut [u32], expect: usize) {
    let Some(src) = src else {
        return;
    };

    if src.len() != expect {
        warn!("Attribute {attr} wants {expect} entries, got {}", src.len());
        return;
    }

    dst.copy_from_slice(src);
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;
    use crate::align::HAlign;

    #[test]
    fn builds_described_widgets() {
        let layout: Layout = indoc! {r#"
            [layout]
            type = "grid"
            cols = 2
            rows = 2
            border = 2
            cfill = [1, 3]
            uid = "root"

            [[layout.widgets]]
            type = "button"
            label = "OK"
            uid = "ok"

            [[layout.widgets]]
            type = "label"
            text = "name:"
            halign = "right"

            [[layout.widgets]]
            type = "checkbox"
            label = "verbose"
            set = true

            [[layout.widgets]]
            type = "textbox"
            text = "abc"
            capacity = 8
            filter = "abcdef"
            hidden = true
        "#}
        .parse()
        .unwrap();

        let Layout { tree, root, .. } = layout;
        let grid = tree.get(root).and_then(|w| w.as_grid()).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (2, 2));
        assert_eq!(grid.col_padds, vec![2, 1, 2]);
        assert_eq!(grid.col_fills, vec![1, 3]);

        let label = grid.cell(1, 0).unwrap();
        assert_eq!(tree.get(label).unwrap().align.h, HAlign::Right);

        let checkbox = grid.cell(0, 1).unwrap();
        assert!(tree
            .get(checkbox)
            .and_then(|w| w.as_checkbox())
            .unwrap()
            .is_checked());

        let tbox = tree
            .get(grid.cell(1, 1).unwrap())
            .and_then(|w| w.as_textbox())
            .unwrap();
        assert!(tbox.hidden);
        assert!(tbox.filter.is_some());
    }

    #[test]
    fn uids_resolve_and_duplicates_keep_the_first() {
        let layout: Layout = indoc! {r#"
            [layout]
            type = "grid"
            cols = 2
            rows = 1

            [[layout.widgets]]
            type = "button"
            label = "a"
            uid = "twice"

            [[layout.widgets]]
            type = "button"
            label = "b"
            uid = "twice"
        "#}
        .parse()
        .unwrap();

        let first = layout.by_uid("twice").unwrap();
        let grid = layout
            .tree
            .get(layout.root)
            .and_then(|w| w.as_grid())
            .unwrap();
        assert_eq!(grid.cell(0, 0), Some(first));
        assert_eq!(layout.by_uid("missing"), None);
    }

    #[test]
    fn focused_aims_the_selection_path() {
        let layout: Layout = indoc! {r#"
            [layout]
            type = "grid"
            cols = 1
            rows = 2

            [[layout.widgets]]
            type = "button"
            label = "a"

            [[layout.widgets]]
            type = "button"
            label = "b"
            focused = true
        "#}
        .parse()
        .unwrap();

        let grid = layout
            .tree
            .get(layout.root)
            .and_then(|w| w.as_grid())
            .unwrap();
        let focused = grid.cell(0, 1).unwrap();
        assert!(layout.tree.get(focused).unwrap().selected);
        assert_eq!(grid.selected_child(), Some(focused));
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let layout: Layout = indoc! {r#"
            [layout]
            type = "grid"
            cols = 2
            rows = 2

            [[layout.widgets]]
            type = "flux_capacitor"

            [[layout.widgets]]
            type = "button"

            [[layout.widgets]]
            type = "spinner"
            min = 10
            max = 2

            [[layout.widgets]]
            type = "label"
            text = "survivor"
        "#}
        .parse()
        .unwrap();

        let grid = layout
            .tree
            .get(layout.root)
            .and_then(|w| w.as_grid())
            .unwrap();
        assert_eq!(grid.cell(0, 0), None);
        assert_eq!(grid.cell(1, 0), None);
        assert_eq!(grid.cell(0, 1), None);
        assert!(grid.cell(1, 1).is_some());
    }

    #[test]
    fn scroll_area_validates_and_attaches_its_child() {
        let layout: Layout = indoc! {r#"
            [layout]
            type = "scroll_area"
            min_w = 50

            [layout.widget]
            type = "button"
            label = "inside"
        "#}
        .parse()
        .unwrap();

        let scroll = layout
            .tree
            .get(layout.root)
            .and_then(|w| w.as_scroll())
            .unwrap();
        let child = scroll.child.unwrap();
        assert_eq!(layout.tree.get(child).unwrap().parent, Some(layout.root));

        let err = indoc! {r#"
            [layout]
            type = "scroll_area"
        "#}
        .parse::<Layout>();
        assert!(err.is_err());
    }

    #[test]
    fn tabs_switch_and_overlay_organize_children() {
        let layout: Layout = indoc! {r#"
            [layout]
            type = "tabs"
            labels = ["first", "second"]
            active = 1

            [[layout.widgets]]
            type = "label"
            text = "one"

            [[layout.widgets]]
            type = "switch"
            active = 1

            [[layout.widgets.layouts]]
            type = "label"
            text = "plan a"

            [[layout.widgets.layouts]]
            type = "overlay"
            hidden = [false, true]

            [[layout.widgets.layouts.layers]]
            type = "label"
            text = "base"

            [[layout.widgets.layouts.layers]]
            type = "label"
            text = "dialog"
        "#}
        .parse()
        .unwrap();

        let tree = &layout.tree;
        let tabs = tree.get(layout.root).and_then(|w| w.as_tabs()).unwrap();
        assert_eq!(tabs.active_tab(), 1);

        let switch = tree
            .get(tabs.active_child().unwrap())
            .and_then(|w| w.as_switch())
            .unwrap();
        assert_eq!(switch.active_layout(), 1);

        let overlay = tree
            .get(switch.active_child().unwrap())
            .and_then(|w| w.as_overlay())
            .unwrap();
        assert!(!overlay.is_hidden(0));
        assert!(overlay.is_hidden(1));
    }

    #[test]
    fn new_events_are_queued_per_widget() {
        let mut layout: Layout = indoc! {r#"
            [layout]
            type = "grid"
            cols = 2
            rows = 1

            [[layout.widgets]]
            type = "button"
            label = "a"

            [[layout.widgets]]
            type = "button"
            label = "b"
        "#}
        .parse()
        .unwrap();

        let news = layout
            .tree
            .drain_events()
            .filter(|ev| ev.event == WidgetEvent::New)
            .count();
        assert_eq!(news, 3);
    }

    #[test]
    fn theme_table_overrides_the_palette() {
        let layout: Layout = indoc! {r##"
            [layout]
            type = "label"
            text = "themed"

            [theme]
            bg = "#101010"
            sel = "#ff0000"
        "##}
        .parse()
        .unwrap();

        let palette = layout.palette().unwrap();
        assert_eq!(palette.bg, 0x10_10_10);
        assert_eq!(palette.sel, 0xff_00_00);
    }

    #[test]
    fn document_errors_fail_the_parse() {
        assert!("".parse::<Layout>().is_err());
        assert!("layout = 3".parse::<Layout>().is_err());
        assert!(indoc! {r##"
            [layout]
            type = "button"
            label = "ok"

            [theme]
            bg = "#nothex"
        "##}
        .parse::<Layout>()
        .is_err());
    }

    #[test]
    fn load_reads_description_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(
            &path,
            indoc! {r#"
                [layout]
                type = "button"
                label = "from disk"
                uid = "main"
            "#},
        )
        .unwrap();

        let layout = Layout::load(&path).unwrap();
        assert_eq!(layout.by_uid("main"), Some(layout.root));

        assert!(Layout::load(dir.path().join("missing.toml")).is_err());
    }
}
