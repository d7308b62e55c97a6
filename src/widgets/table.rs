//! A table over an abstract row cursor.
//!
//! The table never materializes its data. It asks a [`RowSource`] to reset,
//! advance and read cells, so huge or filtered datasets cost only as much
//! as the rows currently on screen. The total row count is discovered as a
//! byproduct of the render pass walking the cursor to the end.

use std::borrow::Cow;

use crate::canvas::Canvas;
use crate::event::{InputEvent, Key, WidgetEvent};
use crate::font::text_fit;
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

const PAGE_STEP: usize = 10;

/// The data contract between a table and its rows.
///
/// `reset` rewinds the cursor to the first row. `advance` moves it forward
/// and reports whether it still points at an existing row; `advance(0)`
/// reports the validity of the current position. `cell` reads the cursor's
/// row.
pub trait RowSource {
    fn reset(&mut self);

    fn advance(&mut self, by: usize) -> bool;

    fn cell(&self, col: usize) -> Cow<'_, str>;

    /// Reorders the backing rows. Only called for sortable columns; the
    /// default flags the missing implementation.
    fn sort(&mut self, col: usize, desc: bool) {
        let _ = desc;
        error!("Sortable column {col} without a sort implementation");
    }
}

pub struct Header {
    pub text: String,
    pub sortable: bool,
}

impl Header {
    pub fn new(text: impl Into<String>, sortable: bool) -> Self {
        Self {
            text: text.into(),
            sortable,
        }
    }
}

pub struct Table {
    pub(crate) cols: usize,
    pub(crate) min_rows: u32,
    pub(crate) headers: Option<Vec<Header>>,
    /// Reserved width per column, in characters.
    pub(crate) col_min_sizes: Vec<u32>,
    pub(crate) col_fills: Vec<u32>,
    /// Computed during distribution.
    pub(crate) cols_w: Vec<u32>,
    /// First row currently in view.
    pub(crate) start_row: usize,
    pub(crate) selected_row: usize,
    pub(crate) row_selected: bool,
    pub(crate) sorted_by: Option<usize>,
    pub(crate) sorted_desc: bool,
    /// Total row count, learned during render.
    pub(crate) last_max_row: usize,
    pub(crate) source: Box<dyn RowSource>,
}

impl Table {
    pub fn new(
        tree: &mut WidgetTree, cols: usize, min_rows: u32, source: Box<dyn RowSource>,
    ) -> WidgetId {
        let table = Table {
            cols,
            min_rows,
            headers: None,
            col_min_sizes: vec![0; cols],
            col_fills: vec![0; cols],
            cols_w: vec![0; cols],
            start_row: 0,
            selected_row: 0,
            row_selected: false,
            sorted_by: None,
            sorted_desc: false,
            last_max_row: 0,
            source,
        };

        tree.insert(Widget::new(WidgetPayload::Table(table)))
    }

    pub fn set_headers(tree: &mut WidgetTree, id: WidgetId, headers: Vec<Header>) {
        if let Some(table) = tree.get_mut(id).and_then(|w| w.as_table_mut()) {
            if headers.len() != table.cols {
                warn!(
                    "Table {id:?} got {} headers for {} columns",
                    headers.len(),
                    table.cols
                );
                return;
            }
            table.headers = Some(headers);
        }
        tree.resize(id);
    }

    /// Reserves at least `chars` characters of width for a column.
    pub fn set_col_min_size(tree: &mut WidgetTree, id: WidgetId, col: usize, chars: u32) {
        if let Some(table) = tree.get_mut(id).and_then(|w| w.as_table_mut()) {
            if col >= table.cols {
                warn!("Column {col} out of range for {id:?}");
                return;
            }
            table.col_min_sizes[col] = chars;
        }
        tree.resize(id);
    }

    pub fn set_col_fill(tree: &mut WidgetTree, id: WidgetId, col: usize, fill: u32) {
        if let Some(table) = tree.get_mut(id).and_then(|w| w.as_table_mut()) {
            if col >= table.cols {
                warn!("Column {col} out of range for {id:?}");
                return;
            }
            table.col_fills[col] = fill;
        }
        tree.resize(id);
    }

    /// Repaints after the backing rows changed.
    pub fn refresh(tree: &mut WidgetTree, id: WidgetId) {
        tree.redraw(id);
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.row_selected.then_some(self.selected_row)
    }

    fn header_h(&self, ctx: &RenderCtx) -> u32 {
        if self.headers.is_some() {
            ctx.font.ascent() + 2 * ctx.padd
        } else {
            0
        }
    }

    fn row_h(ctx: &RenderCtx) -> u32 {
        ctx.font.ascent() + ctx.padd
    }

    fn display_rows(&self, ctx: &RenderCtx, h: u32) -> usize {
        (h.saturating_sub(self.header_h(ctx)) / Self::row_h(ctx)) as usize
    }

    /// Minimal width of one column: the header (plus the sort symbol
    /// reservation) or the reserved character count, whichever is wider.
    fn base_col_w(&self, ctx: &RenderCtx, col: usize) -> u32 {
        let mut w = ctx.font.max_width(self.col_min_sizes[col]);

        if let Some(headers) = &self.headers {
            let header = &headers[col];
            let mut header_w = ctx.font_bold.width(&header.text);
            if header.sortable {
                header_w += ctx.padd + ctx.font.ascent();
            }
            w = w.max(header_w);
        }

        w
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        let cols_w: u32 = (0..self.cols).map(|col| self.base_col_w(ctx, col)).sum();

        cols_w + 2 * self.cols as u32 * ctx.padd
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        Self::row_h(ctx) * self.min_rows + self.header_h(ctx)
    }
}

pub(crate) fn distribute(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) {
    let Some(widget) = tree.get_mut(id) else {
        return;
    };
    let w = widget.w;
    let Some(table) = widget.as_table_mut() else {
        return;
    };

    let mut cols_w: Vec<u32> = (0..table.cols)
        .map(|col| table.base_col_w(ctx, col))
        .collect();

    let sum_fills: u32 = table.col_fills.iter().sum();
    if sum_fills > 0 {
        let base = cols_w.iter().sum::<u32>() + 2 * table.cols as u32 * ctx.padd;
        let share = w.saturating_sub(base) / sum_fills;

        for (col_w, fill) in cols_w.iter_mut().zip(&table.col_fills) {
            *col_w += fill * share;
        }
    }

    table.cols_w = cols_w;
}

fn render_header(
    table: &Table, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point, w: u32, focused: bool,
) {
    let Some(headers) = &table.headers else {
        return;
    };

    let ascent = ctx.font.ascent();
    let padd = ctx.padd as i32;
    let mut cx = origin.x + padd;
    let cy = origin.y + padd;

    for (col, header) in headers.iter().enumerate() {
        if header.sortable && table.sorted_by == Some(col) {
            let symbol = Point::new(
                cx + (table.cols_w[col] - ctx.padd) as i32,
                cy + ascent as i32 / 2,
            );
            if table.sorted_desc {
                canvas.triangle_down(symbol, 2 * ascent / 3, ctx.palette.text);
            } else {
                canvas.triangle_up(symbol, 2 * ascent / 3, ctx.palette.text);
            }
        }

        canvas.text(
            &*ctx.font_bold,
            Point::new(cx, cy),
            ctx.palette.text,
            &header.text,
        );

        cx += (table.cols_w[col] + ctx.padd) as i32;

        if col + 1 < table.cols {
            canvas.vline(cx, origin.y + 1, ascent + 2 * ctx.padd - 1, ctx.palette.bg);
        }

        cx += padd;
    }

    let rule = if focused {
        ctx.palette.sel
    } else {
        ctx.palette.text
    };
    canvas.hline(
        origin.x,
        origin.y + table.header_h(ctx) as i32,
        w,
        rule,
    );
}

pub(crate) fn render(
    tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, canvas: &mut dyn Canvas, origin: Point,
) {
    let Some(widget) = tree.get_mut(id) else {
        return;
    };
    let (w, h, focused) = (widget.w, widget.h, widget.is_selected());
    let Some(table) = widget.as_table_mut() else {
        return;
    };

    let frame = if focused {
        ctx.palette.sel
    } else {
        ctx.palette.text
    };
    canvas.fill_rrect(
        Rect::new(origin.x, origin.y, w, h),
        ctx.palette.bg,
        ctx.palette.fg,
        frame,
    );

    render_header(table, ctx, canvas, origin, w, focused);

    let ascent = ctx.font.ascent();
    let padd = ctx.padd;
    let header_h = table.header_h(ctx);
    let row_h = Table::row_h(ctx);
    let display = table.display_rows(ctx, h);

    // Column separators over the whole body.
    let mut cx = origin.x + padd as i32;
    for col in 0..table.cols.saturating_sub(1) {
        cx += (table.cols_w[col] + padd) as i32;
        canvas.vline(
            cx,
            origin.y + header_h as i32 + 1,
            h.saturating_sub(header_h + 2),
            ctx.palette.bg,
        );
        cx += padd as i32;
    }

    table.source.reset();
    let mut on_row = table.source.advance(table.start_row);
    let mut row = table.start_row;
    let mut shown = 0;

    let mut cy = origin.y + header_h as i32 + (padd / 2) as i32;

    while on_row && shown < display {
        if table.row_selected && row == table.selected_row {
            let band = if focused { ctx.palette.sel } else { ctx.palette.bg };
            canvas.fill_rect(
                Rect::new(
                    origin.x + 1,
                    cy - (padd / 2) as i32 + 1,
                    w - 2,
                    ascent + padd - 1,
                ),
                band,
            );
        }

        let mut cx = origin.x + padd as i32;
        for col in 0..table.cols {
            let cell = table.source.cell(col);
            text_fit(
                canvas,
                &*ctx.font,
                Point::new(cx, cy),
                table.cols_w[col],
                ctx.palette.text,
                &cell,
            );
            cx += (table.cols_w[col] + 2 * padd) as i32;
        }

        cy += row_h as i32;
        canvas.hline(origin.x + 1, cy - (padd / 2) as i32, w - 2, ctx.palette.bg);

        row += 1;
        shown += 1;
        on_row = table.source.advance(1);
    }

    // Walk out the rest of the cursor to learn the total row count.
    while on_row {
        row += 1;
        on_row = table.source.advance(1);
    }
    table.last_max_row = row;
}

fn fix_selected(table: &mut Table) {
    if table.selected_row >= table.last_max_row {
        table.selected_row = table.last_max_row.saturating_sub(1);
    }
}

fn move_down(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, by: usize) -> bool {
    let Some(widget) = tree.get_mut(id) else {
        return false;
    };
    let h = widget.h;
    let Some(table) = widget.as_table_mut() else {
        return false;
    };

    if !table.row_selected {
        table.row_selected = true;
        table.selected_row = table.start_row;
        fix_selected(table);
    } else {
        let target = (table.selected_row + by).min(table.last_max_row.saturating_sub(1));
        if target == table.selected_row {
            return true;
        }
        table.selected_row = target;
    }

    let display = table.display_rows(ctx, h);
    if table.selected_row >= table.start_row + display {
        table.start_row = table.selected_row + 1 - display;
    }

    tree.redraw(id);
    true
}

fn move_up(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, by: usize) -> bool {
    let Some(widget) = tree.get_mut(id) else {
        return false;
    };
    let h = widget.h;
    let Some(table) = widget.as_table_mut() else {
        return false;
    };

    if !table.row_selected {
        table.row_selected = true;
        table.selected_row = (table.start_row + table.display_rows(ctx, h)).saturating_sub(1);
        fix_selected(table);
    } else {
        let target = table.selected_row.saturating_sub(by);
        if target == table.selected_row {
            return true;
        }
        table.selected_row = target;
    }

    if table.selected_row < table.start_row {
        table.start_row = table.selected_row;
    }

    tree.redraw(id);
    true
}

fn header_click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, x: i32) -> bool {
    let Some(table) = tree.get_mut(id).and_then(|w| w.as_table_mut()) else {
        return false;
    };

    let Some(headers) = &table.headers else {
        return false;
    };

    let mut col = table.cols.saturating_sub(1);
    let mut cx = 0i32;
    for i in 0..table.cols.saturating_sub(1) {
        cx += (table.cols_w[i] + 2 * ctx.padd) as i32;
        if x <= cx {
            col = i;
            break;
        }
    }

    if !headers[col].sortable {
        return false;
    }

    if table.sorted_by == Some(col) {
        table.sorted_desc = !table.sorted_desc;
    } else {
        table.sorted_by = Some(col);
    }

    let desc = table.sorted_desc;
    table.source.sort(col, desc);
    tree.redraw(id);
    true
}

fn row_click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, y: i32) -> bool {
    let Some(table) = tree.get_mut(id).and_then(|w| w.as_table_mut()) else {
        return false;
    };

    if table.last_max_row == 0 {
        return false;
    }

    let body_y = y - table.header_h(ctx) as i32;
    if body_y < 0 {
        return false;
    }

    table.selected_row = table.start_row + (body_y as u32 / Table::row_h(ctx)) as usize;
    table.row_selected = true;
    fix_selected(table);

    tree.redraw(id);
    true
}

fn click(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, cursor: Point) -> bool {
    let header_h = tree
        .get(id)
        .and_then(|w| w.as_table())
        .map_or(0, |t| t.header_h(ctx));

    if cursor.y <= header_h as i32 {
        header_click(tree, ctx, id, cursor.x)
    } else {
        row_click(tree, ctx, id, cursor.y)
    }
}

fn enter(tree: &mut WidgetTree, id: WidgetId) -> bool {
    let selected = tree
        .get(id)
        .and_then(|w| w.as_table())
        .is_some_and(|t| t.row_selected);

    if !selected {
        return false;
    }

    tree.send_event(id, WidgetEvent::Action);
    true
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    match ev.pressed() {
        Some(Key::Down) => move_down(tree, ctx, id, 1),
        Some(Key::Up) => move_up(tree, ctx, id, 1),
        Some(Key::PageDown) => move_down(tree, ctx, id, PAGE_STEP),
        Some(Key::PageUp) => move_up(tree, ctx, id, PAGE_STEP),
        Some(Key::BtnLeft) => click(tree, ctx, id, ev.cursor),
        Some(Key::Enter) => enter(tree, id),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::Pixmap;
    use crate::ops;
    use crate::render::Damage;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rows {
        data: Vec<[String; 2]>,
        cursor: usize,
        sorts: Rc<RefCell<Vec<(usize, bool)>>>,
    }

    impl Rows {
        fn new(count: usize) -> Self {
            let data = (0..count)
                .map(|i| [format!("row {i}"), format!("value {i}")])
                .collect();
            Self {
                data,
                cursor: 0,
                sorts: Rc::default(),
            }
        }
    }

    impl RowSource for Rows {
        fn reset(&mut self) {
            self.cursor = 0;
        }

        fn advance(&mut self, by: usize) -> bool {
            self.cursor += by;
            self.cursor < self.data.len()
        }

        fn cell(&self, col: usize) -> Cow<'_, str> {
            Cow::from(&self.data[self.cursor][col])
        }

        fn sort(&mut self, col: usize, desc: bool) {
            self.sorts.borrow_mut().push((col, desc));
        }
    }

    fn table_with_rows(
        tree: &mut WidgetTree, ctx: &RenderCtx, rows: usize,
    ) -> (WidgetId, Rc<RefCell<Vec<(usize, bool)>>>) {
        let source = Rows::new(rows);
        let sorts = Rc::clone(&source.sorts);
        let id = Table::new(tree, 2, 3, Box::new(source));
        Table::set_headers(
            tree,
            id,
            vec![Header::new("name", true), Header::new("value", false)],
        );
        ops::calc_size(tree, ctx, id, 0, 0, true);

        let mut screen = Pixmap::new(200, 200);
        let mut damage = Damage::default();
        ops::render(tree, ctx, id, &mut screen, Point::default(), false, &mut damage);

        (id, sorts)
    }

    fn state(tree: &WidgetTree, id: WidgetId) -> (Option<usize>, usize) {
        let table = tree.get(id).unwrap().as_table().unwrap();
        (table.selected_row(), table.start_row)
    }

    #[test]
    fn the_render_pass_discovers_the_total_row_count() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, _) = table_with_rows(&mut tree, &ctx, 10);

        assert_eq!(tree.get(id).unwrap().as_table().unwrap().last_max_row, 10);
    }

    #[test]
    fn the_selection_scrolls_the_view_window() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, _) = table_with_rows(&mut tree, &ctx, 10);

        // Three rows fit (min_rows). The first Down only selects.
        for _ in 0..5 {
            ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Down));
        }

        // Selected row 4 with a 3-row window: the view starts at row 2.
        assert_eq!(state(&tree, id), (Some(4), 2));

        for _ in 0..5 {
            ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Up));
        }
        assert_eq!(state(&tree, id), (Some(0), 0));
    }

    #[test]
    fn paging_clamps_to_the_last_row() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, _) = table_with_rows(&mut tree, &ctx, 5);

        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Down));
        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::PageDown));

        assert_eq!(state(&tree, id).0, Some(4));
    }

    #[test]
    fn enter_fires_action_only_with_a_selection() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, _) = table_with_rows(&mut tree, &ctx, 5);

        assert!(!ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Enter)));

        ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Down));
        tree.drain_events().count();

        assert!(ops::event(&mut tree, &ctx, id, &InputEvent::key_down(Key::Enter)));
        let events: Vec<_> = tree.drain_events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, WidgetEvent::Action);
    }

    #[test]
    fn header_clicks_toggle_the_sort_order() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, sorts) = table_with_rows(&mut tree, &ctx, 5);

        let click = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(3, 2));
        assert!(ops::event(&mut tree, &ctx, id, &click));
        assert!(ops::event(&mut tree, &ctx, id, &click));

        assert_eq!(*sorts.borrow(), vec![(0, false), (0, true)]);
    }

    #[test]
    fn clicks_on_an_unsortable_header_fall_through() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, sorts) = table_with_rows(&mut tree, &ctx, 5);

        let w = tree.get(id).unwrap().size().w;
        let click = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(w as i32 - 3, 2));
        assert!(!ops::event(&mut tree, &ctx, id, &click));
        assert!(sorts.borrow().is_empty());
    }

    #[test]
    fn row_clicks_select_by_position() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let (id, _) = table_with_rows(&mut tree, &ctx, 5);

        // Header is 18 tall, rows 14: the second row starts at y 32.
        let click = InputEvent::key_down(Key::BtnLeft).with_cursor(Point::new(10, 35));
        assert!(ops::event(&mut tree, &ctx, id, &click));

        assert_eq!(state(&tree, id).0, Some(1));
    }
}
