//! A `cols` x `rows` table of cells, the workhorse container.
//!
//! Column widths and row heights derive from the widest/tallest child per
//! column/row (or the global maximum in uniform mode). Padding between and
//! around cells is expressed in ratios of the context padding unit. Extra
//! space beyond the minimal layout is split by integer fill ratios over
//! cells and paddings; the integer-division remainder is not redistributed
//! and sits after the last column/row.

use itertools::iproduct;

use crate::canvas::Canvas;
use crate::event::InputEvent;
use crate::geometry::{Point, Rect};
use crate::ops::{self, SelectOp};
use crate::render::{Damage, RenderCtx};
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Grid {
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    /// Row-major cells; a cell may be empty.
    pub(crate) cells: Vec<Option<WidgetId>>,
    /// Per-boundary padding ratios, `cols + 1` / `rows + 1` entries.
    pub(crate) col_padds: Vec<u32>,
    pub(crate) row_padds: Vec<u32>,
    /// Per-boundary padding fill ratios.
    pub(crate) col_pfills: Vec<u32>,
    pub(crate) row_pfills: Vec<u32>,
    /// Per-cell fill ratios.
    pub(crate) col_fills: Vec<u32>,
    pub(crate) row_fills: Vec<u32>,
    /// All columns share the widest minimum, all rows the tallest.
    pub(crate) uniform: bool,
    /// Draw an outline around the grid.
    pub(crate) frame: bool,
    pub(crate) selected_col: usize,
    pub(crate) selected_row: usize,
    /// Computed during distribution, offsets relative to the grid origin.
    pub(crate) cols_w: Vec<u32>,
    pub(crate) rows_h: Vec<u32>,
    pub(crate) cols_off: Vec<u32>,
    pub(crate) rows_off: Vec<u32>,
}

impl Grid {
    /// Inserts an empty `cols` x `rows` grid. Borders and gaps default to
    /// one padding unit, cell fills to 1 and padding fills to 0.
    pub fn new(tree: &mut WidgetTree, cols: usize, rows: usize) -> WidgetId {
        let grid = Grid {
            cols,
            rows,
            cells: vec![None; cols * rows],
            col_padds: vec![1; cols + 1],
            row_padds: vec![1; rows + 1],
            col_pfills: vec![0; cols + 1],
            row_pfills: vec![0; rows + 1],
            col_fills: vec![1; cols],
            row_fills: vec![1; rows],
            uniform: false,
            frame: false,
            selected_col: 0,
            selected_row: 0,
            cols_w: vec![0; cols],
            rows_h: vec![0; rows],
            cols_off: vec![0; cols],
            rows_off: vec![0; rows],
        };

        tree.insert(crate::widget::Widget::new(WidgetPayload::Grid(grid)))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Child occupying a cell, if any.
    pub fn cell(&self, col: usize, row: usize) -> Option<WidgetId> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[self.idx(col, row)]
    }

    pub(crate) fn selected_child(&self) -> Option<WidgetId> {
        self.cell(self.selected_col, self.selected_row)
    }

    /// Puts a child into a cell, displacing and returning the previous
    /// occupant (detached, not removed).
    pub fn put(
        tree: &mut WidgetTree, grid: WidgetId, col: usize, row: usize, child: WidgetId,
    ) -> Option<WidgetId> {
        let valid = match tree.get(grid).and_then(|w| w.as_grid()) {
            Some(g) => col < g.cols && row < g.rows,
            None => false,
        };

        if !valid {
            error!("Invalid grid cell {col}x{row} for {grid:?}");
            return None;
        }

        if !tree.set_parent(child, grid) {
            return None;
        }

        let displaced = tree
            .get_mut(grid)
            .and_then(|w| w.as_grid_mut())
            .and_then(|g| {
                let idx = g.idx(col, row);
                g.cells[idx].replace(child)
            });

        if let Some(old) = displaced {
            tree.clear_parent(old);
        }

        tree.resize(grid);
        displaced
    }

    /// Detaches and returns the child in a cell.
    pub fn take(
        tree: &mut WidgetTree, grid: WidgetId, col: usize, row: usize,
    ) -> Option<WidgetId> {
        let child = tree
            .get_mut(grid)
            .and_then(|w| w.as_grid_mut())
            .and_then(|g| {
                if col >= g.cols || row >= g.rows {
                    return None;
                }
                let idx = g.idx(col, row);
                g.cells[idx].take()
            })?;

        tree.clear_parent(child);
        tree.resize(grid);
        Some(child)
    }

    /// Sets the outer border padding ratio on both axes, keeping inner gaps.
    pub fn set_border(tree: &mut WidgetTree, grid: WidgetId, ratio: u32) {
        if let Some(g) = tree.get_mut(grid).and_then(|w| w.as_grid_mut()) {
            g.col_padds[0] = ratio;
            g.col_padds[g.cols] = ratio;
            g.row_padds[0] = ratio;
            g.row_padds[g.rows] = ratio;
        }
        tree.resize(grid);
    }

    pub fn set_uniform(tree: &mut WidgetTree, grid: WidgetId, uniform: bool) {
        if let Some(g) = tree.get_mut(grid).and_then(|w| w.as_grid_mut()) {
            g.uniform = uniform;
        }
        tree.resize(grid);
    }

    pub fn set_frame(tree: &mut WidgetTree, grid: WidgetId, frame: bool) {
        if let Some(g) = tree.get_mut(grid).and_then(|w| w.as_grid_mut()) {
            g.frame = frame;
        }
        tree.redraw(grid);
    }

    pub fn set_col_fill(tree: &mut WidgetTree, grid: WidgetId, col: usize, fill: u32) {
        if let Some(g) = tree.get_mut(grid).and_then(|w| w.as_grid_mut()) {
            if col >= g.cols {
                warn!("Column {col} out of range for {grid:?}");
                return;
            }
            g.col_fills[col] = fill;
        }
        tree.resize(grid);
    }

    pub fn set_row_fill(tree: &mut WidgetTree, grid: WidgetId, row: usize, fill: u32) {
        if let Some(g) = tree.get_mut(grid).and_then(|w| w.as_grid_mut()) {
            if row >= g.rows {
                warn!("Row {row} out of range for {grid:?}");
                return;
            }
            g.row_fills[row] = fill;
        }
        tree.resize(grid);
    }
}

fn padd_size(ctx: &RenderCtx, ratio: u32) -> u32 {
    ctx.padd * ratio
}

fn pfill_share(slack: u32, fill: u32, sum_fills: u32) -> u32 {
    if sum_fills == 0 {
        0
    } else {
        slack * fill / sum_fills
    }
}

pub(crate) fn min_w(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return 0;
    };

    let cols = grid.cols;
    let rows = grid.rows;
    let uniform = grid.uniform;
    let cells = grid.cells.clone();
    let padds: u32 = grid.col_padds.iter().map(|r| padd_size(ctx, *r)).sum();

    if uniform {
        let mut widest = 0;
        for child in cells.iter().flatten() {
            widest = widest.max(ops::min_w(tree, ctx, *child));
        }
        cols as u32 * widest + padds
    } else {
        let mut sum = padds;
        for col in 0..cols {
            let mut widest = 0;
            for row in 0..rows {
                if let Some(child) = cells[row * cols + col] {
                    widest = widest.max(ops::min_w(tree, ctx, child));
                }
            }
            sum += widest;
        }
        sum
    }
}

pub(crate) fn min_h(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) -> u32 {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return 0;
    };

    let cols = grid.cols;
    let rows = grid.rows;
    let uniform = grid.uniform;
    let cells = grid.cells.clone();
    let padds: u32 = grid.row_padds.iter().map(|r| padd_size(ctx, *r)).sum();

    if uniform {
        let mut tallest = 0;
        for child in cells.iter().flatten() {
            tallest = tallest.max(ops::min_h(tree, ctx, *child));
        }
        rows as u32 * tallest + padds
    } else {
        let mut sum = padds;
        for row in 0..rows {
            let mut tallest = 0;
            for col in 0..cols {
                if let Some(child) = cells[row * cols + col] {
                    tallest = tallest.max(ops::min_h(tree, ctx, child));
                }
            }
            sum += tallest;
        }
        sum
    }
}

pub(crate) fn distribute(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let (w, h, grid_min_w, grid_min_h) = (widget.w, widget.h, widget.min_w, widget.min_h);
    let Some(grid) = widget.as_grid() else {
        return;
    };

    let cols = grid.cols;
    let rows = grid.rows;
    let uniform = grid.uniform;
    let cells = grid.cells.clone();
    let col_padds = grid.col_padds.clone();
    let row_padds = grid.row_padds.clone();
    let col_fills = grid.col_fills.clone();
    let row_fills = grid.row_fills.clone();
    let col_pfills = grid.col_pfills.clone();
    let row_pfills = grid.row_pfills.clone();

    // Start from the minimal column/row sizes; children's caches are warm.
    let mut cols_w = vec![0u32; cols];
    let mut rows_h = vec![0u32; rows];

    if uniform {
        let mut widest = 0;
        let mut tallest = 0;
        for child in cells.iter().flatten() {
            widest = widest.max(ops::min_w(tree, ctx, *child));
            tallest = tallest.max(ops::min_h(tree, ctx, *child));
        }
        cols_w.fill(widest);
        rows_h.fill(tallest);
    } else {
        for (row, col) in iproduct!(0..rows, 0..cols) {
            if let Some(child) = cells[row * cols + col] {
                cols_w[col] = cols_w[col].max(ops::min_w(tree, ctx, child));
                rows_h[row] = rows_h[row].max(ops::min_h(tree, ctx, child));
            }
        }
    }

    let sum_col_fills: u32 = col_fills.iter().sum::<u32>() + col_pfills.iter().sum::<u32>();
    let sum_row_fills: u32 = row_fills.iter().sum::<u32>() + row_pfills.iter().sum::<u32>();

    let dx = w.saturating_sub(grid_min_w);
    let dy = h.saturating_sub(grid_min_h);

    if sum_col_fills > 0 {
        for col in 0..cols {
            cols_w[col] += dx * col_fills[col] / sum_col_fills;
        }
    }

    if sum_row_fills > 0 {
        for row in 0..rows {
            rows_h[row] += dy * row_fills[row] / sum_row_fills;
        }
    }

    let mut cols_off = vec![0u32; cols];
    let mut cur_x = padd_size(ctx, col_padds[0]) + pfill_share(dx, col_pfills[0], sum_col_fills);
    for col in 0..cols {
        cols_off[col] = cur_x;
        cur_x += cols_w[col]
            + padd_size(ctx, col_padds[col + 1])
            + pfill_share(dx, col_pfills[col + 1], sum_col_fills);
    }

    let mut rows_off = vec![0u32; rows];
    let mut cur_y = padd_size(ctx, row_padds[0]) + pfill_share(dy, row_pfills[0], sum_row_fills);
    for row in 0..rows {
        rows_off[row] = cur_y;
        cur_y += rows_h[row]
            + padd_size(ctx, row_padds[row + 1])
            + pfill_share(dy, row_pfills[row + 1], sum_row_fills);
    }

    if let Some(grid) = tree.get_mut(id).and_then(|w| w.as_grid_mut()) {
        grid.cols_w.clone_from(&cols_w);
        grid.rows_h.clone_from(&rows_h);
        grid.cols_off.clone_from(&cols_off);
        grid.rows_off.clone_from(&rows_off);
    }

    for (row, col) in iproduct!(0..rows, 0..cols) {
        if let Some(child) = cells[row * cols + col] {
            let cell = Rect::new(
                cols_off[col] as i32,
                rows_off[row] as i32,
                cols_w[col],
                rows_h[row],
            );
            ops::distribute_to(tree, ctx, child, cell, true);
        }
    }
}

/// Fills the padding bands between and around cells.
fn fill_gaps(
    canvas: &mut dyn Canvas, origin: Point, w: u32, h: u32, cols_off: &[u32], cols_w: &[u32],
    rows_off: &[u32], rows_h: &[u32], bg: crate::canvas::Pixel,
) {
    let mut cur_y = 0u32;
    for (off, rh) in rows_off.iter().zip(rows_h) {
        if *off > cur_y {
            canvas.fill_rect(
                Rect::new(origin.x, origin.y + cur_y as i32, w, off - cur_y),
                bg,
            );
        }
        cur_y = off + rh;
    }
    if h > cur_y {
        canvas.fill_rect(Rect::new(origin.x, origin.y + cur_y as i32, w, h - cur_y), bg);
    }

    let mut cur_x = 0u32;
    for (off, cw) in cols_off.iter().zip(cols_w) {
        if *off > cur_x {
            canvas.fill_rect(
                Rect::new(origin.x + cur_x as i32, origin.y, off - cur_x, h),
                bg,
            );
        }
        cur_x = off + cw;
    }
    if w > cur_x {
        canvas.fill_rect(Rect::new(origin.x + cur_x as i32, origin.y, w - cur_x, h), bg);
    }
}

/// Fills the cell area a non-filling child leaves uncovered.
fn fill_unused(
    canvas: &mut dyn Canvas, origin: Point, cell: Rect, child: Rect, bg: crate::canvas::Pixel,
) {
    let left = child.x - cell.x;
    if left > 0 {
        canvas.fill_rect(
            Rect::new(cell.x, cell.y, left as u32, cell.h).translate(origin),
            bg,
        );
    }

    let top = child.y - cell.y;
    if top > 0 {
        canvas.fill_rect(
            Rect::new(child.x, cell.y, child.w, top as u32).translate(origin),
            bg,
        );
    }

    let right = cell.right() - child.right();
    if right > 0 {
        canvas.fill_rect(
            Rect::new(child.right(), cell.y, right as u32, cell.h).translate(origin),
            bg,
        );
    }

    let bottom = cell.bottom() - child.bottom();
    if bottom > 0 {
        canvas.fill_rect(
            Rect::new(child.x, child.bottom(), child.w, bottom as u32).translate(origin),
            bg,
        );
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
    let Some(grid) = widget.as_grid() else {
        return;
    };

    let cols = grid.cols;
    let rows = grid.rows;
    let frame = grid.frame;
    let cells = grid.cells.clone();
    let cols_w = grid.cols_w.clone();
    let rows_h = grid.rows_h.clone();
    let cols_off = grid.cols_off.clone();
    let rows_off = grid.rows_off.clone();

    let bg = ctx.palette.bg;

    if own {
        fill_gaps(
            canvas, origin, w, h, &cols_off, &cols_w, &rows_off, &rows_h, bg,
        );
        if frame {
            canvas.rect(Rect::new(origin.x, origin.y, w, h), ctx.palette.text);
        }
    }

    for (row, col) in iproduct!(0..rows, 0..cols) {
        let cell = Rect::new(
            cols_off[col] as i32,
            rows_off[row] as i32,
            cols_w[col],
            rows_h[row],
        );

        match cells[row * cols + col] {
            None => {
                if own {
                    canvas.fill_rect(cell.translate(origin), bg);
                }
            }
            Some(child) => {
                let Some(child_widget) = tree.get(child) else {
                    continue;
                };
                let child_box = child_widget.bounds();

                if own {
                    fill_unused(canvas, origin, cell, child_box, bg);
                }

                let child_origin = Point::new(origin.x + child_box.x, origin.y + child_box.y);
                ops::render(tree, ctx, child, canvas, child_origin, force, damage);
            }
        }
    }
}

pub(crate) fn event(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, ev: &InputEvent) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    let Some(child) = grid.selected_child() else {
        return false;
    };

    let Some(pos) = tree.get(child).map(Widget::pos) else {
        return false;
    };

    ops::event(tree, ctx, child, &ev.relative_to(pos))
}

/// Selects the child at a cell, releasing the previous selection only
/// after the new one accepted.
fn try_select(tree: &mut WidgetTree, id: WidgetId, col: usize, row: usize, op: SelectOp) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    let old = grid.selected_child();
    let Some(target) = grid.cell(col, row) else {
        return false;
    };

    if !ops::select(tree, target, op) {
        return false;
    }

    if let Some(old) = old {
        if old != target {
            ops::select(tree, old, SelectOp::Out);
        }
    }

    if let Some(grid) = tree.get_mut(id).and_then(|w| w.as_grid_mut()) {
        grid.selected_col = col;
        grid.selected_row = row;
    }

    true
}

fn select_next(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    let (cols, rows) = (grid.cols, grid.rows);
    let (mut col, mut row) = (grid.selected_col, grid.selected_row);

    loop {
        if col + 1 < cols {
            col += 1;
        } else if row + 1 < rows {
            col = 0;
            row += 1;
        } else {
            return false;
        }

        if try_select(tree, id, col, row, op) {
            return true;
        }
    }
}

fn select_prev(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    let cols = grid.cols;
    let (mut col, mut row) = (grid.selected_col, grid.selected_row);

    loop {
        if col > 0 {
            col -= 1;
        } else if row > 0 {
            row -= 1;
            col = cols - 1;
        } else {
            return false;
        }

        if try_select(tree, id, col, row, op) {
            return true;
        }
    }
}

fn select_dir(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    let (cols, rows) = (grid.cols, grid.rows);
    let (mut col, mut row) = (grid.selected_col, grid.selected_row);

    loop {
        match op {
            SelectOp::Left => {
                if col == 0 {
                    return false;
                }
                col -= 1;
            }
            SelectOp::Right => {
                col += 1;
                if col >= cols {
                    return false;
                }
            }
            SelectOp::Up => {
                if row == 0 {
                    return false;
                }
                row -= 1;
            }
            SelectOp::Down => {
                row += 1;
                if row >= rows {
                    return false;
                }
            }
            _ => return false,
        }

        if try_select(tree, id, col, row, op) {
            return true;
        }
    }
}

pub(crate) fn select(tree: &mut WidgetTree, id: WidgetId, op: SelectOp) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    // The selected child gets the first claim, so moves stay as deep in
    // the tree as possible.
    if let Some(child) = grid.selected_child() {
        if ops::select(tree, child, op) {
            return true;
        }
    }

    match op {
        SelectOp::In => {
            let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
                return false;
            };
            let (col, row) = (grid.selected_col, grid.selected_row);
            try_select(tree, id, col, row, op)
        }
        SelectOp::Next => select_next(tree, id, op),
        SelectOp::Prev => select_prev(tree, id, op),
        SelectOp::Left | SelectOp::Right | SelectOp::Up | SelectOp::Down => {
            select_dir(tree, id, op)
        }
        SelectOp::Out => false,
    }
}

fn coord_search(coord: i32, offsets: &[u32], sizes: &[u32]) -> Option<usize> {
    if coord < 0 {
        return None;
    }
    let coord = coord as u32;

    offsets
        .iter()
        .zip(sizes)
        .position(|(off, size)| coord >= *off && coord <= *off + *size)
}

pub(crate) fn select_xy(tree: &mut WidgetTree, ctx: &RenderCtx, id: WidgetId, pos: Point) -> bool {
    let Some(grid) = tree.get(id).and_then(|w| w.as_grid()) else {
        return false;
    };

    let Some(col) = coord_search(pos.x, &grid.cols_off, &grid.cols_w) else {
        return false;
    };
    let Some(row) = coord_search(pos.y, &grid.rows_off, &grid.rows_h) else {
        return false;
    };

    let old = grid.selected_child();
    let moved = grid.selected_col != col || grid.selected_row != row;
    let Some(target) = grid.cell(col, row) else {
        return false;
    };

    let Some(target_pos) = tree.get(target).map(Widget::pos) else {
        return false;
    };

    if !ops::select_xy(tree, ctx, target, pos.offset(Point::new(-target_pos.x, -target_pos.y))) {
        return false;
    }

    if moved {
        if let Some(old) = old {
            ops::select(tree, old, SelectOp::Out);
        }
    }

    if let Some(grid) = tree.get_mut(id).and_then(|w| w.as_grid_mut()) {
        grid.selected_col = col;
        grid.selected_row = row;
    }

    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::widgets::pixmap::PixmapArea;
    use crate::geometry::Size;

    fn fixed(tree: &mut WidgetTree, w: u32, h: u32) -> WidgetId {
        PixmapArea::new(tree, Size::new(w, h))
    }

    #[test]
    fn min_size_sums_columns_and_padding() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let grid = Grid::new(&mut tree, 2, 1);
        let a = fixed(&mut tree, 10, 8);
        let b = fixed(&mut tree, 30, 12);
        Grid::put(&mut tree, grid, 0, 0, a);
        Grid::put(&mut tree, grid, 1, 0, b);

        // 3 boundaries x padd 4 + 10 + 30.
        assert_eq!(min_w(&mut tree, &ctx, grid), 52);
        // 2 boundaries x padd 4 + max(8, 12).
        assert_eq!(min_h(&mut tree, &ctx, grid), 20);
    }

    #[test]
    fn uniform_grid_uses_the_global_maximum() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let grid = Grid::new(&mut tree, 2, 1);
        Grid::set_uniform(&mut tree, grid, true);
        let a = fixed(&mut tree, 10, 8);
        let b = fixed(&mut tree, 30, 12);
        Grid::put(&mut tree, grid, 0, 0, a);
        Grid::put(&mut tree, grid, 1, 0, b);

        // Both columns as wide as the widest child: 2 * 30 + 12 padding.
        assert_eq!(min_w(&mut tree, &ctx, grid), 72);
    }

    #[test]
    fn leftover_slack_is_not_redistributed() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let grid = Grid::new(&mut tree, 3, 1);
        Grid::set_border(&mut tree, grid, 0);
        for col in 0..3 {
            let child = fixed(&mut tree, 10, 10);
            tree.set_align(child, crate::align::Align::FILL);
            Grid::put(&mut tree, grid, col, 0, child);
        }
        tree.set_align(grid, crate::align::Align::FILL);

        // min_w = 3*10 + 2 gaps * 4 = 38; request 48 leaves dx = 10 split
        // by three fills: each column gains 3, one pixel parks at the end.
        ops::calc_size(&mut tree, &ctx, grid, 48, 18, true);

        let g = tree.get(grid).unwrap().as_grid().unwrap();
        assert_eq!(g.cols_w, vec![13, 13, 13]);
        assert_eq!(g.cols_off, vec![0, 17, 34]);
    }

    #[test]
    fn padding_fills_absorb_slack_into_offsets() {
        let mut tree = WidgetTree::new();
        let ctx = RenderCtx::for_tests();
        let grid = Grid::new(&mut tree, 1, 1);
        Grid::set_border(&mut tree, grid, 0);
        let child = fixed(&mut tree, 10, 10);
        Grid::put(&mut tree, grid, 0, 0, child);
        tree.set_align(grid, crate::align::Align::FILL);

        {
            let w = tree.get_mut(grid).unwrap();
            let g = w.as_grid_mut().unwrap();
            g.col_fills[0] = 0;
            g.col_pfills[0] = 1;
            g.col_pfills[1] = 1;
        }

        // dx = 30 split over two padding fills, the cell stays 10 wide and
        // starts after the first 15px share.
        ops::calc_size(&mut tree, &ctx, grid, 40, 10, true);

        let g = tree.get(grid).unwrap().as_grid().unwrap();
        assert_eq!(g.cols_w, vec![10]);
        assert_eq!(g.cols_off, vec![15]);
    }

    #[test]
    fn put_rejects_out_of_range_cells() {
        let mut tree = WidgetTree::new();
        let grid = Grid::new(&mut tree, 1, 1);
        let child = fixed(&mut tree, 4, 4);

        assert!(Grid::put(&mut tree, grid, 5, 0, child).is_none());
        assert!(tree.get(grid).unwrap().payload.children().is_empty());
        // The child stayed unattached and can be placed properly.
        assert!(Grid::put(&mut tree, grid, 0, 0, child).is_none());
        assert_eq!(tree.get(grid).unwrap().payload.children().len(), 1);
    }

    #[test]
    fn put_displaces_and_detaches_the_previous_child() {
        let mut tree = WidgetTree::new();
        let grid = Grid::new(&mut tree, 1, 1);
        let first = fixed(&mut tree, 4, 4);
        let second = fixed(&mut tree, 4, 4);

        assert_eq!(Grid::put(&mut tree, grid, 0, 0, first), None);
        assert_eq!(Grid::put(&mut tree, grid, 0, 0, second), Some(first));
        // The displaced child is detached, not removed.
        assert!(tree.get(first).is_some());
        assert_eq!(Grid::put(&mut tree, grid, 0, 0, first), Some(second));
    }

    #[test]
    fn take_detaches_the_child() {
        let mut tree = WidgetTree::new();
        let grid = Grid::new(&mut tree, 2, 1);
        let child = fixed(&mut tree, 4, 4);
        Grid::put(&mut tree, grid, 1, 0, child);

        assert_eq!(Grid::take(&mut tree, grid, 1, 0), Some(child));
        assert_eq!(Grid::take(&mut tree, grid, 1, 0), None);
        assert!(tree.get(child).is_some());
    }
}
