//! A single-line text entry with a grapheme-aware cursor.
//!
//! The buffer holds at most `capacity` grapheme clusters. Rejected input
//! (full buffer, filtered character, backspace at the start) flashes the
//! frame in the alert color instead of changing anything.

use hashbrown::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::canvas::Canvas;
use crate::event::{InputEvent, InputEventKind, Key, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};
use crate::widgets::spinner::ALERT_MS;

/// The set of characters a textbox admits, kept both as the original
/// charset string (text metrics want one) and as a set for the per-key test.
pub(crate) struct Filter {
    charset: String,
    allowed: HashSet<char>,
}

impl Filter {
    fn new(charset: impl Into<String>) -> Self {
        let charset = charset.into();
        let allowed = charset.chars().collect();
        Self { charset, allowed }
    }

    fn admits(&self, ch: char) -> bool {
        self.allowed.contains(&ch)
    }
}

pub struct TextBox {
    pub(crate) buf: String,
    /// Cursor as a grapheme index into `buf`.
    pub(crate) cur: usize,
    /// Buffer limit in graphemes.
    pub(crate) capacity: usize,
    pub(crate) filter: Option<Filter>,
    /// Echo asterisks instead of the content.
    pub hidden: bool,
    pub(crate) alert: bool,
}

fn count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte offset of the `grapheme`-th cluster, or the end of the string.
fn byte_at(s: &str, grapheme: usize) -> usize {
    s.grapheme_indices(true)
        .nth(grapheme)
        .map_or(s.len(), |(off, _)| off)
}

impl TextBox {
    /// Inserts a textbox holding `text` with room for `capacity` graphemes.
    /// A zero capacity sizes the box to the initial text; an overlong text
    /// is truncated with a warning.
    pub fn new(tree: &mut WidgetTree, text: impl Into<String>, capacity: usize) -> WidgetId {
        let mut buf: String = text.into();
        let len = count(&buf);

        let capacity = if capacity == 0 { len.max(1) } else { capacity };
        if len > capacity {
            warn!("Text '{buf}' does not fit into {capacity} characters");
            buf.truncate(byte_at(&buf, capacity));
        }

        let tbox = TextBox {
            cur: count(&buf),
            buf,
            capacity,
            filter: None,
            hidden: false,
            alert: false,
        };

        tree.insert(Widget::new(WidgetPayload::TextBox(tbox)))
    }

    pub fn text(&self) -> &str {
        &self.buf
    }

    /// Cursor position in graphemes.
    pub fn cursor_at(&self) -> usize {
        self.cur
    }

    /// Replaces the content, truncating to the capacity, and puts the
    /// cursor behind the last character.
    pub fn set_text(tree: &mut WidgetTree, id: WidgetId, text: impl Into<String>) {
        let mut text: String = text.into();

        let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) else {
            return;
        };

        if count(&text) > tbox.capacity {
            warn!("Text '{text}' does not fit into {} characters", tbox.capacity);
            text.truncate(byte_at(&text, tbox.capacity));
        }

        tbox.cur = count(&text);
        tbox.buf = text;
        tree.redraw(id);
    }

    pub fn clear(tree: &mut WidgetTree, id: WidgetId) {
        if let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) {
            tbox.buf.clear();
            tbox.cur = 0;
        }
        tree.redraw(id);
    }

    /// Restricts input to characters of `charset`. Affects the minimal
    /// width, so the layout is recomputed.
    pub fn set_filter(tree: &mut WidgetTree, id: WidgetId, charset: impl Into<String>) {
        if let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) {
            tbox.filter = Some(Filter::new(charset));
        }
        tree.resize(id);
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        let chars = self.capacity as u32;
        let text_w = match &self.filter {
            Some(filter) => ctx.font.max_width_chars(&filter.charset, chars),
            None => ctx.font.max_width(chars),
        };

        2 * ctx.padd + text_w
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.ascent()
    }

    fn echo(&self) -> String {
        if self.hidden {
            "*".repeat(count(&self.buf))
        } else {
            self.buf.clone()
        }
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let frame = if self.alert {
            ctx.palette.alert
        } else if widget.is_selected() {
            ctx.palette.sel
        } else {
            ctx.palette.text
        };

        canvas.fill_rrect(
            Rect::new(origin.x, origin.y, widget.w, widget.h),
            ctx.palette.bg,
            ctx.palette.fg,
            frame,
        );

        let echo = self.echo();
        let padd = ctx.padd as i32;

        if widget.is_selected() {
            let before: String = echo.graphemes(true).take(self.cur).collect();
            let cursor_x = origin.x + padd + ctx.font.width(&before) as i32;
            canvas.vline(cursor_x, origin.y + padd, ctx.font.ascent(), ctx.palette.text);
        }

        canvas.text(
            &*ctx.font,
            Point::new(origin.x + padd, origin.y + padd),
            ctx.palette.text,
            &echo,
        );
    }
}

fn schedule_alert(tree: &mut WidgetTree, id: WidgetId) {
    if let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) {
        tbox.alert = true;
    }
    tree.redraw(id);
    tree.schedule_timer(id, ALERT_MS);
}

fn insert(tree: &mut WidgetTree, id: WidgetId, ch: char) {
    let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) else {
        return;
    };

    if count(&tbox.buf) >= tbox.capacity {
        schedule_alert(tree, id);
        return;
    }

    if tbox.filter.as_ref().is_some_and(|f| !f.admits(ch)) {
        schedule_alert(tree, id);
        return;
    }

    let off = byte_at(&tbox.buf, tbox.cur);
    tbox.buf.insert(off, ch);
    tbox.cur += 1;

    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn backspace(tree: &mut WidgetTree, id: WidgetId) {
    let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) else {
        return;
    };

    if tbox.cur == 0 {
        schedule_alert(tree, id);
        return;
    }

    let (start, grapheme) = match tbox.buf.grapheme_indices(true).nth(tbox.cur - 1) {
        Some(hit) => (hit.0, hit.1.len()),
        None => return,
    };

    tbox.buf.replace_range(start..start + grapheme, "");
    tbox.cur -= 1;

    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn delete(tree: &mut WidgetTree, id: WidgetId) {
    let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) else {
        return;
    };

    let Some((start, grapheme)) = tbox
        .buf
        .grapheme_indices(true)
        .nth(tbox.cur)
        .map(|(off, g)| (off, g.len()))
    else {
        schedule_alert(tree, id);
        return;
    };

    tbox.buf.replace_range(start..start + grapheme, "");

    tree.redraw(id);
    tree.send_event(id, WidgetEvent::Edit);
}

fn move_cursor(tree: &mut WidgetTree, id: WidgetId, to: impl Fn(&TextBox) -> usize) {
    let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) else {
        return;
    };

    let target = to(tbox).min(count(&tbox.buf));
    if target == tbox.cur {
        return;
    }

    tbox.cur = target;
    tree.redraw(id);
}

pub(crate) fn event(
    tree: &mut WidgetTree, _ctx: &RenderCtx, id: WidgetId, ev: &InputEvent,
) -> bool {
    if ev.kind == InputEventKind::Timer {
        if let Some(tbox) = tree.get_mut(id).and_then(|w| w.as_textbox_mut()) {
            tbox.alert = false;
        }
        tree.redraw(id);
        return true;
    }

    match ev.pressed() {
        Some(Key::Tab) => false,
        Some(Key::Enter) => {
            tree.send_event(id, WidgetEvent::Action);
            true
        }
        Some(Key::Left) => {
            move_cursor(tree, id, |t| t.cur.saturating_sub(1));
            true
        }
        Some(Key::Right) => {
            move_cursor(tree, id, |t| t.cur + 1);
            true
        }
        Some(Key::Home) => {
            move_cursor(tree, id, |_| 0);
            true
        }
        Some(Key::End) => {
            move_cursor(tree, id, |t| count(&t.buf));
            true
        }
        Some(Key::Backspace) => {
            backspace(tree, id);
            true
        }
        Some(Key::Delete) => {
            delete(tree, id);
            true
        }
        Some(Key::Char(ch)) => {
            insert(tree, id, ch);
            true
        }
        _ => false,
    }
}
