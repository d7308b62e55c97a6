//! Static text, optionally bold, framed or right-aligned.

use unicode_segmentation::UnicodeSegmentation;

use crate::canvas::Canvas;
use crate::font::Font;
use crate::geometry::{Point, Rect};
use crate::render::RenderCtx;
use crate::widget::{Widget, WidgetId, WidgetPayload, WidgetTree};

pub struct Label {
    pub text: String,
    pub bold: bool,
    /// Reserved width in characters; zero sizes the label to its text.
    /// Useful for counters so the layout does not jitter as digits change.
    pub width: u32,
    pub frame: bool,
    pub ralign: bool,
}

impl Label {
    pub fn new(tree: &mut WidgetTree, text: impl Into<String>) -> WidgetId {
        let label = Label {
            text: text.into(),
            bold: false,
            width: 0,
            frame: false,
            ralign: false,
        };

        tree.insert(Widget::new(WidgetPayload::Label(label)))
    }

    /// Replaces the text. A label sized to its text requests a relayout; a
    /// label with a reserved width only repaints, unless the new text
    /// outgrew the reservation.
    pub fn set_text(tree: &mut WidgetTree, id: WidgetId, text: impl Into<String>) {
        let text = text.into();

        let Some(label) = tree.get_mut(id).and_then(|w| w.as_label_mut()) else {
            return;
        };

        let fits = label.width > 0 && text.graphemes(true).count() <= label.width as usize;
        label.text = text;

        if fits {
            tree.redraw(id);
        } else {
            tree.resize(id);
        }
    }

    fn font<'a>(&self, ctx: &'a RenderCtx) -> &'a dyn Font {
        if self.bold {
            &*ctx.font_bold
        } else {
            &*ctx.font
        }
    }

    pub(crate) fn min_w(&self, ctx: &RenderCtx) -> u32 {
        let font = self.font(ctx);

        // An overlong text wins over the reservation so it never clips.
        let mut width = font.width(&self.text);
        if self.width > 0 {
            width = width.max(font.max_width(self.width));
        }

        if self.frame {
            width += 2 * ctx.padd;
        }

        width
    }

    pub(crate) fn min_h(&self, ctx: &RenderCtx) -> u32 {
        2 * ctx.padd + ctx.font.ascent()
    }

    pub(crate) fn render(
        &self, widget: &Widget, ctx: &RenderCtx, canvas: &mut dyn Canvas, origin: Point,
    ) {
        let font = self.font(ctx);
        let mut x = origin.x;
        let mut w = widget.w;

        if self.frame {
            canvas.fill_rrect(
                Rect::new(x, origin.y, w, widget.h),
                ctx.palette.bg,
                ctx.palette.fg,
                ctx.palette.text,
            );
            x += ctx.padd as i32;
            w = w.saturating_sub(2 * ctx.padd);
        } else {
            canvas.fill_rect(Rect::new(x, origin.y, w, widget.h), ctx.palette.bg);
        }

        let text_x = if self.ralign {
            x + w as i32 - font.width(&self.text) as i32
        } else {
            x
        };

        canvas.text(
            font,
            Point::new(text_x, origin.y + ctx.padd as i32),
            ctx.palette.text,
            &self.text,
        );
    }
}
