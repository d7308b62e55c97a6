//! Text metrics the layout engine consumes.
//!
//! Font loading and glyph shaping live behind the [`Font`] trait; the core
//! only ever asks for widths and vertical metrics. [`FixedFont`] is the
//! bundled monospace metric set used by tests and the memory backend.

use unicode_segmentation::UnicodeSegmentation;

use crate::canvas::{Canvas, Pixel};
use crate::geometry::Point;

pub trait Font {
    /// Pixels above the baseline.
    fn ascent(&self) -> u32;

    /// Pixels below the baseline.
    fn descent(&self) -> u32;

    fn height(&self) -> u32 {
        self.ascent() + self.descent()
    }

    /// Rendered width of a string in pixels.
    fn width(&self, s: &str) -> u32;

    /// The widest single glyph the font can produce.
    fn max_glyph_width(&self) -> u32;

    /// Upper bound for the width of any `chars`-glyph string.
    fn max_width(&self, chars: u32) -> u32 {
        chars * self.max_glyph_width()
    }

    /// Upper bound for the width of a `chars`-glyph string drawn from the
    /// given set, e.g. a numeric charset for spinners.
    fn max_width_chars(&self, charset: &str, chars: u32) -> u32 {
        let widest = charset
            .graphemes(true)
            .map(|g| self.width(g))
            .max()
            .unwrap_or(0);

        chars * widest
    }
}

/// Fixed-advance font metrics. There is no glyph data behind it; backends
/// that render actual text bring their own [`Font`] implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedFont {
    pub advance: u32,
    pub ascent: u32,
    pub descent: u32,
}

impl Default for FixedFont {
    fn default() -> Self {
        Self {
            advance: 8,
            ascent: 10,
            descent: 2,
        }
    }
}

impl FixedFont {
    /// A wider variant standing in for a bold face.
    pub fn bold() -> Self {
        Self {
            advance: 9,
            ..Self::default()
        }
    }
}

impl Font for FixedFont {
    fn ascent(&self) -> u32 {
        self.ascent
    }

    fn descent(&self) -> u32 {
        self.descent
    }

    fn width(&self, s: &str) -> u32 {
        s.graphemes(true).count() as u32 * self.advance
    }

    fn max_glyph_width(&self) -> u32 {
        self.advance
    }
}

/// Draws `s` left-anchored at `pos`, truncated with an ellipsis when it does
/// not fit into `max_width` pixels.
///
/// The fitting grapheme count is found by binary search so very long strings
/// in narrow cells stay cheap.
pub fn text_fit(
    canvas: &mut dyn Canvas, font: &dyn Font, pos: Point, max_width: u32, color: Pixel, s: &str,
) {
    if font.width(s) <= max_width {
        canvas.text(font, pos, color, s);
        return;
    }

    let graphemes: Vec<&str> = s.graphemes(true).collect();
    let fits = |count: usize| -> bool {
        let end = match graphemes.get(..count) {
            Some(prefix) => prefix.iter().map(|g| g.len()).sum(),
            None => s.len(),
        };
        font.width(&s[..end]) + font.width("…") <= max_width
    };

    let (mut lo, mut hi) = (0, graphemes.len());
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    if lo == 0 {
        return;
    }

    let end: usize = graphemes[..lo].iter().map(|g| g.len()).sum();
    let truncated = format!("{}…", &s[..end]);
    canvas.text(font, pos, color, &truncated);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::Pixmap;

    #[test]
    fn fixed_font_width_counts_graphemes() {
        let font = FixedFont::default();
        assert_eq!(font.width(""), 0);
        assert_eq!(font.width("abc"), 24);
        // One grapheme even though it is multiple bytes.
        assert_eq!(font.width("é"), 8);
    }

    #[test]
    fn max_width_chars_uses_widest_glyph() {
        let font = FixedFont::default();
        assert_eq!(font.max_width_chars("-0123456789", 4), 32);
        assert_eq!(font.max_width_chars("", 4), 0);
    }

    #[test]
    fn text_fit_draws_untruncated_when_it_fits() {
        let font = FixedFont::default();
        let mut pix = Pixmap::new(100, 16);
        text_fit(&mut pix, &font, Point::new(0, 0), 100, 0xff, "hello");
        assert_eq!(pix.count_pixels(0xff) as u32, font.width("hello"));
    }

    #[test]
    fn text_fit_truncates_with_ellipsis() {
        let font = FixedFont::default();
        let mut pix = Pixmap::new(100, 16);
        // 5 glyphs fit; "hell" + ellipsis takes 5 * 8 = 40.
        text_fit(&mut pix, &font, Point::new(0, 0), 40, 0xff, "hello world");
        assert_eq!(pix.count_pixels(0xff), 40);
    }

    #[test]
    fn text_fit_gives_up_below_one_glyph() {
        let font = FixedFont::default();
        let mut pix = Pixmap::new(100, 16);
        text_fit(&mut pix, &font, Point::new(0, 0), 10, 0xff, "hello");
        assert_eq!(pix.count_pixels(0xff), 0);
    }
}
