//! Shared state for layout and draw passes.
//!
//! A [`RenderCtx`] carries the fonts, padding unit and colour [`Palette`]
//! every widget consults while sizing and painting itself. Palettes can be
//! overridden from a TOML theme table via [`ThemeConfig`].

use serde::Deserialize;

use crate::canvas::Pixel;
use crate::font::{FixedFont, Font};
use crate::geometry::Rect;
use crate::utils::error::{Result, TrellisError};

/// Colour assignments used by the stock widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Text and frames.
    pub text: Pixel,
    /// Window background.
    pub bg: Pixel,
    /// Widget face.
    pub fg: Pixel,
    /// Accented widget face, e.g. the filled part of a progress bar.
    pub fg2: Pixel,
    /// Keyboard focus highlight.
    pub sel: Pixel,
    /// Invalid input flash.
    pub alert: Pixel,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: 0x00_00_00,
            bg: 0xdd_dd_dd,
            fg: 0xee_ee_ee,
            fg2: 0x44_66_aa,
            sel: 0x11_66_cc,
            alert: 0xcc_44_11,
        }
    }
}

/// Optional palette overrides, deserialized from a `[theme]` table. Colours
/// are `#rrggbb` strings; absent entries keep the built-in default.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub text: Option<String>,
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub fg2: Option<String>,
    pub sel: Option<String>,
    pub alert: Option<String>,
}

impl ThemeConfig {
    pub fn to_palette(&self) -> Result<Palette> {
        let mut palette = Palette::default();

        if let Some(text) = &self.text {
            palette.text = parse_hex(text)?;
        }
        if let Some(bg) = &self.bg {
            palette.bg = parse_hex(bg)?;
        }
        if let Some(fg) = &self.fg {
            palette.fg = parse_hex(fg)?;
        }
        if let Some(fg2) = &self.fg2 {
            palette.fg2 = parse_hex(fg2)?;
        }
        if let Some(sel) = &self.sel {
            palette.sel = parse_hex(sel)?;
        }
        if let Some(alert) = &self.alert {
            palette.alert = parse_hex(alert)?;
        }

        Ok(palette)
    }
}

fn parse_hex(s: &str) -> Result<Pixel> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 {
        return Err(TrellisError::InvalidValue(format!(
            "expected #rrggbb colour, got '{s}'"
        )));
    }

    Pixel::from_str_radix(digits, 16)
        .map_err(|_| TrellisError::InvalidValue(format!("expected #rrggbb colour, got '{s}'")))
}

/// Everything the size and draw passes need besides the widget tree itself.
pub struct RenderCtx {
    pub font: Box<dyn Font>,
    pub font_bold: Box<dyn Font>,
    /// Base padding unit in pixels. Grid gaps and widget insets are
    /// expressed as multiples of this.
    pub padd: u32,
    pub palette: Palette,
}

impl RenderCtx {
    pub fn new(font: Box<dyn Font>, font_bold: Box<dyn Font>, padd: u32) -> Self {
        Self {
            font,
            font_bold,
            padd,
            palette: Palette::default(),
        }
    }

    /// Fixed metrics used throughout the test suite; an 8px advance font
    /// with a 4px padding unit.
    pub fn for_tests() -> Self {
        Self::new(
            Box::new(FixedFont::default()),
            Box::new(FixedFont::bold()),
            4,
        )
    }
}

/// Bounding box of everything repainted during a draw pass. Backends flush
/// just this region to the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    bbox: Rect,
}

impl Damage {
    pub fn add(&mut self, area: Rect) {
        self.bbox = self.bbox.union(area);
    }

    pub fn is_empty(&self) -> bool {
        self.bbox.is_empty()
    }

    /// Returns the accumulated region and resets the accumulator.
    pub fn take(&mut self) -> Option<Rect> {
        let bbox = std::mem::take(&mut self.bbox);
        (!bbox.is_empty()).then_some(bbox)
    }
}
