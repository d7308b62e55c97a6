//! Per-widget alignment within the cell a container hands out.
//!
//! Both axes are independent. "Weak" centering is the default a widget gets
//! when nothing is configured; it behaves like [`HAlign::Center`] during
//! placement but layout descriptions may override it without warning.

/// Horizontal placement within the allotted cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    CenterWeak,
    Center,
    Left,
    Right,
    /// Consume the whole cell width instead of the minimal width.
    Fill,
}

/// Vertical placement within the allotted cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    CenterWeak,
    Center,
    Top,
    Bottom,
    /// Consume the whole cell height instead of the minimal height.
    Fill,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Align {
    pub h: HAlign,
    pub v: VAlign,
}

impl Align {
    /// Fill on both axes.
    pub const FILL: Align = Align {
        h: HAlign::Fill,
        v: VAlign::Fill,
    };

    /// Explicit centering on both axes.
    pub const CENTER: Align = Align {
        h: HAlign::Center,
        v: VAlign::Center,
    };

    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    /// Horizontal offset of a widget of minimal width `min_w` within a cell
    /// of width `cell_w`, and the width it should take.
    pub(crate) fn place_h(&self, cell_w: u32, min_w: u32) -> (u32, u32) {
        let extra = cell_w.saturating_sub(min_w);

        match self.h {
            HAlign::CenterWeak | HAlign::Center => (extra / 2, min_w),
            HAlign::Right => (extra, min_w),
            HAlign::Left => (0, min_w),
            HAlign::Fill => (0, cell_w),
        }
    }

    /// Vertical counterpart of [`Align::place_h`].
    pub(crate) fn place_v(&self, cell_h: u32, min_h: u32) -> (u32, u32) {
        let extra = cell_h.saturating_sub(min_h);

        match self.v {
            VAlign::CenterWeak | VAlign::Center => (extra / 2, min_h),
            VAlign::Bottom => (extra, min_h),
            VAlign::Top => (0, min_h),
            VAlign::Fill => (0, cell_h),
        }
    }
}
