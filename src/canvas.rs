//! The pixel-drawing surface the toolkit renders into.
//!
//! Widgets never touch raw pixel memory; everything goes through the
//! [`Canvas`] trait with explicit colors and coordinates. Real backends
//! implement the trait over their framebuffer; [`Pixmap`] is the in-memory
//! implementation used by tests, offscreen rendering, and pixmap widgets.
//!
//! Most primitives have provided implementations in terms of
//! [`Canvas::put_pixel`] and [`Canvas::fill_rect`]; implementations are free
//! to override them with something faster. Clipping is part of the contract:
//! nothing may paint outside the current clip rectangle.

use crate::font::Font;
use crate::geometry::{Point, Rect, Size};

/// A packed `0xAARRGGBB` color value.
pub type Pixel = u32;

pub trait Canvas {
    fn size(&self) -> Size;

    /// Restricts painting to `clip` (in canvas coordinates) until changed.
    /// `None` restores the full surface.
    fn set_clip(&mut self, clip: Option<Rect>);

    fn clip(&self) -> Option<Rect>;

    fn put_pixel(&mut self, p: Point, color: Pixel);

    fn fill_rect(&mut self, r: Rect, color: Pixel);

    /// Draws `s` with its top-left corner at `pos`. Callers do their own
    /// centering arithmetic from [`Font`] metrics.
    fn text(&mut self, font: &dyn Font, pos: Point, color: Pixel, s: &str);

    /// Copies `src_rect` out of another pixmap to `dst`.
    fn blit(&mut self, src: &Pixmap, src_rect: Rect, dst: Point);

    fn fill(&mut self, color: Pixel) {
        self.fill_rect(Rect::from_size(self.size()), color);
    }

    fn hline(&mut self, x: i32, y: i32, w: u32, color: Pixel) {
        self.fill_rect(Rect::new(x, y, w, 1), color);
    }

    fn vline(&mut self, x: i32, y: i32, h: u32, color: Pixel) {
        self.fill_rect(Rect::new(x, y, 1, h), color);
    }

    /// Rectangle outline.
    fn rect(&mut self, r: Rect, color: Pixel) {
        if r.is_empty() {
            return;
        }
        self.hline(r.x, r.y, r.w, color);
        self.hline(r.x, r.bottom() - 1, r.w, color);
        self.vline(r.x, r.y, r.h, color);
        self.vline(r.right() - 1, r.y, r.h, color);
    }

    /// The standard widget body: `bg` for the corners outside the rounding,
    /// `fill` for the interior, `frame` for the outline.
    fn fill_rrect(&mut self, r: Rect, bg: Pixel, fill: Pixel, frame: Pixel) {
        if r.is_empty() {
            return;
        }

        self.fill_rect(r, fill);

        for (cx, cy) in [
            (r.x, r.y),
            (r.right() - 1, r.y),
            (r.x, r.bottom() - 1),
            (r.right() - 1, r.bottom() - 1),
        ] {
            self.put_pixel(Point::new(cx, cy), bg);
        }

        self.hline(r.x + 1, r.y, r.w.saturating_sub(2), frame);
        self.hline(r.x + 1, r.bottom() - 1, r.w.saturating_sub(2), frame);
        self.vline(r.x, r.y + 1, r.h.saturating_sub(2), frame);
        self.vline(r.right() - 1, r.y + 1, r.h.saturating_sub(2), frame);
    }

    fn line(&mut self, a: Point, b: Point, color: Pixel) {
        // Bresenham.
        let (mut x, mut y) = (a.x, a.y);
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put_pixel(Point::new(x, y), color);
            if x == b.x && y == b.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn circle(&mut self, center: Point, r: u32, color: Pixel) {
        // Midpoint circle.
        let r = r as i32;
        let (mut x, mut y) = (r, 0);
        let mut err = 1 - r;

        while x >= y {
            for (px, py) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.put_pixel(Point::new(center.x + px, center.y + py), color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    fn fill_circle(&mut self, center: Point, r: u32, color: Pixel) {
        let r = r as i32;
        for dy in -r..=r {
            let half = ((r * r - dy * dy) as f64).sqrt() as i32;
            self.hline(center.x - half, center.y + dy, (2 * half + 1) as u32, color);
        }
    }

    /// Upward-pointing triangle centered at `center`, `size` pixels from the
    /// center to the base corners.
    fn triangle_up(&mut self, center: Point, size: u32, color: Pixel) {
        let s = size as i32;
        for dy in 0..=s {
            let half = dy * s / s.max(1);
            self.hline(
                center.x - half,
                center.y - s / 2 + dy,
                (2 * half + 1) as u32,
                color,
            );
        }
    }

    fn triangle_down(&mut self, center: Point, size: u32, color: Pixel) {
        let s = size as i32;
        for dy in 0..=s {
            let half = (s - dy) * s / s.max(1);
            self.hline(
                center.x - half,
                center.y - s / 2 + dy,
                (2 * half + 1) as u32,
                color,
            );
        }
    }
}

/// An owned in-memory pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    w: u32,
    h: u32,
    pixels: Vec<Pixel>,
    clip: Option<Rect>,
}

impl Pixmap {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            pixels: vec![0; (w * h) as usize],
            clip: None,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        if x >= self.w || y >= self.h {
            return 0;
        }
        self.pixels[(y * self.w + x) as usize]
    }

    /// Drops the content and takes a new size.
    pub fn resize(&mut self, size: Size) {
        self.w = size.w;
        self.h = size.h;
        self.clip = None;
        self.pixels.clear();
        self.pixels.resize((size.w * size.h) as usize, 0);
    }

    /// The number of pixels with the given exact value; handy in tests.
    pub fn count_pixels(&self, color: Pixel) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    fn writable(&self, p: Point) -> bool {
        if p.x < 0 || p.y < 0 || p.x >= self.w as i32 || p.y >= self.h as i32 {
            return false;
        }
        match self.clip {
            Some(clip) => clip.contains(p),
            None => true,
        }
    }
}

impl Canvas for Pixmap {
    fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn clip(&self) -> Option<Rect> {
        self.clip
    }

    fn put_pixel(&mut self, p: Point, color: Pixel) {
        if self.writable(p) {
            self.pixels[(p.y as u32 * self.w + p.x as u32) as usize] = color;
        }
    }

    fn fill_rect(&mut self, r: Rect, color: Pixel) {
        let mut r = r.intersection(Rect::from_size(self.size()));
        if let Some(clip) = self.clip {
            r = r.intersection(clip);
        }

        for y in r.y..r.bottom() {
            let row = (y as u32 * self.w) as usize;
            self.pixels[row + r.x as usize..row + r.right() as usize].fill(color);
        }
    }

    fn text(&mut self, font: &dyn Font, pos: Point, color: Pixel, s: &str) {
        // Glyph shaping belongs to real backends; the test surface puts down
        // a baseline strip with the right metrics so geometry stays checkable.
        let w = font.width(s);
        let baseline = pos.y + font.ascent() as i32 - 1;
        self.hline(pos.x, baseline, w, color);
    }

    fn blit(&mut self, src: &Pixmap, src_rect: Rect, dst: Point) {
        let src_rect = src_rect.intersection(Rect::from_size(src.size()));

        for dy in 0..src_rect.h as i32 {
            for dx in 0..src_rect.w as i32 {
                let p = src.pixel((src_rect.x + dx) as u32, (src_rect.y + dy) as u32);
                self.put_pixel(Point::new(dst.x + dx, dst.y + dy), p);
            }
        }
    }
}
