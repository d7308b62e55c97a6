//! A retained-mode widget toolkit for software-rasterized pixel buffers.
//!
//! Widgets live in a [`WidgetTree`] and are addressed by generational
//! [`WidgetId`]s. Containers (grids, tabs, switches, overlays, scroll
//! areas) compute bottom-up minimal sizes and distribute the space they
//! are given top-down; leaves paint themselves into a [`Canvas`]; a
//! [`Runtime`] drives the event loop over a pluggable [`Backend`],
//! repainting only what a dispatched event dirtied. Trees are built in
//! code or loaded from TOML descriptions via [`Layout`].
//!
//! ```
//! use trellis::widgets::Button;
//! use trellis::{MemoryBackend, RenderCtx, Runtime, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//! let root = Button::new(&mut tree, "Quit");
//!
//! let backend = MemoryBackend::new(320, 240);
//! let mut runtime = Runtime::new(backend, RenderCtx::for_tests(), tree, root);
//! assert!(runtime.step());
//! ```

#[macro_use]
extern crate log;

pub mod utils {
    pub mod error;
    pub mod logging;
}
pub mod align;
pub mod backend;
pub mod canvas;
pub mod event;
pub mod font;
pub mod geometry;
pub mod loader;
pub mod ops;
pub mod render;
pub mod runtime;
mod timer;
pub mod widget;
pub mod widgets;

pub use align::{Align, HAlign, VAlign};
pub use backend::{Backend, MemoryBackend};
pub use canvas::{Canvas, Pixel, Pixmap};
pub use event::{AppEvent, BackendEvent, InputEvent, Key, Mods, WidgetEvent};
pub use font::{FixedFont, Font};
pub use geometry::{Point, Rect, Size};
pub use loader::Layout;
pub use render::{Damage, Palette, RenderCtx, ThemeConfig};
pub use runtime::Runtime;
pub use utils::error::{Result, TrellisError};
pub use widget::{Widget, WidgetId, WidgetTree};
