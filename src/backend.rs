//! Presentation layer abstraction.
//!
//! A [`Backend`] owns the screen surface and the input event source; the
//! event loop in [`crate::runtime`] talks to nothing else, so the widget
//! tree stays portable across windowing systems. The crate ships
//! [`MemoryBackend`], an in-memory implementation for the test suite and
//! for headless applications that render into a pixel buffer.

use std::collections::VecDeque;
use std::time::Duration;

use crate::canvas::{Canvas, Pixmap};
use crate::event::BackendEvent;
use crate::geometry::{Rect, Size};

/// Connects the widget tree to a display and an input source.
pub trait Backend {
    /// Current surface size in pixels. The root widget is laid out to
    /// exactly this size.
    fn size(&self) -> Size;

    /// Draw target for the next render pass. Widgets paint into this
    /// backbuffer; nothing reaches the screen until [`Backend::flip`].
    fn canvas(&mut self) -> &mut dyn Canvas;

    /// Publishes a finished region of the backbuffer to the screen.
    fn flip(&mut self, rect: Rect);

    /// Waits up to `timeout` for the next event; `None` blocks until one
    /// arrives. Returns `None` on timeout.
    fn poll_event(&mut self, timeout: Option<Duration>) -> Option<BackendEvent>;
}

/// A backend that renders into an owned [`Pixmap`] and replays a scripted
/// event queue. `poll_event` never blocks; an empty queue reads as a
/// timeout, so a runtime driving this backend steps deterministically.
pub struct MemoryBackend {
    surface: Pixmap,
    events: VecDeque<BackendEvent>,
    flips: Vec<Rect>,
}

impl MemoryBackend {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            surface: Pixmap::new(w, h),
            events: VecDeque::new(),
            flips: Vec::new(),
        }
    }

    /// Queues an event; `poll_event` replays the queue oldest first.
    pub fn push(&mut self, ev: BackendEvent) {
        self.events.push_back(ev);
    }

    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    /// Regions flipped so far, in flip order.
    pub fn flips(&self) -> &[Rect] {
        &self.flips
    }
}

impl Backend for MemoryBackend {
    fn size(&self) -> Size {
        self.surface.size()
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.surface
    }

    fn flip(&mut self, rect: Rect) {
        self.flips.push(rect);
    }

    fn poll_event(&mut self, _timeout: Option<Duration>) -> Option<BackendEvent> {
        let ev = self.events.pop_front()?;

        // A resize takes effect when it is observed, like a real window.
        if let BackendEvent::Resize(size) = ev {
            self.surface = Pixmap::new(size.w, size.h);
        }

        Some(ev)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::{InputEvent, Key};

    #[test]
    fn replays_events_in_order() {
        let mut backend = MemoryBackend::new(10, 10);
        backend.push(BackendEvent::Input(InputEvent::key_down(Key::Enter)));
        backend.push(BackendEvent::Quit);

        assert_eq!(
            backend.poll_event(None),
            Some(BackendEvent::Input(InputEvent::key_down(Key::Enter)))
        );
        assert_eq!(backend.poll_event(None), Some(BackendEvent::Quit));
        assert_eq!(backend.poll_event(None), None);
    }

    #[test]
    fn resize_reallocates_the_surface() {
        let mut backend = MemoryBackend::new(10, 10);
        backend.push(BackendEvent::Resize(Size::new(32, 16)));

        assert_eq!(
            backend.poll_event(None),
            Some(BackendEvent::Resize(Size::new(32, 16)))
        );
        assert_eq!(backend.size(), Size::new(32, 16));
    }

    #[test]
    fn records_flipped_regions() {
        let mut backend = MemoryBackend::new(10, 10);
        backend.flip(Rect::new(0, 0, 4, 4));
        backend.flip(Rect::new(2, 2, 4, 4));

        assert_eq!(
            backend.flips(),
            &[Rect::new(0, 0, 4, 4), Rect::new(2, 2, 4, 4)]
        );
    }
}
