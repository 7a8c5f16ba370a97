//! Host surfaces the overlay is composed onto.

use std::cell::RefCell;
use std::rc::Rc;

use tiny_skia::Pixmap;

use crate::geometry::Rect;
use crate::text::LabelFont;

/// What the engine needs from whatever displays the icon.
pub trait HostSurface {
    /// Rectangle the overlay is drawn into.
    fn overlay_bounds(&self) -> Rect;
    /// Ask for a redraw. Hosts coalesce repeated requests within a frame.
    fn request_repaint(&mut self);
    /// A copy of the unmodified icon to draw under the overlay.
    fn base_icon(&self) -> Option<Pixmap> {
        None
    }
    /// Font for badge labels. Without one, labels are skipped.
    fn label_font(&self) -> Option<LabelFont> {
        None
    }
}

/// An in-memory host owning an icon pixmap.
///
/// Clones share state, so one handle can live inside the controller while
/// the embedding loop keeps another to watch for repaint requests.
#[derive(Clone)]
pub struct PixmapHost {
    inner: Rc<RefCell<HostState>>,
}

struct HostState {
    icon: Pixmap,
    font: Option<LabelFont>,
    repaint_requests: u64,
    dirty: bool,
}

impl PixmapHost {
    pub fn new(icon: Pixmap) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostState {
                icon,
                font: None,
                repaint_requests: 0,
                dirty: true,
            })),
        }
    }

    pub fn with_font(self, font: LabelFont) -> Self {
        self.inner.borrow_mut().font = Some(font);
        self
    }

    pub fn repaint_requests(&self) -> u64 {
        self.inner.borrow().repaint_requests
    }

    /// Whether a repaint was requested since the last call, clearing the flag.
    /// Any number of requests in between count as one.
    pub fn take_dirty(&self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().dirty)
    }
}

impl HostSurface for PixmapHost {
    fn overlay_bounds(&self) -> Rect {
        let state = self.inner.borrow();
        Rect::from_size(state.icon.width() as f32, state.icon.height() as f32)
    }

    fn request_repaint(&mut self) {
        let mut state = self.inner.borrow_mut();
        state.repaint_requests += 1;
        state.dirty = true;
    }

    fn base_icon(&self) -> Option<Pixmap> {
        Some(self.inner.borrow().icon.clone())
    }

    fn label_font(&self) -> Option<LabelFont> {
        self.inner.borrow().font.clone()
    }
}
