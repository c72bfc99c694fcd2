//! Popup and blank-overlay windows built with `tao`.
//!
//! `tao` windows are `!Send`, so the store and every surface built over it
//! live on the event-loop thread. Popups are borderless; their text is
//! rendered by [`PopupRenderer`] and copied in with `softbuffer`.

use crate::{
    AppCommand,
    popup_renderer::{PopupRenderer, xrgb},
};

use std::{collections::BTreeMap, num::NonZeroU32, panic::Location, rc::Rc};

use error_location::ErrorLocation;
use tao::{
    dpi::{LogicalSize, PhysicalPosition},
    event_loop::EventLoopWindowTarget,
    window::{Fullscreen, Window, WindowBuilder, WindowId},
};
use tracing::{debug, warn};
use tray_timer_core::{AlertSurface, CoreResult, PopupHandle, ReminderError, ScreenPoint};

const OVERLAY_TITLE: &str = "Time for a break";

/// A popup window and the pixel surface its text is drawn into.
struct PopupWindow {
    window: Rc<Window>,
    pixels: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    text: String,
}

impl PopupWindow {
    #[track_caller]
    fn open(window: Window, text: &str) -> CoreResult<Self> {
        let window = Rc::new(window);
        let context = softbuffer::Context::new(Rc::clone(&window)).map_err(surface_error)?;
        let pixels = softbuffer::Surface::new(&context, Rc::clone(&window)).map_err(surface_error)?;

        Ok(Self {
            window,
            pixels,
            text: text.to_string(),
        })
    }

    #[track_caller]
    fn paint(&mut self, renderer: &mut PopupRenderer) -> CoreResult<()> {
        let size = self.window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(());
        };

        self.pixels.resize(width, height).map_err(surface_error)?;

        let scale = self.window.scale_factor() as f32;
        let Some(pixmap) = renderer.render(&self.text, size.width, size.height, scale) else {
            return Ok(());
        };

        let mut buffer = self.pixels.buffer_mut().map_err(surface_error)?;
        for (dst, pixel) in buffer.iter_mut().zip(pixmap.pixels()) {
            *dst = xrgb(*pixel);
        }
        buffer.present().map_err(surface_error)
    }
}

#[track_caller]
fn surface_error(e: softbuffer::SoftBufferError) -> ReminderError {
    ReminderError::Surface {
        reason: format!("Failed to draw popup: {}", e),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// What a window created by the surface is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfaceWindow {
    /// An alert popup.
    Popup(PopupHandle),
    /// A blank overlay.
    Overlay,
}

/// Windows owned by the alert surface.
#[derive(Default)]
pub(crate) struct SurfaceStore {
    next_popup: u64,
    popups: BTreeMap<PopupHandle, PopupWindow>,
    overlays: Vec<Window>,
    renderer: Option<PopupRenderer>,
}

impl SurfaceStore {
    /// Classify a window id.
    pub(crate) fn lookup(&self, id: WindowId) -> Option<SurfaceWindow> {
        if let Some((handle, _)) = self.popups.iter().find(|(_, p)| p.window.id() == id) {
            return Some(SurfaceWindow::Popup(*handle));
        }
        self.overlays
            .iter()
            .any(|w| w.id() == id)
            .then_some(SurfaceWindow::Overlay)
    }

    /// Drop a popup window the user closed.
    pub(crate) fn forget_popup(&mut self, handle: PopupHandle) {
        self.popups.remove(&handle);
    }

    /// Repaint a popup the platform asked to redraw. Other windows are ignored.
    pub(crate) fn redraw(&mut self, id: WindowId) {
        let Some(popup) = self.popups.values_mut().find(|p| p.window.id() == id) else {
            return;
        };
        let renderer = self.renderer.get_or_insert_with(PopupRenderer::new);
        if let Err(e) = popup.paint(renderer) {
            warn!(error = ?e, "Popup repaint failed");
        }
    }
}

/// [`AlertSurface`] bound to the running event loop for one dispatch.
pub(crate) struct TaoSurface<'a> {
    target: &'a EventLoopWindowTarget<AppCommand>,
    store: &'a mut SurfaceStore,
}

impl<'a> TaoSurface<'a> {
    pub(crate) fn new(
        target: &'a EventLoopWindowTarget<AppCommand>,
        store: &'a mut SurfaceStore,
    ) -> Self {
        Self { target, store }
    }
}

impl AlertSurface for TaoSurface<'_> {
    fn cursor_position(&self) -> Option<ScreenPoint> {
        match self.target.cursor_position() {
            Ok(position) => Some(ScreenPoint::new(position.x as i32, position.y as i32)),
            Err(e) => {
                debug!(error = %e, "Pointer position unavailable");
                None
            }
        }
    }

    #[track_caller]
    fn show_popup(&mut self, text: &str, at: ScreenPoint) -> CoreResult<PopupHandle> {
        let renderer = self.store.renderer.get_or_insert_with(PopupRenderer::new);
        let (width, height) = renderer.popup_size(text);

        let window = WindowBuilder::new()
            .with_title(text)
            .with_decorations(false)
            .with_inner_size(LogicalSize::new(width, height))
            .with_position(PhysicalPosition::new(at.x, at.y))
            .with_resizable(false)
            .with_minimizable(false)
            .with_always_on_top(true)
            .with_visible(false)
            .build(self.target)
            .map_err(|e| ReminderError::Surface {
                reason: format!("Failed to create popup window: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut popup = PopupWindow::open(window, text)?;
        popup.window.set_visible(true);
        popup.paint(renderer)?;

        self.store.next_popup += 1;
        let handle = PopupHandle::new(self.store.next_popup);
        self.store.popups.insert(handle, popup);

        Ok(handle)
    }

    fn move_popup(&mut self, handle: PopupHandle, at: ScreenPoint) {
        if let Some(popup) = self.store.popups.get(&handle) {
            popup
                .window
                .set_outer_position(PhysicalPosition::new(at.x, at.y));
        }
    }

    fn close_popup(&mut self, handle: PopupHandle) {
        // Dropping the window destroys it.
        if self.store.popups.remove(&handle).is_none() {
            debug!(popup = handle.raw(), "Popup already closed");
        }
    }

    #[track_caller]
    fn show_blank_overlays(&mut self) -> CoreResult<usize> {
        let monitors: Vec<_> = self.target.available_monitors().collect();
        if monitors.is_empty() {
            return Err(ReminderError::Surface {
                reason: "No displays available to blank".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        for monitor in monitors {
            let built = WindowBuilder::new()
                .with_title(OVERLAY_TITLE)
                .with_decorations(false)
                .with_always_on_top(true)
                .with_position(monitor.position())
                .with_inner_size(monitor.size())
                .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
                .build(self.target);

            match built {
                Ok(window) => self.store.overlays.push(window),
                Err(e) => {
                    let reason = format!("Failed to create blank overlay: {}", e);
                    // Leave nothing half-shown.
                    self.store.overlays.clear();
                    return Err(ReminderError::Surface {
                        reason,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        Ok(self.store.overlays.len())
    }

    fn restore_blank_overlays(&mut self) {
        let count = self.store.overlays.len();
        self.store.overlays.clear();
        debug!(count, "Blank overlays removed");
    }
}
