//! Small always-on-top window mirroring the countdown.

use crate::{AppCommand, config::WindowConfig};

use tao::{
    dpi::{LogicalSize, PhysicalPosition},
    event_loop::EventLoopWindowTarget,
    window::{Window, WindowBuilder, WindowId},
};
use tracing::{debug, warn};
use tray_timer_core::format_hms;

const WIDTH: f64 = 160.0;
const HEIGHT: f64 = 40.0;

/// Floating countdown display. Created lazily, shown only while counting.
#[derive(Default)]
pub(crate) struct CountdownWindow {
    window: Option<Window>,
}

impl CountdownWindow {
    /// Show `remaining_secs`, creating the window at the configured position.
    pub(crate) fn show(
        &mut self,
        target: &EventLoopWindowTarget<AppCommand>,
        config: &WindowConfig,
        remaining_secs: u32,
    ) {
        let title = format_hms(remaining_secs);

        if let Some(window) = &self.window {
            window.set_title(&title);
            window.set_visible(true);
            return;
        }

        let built = WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(LogicalSize::new(WIDTH, HEIGHT))
            .with_position(PhysicalPosition::new(config.x, config.y))
            .with_resizable(false)
            .with_always_on_top(true)
            .with_focused(false)
            .build(target);

        match built {
            Ok(window) => self.window = Some(window),
            Err(e) => warn!(error = %e, "Failed to create countdown window"),
        }
    }

    /// Hide the window without destroying it.
    pub(crate) fn hide(&self) {
        if let Some(window) = &self.window {
            window.set_visible(false);
        }
    }

    /// Destroy the window.
    pub(crate) fn close(&mut self) {
        if self.window.take().is_some() {
            debug!("Countdown window closed");
        }
    }

    /// Whether `id` is this window.
    pub(crate) fn owns(&self, id: WindowId) -> bool {
        self.window.as_ref().is_some_and(|w| w.id() == id)
    }
}
