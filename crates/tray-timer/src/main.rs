//! Tray Timer: countdown reminders from the system tray with global hotkeys.

mod app;
mod app_command;
mod clipboard;
mod config;
mod countdown_window;
mod error;
mod hotkey_backend;
mod instance_guard;
mod logging;
mod notifier;
mod popup_renderer;
mod surface;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
mod tray_manager;
mod window_control;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    instance_guard::InstanceGuard,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::config::Config;

use std::{process, time::Instant};

use global_hotkey::GlobalHotKeyEvent;
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tracing::{error, info, warn};
use tray_icon::menu::MenuEvent;

const LOG_DIR: &str = "logs";

/// Application entry point.
fn main() {
    let data_dir = Config::data_dir();
    let log_dir = data_dir.as_ref().ok().map(|dir| dir.join(LOG_DIR));
    let log_guard = logging::init(log_dir.as_deref());

    let (data_dir, config_dir) = match (data_dir, Config::config_dir()) {
        (Ok(data_dir), Ok(config_dir)) => (data_dir, config_dir),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = ?e, "Failed to resolve application directories");
            process::exit(1);
        }
    };

    let instance_guard = match InstanceGuard::acquire(&data_dir) {
        Ok(guard) => guard,
        Err(e @ AppError::AlreadyRunning { .. }) => {
            warn!(error = ?e, "Another instance is running, exiting");
            notifier::notify("Tray Timer", &e.user_message());
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to acquire instance lock");
            process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<AppCommand>::with_user_event().build();

    // Both crates invoke their handlers off the UI thread; forward into the loop.
    let hotkey_proxy = event_loop.create_proxy();
    GlobalHotKeyEvent::set_event_handler(Some(move |event| {
        let _ = hotkey_proxy.send_event(AppCommand::Hotkey(event));
    }));
    let menu_proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = menu_proxy.send_event(AppCommand::Menu(event));
    }));

    // Dropped on LoopDestroyed: `run` never returns, so locals in main never drop.
    let mut lifetime = Some((log_guard, instance_guard));
    let mut app: Option<App> = None;
    let audio_proxy = event_loop.create_proxy();

    event_loop.run(move |event, target, control_flow| {
        match event {
            Event::NewEvents(StartCause::Init) => {
                let config = match Config::load() {
                    Ok(config) => config,
                    Err(e) => {
                        error!(error = ?e, "Failed to load config");
                        notifier::notify("Tray Timer", &e.user_message());
                        *control_flow = ControlFlow::ExitWithCode(1);
                        return;
                    }
                };

                match App::new(config, &config_dir, &data_dir, audio_proxy.clone()) {
                    Ok(created) => app = Some(created),
                    Err(e) => {
                        error!(error = ?e, "Failed to start");
                        notifier::notify("Tray Timer", &e.user_message());
                        *control_flow = ControlFlow::ExitWithCode(1);
                        return;
                    }
                }

                // The tray icon only appears once the run loop spins on macOS.
                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }
            }
            Event::UserEvent(command) => {
                if let Some(app) = app.as_mut()
                    && !app.handle_command(command, target)
                {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            }
            Event::WindowEvent {
                window_id, event, ..
            } => {
                if let Some(app) = app.as_mut() {
                    app.handle_window_event(window_id, &event, target);
                }
            }
            Event::RedrawRequested(window_id) => {
                if let Some(app) = app.as_mut() {
                    app.redraw(window_id);
                }
            }
            Event::LoopDestroyed => {
                if let Some(mut app) = app.take() {
                    app.shutdown(target);
                }
                info!("Event loop destroyed");
                lifetime.take();
                return;
            }
            _ => {}
        }

        if matches!(*control_flow, ControlFlow::ExitWithCode(_)) {
            return;
        }

        let Some(app) = app.as_mut() else {
            *control_flow = ControlFlow::Wait;
            return;
        };

        let now = Instant::now();
        app.pump_timers(target, now);
        app.drain_events(target, now);

        *control_flow = match app.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
    });
}
