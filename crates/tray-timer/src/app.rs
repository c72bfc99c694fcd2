//! Application state and event routing.
//!
//! Everything runs on the `tao` event-loop thread: hotkey and menu commands,
//! window events, fired timers and core events are all handled here in turn.

use crate::{
    AppCommand, AppError, AppResult, TrayCommand, TrayIconState, TrayManager, clipboard,
    config::{ALLOW_LIST_FILE, CONFIG_FILE, Config, TEXT_HISTORY_FILE},
    countdown_window::CountdownWindow,
    hotkey_backend::{self, GlobalHotkeyBackend},
    notifier,
    surface::{SurfaceStore, SurfaceWindow, TaoSurface},
    window_control::platform_window_control,
};

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use tao::{
    event::WindowEvent,
    event_loop::{EventLoopProxy, EventLoopWindowTarget},
    window::WindowId,
};
use tracing::{debug, error, info, instrument, warn};
use tray_timer_core::{
    AlertCoordinator, Countdown, EventReceiver, PlaybackEngine, PresetRegistry, ReminderEvent,
    RodioBackend, TextHistory, TimerPurpose, TimerScheduler, event_channel,
};

/// Main application state.
pub struct App {
    config: Config,
    config_dir: PathBuf,
    registry: PresetRegistry<GlobalHotkeyBackend>,
    coordinator: AlertCoordinator<RodioBackend>,
    countdown: Countdown,
    scheduler: TimerScheduler,
    events: EventReceiver,
    tray: TrayManager,
    surface: SurfaceStore,
    countdown_window: CountdownWindow,
    window_moved: bool,
}

impl App {
    /// Wire the core components to their platform backends.
    ///
    /// Preset hotkeys that cannot be registered show up as notifications on
    /// the first loop turn; they do not fail startup.
    #[track_caller]
    #[instrument(skip(config, proxy))]
    pub fn new(
        config: Config,
        config_dir: &Path,
        data_dir: &Path,
        proxy: EventLoopProxy<AppCommand>,
    ) -> AppResult<Self> {
        let (sender, events) = event_channel();

        let mut registry = PresetRegistry::new(GlobalHotkeyBackend::new()?, sender.clone());
        for item in config.preset_items() {
            registry.add_preset(item);
        }

        let mut engine =
            PlaybackEngine::new(RodioBackend::new(), config.audio.to_settings(), sender.clone());
        engine.set_wake(Arc::new(move || {
            let _ = proxy.send_event(AppCommand::AudioReady);
        }));
        let history = TextHistory::load(&data_dir.join(TEXT_HISTORY_FILE));
        let mut coordinator = AlertCoordinator::new(
            engine,
            history,
            platform_window_control(),
            config_dir.join(ALLOW_LIST_FILE),
            sender.clone(),
        );
        coordinator.set_configuration(config.alerts.into());

        let mut countdown = Countdown::new(sender);
        countdown.set_looping(config.countdown.looping);

        let tray = TrayManager::new(registry.iter(), &config)?;

        info!(
            presets = registry.list_presets().len(),
            hotkeys = registry.dispatcher().len(),
            "Application initialized"
        );

        Ok(Self {
            config,
            config_dir: config_dir.to_path_buf(),
            registry,
            coordinator,
            countdown,
            scheduler: TimerScheduler::new(),
            events,
            tray,
            surface: SurfaceStore::default(),
            countdown_window: CountdownWindow::default(),
            window_moved: false,
        })
    }

    /// Handle a forwarded hotkey or menu event. Returns `false` when the
    /// user asked to exit.
    pub fn handle_command(
        &mut self,
        command: AppCommand,
        target: &EventLoopWindowTarget<AppCommand>,
    ) -> bool {
        match command {
            AppCommand::Hotkey(event) => {
                if hotkey_backend::is_press(event.state()) {
                    self.registry.handle_hotkey(event.id());
                }
                true
            }
            AppCommand::Menu(event) => match self.tray.command_for(event.id()) {
                Some(command) => self.handle_tray_command(command, target),
                None => true,
            },
            // Picked up by `pump_timers` on this turn.
            AppCommand::AudioReady => true,
        }
    }

    #[instrument(skip(self, target))]
    fn handle_tray_command(
        &mut self,
        command: TrayCommand,
        target: &EventLoopWindowTarget<AppCommand>,
    ) -> bool {
        match command {
            TrayCommand::StartPreset(id) => {
                self.registry.trigger(id);
            }
            TrayCommand::StartMinutes(minutes) => {
                if let Err(e) =
                    self.countdown
                        .start_minutes(minutes, &mut self.scheduler, Instant::now())
                {
                    report(&AppError::from(e));
                }
            }
            TrayCommand::StopCountdown => self.countdown.stop(&mut self.scheduler),
            TrayCommand::SetLooping(looping) => {
                self.countdown.set_looping(looping);
                self.config.countdown.looping = looping;
                self.save_config();
            }
            TrayCommand::SetAlertStep(step, enabled) => {
                step.apply(&mut self.config.alerts, enabled);
                self.coordinator.set_configuration(self.config.alerts.into());
                self.save_config();
            }
            TrayCommand::SetSystemSound(enabled) => {
                self.config.audio.use_system_sound = enabled;
                self.reconfigure_audio();
            }
            TrayCommand::SetFade(enabled) => {
                self.config.audio.enable_fade = enabled;
                self.reconfigure_audio();
            }
            TrayCommand::SetFloatingWindow(visible) => {
                self.config.window.visible = visible;
                if visible && self.countdown.is_running() {
                    self.countdown_window
                        .show(target, &self.config.window, self.countdown.remaining());
                } else {
                    self.countdown_window.hide();
                }
                self.save_config();
            }
            TrayCommand::PreviewAlert => {
                let mut surface = TaoSurface::new(target, &mut self.surface);
                self.coordinator
                    .trigger(&mut surface, &mut self.scheduler, Instant::now());
            }
            TrayCommand::UseClipboardText => self.use_clipboard_text(target),
            TrayCommand::ClearHistory => {
                if let Err(e) = self.coordinator.clear_history() {
                    report(&AppError::from(e));
                }
            }
            TrayCommand::OpenSettingsFolder => {
                if let Err(e) = open::that(&self.config_dir) {
                    warn!(error = %e, dir = ?self.config_dir, "Failed to open settings folder");
                }
            }
            TrayCommand::Exit => {
                info!("Exit requested from tray");
                return false;
            }
        }
        true
    }

    fn use_clipboard_text(&mut self, target: &EventLoopWindowTarget<AppCommand>) {
        let text = match clipboard::read_text() {
            Ok(text) => text,
            Err(e) => {
                report(&e);
                return;
            }
        };

        match self.coordinator.save_alert_text(&text) {
            Ok(true) => {}
            Ok(false) => {
                notifier::notify("Tray Timer", "Clipboard text is empty or already saved");
                return;
            }
            // Kept in memory; the popup still shows it.
            Err(e) => report(&AppError::from(e)),
        }

        let mut surface = TaoSurface::new(target, &mut self.surface);
        self.coordinator
            .show_custom_alert(&mut surface, None, &mut self.scheduler, Instant::now());
    }

    fn reconfigure_audio(&mut self) {
        self.coordinator
            .engine_mut()
            .configure(self.config.audio.to_settings());
        self.save_config();
    }

    /// Handle an event for one of the application's own windows.
    pub fn handle_window_event(
        &mut self,
        window_id: WindowId,
        event: &WindowEvent<'_>,
        target: &EventLoopWindowTarget<AppCommand>,
    ) {
        if self.countdown_window.owns(window_id) {
            match event {
                WindowEvent::Moved(position) => {
                    self.config.window.x = position.x;
                    self.config.window.y = position.y;
                    self.window_moved = true;
                }
                WindowEvent::CloseRequested => {
                    self.countdown_window.hide();
                    self.config.window.visible = false;
                    self.tray.set_floating_window_checked(false);
                    self.save_config();
                }
                _ => {}
            }
            return;
        }

        match self.surface.lookup(window_id) {
            Some(SurfaceWindow::Popup(handle)) => {
                if matches!(event, WindowEvent::CloseRequested) {
                    self.surface.forget_popup(handle);
                    self.coordinator.popup_closed(handle, &mut self.scheduler);
                }
            }
            Some(SurfaceWindow::Overlay) => {
                if matches!(
                    event,
                    WindowEvent::CloseRequested
                        | WindowEvent::MouseInput { .. }
                        | WindowEvent::KeyboardInput { .. }
                ) {
                    let mut surface = TaoSurface::new(target, &mut self.surface);
                    self.coordinator
                        .restore_screens(&mut surface, &mut self.scheduler);
                }
            }
            None => {}
        }
    }

    /// Repaint one of the application's windows.
    pub fn redraw(&mut self, window_id: WindowId) {
        self.surface.redraw(window_id);
    }

    /// Start any sound the audio thread finished opening, then run every
    /// timer due at `now`. A countdown expiry triggers the alert.
    pub fn pump_timers(&mut self, target: &EventLoopWindowTarget<AppCommand>, now: Instant) {
        self.coordinator
            .engine_mut()
            .poll_opened(&mut self.scheduler, now);

        let mut surface = TaoSurface::new(target, &mut self.surface);

        while let Some((_, purpose)) = self.scheduler.pop_due(now) {
            if purpose == TimerPurpose::CountdownTick {
                if self.countdown.on_tick(&mut self.scheduler, now) {
                    self.coordinator
                        .trigger(&mut surface, &mut self.scheduler, now);
                }
                continue;
            }

            self.coordinator
                .on_timer(purpose, &mut surface, &mut self.scheduler, now);
        }
    }

    /// Handle core events until the channel is empty, including events
    /// raised while handling earlier ones.
    pub fn drain_events(&mut self, target: &EventLoopWindowTarget<AppCommand>, now: Instant) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ReminderEvent::PresetTriggered { duration_secs, .. } => {
                    self.countdown.start(duration_secs, &mut self.scheduler, now);
                }
                ReminderEvent::CountdownTick { remaining_secs } => {
                    self.set_tray_state(TrayIconState::CountingDown { remaining_secs });
                    if self.config.window.visible {
                        self.countdown_window
                            .show(target, &self.config.window, remaining_secs);
                    }
                }
                ReminderEvent::CountdownExpired | ReminderEvent::CountdownStopped => {
                    self.set_tray_state(TrayIconState::Idle);
                    self.countdown_window.hide();
                }
                ReminderEvent::Chime { message } => notifier::chime(&message),
                ReminderEvent::HotkeyConflict { message, .. } => {
                    notifier::notify("Hotkey already in use", &message);
                }
                ReminderEvent::HotkeyUnavailable { message, .. } => {
                    notifier::notify("Hotkey unavailable", &message);
                }
                ReminderEvent::PlaybackFailed { message } => {
                    notifier::notify("Alert sound failed", &message);
                }
                ReminderEvent::AlertError { message } => {
                    notifier::notify("Alert step failed", &message);
                }
                ReminderEvent::PlaybackStarted {
                    session,
                    effective_ms,
                } => debug!(?session, effective_ms, "Playback started"),
                ReminderEvent::PlaybackStopped { session } => {
                    debug!(?session, "Playback stopped");
                }
            }
        }
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Close alert windows, stop playback and release the hotkeys.
    #[instrument(skip_all)]
    pub fn shutdown(&mut self, target: &EventLoopWindowTarget<AppCommand>) {
        let mut surface = TaoSurface::new(target, &mut self.surface);
        self.coordinator.teardown(&mut surface, &mut self.scheduler);
        self.countdown.stop(&mut self.scheduler);
        self.registry.shutdown();
        self.countdown_window.close();

        if self.window_moved {
            self.save_config();
        }

        info!("Application shut down");
    }

    fn set_tray_state(&mut self, state: TrayIconState) {
        if let Err(e) = self.tray.update_state(state) {
            error!(error = ?e, "Failed to update tray icon");
        }
    }

    /// Persist the config. Failures are shown but the in-memory change stays.
    fn save_config(&mut self) {
        match self.config.save_to(&self.config_dir.join(CONFIG_FILE)) {
            Ok(()) => self.window_moved = false,
            Err(e) => report(&e),
        }
    }
}

fn report(e: &AppError) {
    error!(error = ?e, "Operation failed");
    notifier::notify("Tray Timer", &e.user_message());
}
