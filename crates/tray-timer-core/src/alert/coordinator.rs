use crate::{
    CoreResult, ReminderError,
    alert::{
        AlertConfiguration, AlertSurface, AllowList, Indicators, PopupHandle, PreActions,
        ScreenPoint, TargetWindow, TextHistory, WindowControl,
    },
    audio::{AudioBackend, PlaybackEngine},
    event::{EventSender, ReminderEvent},
    scheduler::{TimerId, TimerPurpose, TimerScheduler},
};

use std::{
    collections::BTreeMap,
    mem,
    panic::Location,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Text shown when no custom alert text has been saved.
pub const DEFAULT_ALERT_TEXT: &str = "Time for a break: pause what you're doing";

/// How long blank overlays stay up.
pub const BLANK_DURATION: Duration = Duration::from_secs(5);

/// How long a popup stays open unless the user closes it first.
pub const POPUP_LIFETIME: Duration = Duration::from_secs(4);

/// How long a new popup tracks the pointer.
pub const POPUP_FOLLOW_DURATION: Duration = Duration::from_secs(2);

/// Period of the pointer-follow timer.
pub const POPUP_FOLLOW_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug)]
struct OpenPopup {
    expiry: TimerId,
    follow: Option<TimerId>,
    follow_until: Instant,
}

impl OpenPopup {
    fn cancel_timers(self, scheduler: &mut TimerScheduler) {
        scheduler.cancel(self.expiry);
        if let Some(follow) = self.follow {
            scheduler.cancel(follow);
        }
    }
}

/// Runs one alert occurrence: pre-actions, then indicators.
///
/// Owns the alert configuration, the playback engine, the text history and
/// the registry of open popups. Every step reports its own failure through
/// [`ReminderEvent::AlertError`] so one broken step never hides the others.
pub struct AlertCoordinator<B: AudioBackend> {
    config: AlertConfiguration,
    engine: PlaybackEngine<B>,
    history: TextHistory,
    windows: Box<dyn WindowControl>,
    allow_list_path: PathBuf,
    popups: BTreeMap<PopupHandle, OpenPopup>,
    blank_timer: Option<TimerId>,
    blank_active: bool,
    events: EventSender,
}

impl<B: AudioBackend> AlertCoordinator<B> {
    /// Create a coordinator with every step disabled.
    pub fn new(
        engine: PlaybackEngine<B>,
        history: TextHistory,
        windows: Box<dyn WindowControl>,
        allow_list_path: PathBuf,
        events: EventSender,
    ) -> Self {
        Self {
            config: AlertConfiguration::default(),
            engine,
            history,
            windows,
            allow_list_path,
            popups: BTreeMap::new(),
            blank_timer: None,
            blank_active: false,
            events,
        }
    }

    /// Replace the active configuration. Applies from the next trigger.
    pub fn configure(&mut self, pre_actions: PreActions, indicators: Indicators) {
        self.set_configuration(AlertConfiguration::new(pre_actions, indicators));
    }

    /// Replace the active configuration as a whole.
    pub fn set_configuration(&mut self, config: AlertConfiguration) {
        debug!(?config, "Alert configuration updated");
        self.config = config;
    }

    /// Active configuration.
    pub fn configuration(&self) -> AlertConfiguration {
        self.config
    }

    /// The playback engine.
    pub fn engine(&self) -> &PlaybackEngine<B> {
        &self.engine
    }

    /// The playback engine, for reconfiguration.
    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<B> {
        &mut self.engine
    }

    /// The alert text history.
    pub fn history(&self) -> &TextHistory {
        &self.history
    }

    /// Allow-list file consulted on every minimize attempt.
    pub fn allow_list_path(&self) -> &Path {
        &self.allow_list_path
    }

    /// Text the next popup will show.
    pub fn current_alert_text(&self) -> &str {
        self.history.latest().unwrap_or(DEFAULT_ALERT_TEXT)
    }

    /// Save a custom alert text. See [`TextHistory::add`].
    pub fn save_alert_text(&mut self, text: &str) -> CoreResult<bool> {
        self.history.add(text)
    }

    /// Forget every saved alert text. No audio or visual effect.
    pub fn clear_history(&mut self) -> CoreResult<()> {
        self.history.clear()
    }

    /// Open popups, oldest first.
    pub fn open_popups(&self) -> impl Iterator<Item = PopupHandle> + '_ {
        self.popups.keys().copied()
    }

    /// Whether blank overlays are currently shown.
    pub fn is_blanking(&self) -> bool {
        self.blank_active
    }

    /// Run the alert.
    ///
    /// Pre-actions (minimize, blank) complete before indicators (popup,
    /// sound) begin. Never fails; errors become [`ReminderEvent::AlertError`].
    #[instrument(skip(self, surface, scheduler))]
    pub fn trigger(
        &mut self,
        surface: &mut dyn AlertSurface,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) {
        let config = self.config;
        info!(?config, "Alert triggered");

        if config.minimize_active_window {
            self.minimize_window_at_cursor(surface);
        }

        if config.blank_screen {
            let result = self.blank_screens(surface, scheduler, now);
            self.report(result);
        }

        if config.position_alert_at_cursor {
            let text = self.current_alert_text().to_string();
            let result = self.show_popup(surface, &text, scheduler, now).map(|_| ());
            self.report(result);
        }

        if config.enable_notifications {
            self.engine.play(scheduler, now);
        }
    }

    /// Show a popup with `text`, or the current alert text, without running
    /// any other alert step.
    #[instrument(skip(self, surface, scheduler))]
    pub fn show_custom_alert(
        &mut self,
        surface: &mut dyn AlertSurface,
        text: Option<&str>,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) {
        let text = text.unwrap_or(self.current_alert_text()).to_string();
        let result = self.show_popup(surface, &text, scheduler, now).map(|_| ());
        self.report(result);
    }

    /// A popup was closed by the user. Drops it from the registry.
    pub fn popup_closed(&mut self, handle: PopupHandle, scheduler: &mut TimerScheduler) {
        if let Some(popup) = self.popups.remove(&handle) {
            popup.cancel_timers(scheduler);
            debug!(popup = handle.raw(), "Popup closed by user");
        }
    }

    /// Remove blank overlays now and cancel their auto-restore.
    pub fn restore_screens(&mut self, surface: &mut dyn AlertSurface, scheduler: &mut TimerScheduler) {
        if let Some(timer) = self.blank_timer.take() {
            scheduler.cancel(timer);
        }
        if mem::take(&mut self.blank_active) {
            surface.restore_blank_overlays();
            info!("Screens restored");
        }
    }

    /// Handle a fired timer. Returns `false` for purposes this coordinator
    /// does not own.
    pub fn on_timer(
        &mut self,
        purpose: TimerPurpose,
        surface: &mut dyn AlertSurface,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) -> bool {
        match purpose {
            TimerPurpose::PlaybackFade(session) => self.engine.on_fade_tick(session, scheduler, now),
            TimerPurpose::PlaybackMonitor(session) => {
                self.engine.on_monitor_tick(session, scheduler, now)
            }
            TimerPurpose::BlankRestore => {
                self.blank_timer = None;
                self.restore_screens(surface, scheduler);
            }
            TimerPurpose::PopupExpiry(handle) => {
                if let Some(popup) = self.popups.remove(&handle) {
                    popup.cancel_timers(scheduler);
                    surface.close_popup(handle);
                    debug!(popup = handle.raw(), "Popup expired");
                }
            }
            TimerPurpose::PopupFollow(handle) => self.follow_pointer(handle, surface, scheduler, now),
            TimerPurpose::CountdownTick => return false,
        }
        true
    }

    /// Close every popup, restore the screens and stop playback.
    #[instrument(skip(self, surface, scheduler))]
    pub fn teardown(&mut self, surface: &mut dyn AlertSurface, scheduler: &mut TimerScheduler) {
        let popups = mem::take(&mut self.popups);
        let count = popups.len();
        for (handle, popup) in popups {
            popup.cancel_timers(scheduler);
            surface.close_popup(handle);
        }

        self.restore_screens(surface, scheduler);
        self.engine.stop(scheduler);

        info!(popups_closed = count, "Alert coordinator torn down");
    }

    fn minimize_window_at_cursor(&self, surface: &dyn AlertSurface) {
        let Some(point) = surface.cursor_position() else {
            debug!("Pointer position unavailable, skipping minimize");
            return;
        };

        // Reloaded on every attempt so edits apply without a restart.
        let allow_list = AllowList::load(&self.allow_list_path);

        let window = match self.resolve_target(point, &allow_list) {
            Ok(window) => window,
            Err(e) => {
                debug!(reason = %e.reason(), "No window minimized");
                return;
            }
        };

        match self.windows.minimize(&window) {
            Ok(()) => info!(process = %window.process_name, "Window minimized"),
            Err(e) => warn!(process = %window.process_name, error = ?e, "Failed to minimize window"),
        }
    }

    #[track_caller]
    fn resolve_target(&self, point: ScreenPoint, allow_list: &AllowList) -> CoreResult<TargetWindow> {
        let window = self.windows.window_at(point)?;

        if !allow_list.permits(&window.process_name) {
            return Err(ReminderError::WindowResolutionFailure {
                reason: format!("{} is not on the allow-list", window.process_name),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !window.visible {
            return Err(ReminderError::WindowResolutionFailure {
                reason: format!("{} has no visible window", window.process_name),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(window)
    }

    fn blank_screens(
        &mut self,
        surface: &mut dyn AlertSurface,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) -> CoreResult<()> {
        self.restore_screens(surface, scheduler);

        let displays = surface.show_blank_overlays()?;
        self.blank_active = true;
        self.blank_timer = Some(scheduler.schedule_once(TimerPurpose::BlankRestore, BLANK_DURATION, now));

        info!(displays, "Screens blanked");
        Ok(())
    }

    fn show_popup(
        &mut self,
        surface: &mut dyn AlertSurface,
        text: &str,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) -> CoreResult<PopupHandle> {
        let pointer = surface.cursor_position();
        let at = pointer.unwrap_or_default();
        let handle = surface.show_popup(text, at)?;

        let expiry = scheduler.schedule_once(TimerPurpose::PopupExpiry(handle), POPUP_LIFETIME, now);
        // Nothing to follow without a pointer.
        let follow = pointer.map(|_| {
            scheduler.schedule_repeating(TimerPurpose::PopupFollow(handle), POPUP_FOLLOW_INTERVAL, now)
        });
        self.popups.insert(
            handle,
            OpenPopup {
                expiry,
                follow,
                follow_until: now + POPUP_FOLLOW_DURATION,
            },
        );

        debug!(popup = handle.raw(), x = at.x, y = at.y, "Popup shown");
        Ok(handle)
    }

    fn follow_pointer(
        &mut self,
        handle: PopupHandle,
        surface: &mut dyn AlertSurface,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) {
        let Some(popup) = self.popups.get_mut(&handle) else {
            return;
        };

        if let Some(at) = surface.cursor_position() {
            surface.move_popup(handle, at);
        }

        if now >= popup.follow_until
            && let Some(follow) = popup.follow.take()
        {
            scheduler.cancel(follow);
            debug!(popup = handle.raw(), "Popup stopped following the pointer");
        }
    }

    fn report(&self, result: CoreResult<()>) {
        if let Err(e) = result {
            error!(error = ?e, "Alert step failed");
            let _ = self.events.send(ReminderEvent::AlertError {
                message: e.reason(),
            });
        }
    }
}
