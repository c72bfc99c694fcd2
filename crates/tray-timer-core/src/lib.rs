//! Tray Timer Core Library
//!
//! Alert orchestration and timed audio playback for a desktop reminder
//! utility: global hotkey dispatch, named countdown presets, a countdown
//! driver, a fade-enveloped playback engine and the alert coordinator that
//! sequences minimize, blank, popup and sound.
//!
//! All components are single-threaded and driven by a [`TimerScheduler`]
//! that the host event loop pumps. Outward notifications arrive as
//! [`ReminderEvent`] values on the channel from [`event_channel`].
//!
//! # Example
//!
//! ```no_run
//! use tray_timer_core::{
//!     AudioSettings, Countdown, PlaybackEngine, RodioBackend, TimerPurpose, TimerScheduler,
//!     event_channel,
//! };
//!
//! use std::time::Instant;
//!
//! let (events, receiver) = event_channel();
//! let mut scheduler = TimerScheduler::new();
//! let mut countdown = Countdown::new(events.clone());
//! let mut engine = PlaybackEngine::new(RodioBackend::new(), AudioSettings::default(), events);
//!
//! countdown.start(3, &mut scheduler, Instant::now());
//! loop {
//!     let now = Instant::now();
//!     engine.poll_opened(&mut scheduler, now);
//!     while let Some((_, purpose)) = scheduler.pop_due(now) {
//!         if purpose == TimerPurpose::CountdownTick && countdown.on_tick(&mut scheduler, now) {
//!             engine.play(&mut scheduler, now);
//!         }
//!     }
//!     for event in receiver.try_iter() {
//!         println!("{:?}", event);
//!     }
//!     # break;
//! }
//! ```

mod alert;
mod audio;
mod countdown;
mod error;
mod event;
mod hotkey;
mod preset;
mod scheduler;

pub use {
    alert::{
        AlertConfiguration, AlertCoordinator, AlertSurface, AllowList, BLANK_DURATION,
        DEFAULT_ALERT_TEXT, Indicators, MAX_HISTORY, MAX_TEXT_CHARS, POPUP_FOLLOW_DURATION,
        POPUP_FOLLOW_INTERVAL, POPUP_LIFETIME, PopupHandle,
        PreActions, ScreenPoint, TargetWindow, TextHistory, WindowControl,
    },
    audio::{
        AudioBackend, AudioSettings, CHIME_MESSAGE, DEFAULT_MAX_DURATION_MS, FADE_INTERVAL,
        FADE_RAMP_MS, FadeEnvelope, MONITOR_INTERVAL, OpenReply, PlaybackEngine, PlaybackHandle,
        PlaybackState, RodioBackend, RodioHandle, SessionId, WakeFn, clamp_volume,
        effective_duration_ms,
    },
    countdown::{
        Countdown, MAX_CUSTOM_MINUTES, MIN_CUSTOM_MINUTES, TICK_INTERVAL, custom_duration_secs,
        format_hms,
    },
    error::{ReminderError, Result as CoreResult},
    event::{EventReceiver, EventSender, ReminderEvent, event_channel},
    hotkey::{HotkeyBackend, HotkeyCombo, HotkeyDispatcher, HotkeyId, NativeHotkeyId},
    preset::{PresetId, PresetItem, PresetRegistry},
    scheduler::{TimerId, TimerPurpose, TimerScheduler},
};

#[cfg(test)]
mod tests;
