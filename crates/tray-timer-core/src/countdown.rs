//! Countdown driver: one-second ticks from a preset duration down to zero.

use crate::{
    CoreResult, ReminderError,
    event::{EventSender, ReminderEvent},
    scheduler::{TimerId, TimerPurpose, TimerScheduler},
};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest custom countdown, in minutes.
pub const MIN_CUSTOM_MINUTES: u32 = 1;

/// Longest custom countdown, in minutes.
pub const MAX_CUSTOM_MINUTES: u32 = 120;

/// Seconds for a user-chosen countdown of `minutes`.
///
/// Fails with [`ReminderError::InvalidDuration`] outside
/// [`MIN_CUSTOM_MINUTES`]..=[`MAX_CUSTOM_MINUTES`].
#[track_caller]
pub fn custom_duration_secs(minutes: u32) -> CoreResult<u32> {
    if !(MIN_CUSTOM_MINUTES..=MAX_CUSTOM_MINUTES).contains(&minutes) {
        return Err(ReminderError::InvalidDuration {
            minutes,
            reason: format!(
                "must be between {} and {} minutes",
                MIN_CUSTOM_MINUTES, MAX_CUSTOM_MINUTES
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(minutes * 60)
}

/// Counts down whole seconds and reports progress as events.
///
/// In loop mode an expired countdown restarts with the same total.
pub struct Countdown {
    total_secs: u32,
    remaining_secs: u32,
    looping: bool,
    timer: Option<TimerId>,
    events: EventSender,
}

impl Countdown {
    /// Create an idle countdown.
    pub fn new(events: EventSender) -> Self {
        Self {
            total_secs: 0,
            remaining_secs: 0,
            looping: false,
            timer: None,
            events,
        }
    }

    /// Start counting down from `seconds`, replacing any running countdown.
    #[instrument(skip(self, scheduler, now))]
    pub fn start(&mut self, seconds: u32, scheduler: &mut TimerScheduler, now: Instant) {
        self.cancel_timer(scheduler);

        self.total_secs = seconds;
        self.remaining_secs = seconds;
        self.timer = Some(scheduler.schedule_repeating(
            TimerPurpose::CountdownTick,
            TICK_INTERVAL,
            now,
        ));

        info!(seconds, looping = self.looping, "Countdown started");
        self.emit(ReminderEvent::CountdownTick {
            remaining_secs: seconds,
        });
    }

    /// Start a user-chosen countdown of `minutes`.
    ///
    /// Out-of-range values are rejected and leave any running countdown
    /// untouched.
    #[track_caller]
    pub fn start_minutes(
        &mut self,
        minutes: u32,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) -> CoreResult<()> {
        let seconds = custom_duration_secs(minutes)?;
        self.start(seconds, scheduler, now);
        Ok(())
    }

    /// Advance by one second.
    ///
    /// Returns `true` when this tick expired the countdown; the caller runs
    /// the alert.
    pub fn on_tick(&mut self, scheduler: &mut TimerScheduler, now: Instant) -> bool {
        if self.timer.is_none() {
            return false;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.emit(ReminderEvent::CountdownTick {
            remaining_secs: self.remaining_secs,
        });

        if self.remaining_secs > 0 {
            return false;
        }

        self.cancel_timer(scheduler);
        info!(total_secs = self.total_secs, "Countdown expired");
        self.emit(ReminderEvent::CountdownExpired);

        if self.looping && self.total_secs > 0 {
            debug!("Loop mode on, restarting countdown");
            self.start(self.total_secs, scheduler, now);
        }

        true
    }

    /// Cancel the running countdown. No-op when idle.
    pub fn stop(&mut self, scheduler: &mut TimerScheduler) {
        if self.timer.is_none() {
            return;
        }
        self.cancel_timer(scheduler);
        self.remaining_secs = 0;

        info!("Countdown stopped");
        self.emit(ReminderEvent::CountdownStopped);
    }

    /// Enable or disable loop mode. Applies at the next expiry.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Whether loop mode is on.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether a countdown is running.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Seconds left; zero when idle.
    pub fn remaining(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds the current countdown started from.
    pub fn total(&self) -> u32 {
        self.total_secs
    }

    fn cancel_timer(&mut self, scheduler: &mut TimerScheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }

    fn emit(&self, event: ReminderEvent) {
        let _ = self.events.send(event);
    }
}

/// Render seconds as `HH:MM:SS`.
pub fn format_hms(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
