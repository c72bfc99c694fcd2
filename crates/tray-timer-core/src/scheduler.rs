//! Single-threaded timer wheel driving every periodic callback.
//!
//! The event loop sleeps until [`TimerScheduler::next_deadline`] and then
//! pops due entries one at a time, so a handler that cancels another timer
//! takes effect before that timer can be popped.

use crate::{alert::PopupHandle, audio::SessionId};

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use tracing::trace;

/// Identity of a scheduled timer. Never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer drives when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Recompute the fade envelope of a playback session.
    PlaybackFade(SessionId),
    /// Check natural completion / duration cap of a playback session.
    PlaybackMonitor(SessionId),
    /// Restore blank overlays.
    BlankRestore,
    /// Auto-close a popup.
    PopupExpiry(PopupHandle),
    /// Move a popup to the pointer while it is still following.
    PopupFollow(PopupHandle),
    /// Advance the countdown by one second.
    CountdownTick,
}

#[derive(Debug)]
struct TimerEntry {
    purpose: TimerPurpose,
    due: Instant,
    period: Option<Duration>,
}

/// Timer registry keyed by [`TimerId`].
#[derive(Debug, Default)]
pub struct TimerScheduler {
    next_id: u64,
    timers: BTreeMap<TimerId, TimerEntry>,
}

impl TimerScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `purpose` once, `delay` after `now`.
    pub fn schedule_once(&mut self, purpose: TimerPurpose, delay: Duration, now: Instant) -> TimerId {
        self.insert(purpose, now + delay, None)
    }

    /// Fire `purpose` every `period`, first at `now + period`.
    pub fn schedule_repeating(
        &mut self,
        purpose: TimerPurpose,
        period: Duration,
        now: Instant,
    ) -> TimerId {
        self.insert(purpose, now + period, Some(period))
    }

    /// Cancel a timer. Returns `false` if it was not scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(&id).is_some();
        if removed {
            trace!(timer = id.0, "Timer cancelled");
        }
        removed
    }

    /// Whether a timer is still scheduled.
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of scheduled timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are scheduled.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest due instant, if any timer is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.due).min()
    }

    /// Pop the earliest timer due at `now`.
    ///
    /// One-shot timers are removed. Repeating timers are re-armed one period
    /// after their due time, or one period after `now` when the loop fell
    /// behind, so a stall never produces a burst of catch-up ticks.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, TimerPurpose)> {
        let (&id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(id, t)| (t.due, **id))?;

        let entry = self.timers.get_mut(&id)?;
        let purpose = entry.purpose;

        match entry.period {
            Some(period) => {
                let next = entry.due + period;
                entry.due = if next <= now { now + period } else { next };
            }
            None => {
                self.timers.remove(&id);
            }
        }

        Some((id, purpose))
    }

    fn insert(&mut self, purpose: TimerPurpose, due: Instant, period: Option<Duration>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(id, TimerEntry { purpose, due, period });
        trace!(timer = id.0, ?purpose, ?period, "Timer scheduled");
        id
    }
}
