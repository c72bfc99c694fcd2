use crate::{
    audio::{
        AudioBackend, AudioSettings, FadeEnvelope, OpenReply, PlaybackHandle, SessionId, WakeFn,
        backend::OpenedSound, clamp_volume, effective_duration_ms,
    },
    event::{EventSender, ReminderEvent},
    scheduler::{TimerId, TimerPurpose, TimerScheduler},
};

use std::{
    path::PathBuf,
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument, warn};

/// Period of the fade envelope callback.
pub const FADE_INTERVAL: Duration = Duration::from_millis(50);

/// Period of the completion / duration-cap monitor.
pub const MONITOR_INTERVAL: Duration = Duration::from_millis(100);

/// Text sent with the notification chime.
pub const CHIME_MESSAGE: &str = "Time's up";

/// Playback lifecycle. `Stopped` is terminal for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has played yet, or the last open failed.
    Idle,
    /// A session is producing output.
    Playing,
    /// Stopped explicitly, or the last session ended and its resources are released.
    Stopped,
}

struct PlaybackSession<H> {
    id: SessionId,
    handle: H,
    path: PathBuf,
    envelope: Option<FadeEnvelope>,
    effective_ms: u64,
    nominal: f32,
    volume: f32,
    started_at: Instant,
    fade_timer: Option<TimerId>,
    monitor_timer: TimerId,
}

impl<H: PlaybackHandle> PlaybackSession<H> {
    fn elapsed_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at).as_millis() as u64
    }

    fn is_done(&self, now: Instant) -> bool {
        self.handle.is_finished() || self.elapsed_ms(now) >= self.effective_ms
    }

    fn apply_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        self.handle.set_volume(self.volume);
    }
}

/// Plays the alert sound with a fade envelope and a duration cap.
///
/// At most one session is live. Every callback carries the id of the
/// session that armed it; callbacks for any other session are ignored, and
/// [`PlaybackEngine::stop`] cancels both callbacks synchronously.
///
/// Opening is asynchronous: [`PlaybackEngine::play`] hands the file to the
/// backend and the session starts on the [`PlaybackEngine::poll_opened`]
/// that receives the opened sound. Only the most recent request can start.
pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    settings: AudioSettings,
    state: PlaybackState,
    session: Option<PlaybackSession<B::Handle>>,
    pending: Option<(SessionId, PathBuf)>,
    opened_tx: mpsc::Sender<OpenedSound<B::Handle>>,
    opened_rx: mpsc::Receiver<OpenedSound<B::Handle>>,
    wake: WakeFn,
    events: EventSender,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    /// Create an idle engine.
    pub fn new(backend: B, settings: AudioSettings, events: EventSender) -> Self {
        let (opened_tx, opened_rx) = mpsc::channel();
        Self {
            backend,
            settings,
            state: PlaybackState::Idle,
            session: None,
            pending: None,
            opened_tx,
            opened_rx,
            wake: Arc::new(|| {}),
            events,
        }
    }

    /// Install the callback run when a sound finishes opening, so the host
    /// loop knows to call [`Self::poll_opened`].
    pub fn set_wake(&mut self, wake: WakeFn) {
        self.wake = wake;
    }

    /// Replace the audio settings. Takes effect on the next [`Self::play`].
    pub fn configure(&mut self, settings: AudioSettings) {
        debug!(?settings, "Audio settings updated");
        self.settings = settings;
    }

    /// Current audio settings.
    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether a sound is being opened and has not started yet.
    pub fn is_opening(&self) -> bool {
        self.pending.is_some()
    }

    /// Id of the live session.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Last volume applied to the live session.
    pub fn current_volume(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.volume)
    }

    /// Effective duration of the live session.
    pub fn effective_duration_ms(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.effective_ms)
    }

    /// Access the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Play the alert sound.
    ///
    /// Always tears down the previous session or pending open first. With
    /// `use_system_sound` only a [`ReminderEvent::Chime`] is emitted.
    /// Otherwise the file is handed to the backend; open failures are
    /// reported as [`ReminderEvent::PlaybackFailed`] and leave no session
    /// behind.
    #[instrument(skip(self, scheduler))]
    pub fn play(&mut self, scheduler: &mut TimerScheduler, now: Instant) {
        self.end_session(scheduler);

        if self.settings.use_system_sound {
            debug!("Using system notification sound");
            let _ = self.events.send(ReminderEvent::Chime {
                message: CHIME_MESSAGE.to_string(),
            });
            return;
        }

        let Some(path) = self
            .settings
            .custom_sound_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
        else {
            debug!("No custom sound configured, nothing to play");
            return;
        };

        let id = SessionId::new();
        debug!(session_id = %id, path = ?path, "Opening sound");
        self.pending = Some((id, path.clone()));

        let reply = OpenReply::new(id, self.opened_tx.clone(), Arc::clone(&self.wake));
        self.backend.open(&path, reply);

        // Backends that answer before returning start right away.
        self.poll_opened(scheduler, now);
    }

    /// Start the session whose sound finished opening.
    ///
    /// Call from the host loop after the wake callback fires. The session
    /// clock starts at `now`, once output is playing. Opened sounds for a
    /// stopped or superseded request are released without playing.
    pub fn poll_opened(&mut self, scheduler: &mut TimerScheduler, now: Instant) {
        while let Ok(opened) = self.opened_rx.try_recv() {
            let path = match self.pending.take() {
                Some((id, path)) if id == opened.session => path,
                other => {
                    self.pending = other;
                    debug!(session_id = %opened.session, "Discarding sound for a superseded request");
                    continue;
                }
            };

            match opened.result {
                Ok(handle) => self.start_session(opened.session, path, handle, scheduler, now),
                Err(e) => {
                    warn!(path = ?path, error = ?e, "Alert sound failed");
                    self.state = PlaybackState::Idle;
                    let _ = self.events.send(ReminderEvent::PlaybackFailed {
                        message: e.reason(),
                    });
                }
            }
        }
    }

    /// End the live session and cancel any pending open.
    ///
    /// Cancels both callbacks, halts output and drops the handle (releasing
    /// the file). Idempotent. Always leaves the engine [`PlaybackState::Stopped`];
    /// [`ReminderEvent::PlaybackStopped`] is only emitted when a session was live.
    #[instrument(skip(self, scheduler))]
    pub fn stop(&mut self, scheduler: &mut TimerScheduler) {
        self.end_session(scheduler);
        self.state = PlaybackState::Stopped;
    }

    fn end_session(&mut self, scheduler: &mut TimerScheduler) {
        if let Some((id, _)) = self.pending.take() {
            debug!(session_id = %id, "Pending sound cancelled");
        }

        let Some(mut session) = self.session.take() else {
            return;
        };

        if let Some(fade_timer) = session.fade_timer.take() {
            scheduler.cancel(fade_timer);
        }
        scheduler.cancel(session.monitor_timer);
        session.handle.stop();

        let id = session.id;
        drop(session);
        self.state = PlaybackState::Stopped;

        info!(session_id = %id, "Playback stopped");
        let _ = self
            .events
            .send(ReminderEvent::PlaybackStopped { session: id });
    }

    /// Fade callback: recompute the envelope, or end the session when done.
    pub fn on_fade_tick(
        &mut self,
        session_id: SessionId,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == session_id) else {
            return;
        };

        if session.is_done(now) {
            self.stop(scheduler);
            return;
        }

        let volume = match session.envelope {
            Some(envelope) => envelope.volume_at(session.elapsed_ms(now)),
            None => session.nominal,
        };
        session.apply_volume(volume);
    }

    /// Monitor callback: end the session on natural completion or at the cap.
    pub fn on_monitor_tick(
        &mut self,
        session_id: SessionId,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) {
        let done = self
            .session
            .as_ref()
            .filter(|s| s.id == session_id)
            .is_some_and(|s| s.is_done(now));

        if done {
            debug!(session_id = %session_id, "Playback reached its end");
            self.stop(scheduler);
        }
    }

    fn start_session(
        &mut self,
        id: SessionId,
        path: PathBuf,
        mut handle: B::Handle,
        scheduler: &mut TimerScheduler,
        now: Instant,
    ) {
        let max_ms = self.settings.max_duration_ms;
        let file_ms = handle
            .duration()
            .map_or(max_ms, |d| d.as_millis() as u64);
        let effective_ms = effective_duration_ms(file_ms, max_ms);
        let nominal = clamp_volume(self.settings.volume);

        let envelope = self
            .settings
            .fade_enabled
            .then(|| FadeEnvelope::new(effective_ms, nominal));
        let initial = envelope.map_or(nominal, |e| e.volume_at(0));

        handle.set_volume(initial);
        handle.play();

        let fade_timer = envelope.map(|_| {
            scheduler.schedule_repeating(TimerPurpose::PlaybackFade(id), FADE_INTERVAL, now)
        });
        let monitor_timer =
            scheduler.schedule_repeating(TimerPurpose::PlaybackMonitor(id), MONITOR_INTERVAL, now);

        self.session = Some(PlaybackSession {
            id,
            handle,
            path,
            envelope,
            effective_ms,
            nominal,
            volume: initial,
            started_at: now,
            fade_timer,
            monitor_timer,
        });
        self.state = PlaybackState::Playing;

        info!(
            session_id = %id,
            file_ms,
            effective_ms,
            fade = envelope.is_some(),
            "Playback started"
        );
        let _ = self.events.send(ReminderEvent::PlaybackStarted {
            session: id,
            effective_ms,
        });
    }
}

impl<B: AudioBackend> Drop for PlaybackEngine<B> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.handle.stop();
            debug!(session_id = %session.id, path = ?session.path, "Playback dropped with engine");
        }
    }
}
