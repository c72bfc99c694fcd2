use crate::{
    AudioSettings, CHIME_MESSAGE, FADE_INTERVAL, PlaybackEngine, PlaybackState, ReminderEvent,
    TimerPurpose, TimerScheduler, event_channel,
    tests::fakes::{FakeAudioBackend, custom_sound, drain},
};

use std::time::{Duration, Instant};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Route every due playback timer at `now` to the engine.
fn pump(engine: &mut PlaybackEngine<FakeAudioBackend>, scheduler: &mut TimerScheduler, now: Instant) {
    while let Some((_, purpose)) = scheduler.pop_due(now) {
        match purpose {
            TimerPurpose::PlaybackFade(session) => engine.on_fade_tick(session, scheduler, now),
            TimerPurpose::PlaybackMonitor(session) => {
                engine.on_monitor_tick(session, scheduler, now)
            }
            _ => {}
        }
    }
}

/// WHAT: System-sound mode emits a chime and opens nothing
/// WHY: The default configuration must never touch the audio device
#[test]
fn given_system_sound_when_playing_then_chime_event_and_no_session() {
    // Given: Default settings
    let backend = FakeAudioBackend::with_duration_ms(3000);
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), AudioSettings::default(), events);

    // When: Playing
    engine.play(&mut scheduler, Instant::now());

    // Then: Chime only
    assert_eq!(
        drain(&receiver),
        vec![ReminderEvent::Chime {
            message: CHIME_MESSAGE.to_string(),
        }]
    );
    assert_eq!(backend.state.borrow().opens, 0);
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert!(scheduler.is_empty());
}

/// WHAT: A long file is capped at the maximum duration
/// WHY: Alerts must not play indefinitely
#[test]
#[allow(clippy::unwrap_used)]
fn given_twelve_second_file_when_playing_then_capped_at_eight_seconds() {
    // Given: A 12 s file and the default 8 s cap
    let backend = FakeAudioBackend::with_duration_ms(12_000);
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    let start = Instant::now();

    // When: Playing and running the loop to just before and at the cap
    engine.play(&mut scheduler, start);
    let session = engine.session_id().unwrap();
    pump(&mut engine, &mut scheduler, start + ms(7900));
    let before_cap = engine.state();
    pump(&mut engine, &mut scheduler, start + ms(8000));

    // Then: Started with 8000 ms effective, stopped at the cap, handle released
    let events = drain(&receiver);
    assert!(matches!(
        events.first(),
        Some(ReminderEvent::PlaybackStarted { effective_ms: 8000, .. })
    ));
    assert_eq!(before_cap, PlaybackState::Playing);
    assert_eq!(engine.state(), PlaybackState::Stopped);
    assert!(events.contains(&ReminderEvent::PlaybackStopped { session }));
    assert_eq!(backend.state.borrow().live_handles, 0);
    assert!(scheduler.is_empty());
}

/// WHAT: A short file uses its own length
/// WHY: effective = min(file, cap)
#[test]
fn given_three_second_file_when_playing_then_effective_is_file_length() {
    // Given: A 3 s file
    let backend = FakeAudioBackend::with_duration_ms(3000);
    let (events, _receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend, custom_sound(true), events);

    // When: Playing
    engine.play(&mut scheduler, Instant::now());

    // Then
    assert_eq!(engine.effective_duration_ms(), Some(3000));
    assert_eq!(engine.state(), PlaybackState::Playing);
}

/// WHAT: Fade ticks follow the envelope
/// WHY: Volume is recomputed every 50 ms while playing
#[test]
#[allow(clippy::unwrap_used)]
fn given_fade_enabled_when_ticking_then_volume_follows_envelope() {
    // Given: A 4 s file with fade
    let backend = FakeAudioBackend::with_duration_ms(4000);
    let (events, _receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    let start = Instant::now();
    engine.play(&mut scheduler, start);

    // When: Advancing to 500 ms one fade interval at a time
    let mut t = Duration::ZERO;
    while t < ms(500) {
        t += FADE_INTERVAL;
        pump(&mut engine, &mut scheduler, start + t);
    }

    // Then: Started silent, now at half volume, never out of range
    let volumes = backend.state.borrow().volumes.clone();
    assert_eq!(volumes.first().copied(), Some(0.0));
    assert!((engine.current_volume().unwrap() - 0.5).abs() < 1e-4);
    assert!(volumes.iter().all(|v| (0.0..=1.0).contains(v)));
}

/// WHAT: Without fade the volume is fixed at nominal and no fade timer runs
/// WHY: Fade is optional
#[test]
fn given_fade_disabled_when_playing_then_nominal_volume_and_monitor_only() {
    // Given: Fade off, volume 0.6
    let backend = FakeAudioBackend::with_duration_ms(4000);
    let (events, _receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let settings = AudioSettings {
        volume: 0.6,
        ..custom_sound(false)
    };
    let mut engine = PlaybackEngine::new(backend.clone(), settings, events);

    // When: Playing
    engine.play(&mut scheduler, Instant::now());

    // Then: One timer (monitor) and nominal volume
    assert_eq!(scheduler.len(), 1);
    assert_eq!(backend.state.borrow().volumes, vec![0.6]);
}

/// WHAT: Natural completion stops the session before the cap
/// WHY: The monitor observes the device as well as the clock
#[test]
fn given_device_finished_when_monitor_ticks_then_session_stopped() {
    // Given: A playing 8 s file
    let backend = FakeAudioBackend::with_duration_ms(8000);
    let (events, _receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    let start = Instant::now();
    engine.play(&mut scheduler, start);

    // When: The device drains early and a monitor tick runs
    backend.state.borrow_mut().finished = true;
    pump(&mut engine, &mut scheduler, start + ms(100));

    // Then: Stopped
    assert_eq!(engine.state(), PlaybackState::Stopped);
    assert!(!backend.state.borrow().playing);
}

/// WHAT: Stopping twice is safe and leaves nothing live
/// WHY: Fade and monitor callbacks can both race to stop
#[test]
fn given_playing_session_when_stopped_twice_then_stopped_without_handles() {
    // Given: A playing session
    let backend = FakeAudioBackend::with_duration_ms(4000);
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    engine.play(&mut scheduler, Instant::now());
    drain(&receiver);

    // When: Stopping twice
    engine.stop(&mut scheduler);
    engine.stop(&mut scheduler);

    // Then: One stop event, no timers, no live handle
    let events = drain(&receiver);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ReminderEvent::PlaybackStopped { .. }));
    assert_eq!(engine.state(), PlaybackState::Stopped);
    assert_eq!(engine.session_id(), None);
    assert_eq!(backend.state.borrow().live_handles, 0);
    assert!(scheduler.is_empty());
}

/// WHAT: Stop from idle moves to Stopped without an event
/// WHY: Stop always ends in Stopped; there is no session to report
#[test]
fn given_idle_engine_when_stopped_then_stopped_silently() {
    // Given: A fresh engine
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(FakeAudioBackend::default(), custom_sound(true), events);

    // When
    engine.stop(&mut scheduler);

    // Then
    assert_eq!(engine.state(), PlaybackState::Stopped);
    assert!(drain(&receiver).is_empty());
    assert!(scheduler.is_empty());
}

/// WHAT: Ticks from a stopped or superseded session are ignored
/// WHY: A stale callback must not touch a newer session
#[test]
#[allow(clippy::unwrap_used)]
fn given_superseded_session_when_stale_ticks_arrive_then_no_effect() {
    // Given: A first session replaced by a second one
    let backend = FakeAudioBackend::with_duration_ms(4000);
    let (events, _receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    let start = Instant::now();
    engine.play(&mut scheduler, start);
    let first = engine.session_id().unwrap();
    engine.play(&mut scheduler, start);
    let second = engine.session_id().unwrap();
    let volumes_before = backend.state.borrow().volumes.len();

    // When: Stale ticks for the first session arrive well past its end
    engine.on_fade_tick(first, &mut scheduler, start + ms(10_000));
    engine.on_monitor_tick(first, &mut scheduler, start + ms(10_000));

    // Then: The second session is untouched
    assert_ne!(first, second);
    assert_eq!(engine.session_id(), Some(second));
    assert_eq!(engine.state(), PlaybackState::Playing);
    assert_eq!(backend.state.borrow().volumes.len(), volumes_before);
    assert_eq!(backend.state.borrow().live_handles, 1);
    assert_eq!(scheduler.len(), 2);
}

/// WHAT: Open failures are reported and leave no session
/// WHY: A broken sound file must not crash the alert
#[test]
fn given_unreadable_file_when_playing_then_failure_event_and_idle() {
    // Given: A backend that cannot decode
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(FakeAudioBackend::failing(), custom_sound(true), events);

    // When
    engine.play(&mut scheduler, Instant::now());

    // Then
    let events = drain(&receiver);
    assert!(matches!(
        &events[..],
        [ReminderEvent::PlaybackFailed { message }] if message.contains("alert.wav")
    ));
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert!(scheduler.is_empty());
}

/// WHAT: Missing duration falls back to the cap
/// WHY: Some decoders cannot report a length
#[test]
fn given_unknown_file_length_when_playing_then_effective_is_cap() {
    // Given: A backend reporting no duration
    let (events, _receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let settings = AudioSettings {
        max_duration_ms: 5000,
        ..custom_sound(true)
    };
    let mut engine = PlaybackEngine::new(FakeAudioBackend::default(), settings, events);

    // When
    engine.play(&mut scheduler, Instant::now());

    // Then
    assert_eq!(engine.effective_duration_ms(), Some(5000));
}

/// WHAT: A sound opened off-thread starts on the poll that receives it
/// WHY: The duration cap is measured from when output starts, not from the request
#[test]
#[allow(clippy::unwrap_used)]
fn given_slow_open_when_reply_polled_then_session_clock_starts_at_poll() {
    // Given: A backend that answers later, a 2 s file
    let backend = FakeAudioBackend::with_duration_ms(2000).deferred();
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(false), events);
    let start = Instant::now();

    // When: Requesting, then the open completes 300 ms later
    engine.play(&mut scheduler, start);
    let while_opening = (engine.state(), engine.is_opening(), scheduler.len());
    assert!(backend.finish_open());
    engine.poll_opened(&mut scheduler, start + ms(300));
    pump(&mut engine, &mut scheduler, start + ms(2000));
    let at_request_plus_cap = engine.state();
    pump(&mut engine, &mut scheduler, start + ms(2300));

    // Then: Nothing ran until the poll, and the cap counted from it
    assert_eq!(while_opening, (PlaybackState::Idle, true, 0));
    assert!(!engine.is_opening());
    assert_eq!(at_request_plus_cap, PlaybackState::Playing);
    assert_eq!(engine.state(), PlaybackState::Stopped);
    let events = drain(&receiver);
    assert!(matches!(
        events.first(),
        Some(ReminderEvent::PlaybackStarted { effective_ms: 2000, .. })
    ));
    assert_eq!(backend.state.borrow().live_handles, 0);
}

/// WHAT: A sound that finishes opening after stop is released unplayed
/// WHY: A late reply must not start an alert the user already dismissed
#[test]
fn given_stop_while_opening_when_reply_arrives_then_discarded() {
    // Given: A pending open
    let backend = FakeAudioBackend::with_duration_ms(4000).deferred();
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    let start = Instant::now();
    engine.play(&mut scheduler, start);

    // When: Stopped before the open completes
    engine.stop(&mut scheduler);
    assert!(backend.finish_open());
    engine.poll_opened(&mut scheduler, start + ms(100));

    // Then: Never played, handle dropped, no events
    assert_eq!(engine.state(), PlaybackState::Stopped);
    assert_eq!(engine.session_id(), None);
    assert!(!backend.state.borrow().playing);
    assert_eq!(backend.state.borrow().live_handles, 0);
    assert!(drain(&receiver).is_empty());
    assert!(scheduler.is_empty());
}

/// WHAT: Replaying while a sound opens supersedes the first request
/// WHY: Only the most recent alert may produce output
#[test]
fn given_two_requests_while_opening_when_both_reply_then_only_latest_plays() {
    // Given: Two requests in flight
    let backend = FakeAudioBackend::with_duration_ms(4000).deferred();
    let (events, receiver) = event_channel();
    let mut scheduler = TimerScheduler::new();
    let mut engine = PlaybackEngine::new(backend.clone(), custom_sound(true), events);
    let start = Instant::now();
    engine.play(&mut scheduler, start);
    engine.play(&mut scheduler, start + ms(10));
    assert_eq!(backend.waiting_opens(), 2);

    // When: Both complete and the loop polls
    assert!(backend.finish_open());
    assert!(backend.finish_open());
    engine.poll_opened(&mut scheduler, start + ms(50));

    // Then: One session with one live handle and timers
    let started: Vec<_> = drain(&receiver)
        .into_iter()
        .filter(|e| matches!(e, ReminderEvent::PlaybackStarted { .. }))
        .collect();
    assert_eq!(started.len(), 1);
    assert_eq!(engine.state(), PlaybackState::Playing);
    assert_eq!(backend.state.borrow().live_handles, 1);
    assert_eq!(scheduler.len(), 2);
    assert!(engine.session_id().is_some());
}

/// WHAT: The rodio backend reports a missing file through the reply
/// WHY: Exercises the audio thread's error path
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_rodio_backend_when_opening_missing_file_then_open_failure() {
    use crate::{AudioBackend, OpenReply, ReminderError, RodioBackend, SessionId};
    use std::sync::{Arc, mpsc};

    // Given: The rodio backend and a reply slot
    let mut backend = RodioBackend::new();
    let (sender, opened) = mpsc::channel();
    let reply = OpenReply::new(SessionId::new(), sender, Arc::new(|| {}));

    // When: Opening a path that does not exist
    backend.open(std::path::Path::new("/nonexistent/alert.wav"), reply);
    let result = opened.recv_timeout(Duration::from_secs(5)).unwrap().result;

    // Then: A file error, not a device error
    assert!(matches!(result, Err(ReminderError::AudioOpenFailure { .. })));
}
