use crate::{
    AlertCoordinator, AudioSettings, BLANK_DURATION, DEFAULT_ALERT_TEXT, Indicators,
    POPUP_FOLLOW_DURATION, POPUP_LIFETIME, PlaybackState, PreActions, ReminderEvent, ScreenPoint,
    TimerScheduler,
    tests::fakes::{
        FakeAudioBackend, FakeSurface, FakeWindowControl, call_log, coordinator, custom_sound,
        drain, temp_path,
    },
};

use std::{
    fs,
    time::{Duration, Instant},
};

fn run_timers(
    coordinator: &mut AlertCoordinator<FakeAudioBackend>,
    surface: &mut FakeSurface,
    scheduler: &mut TimerScheduler,
    now: Instant,
) {
    while let Some((_, purpose)) = scheduler.pop_due(now) {
        coordinator.on_timer(purpose, surface, scheduler, now);
    }
}

fn indicators(enable_notifications: bool, position_alert_at_cursor: bool) -> Indicators {
    Indicators {
        enable_notifications,
        position_alert_at_cursor,
    }
}

fn pre_actions(minimize_active_window: bool, blank_screen: bool) -> PreActions {
    PreActions {
        minimize_active_window,
        blank_screen,
    }
}

/// WHAT: Popup then sound, exactly once each, with the default text
/// WHY: Indicator ordering is observable to the user
#[test]
fn given_popup_and_sound_enabled_when_triggered_then_one_popup_then_one_play() {
    // Given: Notifications and popup on, no saved text
    let log = call_log();
    let audio = FakeAudioBackend::with_duration_ms(3000).logging_to(&log);
    let (mut coordinator, receiver) = coordinator(
        audio,
        custom_sound(true),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.configure(pre_actions(false, false), indicators(true, true));
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();

    // When
    coordinator.trigger(&mut surface, &mut scheduler, Instant::now());

    // Then: Popup with default text, then the sound opened and started
    assert_eq!(
        *log.borrow(),
        vec![
            format!("popup:{}", DEFAULT_ALERT_TEXT),
            "open".to_string(),
            "play".to_string(),
        ]
    );
    assert_eq!(coordinator.open_popups().count(), 1);
    assert_eq!(coordinator.engine().state(), PlaybackState::Playing);
    assert!(
        !drain(&receiver)
            .iter()
            .any(|e| matches!(e, ReminderEvent::AlertError { .. }))
    );
}

/// WHAT: Popup is placed at the pointer and uses the newest saved text
/// WHY: Custom texts replace the built-in message
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_text_when_triggered_then_popup_at_cursor_with_latest_text() {
    // Given: Two saved texts and the pointer at (10, 20)
    let log = call_log();
    let (mut coordinator, _receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.configure(pre_actions(false, false), indicators(false, true));
    coordinator.save_alert_text("stretch").unwrap();
    coordinator.save_alert_text("drink water").unwrap();
    let mut surface = FakeSurface::new(&log);
    surface.cursor = Some(ScreenPoint::new(10, 20));
    let mut scheduler = TimerScheduler::new();

    // When
    coordinator.trigger(&mut surface, &mut scheduler, Instant::now());

    // Then
    let (text, at) = surface.open_popups.values().next().unwrap();
    assert_eq!(text, "drink water");
    assert_eq!(*at, ScreenPoint::new(10, 20));
}

/// WHAT: Pre-actions complete before any indicator
/// WHY: The user's window is out of the way before the alert appears
#[test]
#[allow(clippy::unwrap_used)]
fn given_all_steps_enabled_when_triggered_then_minimize_blank_popup_play_in_order() {
    // Given: An allow-listed visible window under the pointer
    let log = call_log();
    let allow_list = temp_path("whitelist.config");
    fs::write(&allow_list, "code.exe\n").unwrap();
    let audio = FakeAudioBackend::with_duration_ms(3000).logging_to(&log);
    let (mut coordinator, _receiver) = coordinator(
        audio,
        custom_sound(true),
        FakeWindowControl::with_window(&log, "Code", true),
        allow_list.clone(),
    );
    coordinator.configure(pre_actions(true, true), indicators(true, true));
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();

    // When
    coordinator.trigger(&mut surface, &mut scheduler, Instant::now());

    // Then
    assert_eq!(
        *log.borrow(),
        vec![
            "minimize:Code".to_string(),
            "blank".to_string(),
            format!("popup:{}", DEFAULT_ALERT_TEXT),
            "open".to_string(),
            "play".to_string(),
        ]
    );

    let _ = fs::remove_file(&allow_list);
}

/// WHAT: Windows not on the allow-list, or invisible, are left alone
/// WHY: Minimize is opt-in per process
#[test]
#[allow(clippy::unwrap_used)]
fn given_window_not_permitted_when_triggered_then_not_minimized_and_no_error() {
    // Given: Allow-list names a different process; a second case is invisible
    let allow_list = temp_path("whitelist.config");
    fs::write(&allow_list, "firefox\n").unwrap();

    for (process, visible) in [("explorer", true), ("firefox", false)] {
        let log = call_log();
        let (mut coordinator, receiver) = coordinator(
            FakeAudioBackend::default(),
            AudioSettings::default(),
            FakeWindowControl::with_window(&log, process, visible),
            allow_list.clone(),
        );
        coordinator.configure(pre_actions(true, false), indicators(false, false));
        let mut surface = FakeSurface::new(&log);
        let mut scheduler = TimerScheduler::new();

        // When
        coordinator.trigger(&mut surface, &mut scheduler, Instant::now());

        // Then: Silently skipped
        assert!(log.borrow().is_empty(), "{} was minimized", process);
        assert!(drain(&receiver).is_empty());
    }

    let _ = fs::remove_file(&allow_list);
}

/// WHAT: A failing step is reported and the remaining steps still run
/// WHY: trigger() never propagates errors
#[test]
fn given_blank_fails_when_triggered_then_alert_error_and_indicators_run() {
    // Given: Overlays cannot be built
    let log = call_log();
    let (mut coordinator, receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.configure(pre_actions(false, true), indicators(true, true));
    let mut surface = FakeSurface::new(&log);
    surface.fail_blank = true;
    let mut scheduler = TimerScheduler::new();

    // When
    coordinator.trigger(&mut surface, &mut scheduler, Instant::now());

    // Then: Error event, popup shown, chime sent, only the popup's expiry and follow timers armed
    let events = drain(&receiver);
    assert!(matches!(events[0], ReminderEvent::AlertError { .. }));
    assert!(matches!(events[1], ReminderEvent::Chime { .. }));
    assert_eq!(surface.open_popups.len(), 1);
    assert!(!coordinator.is_blanking());
    assert_eq!(scheduler.len(), 2);
}

/// WHAT: Re-blanking restores old overlays first and the 5 s timer restores
/// WHY: Overlays must never stack or stay up
#[test]
fn given_blank_active_when_triggered_again_then_restored_first_and_timer_restores() {
    // Given: Blank only
    let log = call_log();
    let (mut coordinator, _receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.configure(pre_actions(false, true), indicators(false, false));
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();
    let start = Instant::now();

    // When: Triggered twice, then the loop runs past the blank duration
    coordinator.trigger(&mut surface, &mut scheduler, start);
    coordinator.trigger(&mut surface, &mut scheduler, start);
    assert_eq!(scheduler.len(), 1);

    let now = start + BLANK_DURATION;
    while let Some((_, purpose)) = scheduler.pop_due(now) {
        coordinator.on_timer(purpose, &mut surface, &mut scheduler, now);
    }

    // Then
    assert_eq!(
        *log.borrow(),
        vec!["blank", "restore", "blank", "restore"]
    );
    assert_eq!(surface.overlays, 0);
    assert!(!coordinator.is_blanking());
}

/// WHAT: Popups auto-close after their lifetime
/// WHY: Unattended popups must not pile up
#[test]
fn given_open_popup_when_lifetime_elapses_then_closed_and_unregistered() {
    // Given: One popup
    let log = call_log();
    let (mut coordinator, _receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();
    let start = Instant::now();
    coordinator.show_custom_alert(&mut surface, Some("walk"), &mut scheduler, start);

    // When
    let now = start + POPUP_LIFETIME;
    while let Some((_, purpose)) = scheduler.pop_due(now) {
        coordinator.on_timer(purpose, &mut surface, &mut scheduler, now);
    }

    // Then
    assert_eq!(coordinator.open_popups().count(), 0);
    assert!(surface.open_popups.is_empty());
    assert_eq!(surface.closed.len(), 1);
}

/// WHAT: A new popup tracks the pointer for two seconds, then stays put
/// WHY: The message should land where the user is looking without chasing them afterwards
#[test]
#[allow(clippy::unwrap_used)]
fn given_new_popup_when_pointer_moves_then_followed_for_two_seconds_only() {
    // Given: A popup opened at the pointer
    let log = call_log();
    let (mut coordinator, _receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();
    let start = Instant::now();
    coordinator.show_custom_alert(&mut surface, Some("stretch"), &mut scheduler, start);
    let handle = coordinator.open_popups().next().unwrap();

    // When: The pointer moves within the follow window, then again after it
    surface.cursor = Some(ScreenPoint::new(800, 500));
    run_timers(&mut coordinator, &mut surface, &mut scheduler, start + Duration::from_millis(100));
    let followed = surface.open_popups[&handle].1;

    run_timers(&mut coordinator, &mut surface, &mut scheduler, start + POPUP_FOLLOW_DURATION);
    surface.cursor = Some(ScreenPoint::new(10, 10));
    run_timers(&mut coordinator, &mut surface, &mut scheduler, start + Duration::from_millis(2500));

    // Then: Followed early on, left in place later, only the expiry remains armed
    assert_eq!(followed, ScreenPoint::new(800, 500));
    assert_eq!(surface.open_popups[&handle].1, ScreenPoint::new(800, 500));
    assert_eq!(scheduler.len(), 1);
}

/// WHAT: Without a pointer position the popup does not follow
/// WHY: There is nothing to track, so no follow timer should run
#[test]
fn given_pointer_unavailable_when_popup_shown_then_no_follow_timer() {
    // Given: A surface that cannot report the pointer
    let log = call_log();
    let (mut coordinator, _receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    let mut surface = FakeSurface::new(&log);
    surface.cursor = None;
    let mut scheduler = TimerScheduler::new();

    // When
    coordinator.show_custom_alert(&mut surface, None, &mut scheduler, Instant::now());

    // Then: Only the expiry timer, opened at the origin
    assert_eq!(scheduler.len(), 1);
    assert_eq!(surface.moves, 0);
    assert!(surface.open_popups.values().all(|(_, at)| *at == ScreenPoint::default()));
}

/// WHAT: User-closed popups leave the registry and cancel their timer
/// WHY: The registry never holds a destroyed window
#[test]
#[allow(clippy::unwrap_used)]
fn given_open_popup_when_user_closes_it_then_unregistered_and_timer_cancelled() {
    // Given
    let log = call_log();
    let (mut coordinator, _receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();
    coordinator.show_custom_alert(&mut surface, None, &mut scheduler, Instant::now());
    let handle = coordinator.open_popups().next().unwrap();

    // When
    coordinator.popup_closed(handle, &mut scheduler);

    // Then
    assert_eq!(coordinator.open_popups().count(), 0);
    assert!(scheduler.is_empty());
}

/// WHAT: Teardown closes popups, restores screens and stops playback
/// WHY: Nothing may outlive the application
#[test]
fn given_active_alert_when_torn_down_then_everything_released() {
    // Given: Popups, blank and sound all active
    let log = call_log();
    let audio = FakeAudioBackend::with_duration_ms(3000);
    let (mut coordinator, _receiver) = coordinator(
        audio.clone(),
        custom_sound(true),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.configure(pre_actions(false, true), indicators(true, true));
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();
    let now = Instant::now();
    coordinator.trigger(&mut surface, &mut scheduler, now);
    coordinator.show_custom_alert(&mut surface, Some("extra"), &mut scheduler, now);

    // When
    coordinator.teardown(&mut surface, &mut scheduler);

    // Then
    assert!(surface.open_popups.is_empty());
    assert_eq!(surface.closed.len(), 2);
    assert_eq!(surface.overlays, 0);
    assert_eq!(coordinator.engine().state(), PlaybackState::Stopped);
    assert_eq!(audio.state.borrow().live_handles, 0);
    assert!(scheduler.is_empty());
}

/// WHAT: Configuration changes apply to the next trigger
/// WHY: Tray toggles take effect without restart
#[test]
fn given_reconfigured_coordinator_when_triggered_then_new_configuration_used() {
    // Given: Popup enabled, then disabled
    let log = call_log();
    let (mut coordinator, receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.configure(pre_actions(false, false), indicators(true, true));
    coordinator.configure(pre_actions(false, false), indicators(true, false));
    let mut surface = FakeSurface::new(&log);
    let mut scheduler = TimerScheduler::new();

    // When
    coordinator.trigger(&mut surface, &mut scheduler, Instant::now());

    // Then: Sound only
    assert!(log.borrow().is_empty());
    assert_eq!(drain(&receiver).len(), 1);
}

/// WHAT: Clearing history restores the default text
/// WHY: Clear has no audio or visual side effect
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_text_when_history_cleared_then_default_text_current() {
    // Given
    let log = call_log();
    let (mut coordinator, receiver) = coordinator(
        FakeAudioBackend::default(),
        AudioSettings::default(),
        FakeWindowControl::none(&log),
        temp_path("whitelist.config"),
    );
    coordinator.save_alert_text("walk").unwrap();

    // When
    coordinator.clear_history().unwrap();

    // Then
    assert_eq!(coordinator.current_alert_text(), DEFAULT_ALERT_TEXT);
    assert!(log.borrow().is_empty());
    assert!(drain(&receiver).is_empty());
}
