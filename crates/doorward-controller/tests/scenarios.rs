//! Integration tests for complete access-control scenarios.
//!
//! Each test drives the controller on a simulated clock through a realistic
//! sequence: a visitor walking up and scanning, repeated bad cards, a door
//! pried open, and remote overrides.

mod common;

use common::{
    Harness, INVALID_UID, TICK, VALID_UID, count_indications, displays, logs, ms, reader_resets,
    secs,
};
use doorward_controller::{Effect, SystemState};
use doorward_core::{
    ControllerConfig, DoorCommand, DoorPosition, EventChannel, ForcedEntryPolicy, Indication,
    LockCommand,
};

fn servo_angles(effects: &[Effect]) -> Vec<u8> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Servo(angle) => Some(*angle),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Credential flow
// ============================================================================

#[test]
fn test_valid_card_opens_and_recloses_after_dwell() {
    let mut h = Harness::new();
    h.attempt(INVALID_UID);
    assert_eq!(h.controller.attempts(), 1);

    let effects = h.attempt(VALID_UID);
    let granted_at = h.now;
    assert_eq!(h.state(), SystemState::AccessGranted);
    assert_eq!(h.controller.attempts(), 0);
    assert!(effects.contains(&Effect::Relay(LockCommand::Unlocked)));
    assert!(displays(&effects).contains(&("Access granted".to_string(), String::new())));

    assert!(h.run_until(secs(2), |h| h.controller.door_opened_at().is_some()));
    let opened_at = h.controller.door_opened_at().unwrap();
    assert!(opened_at > granted_at, "dwell counts from ramp completion");
    assert_eq!(h.controller.door_state().commanded, LockCommand::Unlocked);

    assert!(h.run_until(secs(10), |h| h.controller.actuator().is_closing()));
    let close_started = h.now - opened_at;
    assert!(close_started > secs(5));
    assert!(close_started <= secs(5) + TICK);

    assert!(h.run_until(secs(2), |h| h.state() == SystemState::Idle));
    assert_eq!(h.controller.door_state().commanded, LockCommand::Locked);
    assert_eq!(
        logs(&h.journal, EventChannel::ValidAccess),
        vec!["UID: E3 87 26 29 Access Granted"]
    );
    assert_eq!(
        logs(&h.journal, EventChannel::DoorStatus),
        vec!["Door Opened", "Door Closed"]
    );
    assert_eq!(h.journal.last(), Some(&Effect::Display {
        primary: "Automatic Door".to_string(),
        secondary: "Waiting...".to_string(),
    }));
}

#[test]
fn test_grant_and_close_ramps_walk_every_step() {
    let mut h = Harness::with_config(ControllerConfig {
        tick_period_ms: 20,
        ..ControllerConfig::default()
    });
    let booted = h.journal.len();
    h.open_with_card();
    let opening = servo_angles(&h.journal[booted..]);
    let expected: Vec<u8> = (1..=18).map(|step| step * 5).collect();
    assert_eq!(opening, expected);

    let mark = h.journal.len();
    assert!(h.run_until(secs(8), |h| h.state() == SystemState::Idle));
    let closing = servo_angles(&h.journal[mark..]);
    let expected: Vec<u8> = (0..18).rev().map(|step| step * 5).collect();
    assert_eq!(closing, expected);
}

#[test]
fn test_single_mismatch_denies_and_stays_usable() {
    let mut h = Harness::new();

    let effects = h.attempt(INVALID_UID);
    assert_eq!(h.state(), SystemState::Idle);
    assert_eq!(h.controller.attempts(), 1);
    assert_eq!(
        logs(&effects, EventChannel::InvalidAccess),
        vec!["UID: AA BB CC DD Access Denied"]
    );
    assert!(logs(&effects, EventChannel::FailedAttempts).is_empty());
    assert_eq!(count_indications(&effects, Indication::Denied), 1);
    assert_eq!(reader_resets(&effects), 1);
    assert!(!h.controller.reader_cooling_down());
    assert!(
        displays(&effects).contains(&("Access denied!".to_string(), "Invalid card".to_string()))
    );

    h.run_for(secs(3));
    h.present();
    assert_eq!(h.state(), SystemState::AwaitingCredential);
}

#[test]
fn test_escalation_ladder_over_four_mismatches() {
    let mut h = Harness::new();

    h.attempt(INVALID_UID);
    let second = h.attempt(INVALID_UID);
    assert_eq!(
        logs(&second, EventChannel::FailedAttempts),
        vec!["Failed Attempts: 2"]
    );
    assert!(!h.controller.reader_cooling_down());

    // Third: reader off for the cooldown, then reinitialized.
    h.attempt(INVALID_UID);
    let denied_at = h.now;
    let mark = h.journal.len();
    assert!(h.controller.reader_cooling_down());

    h.run_for(secs(10));
    h.present();
    assert_eq!(h.state(), SystemState::Idle, "presence ignored during cooldown");

    assert!(h.run_until(secs(30), |h| !h.controller.reader_cooling_down()));
    let cooled_after = h.now - denied_at;
    assert!(cooled_after > ms(32_700));
    assert!(cooled_after <= ms(32_700) + TICK);
    assert_eq!(reader_resets(&h.journal[mark..]), 1);

    let screens = displays(&h.journal[mark..]);
    let waiting = "Please wait...".to_string();
    assert!(screens.contains(&("Reader off: 30s".to_string(), waiting.clone())));
    assert!(screens.contains(&("Reader off: 1s".to_string(), waiting)));

    // Fourth: alarm burst once the denial sequence has played.
    let fourth = h.attempt(INVALID_UID);
    assert_eq!(h.controller.attempts(), 4);
    assert_eq!(count_indications(&fourth, Indication::AttemptAlarm), 0);
    let mark = h.journal.len();
    h.run_for(secs(3));
    assert_eq!(count_indications(&h.journal[mark..], Indication::AttemptAlarm), 1);
    assert!(h.controller.reader_cooling_down());

    // The counter keeps climbing until a match resets it.
    h.attempt(INVALID_UID);
    assert_eq!(h.controller.attempts(), 5);
    h.attempt(VALID_UID);
    assert_eq!(h.controller.attempts(), 0);
}

#[test]
fn test_await_times_out_without_penalty() {
    let mut h = Harness::new();
    h.present();
    let armed_at = h.now;
    let mark = h.journal.len();

    assert!(h.run_until(secs(11), |h| h.state() != SystemState::AwaitingCredential));
    let waited = h.now - armed_at;
    assert!(waited > secs(10));
    assert!(waited <= secs(10) + TICK);

    assert_eq!(h.state(), SystemState::Idle);
    assert_eq!(h.controller.attempts(), 0);
    assert_eq!(reader_resets(&h.journal[mark..]), 1);
    assert!(
        displays(&h.journal[mark..])
            .contains(&("Automatic Door".to_string(), "Waiting...".to_string()))
    );
}

#[test]
fn test_history_follows_grant_cycle() {
    let mut h = Harness::new();
    h.open_with_card();
    assert!(h.run_until(secs(8), |h| h.state() == SystemState::Idle));

    let path: Vec<(SystemState, SystemState)> = h
        .controller
        .history()
        .iter()
        .map(|transition| (transition.from, transition.to))
        .collect();
    assert_eq!(
        path,
        vec![
            (SystemState::Idle, SystemState::AwaitingCredential),
            (SystemState::AwaitingCredential, SystemState::AccessGranted),
            (SystemState::AccessGranted, SystemState::Idle),
        ]
    );
}

// ============================================================================
// Intrusion
// ============================================================================

#[test]
fn test_forced_entry_latches_until_acknowledged() {
    let mut h = Harness::new();

    h.door = DoorPosition::Open;
    let effects = h.tick();
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
    assert_eq!(logs(&effects, EventChannel::ForcedEntry), vec!["Door forced open!"]);
    assert_eq!(count_indications(&effects, Indication::ForcedEntryAlarm), 1);
    assert!(
        displays(&effects).contains(&("ALARM!".to_string(), "Door forced open".to_string()))
    );

    h.run_for(secs(60));
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
    assert_eq!(logs(&h.journal, EventChannel::ForcedEntry).len(), 1);

    h.door = DoorPosition::Closed;
    let now = h.now;
    let effects = h.controller.acknowledge_alarm(now);
    assert_eq!(h.state(), SystemState::Idle);
    assert!(effects.contains(&Effect::Indicate(Indication::AllClear)));
    assert_eq!(logs(&effects, EventChannel::ForcedEntry), vec!["Alarm acknowledged"]);

    h.run_for(secs(1));
    assert_eq!(h.state(), SystemState::Idle);
}

#[test]
fn test_bounded_alarm_clears_after_window() {
    let mut h = Harness::with_config(ControllerConfig {
        forced_entry: ForcedEntryPolicy::Bounded { duration_ms: 10_000 },
        ..ControllerConfig::default()
    });

    h.door = DoorPosition::Open;
    h.tick();
    let raised_at = h.now;
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);

    h.run_for(secs(5));
    h.door = DoorPosition::Closed;
    assert!(h.run_until(secs(6), |h| h.state() == SystemState::Idle));
    let held = h.now - raised_at;
    assert!(held > secs(10));
    assert!(held <= secs(10) + TICK);
    assert_eq!(count_indications(&h.journal, Indication::AllClear), 2);
}

#[test]
fn test_bounded_alarm_rearms_if_door_still_open() {
    let mut h = Harness::with_config(ControllerConfig {
        forced_entry: ForcedEntryPolicy::Bounded { duration_ms: 10_000 },
        ..ControllerConfig::default()
    });

    h.door = DoorPosition::Open;
    h.tick();
    h.run_for(ms(10_500));

    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
    assert_eq!(logs(&h.journal, EventChannel::ForcedEntry).len(), 2);
}

#[test]
fn test_forced_entry_while_awaiting_resets_reader() {
    let mut h = Harness::new();
    h.present();

    h.door = DoorPosition::Open;
    let effects = h.tick();
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
    assert_eq!(reader_resets(&effects), 1);
    assert!(!h.controller.wants_credential(h.now));
}

#[test]
fn test_no_alarm_while_granted_but_alarm_after_relock() {
    let mut h = Harness::new();
    h.open_with_card();

    h.door = DoorPosition::Open;
    h.run_for(secs(4));
    assert_eq!(h.state(), SystemState::AccessGranted);
    assert!(logs(&h.journal, EventChannel::ForcedEntry).is_empty());

    // Held open past the dwell: the relock makes it a forced entry.
    assert!(h.run_until(secs(4), |h| h.state() == SystemState::ForcedEntryAlarm));
    assert_eq!(h.controller.door_state().commanded, LockCommand::Locked);
}

#[test]
fn test_forced_entry_detected_during_reader_cooldown() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.attempt(INVALID_UID);
    }
    h.run_for(secs(5));
    assert!(h.controller.reader_cooling_down());

    h.door = DoorPosition::Open;
    let effects = h.tick();
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
    assert_eq!(logs(&effects, EventChannel::ForcedEntry).len(), 1);
}

#[test]
fn test_forced_entry_detected_during_denial_sequence() {
    let mut h = Harness::new();
    h.attempt(INVALID_UID);

    h.door = DoorPosition::Open;
    h.tick();
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
}

#[test]
fn test_vibration_alarm_during_cooldown() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.attempt(INVALID_UID);
    }
    h.run_for(secs(5));

    let effects = h.vibrate();
    assert_eq!(
        logs(&effects, EventChannel::SuspiciousActivity),
        vec!["Suspicious vibration detected"]
    );
    assert_eq!(count_indications(&effects, Indication::VibrationAlarm), 1);
    assert!(
        displays(&effects).contains(&("ALARM!".to_string(), "Vibration detected".to_string()))
    );
    assert_eq!(h.controller.attempts(), 3);
    assert!(h.controller.reader_cooling_down());

    // Back to the countdown once the vibration alarm has played.
    h.run_for(ms(2_100));
    let (primary, _) = displays(&h.journal).pop().unwrap();
    assert!(primary.starts_with("Reader off: "), "{primary}");
}

// ============================================================================
// Remote override
// ============================================================================

#[test]
fn test_remote_open_uses_grant_actuator_path() {
    let mut h = Harness::new();
    h.attempt(INVALID_UID);
    h.attempt(INVALID_UID);
    h.run_for(secs(3));
    let mark = h.journal.len();

    let effects = h.remote(Some(DoorCommand::Open));
    assert_eq!(effects.first(), Some(&Effect::Relay(LockCommand::Unlocked)));
    assert!(h.run_until(secs(2), |h| h.controller.actuator().is_open()));

    assert_eq!(h.state(), SystemState::Idle);
    assert_eq!(h.controller.attempts(), 2);
    let remote_ramp = servo_angles(&h.journal[mark..]);
    assert_eq!(logs(&h.journal[mark..], EventChannel::DoorStatus), vec!["Door Opened"]);
    assert!(logs(&h.journal[mark..], EventChannel::InvalidAccess).is_empty());
    assert!(logs(&h.journal[mark..], EventChannel::FailedAttempts).is_empty());

    // Same ramp as a credential grant.
    let mut granted = Harness::new();
    let booted = granted.journal.len();
    granted.open_with_card();
    assert_eq!(servo_angles(&granted.journal[booted..]), remote_ramp);
    assert_eq!(remote_ramp, vec![25, 50, 75, 90]);

    // No dwell: stays open until told otherwise.
    h.run_for(secs(10));
    assert!(h.controller.actuator().is_open());

    let effects = h.remote(Some(DoorCommand::Open));
    assert!(!effects.contains(&Effect::Relay(LockCommand::Unlocked)));

    h.remote(Some(DoorCommand::Close));
    assert!(h.run_until(secs(2), |h| h.controller.door_state().commanded == LockCommand::Locked));
    assert_eq!(
        logs(&h.journal[mark..], EventChannel::DoorStatus),
        vec!["Door Opened", "Door Closed"]
    );
}

#[test]
fn test_remote_open_cancels_credential_wait() {
    let mut h = Harness::new();
    h.present();
    assert_eq!(h.state(), SystemState::AwaitingCredential);

    let effects = h.remote(Some(DoorCommand::Open));
    assert_eq!(h.state(), SystemState::Idle);
    assert_eq!(reader_resets(&effects), 1);
    assert!(effects.contains(&Effect::Relay(LockCommand::Unlocked)));
}

#[test]
fn test_remote_close_defers_to_grant_cycle() {
    let mut h = Harness::new();
    h.open_with_card();

    h.remote(Some(DoorCommand::Close));
    assert_eq!(h.state(), SystemState::AccessGranted);
    assert!(h.controller.actuator().is_open());

    assert!(h.run_until(secs(7), |h| h.state() == SystemState::Idle));
}

#[test]
fn test_remote_cannot_open_during_alarm_but_can_reset() {
    let mut h = Harness::new();
    h.door = DoorPosition::Open;
    h.tick();

    let effects = h.remote(Some(DoorCommand::Open));
    assert_eq!(h.state(), SystemState::ForcedEntryAlarm);
    assert!(!effects.contains(&Effect::Relay(LockCommand::Unlocked)));

    h.door = DoorPosition::Closed;
    let effects = h.remote(Some(DoorCommand::Reset));
    assert_eq!(h.state(), SystemState::Idle);
    assert!(effects.contains(&Effect::Indicate(Indication::AllClear)));
    assert!(
        displays(&effects).contains(&("Automatic Door".to_string(), "Waiting...".to_string()))
    );
}

#[test]
fn test_empty_remote_value_changes_nothing() {
    let mut h = Harness::new();
    let effects = h.remote(None);
    assert!(effects.is_empty());
    assert!(!h.controller.remote_poll_due(h.now + ms(1_000)));
}
