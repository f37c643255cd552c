//! Property tests over random input sequences.

mod common;

use common::{Harness, INVALID_UID, VALID_UID, logs, ms};
use doorward_controller::{Effect, Inputs, SystemState};
use doorward_core::{
    ControllerConfig, DoorCommand, DoorPosition, EventChannel, ForcedEntryPolicy, LockCommand,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Quiet(u8),
    Present,
    Scan(bool),
    Door(bool),
    Vibrate,
    Remote(DoorCommand),
    Acknowledge,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u8..40).prop_map(Op::Quiet),
        3 => Just(Op::Present),
        3 => any::<bool>().prop_map(Op::Scan),
        2 => any::<bool>().prop_map(Op::Door),
        1 => Just(Op::Vibrate),
        1 => prop_oneof![
            Just(DoorCommand::Open),
            Just(DoorCommand::Close),
            Just(DoorCommand::Reset),
        ]
        .prop_map(Op::Remote),
        1 => Just(Op::Acknowledge),
    ]
}

fn policy() -> impl Strategy<Value = ForcedEntryPolicy> {
    prop_oneof![
        Just(ForcedEntryPolicy::Latched),
        (500u64..20_000).prop_map(|duration_ms| ForcedEntryPolicy::Bounded { duration_ms }),
    ]
}

/// Door open against a locked, settled lock outside a grant must be alarming.
fn assert_forced_entry_caught(h: &Harness) {
    let door = h.controller.door_state();
    let unauthorized = door.sensed == DoorPosition::Open
        && door.commanded == LockCommand::Locked
        && !h.controller.actuator().is_opening()
        && h.state() != SystemState::AccessGranted;
    if unauthorized {
        assert_eq!(h.state(), SystemState::ForcedEntryAlarm, "at {:?}", h.elapsed());
    }
}

/// An alarm is only ever raised for an open door with the lock engaged.
fn assert_alarm_justified(h: &Harness, effects: &[Effect]) {
    if logs(effects, EventChannel::ForcedEntry).iter().any(|m| m == "Door forced open!") {
        let door = h.controller.door_state();
        assert_eq!(door.sensed, DoorPosition::Open);
        assert_eq!(door.commanded, LockCommand::Locked);
    }
}

fn checked(h: &Harness, effects: Vec<Effect>) {
    assert_forced_entry_caught(h);
    assert_alarm_justified(h, &effects);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_forced_entry_alarm_iff_unauthorized_open(
        forced_entry in policy(),
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut h = Harness::with_config(ControllerConfig {
            forced_entry,
            ..ControllerConfig::default()
        });

        for op in ops {
            match op {
                Op::Quiet(ticks) => {
                    for _ in 0..ticks {
                        let effects = h.tick();
                        checked(&h, effects);
                    }
                }
                Op::Present => {
                    let effects = h.present();
                    checked(&h, effects);
                }
                Op::Scan(valid) => {
                    let uid = if valid { VALID_UID } else { INVALID_UID };
                    let effects = h.scan(uid);
                    checked(&h, effects);
                }
                Op::Door(open) => {
                    h.door = if open { DoorPosition::Open } else { DoorPosition::Closed };
                    let effects = h.tick();
                    checked(&h, effects);
                }
                Op::Vibrate => {
                    let effects = h.vibrate();
                    checked(&h, effects);
                }
                Op::Remote(command) => {
                    let effects = h.remote(Some(command));
                    checked(&h, effects);
                }
                Op::Acknowledge => {
                    let now = h.now;
                    h.controller.acknowledge_alarm(now);
                    let effects = h.tick();
                    checked(&h, effects);
                }
            }
        }
    }

    #[test]
    fn prop_await_exits_within_one_tick_of_timeout(tick_ms in 10u64..=1_000) {
        let mut h = Harness::with_config(ControllerConfig {
            tick_period_ms: tick_ms,
            ..ControllerConfig::default()
        });
        h.present();
        let armed_at = h.now;

        let limit = ms(10_000) + ms(tick_ms) * 2;
        prop_assert!(h.run_until(limit, |h| h.state() != SystemState::AwaitingCredential));

        let waited = h.now - armed_at;
        prop_assert!(waited > ms(10_000));
        prop_assert!(waited <= ms(10_000) + ms(tick_ms));
        prop_assert_eq!(h.controller.attempts(), 0);
        prop_assert_eq!(h.state(), SystemState::Idle);
    }

    #[test]
    fn prop_presence_never_arms_while_unlocked(extra_ticks in 0u8..30) {
        let mut h = Harness::new();
        h.remote(Some(DoorCommand::Open));
        for _ in 0..extra_ticks {
            h.tick();
        }
        h.tick_with(Inputs { presence: true, ..Inputs::default() });
        prop_assert_eq!(h.state(), SystemState::Idle);
    }
}
