//! Property tests for the flow invariants.
//!
//! - After any completed activation, exactly one screen is active.
//! - Emergency restore is idempotent.
//! - The coordinator reaches all-active within `N * max_attempts` signal
//!   attempts for any acknowledge/ignore pattern.
//! - Acknowledgements never panic or disturb settled state, however late
//!   or misaddressed.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use runegate_core::{HeadlessView, NoopHooks, ScreenId, ScreenRegistry};
use runegate_runtime::{
    CoordinatorConfig, CoordinatorEvent, InitCoordinator, ManagerConfig, ScreenManager,
    StartOutcome, Subsystem, SubsystemState,
};

const SCREENS: [&str; 4] = ["runeSelect", "game", "areaSelect", "battle"];

#[derive(Debug, Clone)]
enum Op {
    Activate(usize),
    ActivateUnknown,
    GoBack,
    Restore,
    AdvanceMs(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..SCREENS.len()).prop_map(Op::Activate),
        Just(Op::ActivateUnknown),
        Just(Op::GoBack),
        Just(Op::Restore),
        (1u64..1_000).prop_map(Op::AdvanceMs),
    ]
}

fn manager() -> ScreenManager<HeadlessView, NoopHooks> {
    let registry = ScreenRegistry::from_ids(SCREENS).unwrap();
    let config = ManagerConfig::new("runeSelect", "game", "runeSelect");
    ScreenManager::new(registry, HeadlessView::new(), NoopHooks, config).unwrap()
}

proptest! {
    // Whatever the interleaving of operations and clock advances, the
    // registry never holds more than one active screen, and a successful
    // activate leaves exactly one.
    #[test]
    fn at_most_one_screen_is_ever_active(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut mgr = manager();
        let t0 = Instant::now();
        let mut clock = t0;

        for op in ops {
            match op {
                Op::Activate(idx) => {
                    if mgr.activate_at(SCREENS[idx], clock).is_ok() {
                        prop_assert_eq!(mgr.registry().active_count(), 1);
                    }
                }
                Op::ActivateUnknown => {
                    let before = mgr.active();
                    prop_assert!(mgr.activate_at("noSuchScreen", clock).is_err());
                    prop_assert_eq!(mgr.active(), before);
                }
                Op::GoBack => {
                    let _ = mgr.go_back_at(clock);
                }
                Op::Restore => {
                    mgr.emergency_restore();
                    prop_assert_eq!(mgr.registry().active_count(), 1);
                }
                Op::AdvanceMs(ms) => {
                    clock += Duration::from_millis(ms);
                    mgr.tick_at(clock);
                }
            }
            prop_assert!(mgr.registry().active_count() <= 1);
        }
    }

    // Restore twice with nothing in between: same screen both times.
    #[test]
    fn emergency_restore_is_idempotent(ops in prop::collection::vec(op_strategy(), 0..32)) {
        let mut mgr = manager();
        let t0 = Instant::now();
        let mut clock = t0;

        for op in ops {
            match op {
                Op::Activate(idx) => { let _ = mgr.activate_at(SCREENS[idx], clock); }
                Op::ActivateUnknown => { let _ = mgr.activate_at("noSuchScreen", clock); }
                Op::GoBack => { let _ = mgr.go_back_at(clock); }
                Op::Restore => { mgr.emergency_restore(); }
                Op::AdvanceMs(ms) => { clock += Duration::from_millis(ms); mgr.tick_at(clock); }
            }
        }

        let first = mgr.emergency_restore();
        let second = mgr.emergency_restore();
        prop_assert_eq!(first, second);
        prop_assert_eq!(mgr.registry().active_count(), 1);
    }
}

struct Scripted {
    name: String,
    acks_on_attempt: Option<u32>,
    starts: u32,
}

impl Subsystem for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> StartOutcome {
        self.starts += 1;
        match self.acks_on_attempt {
            Some(n) if self.starts >= n => StartOutcome::Ready,
            _ => StartOutcome::Pending,
        }
    }
}

proptest! {
    // N subsystems, each acknowledging on some attempt or never: the
    // coordinator reaches all-active within N * max_attempts signals, and
    // every status ends Active.
    #[test]
    fn coordinator_terminates_within_the_attempt_budget(
        plans in prop::collection::vec(prop::option::of(1u32..=3), 1..8)
    ) {
        let config = CoordinatorConfig::default();
        let max_attempts = config.max_attempts;
        let timeout = config.attempt_timeout;
        let mut coord = InitCoordinator::new(config);
        for (i, plan) in plans.iter().enumerate() {
            coord.register(Box::new(Scripted {
                name: format!("subsystem{i}"),
                acks_on_attempt: *plan,
                starts: 0,
            }));
        }

        let t0 = Instant::now();
        let mut clock = t0;
        let mut signals = 0u32;
        let budget = plans.len() as u32 * max_attempts;

        loop {
            match coord.poll_at(clock) {
                CoordinatorEvent::Signaled { .. } => {
                    signals += 1;
                    // Let the armed deadline fire on the next poll.
                    clock += timeout;
                }
                CoordinatorEvent::AllActive | CoordinatorEvent::Done => break,
                CoordinatorEvent::Waiting => clock += Duration::from_millis(100),
                _ => {}
            }
            prop_assert!(signals <= budget, "exceeded signal budget");
        }

        prop_assert!(coord.is_complete());
        for status in coord.statuses() {
            prop_assert_eq!(status.state, SubsystemState::Active);
            prop_assert!(status.attempts <= max_attempts);
        }
    }

    // Acknowledgements for arbitrary names at arbitrary points never panic
    // and never un-complete a finished sequence.
    #[test]
    fn stray_acknowledgements_are_harmless(
        names in prop::collection::vec("[a-z]{1,10}", 0..16)
    ) {
        let mut coord = InitCoordinator::new(CoordinatorConfig::default());
        coord.register(Box::new(Scripted {
            name: "screenManager".to_string(),
            acks_on_attempt: Some(1),
            starts: 0,
        }));
        let t0 = Instant::now();

        coord.poll_at(t0);
        coord.poll_at(t0);
        let was_complete = coord.is_complete();

        for name in &names {
            coord.acknowledge(name);
        }
        coord.acknowledge("screenManager");

        prop_assert_eq!(coord.is_complete(), was_complete);
        prop_assert_eq!(
            coord.status("screenManager").map(|s| s.state),
            Some(SubsystemState::Active)
        );
    }
}
