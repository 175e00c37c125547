//! Dispatch behavior of the hotkey registry.
//!
//! # Oracle Pattern
//!
//! Each test drives the registry with explicit instants and ends with checks
//! on the recorded firing times and on the registry's held-key state.

use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use keybook_input::{
    ActionError, ErrorContext, ErrorHandler, Hotkey, Key, KeyState, Keyboard, Modifiers, Origin,
};
use proptest::prelude::*;

const INTERVAL: Duration = Duration::from_millis(100);

/// Context recording the instant of every firing, per hotkey name.
#[derive(Debug, Default)]
struct Recorder {
    fired: Vec<(&'static str, Instant)>,
    now: Option<Instant>,
}

impl Recorder {
    fn times(&self, name: &str) -> Vec<Instant> {
        self.fired.iter().filter(|(n, _)| *n == name).map(|(_, t)| *t).collect()
    }
}

fn recording(name: &'static str) -> impl Fn(&mut Recorder) -> Result<(), ActionError> {
    move |rec: &mut Recorder| {
        let now = rec.now.ok_or_else(|| ActionError::msg("clock not set"))?;
        rec.fired.push((name, now));
        Ok(())
    }
}

/// Press/release/tick helpers that keep the recorder's clock in sync.
struct Rig {
    keyboard: Keyboard<Recorder>,
    rec: Recorder,
    t0: Instant,
}

impl Rig {
    fn new(keyboard: Keyboard<Recorder>) -> Self {
        Self { keyboard, rec: Recorder::default(), t0: Instant::now() }
    }

    fn at(&mut self, ms: u64) -> Instant {
        let now = self.t0 + Duration::from_millis(ms);
        self.rec.now = Some(now);
        now
    }

    fn press(&mut self, c: char, ms: u64) -> KeyState {
        let now = self.at(ms);
        self.keyboard.press(&mut self.rec, Key::from(c), Modifiers::NONE, now)
    }

    fn release(&mut self, c: char) {
        self.keyboard.release(&Key::from(c));
    }

    fn tick(&mut self, ms: u64) {
        let now = self.at(ms);
        self.keyboard.tick(&mut self.rec, now);
    }

    fn ms(&self, times: &[Instant]) -> Vec<u64> {
        times.iter().map(|t| (*t - self.t0).as_millis() as u64).collect()
    }
}

fn failure_log() -> (ErrorHandler, Rc<RefCell<Vec<(String, ErrorContext)>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let handler: ErrorHandler = {
        let log = Rc::clone(&log);
        Rc::new(move |error: &ActionError, context: &ErrorContext| {
            log.borrow_mut().push((error.to_string(), context.clone()));
        })
    };
    (handler, log)
}

#[test]
fn pressing_held_key_is_idempotent() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('p'), recording("p")));
    let mut rig = Rig::new(keyboard);

    rig.press('p', 0);
    rig.press('p', 30);
    rig.press('p', 60);

    assert_eq!(rig.keyboard.held_keys().count(), 1);
    assert_eq!(rig.rec.times("p").len(), 1);
}

#[test]
fn release_of_unheld_key_is_noop() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('p'), recording("p")));
    let mut rig = Rig::new(keyboard);

    rig.press('p', 0);
    rig.release('q');

    assert!(rig.keyboard.is_held(&KeyState::plain('p')));
    assert_eq!(rig.rec.times("p").len(), 1);
}

#[test]
fn one_shot_fires_once_per_press_cycle_never_on_release() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('p'), recording("p")));
    let mut rig = Rig::new(keyboard);

    rig.press('p', 0);
    rig.tick(500);
    rig.release('p');
    assert_eq!(rig.ms(&rig.rec.times("p")), [0]);

    rig.press('p', 600);
    rig.release('p');
    assert_eq!(rig.ms(&rig.rec.times("p")), [0, 600]);
}

#[test]
fn repeating_hotkey_fires_on_interval_grid() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('r'), recording("r")).repeating(INTERVAL));
    let mut rig = Rig::new(keyboard);

    rig.press('r', 0);
    for ms in (10..=350).step_by(10) {
        rig.tick(ms);
    }
    assert_eq!(rig.ms(&rig.rec.times("r")), [0, 100, 200, 300]);

    rig.release('r');
    for ms in (360..=800).step_by(10) {
        rig.tick(ms);
    }
    assert_eq!(rig.rec.times("r").len(), 4, "release must stop the timer");
    assert!(rig.keyboard.next_deadline().is_none());
}

#[test]
fn repress_restarts_sequence_from_fresh_t0() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('r'), recording("r")).repeating(INTERVAL));
    let mut rig = Rig::new(keyboard);

    rig.press('r', 0);
    rig.tick(100);
    rig.release('r');

    rig.press('r', 1000);
    rig.tick(1100);
    rig.tick(1200);

    assert_eq!(rig.ms(&rig.rec.times("r")), [0, 100, 1000, 1100, 1200]);
}

#[test]
fn quick_repress_waits_for_interval() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('r'), recording("r")).repeating(INTERVAL));
    let mut rig = Rig::new(keyboard);

    rig.press('r', 0);
    rig.release('r');

    // Fired 40ms ago: no immediate firing, the timer picks it up.
    rig.press('r', 40);
    assert_eq!(rig.ms(&rig.rec.times("r")), [0]);

    rig.tick(140);
    assert_eq!(rig.ms(&rig.rec.times("r")), [0, 140]);
}

#[test]
fn late_ticks_skip_missed_periods() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('r'), recording("r")).repeating(INTERVAL));
    let mut rig = Rig::new(keyboard);

    rig.press('r', 0);
    rig.tick(450);
    rig.tick(460);
    rig.tick(500);

    assert_eq!(rig.ms(&rig.rec.times("r")), [0, 450, 500]);
}

#[test]
fn release_all_cancels_every_timer_and_is_idempotent() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkeys([
        Hotkey::new(KeyState::plain('a'), recording("a")).repeating(INTERVAL),
        Hotkey::new(KeyState::plain('b'), recording("b")).repeating(INTERVAL),
    ]);
    let mut rig = Rig::new(keyboard);

    rig.keyboard.release_all();

    rig.press('a', 0);
    rig.press('b', 0);
    rig.keyboard.release_all();
    rig.keyboard.release_all();
    rig.tick(500);

    assert_eq!(rig.keyboard.held_keys().count(), 0);
    assert_eq!(rig.rec.times("a").len(), 1);
    assert_eq!(rig.rec.times("b").len(), 1);
}

#[test]
fn guard_is_rechecked_on_every_repeat() {
    let open = Rc::new(RefCell::new(true));
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    keyboard.add_hotkey(
        Hotkey::new(KeyState::plain('r'), recording("r")).repeating(INTERVAL).guard({
            let open = Rc::clone(&open);
            move |_: &Recorder| *open.borrow()
        }),
    );
    let mut rig = Rig::new(keyboard);

    rig.press('r', 0);
    *open.borrow_mut() = false;
    rig.tick(100);
    *open.borrow_mut() = true;
    rig.tick(200);

    assert_eq!(rig.ms(&rig.rec.times("r")), [0, 200]);
}

#[test]
fn failing_action_is_isolated() {
    let (handler, failures) = failure_log();
    let mut keyboard: Keyboard<Recorder> = Keyboard::new(handler);
    keyboard.add_hotkeys([
        Hotkey::new(KeyState::plain('x'), |_: &mut Recorder| Err(ActionError::msg("broken"))),
        Hotkey::new(KeyState::plain('y'), recording("y")),
    ]);
    let mut rig = Rig::new(keyboard);

    rig.press('x', 0);
    rig.press('y', 10);

    assert_eq!(failures.borrow().len(), 1);
    assert_eq!(failures.borrow()[0].0, "action failed: broken");
    assert_eq!(rig.ms(&rig.rec.times("y")), [10]);
    assert!(rig.keyboard.is_held(&KeyState::plain('x')), "failed hotkey's key stays held");
}

#[test]
fn panicking_action_is_caught_and_timer_keeps_running() {
    let (handler, failures) = failure_log();
    let mut keyboard: Keyboard<Recorder> = Keyboard::new(handler);
    keyboard.add_hotkey(
        Hotkey::new(KeyState::plain('x'), |_: &mut Recorder| -> Result<(), ActionError> {
            panic!("exploded")
        })
        .repeating(INTERVAL),
    );
    keyboard.add_hotkey(Hotkey::new(KeyState::plain('y'), recording("y")));
    let mut rig = Rig::new(keyboard);

    rig.press('x', 0);
    rig.tick(100);
    rig.tick(200);
    rig.press('y', 250);

    let failures = failures.borrow();
    let origins: Vec<Origin> = failures.iter().map(|(_, ctx)| ctx.origin).collect();
    assert_eq!(origins, [Origin::Press, Origin::Repeat, Origin::Repeat]);
    assert!(failures.iter().all(|(msg, _)| msg == "action panicked: exploded"));
    assert_eq!(rig.ms(&rig.rec.times("y")), [250]);
}

#[test]
fn late_tick_fires_once_and_records_tick_instant() {
    let mut keyboard: Keyboard<Recorder> = Keyboard::default();
    let id =
        keyboard.add_hotkey(Hotkey::new(KeyState::plain('a'), recording("a")).repeating(INTERVAL));
    let mut rig = Rig::new(keyboard);

    rig.press('a', 0);
    rig.tick(156);
    rig.tick(200);
    rig.tick(250);

    // Slots are 100, 200, 300: the 156 tick covers slot 100, the 200 tick slot 200.
    assert_eq!(rig.ms(&rig.rec.times("a")), [0, 156, 200]);

    // `last_fired_at` is when the action ran, not the slot it was due in.
    let hotkey = rig.keyboard.hotkey(id).unwrap();
    assert_eq!(hotkey.last_fired_at(), Some(rig.t0 + Duration::from_millis(200)));
    assert_eq!(hotkey.timer().map(|t| t.next_due()), Some(rig.t0 + Duration::from_millis(300)));
}

/// Operations for the registry state-machine property test.
#[derive(Debug, Clone)]
enum Op {
    Press(char),
    Release(char),
    ReleaseAll,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let keys = prop::sample::select(vec!['a', 'b', 'c', 'd']);
    prop_oneof![
        3 => keys.clone().prop_map(Op::Press),
        3 => keys.prop_map(Op::Release),
        1 => Just(Op::ReleaseAll),
        3 => (1u64..250).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn prop_timers_only_exist_for_held_keys(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut keyboard: Keyboard<Recorder> = Keyboard::default();
        keyboard.add_hotkeys([
            Hotkey::new(KeyState::plain('a'), recording("a")).repeating(INTERVAL),
            Hotkey::new(KeyState::plain('b'), recording("b")).repeating(Duration::from_millis(35)),
            Hotkey::new(KeyState::plain('c'), recording("c")),
        ]);
        let mut rig = Rig::new(keyboard);
        let mut clock = 0;
        let interval_ms = INTERVAL.as_millis() as u64;
        // Press instant of the current hold of 'a' and the last grid slot it fired in.
        let mut hold_start: Option<u64> = None;
        let mut last_slot = 0;

        for op in ops {
            let fired_before = rig.rec.times("a").len();
            match op {
                Op::Press(c) => {
                    let fresh = c == 'a' && !rig.keyboard.is_held(&KeyState::plain('a'));
                    rig.press(c, clock);
                    if fresh {
                        hold_start = Some(clock);
                        last_slot = 0;
                    }
                },
                Op::Release(c) => {
                    rig.release(c);
                    if c == 'a' {
                        hold_start = None;
                    }
                },
                Op::ReleaseAll => {
                    rig.keyboard.release_all();
                    hold_start = None;
                },
                Op::Advance(ms) => {
                    clock += ms;
                    rig.tick(clock);

                    // A late tick fires once, in the latest elapsed slot of
                    // the press-anchored grid, and never twice in one slot.
                    let fired = rig.rec.times("a").len() - fired_before;
                    prop_assert!(fired <= 1);
                    if fired == 1 {
                        let start = hold_start.expect("repeat fired without a hold");
                        let slot = (clock - start) / interval_ms;
                        prop_assert!(slot > last_slot, "slot {} fired after {}", slot, last_slot);
                        last_slot = slot;
                    }
                },
            }

            for hotkey in rig.keyboard.hotkeys() {
                if hotkey.timer().is_some() {
                    prop_assert!(rig.keyboard.is_held(hotkey.trigger()));
                }
            }
            let held: Vec<_> = rig.keyboard.held_keys().collect();
            let unique: std::collections::HashSet<_> = held.iter().collect();
            prop_assert_eq!(held.len(), unique.len());
        }
    }
}
