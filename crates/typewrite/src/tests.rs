use std::cell::{Cell, RefCell};
use std::rc::Rc;

use typewrite_core::{
    Clock, FixedRandom, ManualFrames, Options, OptionsPatch, RandomSource, SeededRandom, TestClock, ms,
};

use crate::error::Error;
use crate::stage::{InstanceState, Stage};
use crate::typewriter::{Typewriter, sink};

struct Harness {
    frames: Rc<ManualFrames>,
    clock: Rc<TestClock>,
    seen: Rc<RefCell<Vec<String>>>,
    tw: Typewriter,
    now: Cell<u64>,
}

fn zero_delays() -> OptionsPatch {
    OptionsPatch::new()
        .typing_delay(ms(0))
        .untyping_delay(ms(0))
        .delay_before_typing(ms(0))
        .delay_after_typing(ms(0))
        .typing_variation(ms(0))
}

impl Harness {
    fn new(strings: &[&str], patch: OptionsPatch) -> Self {
        Self::with_random(strings, patch, Rc::new(FixedRandom::new(0.0)))
    }

    fn with_random(strings: &[&str], patch: OptionsPatch, random: Rc<dyn RandomSource>) -> Self {
        let frames = Rc::new(ManualFrames::new());
        let clock = Rc::new(TestClock::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let tw = Typewriter::builder(frames.clone())
            .clock(clock.clone())
            .random(random)
            .strings(strings.iter().copied())
            .options(patch)
            .callback({
                let seen = seen.clone();
                move |s| seen.borrow_mut().push(s.to_string())
            })
            .build();
        Self {
            frames,
            clock,
            seen,
            tw,
            now: Cell::new(0),
        }
    }

    /// Move the clock to `t` ms and pump one frame.
    fn at(&self, t: u64) {
        self.now.set(t);
        self.clock.set(ms(t));
        self.frames.advance(ms(t));
    }

    fn tick(&self) {
        self.at(self.now.get() + 1);
    }

    fn ticks(&self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

fn counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, move || c.set(c.get() + 1))
}

fn index_log() -> (Rc<RefCell<Vec<usize>>>, impl Fn(usize) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    (log, move |i| l.borrow_mut().push(i))
}

#[test]
fn first_five_ticks_of_a_two_letter_string() {
    let h = Harness::new(&["ab"], zero_delays());
    h.tw.start().unwrap();

    let mut stages = Vec::new();
    for _ in 0..5 {
        stages.push(h.tw.running_state());
        h.tick();
    }
    assert_eq!(
        stages,
        vec![
            Stage::CycleStart,
            Stage::DelayBeforeTyping,
            Stage::BeforeTyping,
            Stage::Typing,
            Stage::Typing,
        ]
    );
    insta::assert_snapshot!(h.seen().join(", "), @"a|, ab|");
}

#[test]
fn typing_delivers_one_call_per_prefix_then_settles() {
    let h = Harness::new(
        &["hello"],
        zero_delays().untype_string(false).looping(false),
    );
    let (finished, on_finished) = counter();
    h.tw.on_array_finished(on_finished, false).unwrap();
    h.tw.start().unwrap();
    h.ticks(40);

    insta::assert_snapshot!(h.seen().join(", "), @"h|, he|, hel|, hell|, hello|");
    assert_eq!(finished.get(), 1);
    assert_eq!(h.tw.running_state(), Stage::Idle);
    assert_eq!(h.tw.instance_state(), InstanceState::Running);
}

#[test]
fn single_string_without_loop_finishes_once_and_idles() {
    let h = Harness::new(&["x"], zero_delays().untype_string(false).looping(false));
    let (finished, on_finished) = counter();
    h.tw.on_array_finished(on_finished, false).unwrap();
    h.tw.start().unwrap();

    h.ticks(7);
    assert_eq!(finished.get(), 1);
    assert_eq!(h.tw.running_state(), Stage::Idle);

    h.ticks(2000);
    assert_eq!(finished.get(), 1);
    assert_eq!(h.tw.running_state(), Stage::Idle);
    // blinking against the typed string
    assert!(h.seen().iter().all(|s| s == "x" || s == "x|"));
}

#[test]
fn sink_never_sees_the_same_string_twice_in_a_row() {
    let h = Harness::new(&["ab", "b", "abc"], zero_delays().cursor_blink_rate(ms(3)));
    h.tw.start().unwrap();
    h.ticks(300);

    let seen = h.seen();
    assert!(seen.len() > 10);
    for pair in seen.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn untyping_rewinds_to_the_bare_cursor() {
    let h = Harness::new(&["ab"], zero_delays().looping(false));
    let (after_untyping, on_after) = index_log();
    h.tw.on_after_untyping(on_after, false).unwrap();
    h.tw.start().unwrap();
    h.ticks(20);

    insta::assert_snapshot!(h.seen().join(", "), @"a|, ab|, a|, |");
    assert_eq!(*after_untyping.borrow(), vec![0]);
}

#[test]
fn once_subscribers_fire_once_across_loops() {
    let h = Harness::new(&["a"], zero_delays().untype_string(false));
    let (once, on_once) = counter();
    let (every, on_every) = counter();
    let (loops, on_loop) = counter();
    h.tw.on_after_typing(move |_| on_once(), true).unwrap();
    h.tw.on_after_typing(move |_| on_every(), false).unwrap();
    h.tw.on_array_finished(on_loop, false).unwrap();
    h.tw.start().unwrap();
    h.ticks(70);

    assert_eq!(once.get(), 1);
    assert!(every.get() >= 5);
    assert_eq!(loops.get(), every.get());
}

#[test]
fn unsubscribed_listener_never_fires_again() {
    let h = Harness::new(&["a", "b"], zero_delays().untype_string(false));
    let (count, on_before) = counter();
    let unsubscribe = h.tw.on_before_typing(move |_| on_before(), false).unwrap();
    h.tw.start().unwrap();

    h.ticks(3);
    assert_eq!(count.get(), 1);
    unsubscribe.run();
    h.ticks(100);
    assert_eq!(count.get(), 1);
}

#[test]
fn unsubscribing_a_later_listener_mid_pass_only_affects_future_passes() {
    let h = Harness::new(&["a"], zero_delays().untype_string(false));
    let (b_calls, on_b) = counter();
    let b_handle: Rc<RefCell<Option<typewrite_core::Dispose>>> = Rc::new(RefCell::new(None));

    let handle = b_handle.clone();
    h.tw.on_before_typing(
        move |_| {
            if let Some(d) = handle.borrow().as_ref() {
                d.run();
            }
        },
        false,
    )
    .unwrap();
    *b_handle.borrow_mut() = Some(h.tw.on_before_typing(move |_| on_b(), false).unwrap());

    h.tw.start().unwrap();
    h.ticks(50);
    assert_eq!(b_calls.get(), 1);
}

#[test]
fn out_of_range_jumps_resolve_to_the_first_string() {
    let h = Harness::new(&["a", "b", "c"], zero_delays());
    let (indices, on_before) = index_log();
    h.tw.on_before_typing(on_before, false).unwrap();
    h.tw.start().unwrap();

    h.tw.jump_to(Some(2), true).unwrap();
    h.ticks(3);
    h.tw.jump_to(Some(-1), true).unwrap();
    assert_eq!(h.tw.running_state(), Stage::CycleStart);
    h.ticks(3);
    h.tw.jump_to(Some(20), true).unwrap();
    h.ticks(3);

    assert_eq!(*indices.borrow(), vec![2, 0, 0]);
}

#[test]
fn jump_while_ready_sets_the_starting_string() {
    let h = Harness::new(&["a", "b", "c"], zero_delays());
    let (indices, on_before) = index_log();
    h.tw.on_before_typing(on_before, false).unwrap();

    h.tw.jump_to(Some(1), false).unwrap();
    h.tw.start().unwrap();
    h.ticks(3);
    assert_eq!(*indices.borrow(), vec![1]);
}

#[test]
fn deferred_jumps_collapse_to_the_last_target() {
    let h = Harness::new(&["a", "b", "c"], zero_delays().untype_string(false));
    let (indices, on_before) = index_log();
    h.tw.on_before_typing(on_before, false).unwrap();
    h.tw.start().unwrap();

    h.ticks(3);
    h.tw.jump_to(Some(1), false).unwrap();
    h.tw.jump_to(Some(2), false).unwrap();
    // the current string finishes first
    h.tick();
    assert_eq!(h.seen(), vec!["a|"]);
    h.ticks(6);

    assert_eq!(*indices.borrow(), vec![0, 2]);
}

#[test]
fn jump_requires_a_ready_or_running_instance() {
    let frames = Rc::new(ManualFrames::new());
    let tw = Typewriter::builder(frames).strings(["a"]).build();
    let err = tw.jump_to(None, false).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidState {
            actual: InstanceState::Uninitialized,
            ..
        }
    ));
}

#[test]
fn pause_and_resume_continue_the_same_stage() {
    let h = Harness::new(&["abc"], zero_delays());
    h.tw.start().unwrap();
    h.ticks(4);
    assert_eq!(h.seen(), vec!["a|"]);

    h.tw.pause().unwrap();
    h.tw.pause().unwrap();
    assert!(h.tw.is_paused());
    assert_eq!(h.tw.running_state(), Stage::Idle);
    h.ticks(10);
    assert_eq!(h.seen(), vec!["a|"]);

    h.tw.resume().unwrap();
    assert_eq!(h.tw.running_state(), Stage::Typing);
    h.tw.resume().unwrap();
    h.ticks(2);
    insta::assert_snapshot!(h.seen().join(", "), @"a|, ab|, abc|");
}

#[test]
fn paused_idle_blinks_against_the_committed_text() {
    let h = Harness::new(&["abc"], zero_delays().cursor_blink_rate(ms(10)));
    h.tw.start().unwrap();
    h.ticks(5);
    h.tw.pause().unwrap();
    h.ticks(25);

    let seen = h.seen();
    assert_eq!(&seen[..2], &["a|", "ab|"]);
    assert!(seen[2..].iter().all(|s| s == "ab" || s == "ab|"));
    assert!(seen.len() >= 4);
}

// Pausing doesn't push the typing threshold back: after a long pause the next
// grapheme is due on the very first tick.
#[test]
fn long_pause_makes_the_next_step_due_immediately() {
    let h = Harness::new(
        &["abc"],
        zero_delays()
            .typing_delay(ms(100))
            .cursor_blink_rate(ms(10_000)),
    );
    h.tw.start().unwrap();
    h.ticks(3);
    assert_eq!(h.tw.running_state(), Stage::Typing);

    h.at(103);
    assert_eq!(h.seen(), vec!["a|"]);
    h.at(110);
    h.tw.pause().unwrap();
    h.at(1110);
    h.tw.resume().unwrap();
    h.at(1111);
    assert_eq!(h.seen(), vec!["a|", "ab|"]);
}

#[test]
fn pause_and_resume_require_running() {
    let h = Harness::new(&["a"], zero_delays());
    let err = h.tw.pause().unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidState {
            method: "pause",
            actual: InstanceState::Ready,
            ..
        }
    ));
    assert!(h.tw.resume().is_err());
}

#[test]
fn jitter_delays_typing_deterministically() {
    let random = Rc::new(FixedRandom::new(0.5));
    let h = Harness::with_random(
        &["ab"],
        zero_delays().typing_variation(ms(10)),
        random.clone(),
    );
    let stamps = Rc::new(RefCell::new(Vec::new()));
    let clock = h.clock.clone();
    let s = stamps.clone();
    h.tw.set_callback(
        Some(sink(move |text| {
            s.borrow_mut().push((clock.now().as_millis(), text.to_string()))
        })),
        true,
    )
    .unwrap();
    h.tw.start().unwrap();
    h.ticks(20);

    // typing entered at 3ms; each grapheme waits floor(0.5 * 10) = 5ms extra
    assert_eq!(
        *stamps.borrow(),
        vec![(8, "a|".to_string()), (13, "ab|".to_string())]
    );
    assert!(random.draws() > 2);
}

#[test]
fn seeded_jitter_is_reproducible() {
    let run = || {
        let h = Harness::with_random(
            &["hello", "world"],
            zero_delays().typing_variation(ms(30)),
            Rc::new(SeededRandom::new(42)),
        );
        let stamps = Rc::new(RefCell::new(Vec::new()));
        let clock = h.clock.clone();
        let s = stamps.clone();
        h.tw.set_callback(
            Some(sink(move |text| {
                s.borrow_mut().push((clock.now(), text.to_string()))
            })),
            false,
        )
        .unwrap();
        h.tw.start().unwrap();
        h.ticks(400);
        stamps.take()
    };
    let first = run();
    assert!(first.len() > 10);
    assert_eq!(first, run());
}

#[test]
fn queued_options_merge_like_a_single_call() {
    let run = |patches: Vec<OptionsPatch>| {
        let h = Harness::new(&["ab"], zero_delays());
        h.tw.start().unwrap();
        h.ticks(4);
        for patch in patches {
            h.tw.set_options(patch, false).unwrap();
        }
        h.ticks(8);
        assert_eq!(h.tw.options().unwrap().cursor_blink_rate, ms(500));
        assert!(h.tw.options().unwrap().show_cursor);
        h.ticks(1);
        h.tw.options().unwrap()
    };

    let split = run(vec![
        OptionsPatch::new().cursor_blink_rate(ms(7)),
        OptionsPatch::new().show_cursor(false),
    ]);
    let single = run(vec![
        OptionsPatch::new()
            .cursor_blink_rate(ms(7))
            .show_cursor(false),
    ]);
    assert_eq!(split, single);
    assert_eq!(split.cursor_blink_rate, ms(7));
    assert!(!split.show_cursor);
}

#[test]
fn queued_strings_collapse_to_the_last_call() {
    let h = Harness::new(&["ab"], zero_delays().untype_string(false));
    h.tw.start().unwrap();
    h.ticks(4);
    h.tw.set_strings(["x"], false).unwrap();
    h.tw.set_strings(["yz"], false).unwrap();
    assert_eq!(h.tw.strings().unwrap(), vec!["ab"]);

    h.ticks(10);
    assert_eq!(h.tw.strings().unwrap(), vec!["yz"]);
    assert_eq!(&h.seen()[..2], &["a|", "ab|"]);
    assert!(h.seen().contains(&"yz|".to_string()));
    assert!(!h.seen().contains(&"x|".to_string()));
}

#[test]
fn immediate_empty_strings_demote_in_the_same_call() {
    let h = Harness::new(&["abc"], zero_delays());
    h.tw.start().unwrap();
    h.ticks(4);

    h.tw.set_strings(Vec::<String>::new(), true).unwrap();
    assert_eq!(h.tw.instance_state(), InstanceState::Uninitialized);
    assert_eq!(h.tw.running_state(), Stage::Idle);
    assert_eq!(h.frames.pending(), 0);

    let err = h.tw.start().unwrap_err();
    assert!(err.to_string().contains("supply non-empty strings"));
}

#[test]
fn deferred_empty_strings_wait_for_the_boundary() {
    let h = Harness::new(&["ab"], zero_delays().untype_string(false));
    h.tw.start().unwrap();
    h.ticks(4);
    h.tw.set_strings(Vec::<String>::new(), false).unwrap();
    assert_eq!(h.tw.instance_state(), InstanceState::Running);

    h.ticks(10);
    assert_eq!(h.tw.instance_state(), InstanceState::Uninitialized);
    assert_eq!(h.tw.running_state(), Stage::Idle);
    assert_eq!(h.seen(), vec!["a|", "ab|"]);
}

#[test]
fn deferred_callback_swap_lands_at_the_boundary() {
    let h = Harness::new(&["ab", "cd"], zero_delays().untype_string(false));
    let other = Rc::new(RefCell::new(Vec::new()));
    h.tw.start().unwrap();
    h.ticks(4);

    let o = other.clone();
    h.tw.set_callback(Some(sink(move |s| o.borrow_mut().push(s.to_string()))), false)
        .unwrap();
    h.ticks(12);

    assert_eq!(h.seen(), vec!["a|", "ab|"]);
    assert_eq!(&other.borrow()[..2], &["c|", "cd|"]);
}

#[test]
fn toggling_untype_immediately_restarts_the_current_string() {
    let h = Harness::new(&["ab", "cd"], zero_delays());
    let (indices, on_before) = index_log();
    h.tw.on_before_typing(on_before, false).unwrap();
    h.tw.start().unwrap();
    h.ticks(4);

    h.tw.set_options(OptionsPatch::new().untype_string(false), true)
        .unwrap();
    assert_eq!(h.tw.running_state(), Stage::CycleStart);
    h.ticks(14);

    assert_eq!(*indices.borrow(), vec![0, 0, 1]);
    // no rewind fragments after the switch
    assert!(!h.seen().contains(&"|".to_string()));
}

#[test]
fn deferred_strings_restart_a_finished_cycle() {
    let h = Harness::new(&["x"], zero_delays().untype_string(false).looping(false));
    let (finished, on_finished) = counter();
    h.tw.on_array_finished(on_finished, false).unwrap();
    h.tw.start().unwrap();
    h.ticks(10);
    assert_eq!(h.tw.running_state(), Stage::Idle);

    h.tw.set_strings(["y"], false).unwrap();
    h.ticks(10);
    assert!(h.seen().contains(&"y|".to_string()));
    assert_eq!(finished.get(), 2);
}

#[test]
fn listeners_may_call_back_into_the_session() {
    let h = Harness::new(&["ab", "cd"], zero_delays());
    let tw = h.tw.clone();
    h.tw.on_after_typing(
        move |_| {
            tw.pause().unwrap();
        },
        true,
    )
    .unwrap();
    h.tw.start().unwrap();
    h.ticks(7);

    assert!(h.tw.is_paused());
    h.tw.resume().unwrap();
    assert_eq!(h.tw.running_state(), Stage::DelayAfterTyping);
}

#[test]
fn lifecycle_transitions_and_guards() {
    let frames = Rc::new(ManualFrames::new());
    let tw = Typewriter::builder(frames.clone()).build();
    assert_eq!(tw.instance_state(), InstanceState::Uninitialized);
    assert!(matches!(
        tw.start(),
        Err(Error::InvalidState {
            method: "start",
            actual: InstanceState::Uninitialized,
            ..
        })
    ));

    tw.set_strings(["a"], false).unwrap();
    assert_eq!(tw.instance_state(), InstanceState::Uninitialized);
    tw.set_callback(Some(sink(|_| {})), false).unwrap();
    assert_eq!(tw.instance_state(), InstanceState::Ready);

    tw.start().unwrap();
    assert_eq!(tw.instance_state(), InstanceState::Running);
    assert_eq!(frames.pending(), 1);
    assert!(tw.start().is_err());

    tw.stop().unwrap();
    assert_eq!(tw.instance_state(), InstanceState::Ready);
    assert_eq!(tw.running_state(), Stage::Idle);
    assert_eq!(frames.pending(), 0);

    tw.set_callback(None, false).unwrap();
    assert_eq!(tw.instance_state(), InstanceState::Uninitialized);
}

#[test]
fn stop_lands_queued_mutations() {
    let h = Harness::new(&["abc"], zero_delays());
    h.tw.start().unwrap();
    h.ticks(4);
    h.tw.set_strings(["z"], false).unwrap();
    h.tw.stop().unwrap();
    assert_eq!(h.tw.strings().unwrap(), vec!["z"]);
    assert_eq!(h.tw.instance_state(), InstanceState::Ready);
}

#[test]
fn ready_instances_apply_deferred_options_at_once() {
    let h = Harness::new(&["a"], zero_delays());
    h.tw.set_options(OptionsPatch::new().typing_delay(ms(42)), false)
        .unwrap();
    assert_eq!(h.tw.options().unwrap().typing_delay, ms(42));
}

#[test]
fn malformed_json_options_change_nothing() {
    let h = Harness::new(&["a"], zero_delays());
    let before = h.tw.options().unwrap();
    let err = h.tw.set_options_json("[1, 2, 3]", true).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(h.tw.options().unwrap(), before);

    h.tw.set_options_json(r#"{ "typingDelay": null }"#, true)
        .unwrap();
    assert_eq!(
        h.tw.options().unwrap().typing_delay,
        Options::default().typing_delay
    );
}

#[test]
fn json_arrays_never_reach_a_running_session() {
    let h = Harness::new(&["abc"], zero_delays());
    h.tw.start().unwrap();
    h.ticks(4);
    let before = h.tw.options().unwrap();

    for immediate in [false, true] {
        let err = h.tw.set_options_json("[7, 8, 9]", immediate).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }
    h.ticks(20);
    assert_eq!(h.tw.options().unwrap(), before);
}

#[test]
fn pausing_a_halted_session_holds_its_pending_restart() {
    let h = Harness::new(&["x"], zero_delays().untype_string(false).looping(false));
    h.tw.start().unwrap();
    h.ticks(10);
    assert_eq!(h.tw.running_state(), Stage::Idle);

    h.tw.set_strings(["yz"], false).unwrap();
    h.tw.pause().unwrap();
    h.ticks(10);
    assert!(h.tw.is_paused());
    assert_eq!(h.tw.running_state(), Stage::Idle);
    assert_eq!(h.seen(), vec!["x|"]);
    assert_eq!(h.tw.strings().unwrap(), vec!["x"]);

    h.tw.resume().unwrap();
    h.ticks(6);
    assert_eq!(h.tw.strings().unwrap(), vec!["yz"]);
    insta::assert_snapshot!(h.seen().join(", "), @"x|, y|, yz|");
}

#[test]
fn immediate_demotion_lands_queued_options() {
    let h = Harness::new(&["abc"], zero_delays());
    h.tw.start().unwrap();
    h.ticks(4);

    h.tw.set_options(OptionsPatch::new().typing_delay(ms(42)), false)
        .unwrap();
    h.tw.set_strings(Vec::<String>::new(), true).unwrap();
    assert_eq!(h.tw.instance_state(), InstanceState::Uninitialized);
    assert_eq!(h.tw.options().unwrap().typing_delay, ms(42));

    h.tw.set_strings(["q"], false).unwrap();
    h.tw.start().unwrap();
    h.ticks(50);
    assert_eq!(h.tw.options().unwrap().typing_delay, ms(42));
}

#[test]
fn clearing_the_callback_lands_queued_strings() {
    let h = Harness::new(&["abc"], zero_delays());
    h.tw.start().unwrap();
    h.ticks(4);

    h.tw.set_strings(["zz"], false).unwrap();
    h.tw.set_callback(None, true).unwrap();
    assert_eq!(h.tw.instance_state(), InstanceState::Uninitialized);
    assert_eq!(h.tw.strings().unwrap(), vec!["zz"]);
}

#[test]
fn accessors_return_copies() {
    let h = Harness::new(&["a", "b"], zero_delays());
    let mut strings = h.tw.strings().unwrap();
    strings.push("c".into());
    assert_eq!(h.tw.strings().unwrap().len(), 2);
    assert!(h.tw.callback().unwrap().is_some());
}

#[test]
fn dispose_notifies_in_order_then_rejects_everything() {
    let h = Harness::new(&["abc"], zero_delays());
    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in [1, 2, 3] {
        let log = log.clone();
        h.tw.on_instance_disposed(move || log.borrow_mut().push(tag))
            .unwrap();
    }
    let tw = h.tw.clone();
    let inner_err = Rc::new(RefCell::new(None));
    let e = inner_err.clone();
    h.tw.on_instance_disposed(move || *e.borrow_mut() = tw.pause().err())
        .unwrap();

    h.tw.start().unwrap();
    h.ticks(4);
    h.tw.dispose().unwrap();

    assert_eq!(*log.borrow(), vec![1, 2, 3]);
    assert!(matches!(
        *inner_err.borrow(),
        Some(Error::Disposed { method: "pause" })
    ));
    assert_eq!(h.tw.instance_state(), InstanceState::Disposed);
    assert_eq!(h.frames.pending(), 0);

    assert!(matches!(
        h.tw.dispose(),
        Err(Error::Disposed { method: "dispose" })
    ));
    assert!(matches!(
        h.tw.start(),
        Err(Error::Disposed { method: "start" })
    ));
    assert!(h.tw.set_strings(["x"], true).is_err());
    assert!(h.tw.strings().is_err());
    assert!(h.tw.on_after_typing(|_| {}, false).is_err());

    h.ticks(5);
    assert_eq!(*log.borrow(), vec![1, 2, 3]);
}
