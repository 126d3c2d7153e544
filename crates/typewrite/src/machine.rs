//! Session state and the stage handlers.
//!
//! Handlers never call user code. They push [`Dispatch`]es which the tick
//! driver runs after releasing its borrow, so sinks and subscribers may call
//! back into the public API.

use std::rc::Rc;
use std::time::Duration;

use typewrite_core::{
    Clock, FrameScheduler, Marker, Options, OptionsPatch, RandomSource, Sequencer,
    SequencerOptions, TimerLoop,
};

use crate::stage::{Hook, InstanceState, Stage};
use crate::subscriptions::{Listener, Registry};

/// Receives every rendered string (after deduplication).
pub type Sink = Rc<dyn Fn(&str)>;

pub(crate) enum Dispatch {
    Render(Sink, String),
    Hooks(Vec<Listener>, usize),
}

pub(crate) fn run(dispatches: Vec<Dispatch>) {
    for dispatch in dispatches {
        match dispatch {
            Dispatch::Render(sink, text) => sink(&text),
            Dispatch::Hooks(listeners, index) => {
                for listener in listeners {
                    listener(index);
                }
            }
        }
    }
}

/// One-shot work the tick driver performs around the stage handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Override {
    /// Land queued mutations once the machine sits on the cycle boundary.
    AtBoundary,
    /// Land queued mutations on the next tick, restarting a halted cycle if
    /// they changed what to type.
    Restart,
}

/// Mutations waiting for the next cycle boundary.
#[derive(Default)]
pub(crate) struct Queued {
    pub strings: Option<Vec<String>>,
    pub sink: Option<Option<Sink>>,
    /// Not collapsed: every patch lands, in call order.
    pub options: Vec<OptionsPatch>,
    pub jump: Option<isize>,
}

impl Queued {
    pub fn is_empty(&self) -> bool {
        self.strings.is_none() && self.sink.is_none() && self.options.is_empty() && self.jump.is_none()
    }
}

pub(crate) struct Inner {
    pub strings: Vec<String>,
    pub sink: Option<Sink>,
    pub options: Options,
    pub instance: InstanceState,
    pub stage: Stage,
    pub paused_stage: Option<Stage>,

    pub sequencer: Option<Sequencer>,
    /// Most recent marker pulled and not yet consumed.
    pub marker: Option<Marker>,
    pub active_index: usize,
    /// Index `start()` seeds from; set by jumps while not running.
    pub start_index: usize,
    /// Text (without cursor) of the last render.
    pub committed: String,
    pub last_delivered: Option<String>,
    pub cursor_visible: bool,

    pub last_stage_at: Duration,
    pub last_string_change_at: Duration,
    pub last_cursor_toggle_at: Duration,

    pub pending_before: Option<Override>,
    pub pending_after: Option<Override>,
    pub queued: Queued,
    pub subscriptions: Registry,

    pub clock: Rc<dyn Clock>,
    pub random: Rc<dyn RandomSource>,
    pub frames: Rc<dyn FrameScheduler>,
    pub tick_interval: Duration,
    pub timer: Option<TimerLoop>,
}

impl Inner {
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_stage.is_some()
    }

    /// Running, not paused, and parked at `idle` after a non-looping array.
    pub fn is_halted(&self) -> bool {
        self.instance == InstanceState::Running && !self.is_paused() && self.stage == Stage::Idle
    }

    /// One timer tick: overrides, stage handler, transition bookkeeping.
    pub fn step(&mut self, ts: Duration) -> Vec<Dispatch> {
        let mut out = Vec::new();
        if self.instance != InstanceState::Running {
            return out;
        }

        match self.pending_before {
            Some(Override::Restart) => {
                self.clear_overrides();
                if self.land_queued() && self.instance == InstanceState::Running {
                    self.force_stage(Stage::CycleStart, ts);
                }
            }
            Some(Override::AtBoundary) if self.stage == Stage::CycleStart => {
                self.clear_overrides();
                self.land_queued();
            }
            _ => {}
        }
        if self.instance != InstanceState::Running {
            return out;
        }

        let stage = self.stage;
        let mut next = self.handle(stage, ts, &mut out);

        if next == Stage::CycleStart && stage != Stage::CycleStart {
            if self.pending_after == Some(Override::AtBoundary) {
                self.clear_overrides();
                self.land_queued();
                if self.instance != InstanceState::Running {
                    return out;
                }
            }
            if self.sequencer.as_ref().is_none_or(Sequencer::is_exhausted) {
                next = self.finish_array(&mut out);
            }
        }

        if next != stage {
            log::trace!("stage {stage} -> {next} at {ts:?}");
            self.force_stage(next, ts);
        }
        out
    }

    fn handle(&mut self, stage: Stage, ts: Duration, out: &mut Vec<Dispatch>) -> Stage {
        match stage {
            Stage::Idle => {
                if self.options.show_cursor {
                    let base = self.committed.clone();
                    self.blink(&base, ts, out);
                }
                Stage::Idle
            }
            Stage::CycleStart => {
                self.marker = self.sequencer.as_mut().and_then(Iterator::next);
                match self.marker.as_ref().map(Marker::index) {
                    Some(index) => {
                        self.active_index = index;
                        Stage::DelayBeforeTyping
                    }
                    None => {
                        let next = self.finish_array(out);
                        if next == Stage::CycleStart {
                            // Looped onto a fresh sequencer; pull from it.
                            self.handle(Stage::CycleStart, ts, out)
                        } else {
                            next
                        }
                    }
                }
            }
            Stage::DelayBeforeTyping => {
                if ts >= self.last_stage_at + self.options.delay_before_typing {
                    Stage::BeforeTyping
                } else {
                    self.blink("", ts, out);
                    Stage::DelayBeforeTyping
                }
            }
            Stage::BeforeTyping => {
                self.fire(Hook::BeforeTyping, out);
                Stage::Typing
            }
            Stage::Typing => self.type_next(ts, out),
            Stage::AfterTyping => {
                self.fire(Hook::AfterTyping, out);
                Stage::DelayAfterTyping
            }
            Stage::DelayAfterTyping => {
                if ts >= self.last_stage_at + self.options.delay_after_typing {
                    if self.options.untype_string {
                        Stage::BeforeUntyping
                    } else {
                        Stage::CycleStart
                    }
                } else {
                    let base = self.committed.clone();
                    self.blink(&base, ts, out);
                    Stage::DelayAfterTyping
                }
            }
            Stage::BeforeUntyping => {
                self.fire(Hook::BeforeUntyping, out);
                Stage::Untyping
            }
            Stage::Untyping => self.untype_next(ts, out),
            Stage::AfterUntyping => {
                self.fire(Hook::AfterUntyping, out);
                Stage::CycleStart
            }
        }
    }

    fn type_next(&mut self, ts: Duration, out: &mut Vec<Dispatch>) -> Stage {
        let ready = self.last_stage_at.max(self.last_string_change_at) + self.options.typing_delay;
        if ts < ready {
            return Stage::Typing;
        }
        let jitter = jitter(self.random.next_unit(), self.options.typing_variation);
        if ts < ready + jitter {
            return Stage::Typing;
        }

        match self.marker.take() {
            Some(Marker::Fragment { text, .. }) => {
                let glyph = self.options.cursor.typing.clone();
                self.show_fragment(text, &glyph, ts, out);
                self.marker = self.sequencer.as_mut().and_then(Iterator::next);
                Stage::Typing
            }
            // End of string, or a sequencer that ran dry underneath us.
            _ => Stage::AfterTyping,
        }
    }

    fn untype_next(&mut self, ts: Duration, out: &mut Vec<Dispatch>) -> Stage {
        let ready =
            self.last_stage_at.max(self.last_string_change_at) + self.options.untyping_delay;
        if ts < ready {
            return Stage::Untyping;
        }

        match self.sequencer.as_mut().and_then(Iterator::next) {
            Some(Marker::Fragment { text, .. }) => {
                let glyph = self.options.cursor.untyping.clone();
                self.show_fragment(text, &glyph, ts, out);
                Stage::Untyping
            }
            _ => Stage::AfterUntyping,
        }
    }

    fn show_fragment(&mut self, text: String, glyph: &str, ts: Duration, out: &mut Vec<Dispatch>) {
        let rendered = if self.options.show_cursor {
            format!("{text}{glyph}")
        } else {
            text.clone()
        };
        self.committed = text;
        self.last_string_change_at = ts;
        self.cursor_visible = true;
        self.deliver(rendered, out);
    }

    /// Render `base` with the blinking glyph, toggling it once per blink period.
    fn blink(&mut self, base: &str, ts: Duration, out: &mut Vec<Dispatch>) {
        let since = self
            .last_string_change_at
            .max(self.last_stage_at)
            .max(self.last_cursor_toggle_at);
        if ts >= since + self.options.cursor_blink_rate {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_toggle_at = ts;
        }

        let rendered = if self.options.show_cursor && self.cursor_visible {
            format!("{base}{}", self.options.cursor.blinking)
        } else {
            base.to_string()
        };
        self.committed = base.to_string();
        self.deliver(rendered, out);
    }

    fn deliver(&mut self, rendered: String, out: &mut Vec<Dispatch>) {
        if self.last_delivered.as_deref() == Some(rendered.as_str()) {
            return;
        }
        if let Some(sink) = &self.sink {
            out.push(Dispatch::Render(sink.clone(), rendered.clone()));
        }
        self.last_delivered = Some(rendered);
    }

    fn fire(&mut self, hook: Hook, out: &mut Vec<Dispatch>) {
        let listeners = self.subscriptions.begin_pass(hook);
        if !listeners.is_empty() {
            out.push(Dispatch::Hooks(listeners, self.active_index));
        }
    }

    /// The array ran out at a cycle boundary: notify, then loop or park.
    fn finish_array(&mut self, out: &mut Vec<Dispatch>) -> Stage {
        log::debug!("array finished (loop = {})", self.options.looping);
        self.fire(Hook::ArrayFinished, out);
        if self.options.looping {
            self.reseed(0);
            Stage::CycleStart
        } else {
            Stage::Idle
        }
    }

    pub fn force_stage(&mut self, stage: Stage, at: Duration) {
        self.stage = stage;
        self.last_stage_at = at;
        self.cursor_visible = true;
    }

    /// Restart the cycle at `stage`; while paused the change waits for resume.
    pub fn reset_to(&mut self, stage: Stage) {
        if self.is_paused() {
            self.paused_stage = Some(stage);
        } else {
            let now = self.now();
            self.force_stage(stage, now);
        }
    }

    pub fn reseed(&mut self, index: usize) {
        let seq = Sequencer::new(
            &self.strings,
            SequencerOptions {
                rewind_on_finish: self.options.untype_string,
                start_at_index: Some(index),
            },
        );
        self.active_index = seq.index();
        self.sequencer = Some(seq);
        self.marker = None;
    }

    /// Resolve a jump request against the current strings; anything out of
    /// range lands on the first string.
    pub fn jump_target(&self, requested: isize) -> usize {
        match usize::try_from(requested) {
            Ok(i) if i < self.strings.len() => i,
            _ => {
                log::debug!("jump target {requested} out of range; using 0");
                0
            }
        }
    }

    pub fn clear_overrides(&mut self) {
        self.pending_before = None;
        self.pending_after = None;
    }

    /// Apply everything queued by deferred mutators. Returns true when the
    /// sequencer was reseeded.
    pub fn land_queued(&mut self) -> bool {
        let queued = std::mem::take(&mut self.queued);
        if queued.is_empty() {
            return false;
        }
        log::debug!("landing queued mutations");

        let mut reseed = None;
        if let Some(strings) = queued.strings {
            self.strings = strings;
            reseed = Some(0);
        }
        if let Some(sink) = queued.sink {
            self.replace_sink(sink);
        }
        if !queued.options.is_empty() {
            let rewind_before = self.options.untype_string;
            self.options = queued
                .options
                .iter()
                .fold(self.options.clone(), |acc, patch| acc.merge(patch));
            if rewind_before != self.options.untype_string
                && reseed.is_none()
                && let Some(seq) = &self.sequencer
                && !seq.is_exhausted()
            {
                reseed = Some(seq.index());
            }
        }
        if let Some(jump) = queued.jump {
            reseed = Some(self.jump_target(jump));
        }

        self.refresh_instance();
        match (self.instance, reseed) {
            (InstanceState::Running, Some(index)) => {
                self.reseed(index);
                true
            }
            (InstanceState::Ready, Some(index)) => {
                self.start_index = index;
                false
            }
            _ => false,
        }
    }

    /// Outside `Running` there is no boundary to wait for: land whatever is
    /// still queued, e.g. after an immediate call demoted the instance.
    pub fn settle_queue(&mut self) {
        if self.instance != InstanceState::Running && !self.queued.is_empty() {
            self.land_queued();
        }
    }

    pub fn replace_sink(&mut self, sink: Option<Sink>) {
        self.sink = sink;
        self.last_delivered = None;
    }

    /// Re-derive the lifecycle state from strings and sink presence.
    pub fn refresh_instance(&mut self) {
        let complete = !self.strings.is_empty() && self.sink.is_some();
        match (self.instance, complete) {
            (InstanceState::Uninitialized, true) => {
                log::debug!("instance Uninitialized -> Ready");
                self.instance = InstanceState::Ready;
            }
            (InstanceState::Running | InstanceState::Ready, false) => {
                log::debug!("instance {} -> Uninitialized", self.instance);
                self.halt_cycle();
                self.instance = InstanceState::Uninitialized;
            }
            _ => {}
        }
    }

    /// Stop the timer and forget the cycle in flight.
    pub fn halt_cycle(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.sequencer = None;
        self.marker = None;
        self.paused_stage = None;
        self.clear_overrides();
        self.stage = Stage::Idle;
    }
}

/// `floor(unit * variation)` whole milliseconds.
fn jitter(unit: f64, variation: Duration) -> Duration {
    let ms = (unit * variation.as_millis() as f64).floor();
    if ms > 0.0 {
        Duration::from_millis(ms as u64)
    } else {
        Duration::ZERO
    }
}
