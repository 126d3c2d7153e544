use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use typewrite_core::{
    Clock, Dispose, FrameScheduler, Options, OptionsPatch, RandomSource, SystemClock,
    ThreadRandom, TimerLoop,
};

use crate::error::{Error, Result};
use crate::machine::{self, Inner, Override, Queued, Sink};
use crate::stage::{Hook, InstanceState, Stage};
use crate::subscriptions::{Listener, Registry};

const READY: &[InstanceState] = &[InstanceState::Ready];
const RUNNING: &[InstanceState] = &[InstanceState::Running];
const READY_OR_RUNNING: &[InstanceState] = &[InstanceState::Ready, InstanceState::Running];

/// Wrap a closure as a [`Sink`].
pub fn sink(f: impl Fn(&str) + 'static) -> Sink {
    Rc::new(f)
}

/// Handle to a typewriter session. Clones share the session.
///
/// Every mutator takes an `immediate` flag. Deferred calls made while running
/// land together at the next `cycleStart`; repeated deferred calls to the same
/// setter collapse to the last one, except `set_options`, whose patches all
/// land in call order.
#[derive(Clone)]
pub struct Typewriter {
    inner: Rc<RefCell<Inner>>,
}

pub struct TypewriterBuilder {
    frames: Rc<dyn FrameScheduler>,
    strings: Vec<String>,
    sink: Option<Sink>,
    options: OptionsPatch,
    clock: Option<Rc<dyn Clock>>,
    random: Option<Rc<dyn RandomSource>>,
    tick_interval: Duration,
}

impl TypewriterBuilder {
    pub fn strings<I, S>(mut self, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings = strings.into_iter().map(Into::into).collect();
        self
    }

    pub fn callback(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.sink = Some(sink(f));
        self
    }

    pub fn options(mut self, patch: OptionsPatch) -> Self {
        self.options = patch;
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn random(mut self, random: Rc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    /// Minimum spacing between ticks; zero ticks on every frame that moves
    /// time forward.
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn build(self) -> Typewriter {
        let clock = self
            .clock
            .unwrap_or_else(|| Rc::new(SystemClock::new()) as Rc<dyn Clock>);
        let now = clock.now();
        let mut inner = Inner {
            strings: self.strings,
            sink: self.sink,
            options: Options::default().merge(&self.options),
            instance: InstanceState::Uninitialized,
            stage: Stage::Idle,
            paused_stage: None,
            sequencer: None,
            marker: None,
            active_index: 0,
            start_index: 0,
            committed: String::new(),
            last_delivered: None,
            cursor_visible: true,
            last_stage_at: now,
            last_string_change_at: now,
            last_cursor_toggle_at: now,
            pending_before: None,
            pending_after: None,
            queued: Queued::default(),
            subscriptions: Registry::default(),
            clock,
            random: self
                .random
                .unwrap_or_else(|| Rc::new(ThreadRandom) as Rc<dyn RandomSource>),
            frames: self.frames,
            tick_interval: self.tick_interval,
            timer: None,
        };
        inner.refresh_instance();
        Typewriter {
            inner: Rc::new(RefCell::new(inner)),
        }
    }
}

impl Typewriter {
    pub fn builder(frames: Rc<dyn FrameScheduler>) -> TypewriterBuilder {
        TypewriterBuilder {
            frames,
            strings: Vec::new(),
            sink: None,
            options: OptionsPatch::default(),
            clock: None,
            random: None,
            tick_interval: Duration::ZERO,
        }
    }

    fn guard(&self, method: &'static str) -> Result<RefMut<'_, Inner>> {
        let inner = self.inner.borrow_mut();
        if inner.instance == InstanceState::Disposed {
            return Err(Error::Disposed { method });
        }
        Ok(inner)
    }

    fn require(
        inner: &Inner,
        method: &'static str,
        required: &'static [InstanceState],
    ) -> Result<()> {
        if required.contains(&inner.instance) {
            Ok(())
        } else {
            Err(Error::InvalidState {
                method,
                actual: inner.instance,
                required,
            })
        }
    }

    /// Ready -> Running. Types from the first string, or from a target set by
    /// `jump_to` while ready.
    pub fn start(&self) -> Result<&Self> {
        let mut inner = self.guard("start")?;
        inner.settle_queue();
        Self::require(&inner, "start", READY)?;

        let now = inner.now();
        let index = std::mem::take(&mut inner.start_index);
        inner.instance = InstanceState::Running;
        inner.paused_stage = None;
        inner.committed.clear();
        inner.reseed(index);
        inner.force_stage(Stage::CycleStart, now);

        let weak = Rc::downgrade(&self.inner);
        let timer = TimerLoop::start(inner.frames.clone(), now, inner.tick_interval, move |ts| {
            if let Some(inner) = weak.upgrade() {
                tick(&inner, ts);
            }
        });
        inner.timer = Some(timer);
        log::debug!("started at string {index}");
        Ok(self)
    }

    /// Running -> Ready. Queued mutations land right away. No-op otherwise.
    pub fn stop(&self) -> Result<&Self> {
        let mut inner = self.guard("stop")?;
        if inner.instance != InstanceState::Running {
            return Ok(self);
        }
        inner.halt_cycle();
        inner.instance = InstanceState::Ready;
        inner.land_queued();
        inner.refresh_instance();
        log::debug!("stopped");
        Ok(self)
    }

    /// Park the cycle; the cursor keeps blinking against the last text.
    /// Pausing twice is a no-op.
    pub fn pause(&self) -> Result<&Self> {
        let mut inner = self.guard("pause")?;
        Self::require(&inner, "pause", RUNNING)?;
        if inner.is_paused() {
            return Ok(self);
        }
        inner.paused_stage = Some(inner.stage);
        inner.stage = Stage::Idle;
        // A halted session restarts on resume instead.
        if inner.pending_before == Some(Override::Restart) {
            inner.pending_before = None;
        }
        log::debug!("paused in {}", inner.paused_stage.unwrap_or_default());
        Ok(self)
    }

    /// Continue the stage captured by `pause`. Elapsed pause time isn't
    /// subtracted from the stage thresholds.
    pub fn resume(&self) -> Result<&Self> {
        let mut inner = self.guard("resume")?;
        Self::require(&inner, "resume", RUNNING)?;
        if let Some(stage) = inner.paused_stage.take() {
            inner.stage = stage;
            if stage == Stage::Idle && !inner.queued.is_empty() {
                inner.pending_before = Some(Override::Restart);
            }
            log::debug!("resumed into {stage}");
        }
        Ok(self)
    }

    /// Move to string `index` (default: the active one). Negative or
    /// out-of-range targets go to the first string.
    pub fn jump_to(&self, index: Option<isize>, immediate: bool) -> Result<&Self> {
        let mut inner = self.guard("jump_to")?;
        Self::require(&inner, "jump_to", READY_OR_RUNNING)?;

        let requested = index.unwrap_or(inner.active_index as isize);
        if inner.instance == InstanceState::Ready {
            inner.queued.jump = None;
            inner.start_index = inner.jump_target(requested);
        } else if immediate {
            inner.queued.jump = None;
            let target = inner.jump_target(requested);
            inner.reseed(target);
            inner.reset_to(Stage::CycleStart);
        } else {
            inner.queued.jump = Some(requested);
            schedule_landing(&mut inner);
        }
        Ok(self)
    }

    pub fn set_strings<I, S>(&self, strings: I, immediate: bool) -> Result<&Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strings: Vec<String> = strings.into_iter().map(Into::into).collect();
        let mut inner = self.guard("set_strings")?;

        if immediate || inner.instance != InstanceState::Running {
            inner.queued.strings = None;
            inner.queued.jump = None;
            inner.strings = strings;
            inner.refresh_instance();
            match inner.instance {
                InstanceState::Running => {
                    inner.reseed(0);
                    inner.reset_to(Stage::CycleStart);
                }
                InstanceState::Ready => inner.start_index = 0,
                _ => {}
            }
            inner.settle_queue();
        } else {
            inner.queued.strings = Some(strings);
            schedule_landing(&mut inner);
        }
        Ok(self)
    }

    /// Replace the sink; `None` demotes the instance to `Uninitialized`.
    pub fn set_callback(&self, sink: Option<Sink>, immediate: bool) -> Result<&Self> {
        let mut inner = self.guard("set_callback")?;

        if immediate || inner.instance != InstanceState::Running {
            inner.queued.sink = None;
            inner.replace_sink(sink);
            inner.refresh_instance();
            inner.settle_queue();
        } else {
            inner.queued.sink = Some(sink);
            schedule_landing(&mut inner);
        }
        Ok(self)
    }

    /// Merge `patch` into the options. An immediate call also lands any
    /// patches still queued, ahead of this one.
    pub fn set_options(&self, patch: OptionsPatch, immediate: bool) -> Result<&Self> {
        let mut inner = self.guard("set_options")?;

        if immediate || inner.instance != InstanceState::Running {
            let mut patches = std::mem::take(&mut inner.queued.options);
            patches.push(patch);
            let rewind_before = inner.options.untype_string;
            inner.options = patches
                .iter()
                .fold(inner.options.clone(), |acc, p| acc.merge(p));

            // The rewind flag is baked into the sequencer; restart the string.
            if rewind_before != inner.options.untype_string
                && inner.instance == InstanceState::Running
                && !inner.is_halted()
            {
                let index = inner.active_index;
                inner.reseed(index);
                inner.reset_to(Stage::CycleStart);
            }
        } else {
            inner.queued.options.push(patch);
            schedule_landing(&mut inner);
        }
        Ok(self)
    }

    /// [`set_options`](Self::set_options) from a JSON object. Malformed input
    /// is rejected before anything changes.
    pub fn set_options_json(&self, json: &str, immediate: bool) -> Result<&Self> {
        self.guard("set_options_json")?;
        let patch = OptionsPatch::from_json(json).map_err(|e| Error::InvalidArgument {
            method: "set_options_json",
            reason: e.to_string(),
        })?;
        self.set_options(patch, immediate)
    }

    /// Halt for good. `instanceDisposed` subscribers fire once, in
    /// registration order; every later call fails.
    pub fn dispose(&self) -> Result<()> {
        let listeners = {
            let mut inner = self.guard("dispose")?;
            inner.halt_cycle();
            inner.instance = InstanceState::Disposed;
            inner.subscriptions.begin_pass(Hook::InstanceDisposed)
        };
        log::debug!("disposing; {} listener(s)", listeners.len());
        for listener in listeners {
            listener(0);
        }

        let mut inner = self.inner.borrow_mut();
        if !inner.queued.is_empty() {
            log::warn!("dropping queued mutations on dispose");
        }
        inner.queued = Queued::default();
        inner.subscriptions.clear();
        inner.strings.clear();
        inner.sink = None;
        inner.last_delivered = None;
        inner.committed.clear();
        Ok(())
    }

    /// Register `callback` for `hook`. The returned handle unsubscribes; the
    /// entry is skipped from the next pass on.
    pub fn subscribe(&self, hook: Hook, callback: Listener, once: bool) -> Result<Dispose> {
        let mut inner = self.guard("subscribe")?;
        let key = inner.subscriptions.add(hook, callback, once);
        Ok(Dispose::new(inner.subscriptions.unsubscriber(key)))
    }

    pub fn on_before_typing(&self, f: impl Fn(usize) + 'static, once: bool) -> Result<Dispose> {
        self.subscribe(Hook::BeforeTyping, Rc::new(f), once)
    }

    pub fn on_after_typing(&self, f: impl Fn(usize) + 'static, once: bool) -> Result<Dispose> {
        self.subscribe(Hook::AfterTyping, Rc::new(f), once)
    }

    pub fn on_before_untyping(&self, f: impl Fn(usize) + 'static, once: bool) -> Result<Dispose> {
        self.subscribe(Hook::BeforeUntyping, Rc::new(f), once)
    }

    pub fn on_after_untyping(&self, f: impl Fn(usize) + 'static, once: bool) -> Result<Dispose> {
        self.subscribe(Hook::AfterUntyping, Rc::new(f), once)
    }

    pub fn on_array_finished(&self, f: impl Fn() + 'static, once: bool) -> Result<Dispose> {
        self.subscribe(Hook::ArrayFinished, Rc::new(move |_| f()), once)
    }

    pub fn on_instance_disposed(&self, f: impl Fn() + 'static) -> Result<Dispose> {
        self.subscribe(Hook::InstanceDisposed, Rc::new(move |_| f()), false)
    }

    pub fn strings(&self) -> Result<Vec<String>> {
        Ok(self.guard("strings")?.strings.clone())
    }

    pub fn callback(&self) -> Result<Option<Sink>> {
        Ok(self.guard("callback")?.sink.clone())
    }

    pub fn options(&self) -> Result<Options> {
        Ok(self.guard("options")?.options.clone())
    }

    pub fn instance_state(&self) -> InstanceState {
        self.inner.borrow().instance
    }

    pub fn running_state(&self) -> Stage {
        self.inner.borrow().stage
    }

    pub fn is_paused(&self) -> bool {
        self.inner.borrow().is_paused()
    }
}

impl fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Typewriter")
            .field("instance", &inner.instance)
            .field("stage", &inner.stage)
            .field("paused", &inner.is_paused())
            .field("strings", &inner.strings.len())
            .finish_non_exhaustive()
    }
}

fn schedule_landing(inner: &mut Inner) {
    if inner.is_halted() {
        inner.pending_before = Some(Override::Restart);
    } else if inner.pending_before != Some(Override::Restart) {
        inner.pending_before = Some(Override::AtBoundary);
        inner.pending_after = Some(Override::AtBoundary);
    }
}

fn tick(inner: &Rc<RefCell<Inner>>, ts: Duration) {
    let dispatches = match inner.try_borrow_mut() {
        Ok(mut inner) => inner.step(ts),
        Err(_) => {
            log::warn!("tick at {ts:?} skipped: session busy");
            return;
        }
    };
    machine::run(dispatches);
}
