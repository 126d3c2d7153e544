//! Platform runners (headless frame pump for terminals and tests)
//!

use std::rc::Rc;
use std::time::Duration;

use typewrite::{Typewriter, TypewriterBuilder};
use typewrite_core::{Clock, FrameScheduler, ManualFrames, SystemClock};
use web_time::Instant;

#[derive(Clone, Copy, Debug)]
pub struct HeadlessOptions {
    /// Sleep between frames.
    pub frame_interval: Duration,
    /// Give up after this long; `None` runs until told to stop.
    pub max_duration: Option<Duration>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            max_duration: None,
        }
    }
}

/// Why [`Headless::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// `keep_running` said no.
    Requested,
    /// No frame requests left: every session was stopped or disposed.
    Drained,
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub exit: Exit,
}

/// Wall clock plus a frame queue pumped from a sleep loop.
pub struct Headless {
    frames: Rc<ManualFrames>,
    clock: Rc<SystemClock>,
}

impl Default for Headless {
    fn default() -> Self {
        Self::new()
    }
}

impl Headless {
    pub fn new() -> Self {
        Self {
            frames: Rc::new(ManualFrames::new()),
            clock: Rc::new(SystemClock::new()),
        }
    }

    pub fn frames(&self) -> Rc<dyn FrameScheduler> {
        self.frames.clone()
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    /// A typewriter builder already wired to this runner's frames and clock.
    pub fn typewriter(&self) -> TypewriterBuilder {
        Typewriter::builder(self.frames()).clock(self.clock())
    }

    /// Pump frames until `keep_running` returns false, the queue drains, or
    /// `max_duration` elapses.
    pub fn run(
        &self,
        options: HeadlessOptions,
        mut keep_running: impl FnMut() -> bool,
    ) -> anyhow::Result<RunSummary> {
        anyhow::ensure!(
            !options.frame_interval.is_zero(),
            "frame interval must be positive"
        );
        let deadline = options.max_duration.map(|d| Instant::now() + d);
        let mut fired = 0;

        let exit = loop {
            if !keep_running() {
                break Exit::Requested;
            }
            if self.frames.pending() == 0 {
                break Exit::Drained;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break Exit::TimedOut;
            }
            std::thread::sleep(options.frame_interval);
            fired += self.frames.advance(self.clock.now());
        };

        log::info!("headless runner exited ({exit:?}) after {fired} frame(s)");
        Ok(RunSummary {
            frames: fired,
            exit,
        })
    }
}
