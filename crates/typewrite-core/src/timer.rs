use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::frames::{FrameId, FrameScheduler};

/// Throttles a host frame clock into a minimum-interval periodic callback.
///
/// Every frame schedules the next one. The callback fires only when the frame
/// timestamp is strictly more than `min_interval` past the last firing (or the
/// origin), so a zero interval still needs forward progress.
///
/// Owned by value; dropping the loop cancels it.
pub struct TimerLoop {
    state: Rc<LoopState>,
}

struct LoopState {
    frames: Rc<dyn FrameScheduler>,
    min_interval: Duration,
    start: Cell<Duration>,
    pending: Cell<Option<FrameId>>,
    cancelled: Cell<bool>,
    callback: RefCell<Box<dyn FnMut(Duration)>>,
}

impl TimerLoop {
    /// Start pumping frames. `origin` is the reference point the first frame
    /// is measured against, normally the owner's clock reading right now.
    pub fn start(
        frames: Rc<dyn FrameScheduler>,
        origin: Duration,
        min_interval: Duration,
        callback: impl FnMut(Duration) + 'static,
    ) -> Self {
        let state = Rc::new(LoopState {
            frames,
            min_interval,
            start: Cell::new(origin),
            pending: Cell::new(None),
            cancelled: Cell::new(false),
            callback: RefCell::new(Box::new(callback)),
        });
        schedule(&state);
        Self { state }
    }

    /// Stop scheduling. Safe to call more than once, including from inside
    /// the callback.
    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        if let Some(id) = self.state.pending.take() {
            self.state.frames.cancel_frame(id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }
}

impl Drop for TimerLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule(state: &Rc<LoopState>) {
    let s = state.clone();
    let id = state
        .frames
        .request_frame(Box::new(move |timestamp| on_frame(&s, timestamp)));
    state.pending.set(Some(id));
}

fn on_frame(state: &Rc<LoopState>, timestamp: Duration) {
    if state.cancelled.get() {
        return;
    }
    state.pending.set(None);

    let elapsed = timestamp.saturating_sub(state.start.get());
    if elapsed > state.min_interval {
        state.start.set(timestamp);
        // A reentrant frame can't happen: frames are only fired by the host.
        if let Ok(mut callback) = state.callback.try_borrow_mut() {
            callback(timestamp);
        }
    }

    if !state.cancelled.get() {
        schedule(state);
    }
}
