//! Host frame clock abstraction.
//!
//! A host (browser `requestAnimationFrame`, a winit redraw loop, a headless
//! pump) schedules one-shot callbacks that receive a monotonically increasing
//! timestamp. [`TimerLoop`](crate::TimerLoop) is the only consumer.

use std::cell::{Cell, RefCell};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

pub type FrameCallback = Box<dyn FnOnce(Duration)>;

pub trait FrameScheduler {
    /// Schedule `callback` to run once on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameId;
    /// Drop a pending request. Unknown or already-fired ids are ignored.
    fn cancel_frame(&self, id: FrameId);
}

/// Frame queue pumped explicitly by its owner.
///
/// Tests call [`ManualFrames::advance`] with the timestamp of the frame; the
/// headless platform runner does the same from a sleep loop.
#[derive(Default)]
pub struct ManualFrames {
    next_id: Cell<u64>,
    queue: RefCell<Vec<(FrameId, FrameCallback)>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every request pending at call time with `timestamp`.
    ///
    /// Requests made by the callbacks themselves wait for the next advance.
    /// Returns the number of callbacks fired.
    pub fn advance(&self, timestamp: Duration) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let fired = due.len();
        for (_, callback) in due {
            callback(timestamp);
        }
        fired
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = FrameId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        self.queue.borrow_mut().retain(|(pending, _)| *pending != id);
    }
}
