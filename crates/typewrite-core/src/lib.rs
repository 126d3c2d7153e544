//! # Typewrite core
//!
//! The leaf pieces the typewriter engine is built from. None of them know
//! about stages or subscriptions:
//!
//! - [`Clock`]: zero-based monotonic time (`SystemClock`, `TestClock`).
//! - [`FrameScheduler`]: the host frame clock; [`ManualFrames`] is pumped by
//!   hand in tests and by the headless runner.
//! - [`TimerLoop`]: turns frames into a throttled periodic callback.
//! - [`Sequencer`]: lazily yields growing/shrinking prefixes with
//!   end-of-string and end-of-rewind markers.
//! - [`Options`] / [`OptionsPatch`]: configuration and its defaults-aware
//!   merge.
//! - [`RandomSource`]: injectable jitter source.
//!
//! ## Driving time by hand
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use typewrite_core::*;
//!
//! let frames = Rc::new(ManualFrames::new());
//! let ticks = Rc::new(Cell::new(0));
//! let t = ticks.clone();
//! let timer = TimerLoop::start(frames.clone(), ms(0), ms(10), move |_| t.set(t.get() + 1));
//!
//! frames.advance(ms(5));  // too early
//! frames.advance(ms(11)); // fires
//! assert_eq!(ticks.get(), 1);
//! timer.cancel();
//! ```

pub mod clock;
pub mod effects;
pub mod frames;
pub mod options;
pub mod prelude;
pub mod random;
pub mod sequencer;
pub mod timer;

pub use clock::*;
pub use effects::*;
pub use frames::*;
pub use options::*;
pub use random::*;
pub use sequencer::*;
pub use timer::*;
