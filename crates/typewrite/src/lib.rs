//! # Typewriter effect engine
//!
//! A [`Typewriter`] reveals each string of a list one grapheme at a time,
//! optionally rewinds it, and moves on, looping if asked. Rendered text goes
//! to a single callback (the sink); nothing here knows what draws it.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use typewrite::prelude::*;
//!
//! let frames = Rc::new(ManualFrames::new());
//! let clock = Rc::new(TestClock::new());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let tw = Typewriter::builder(frames.clone())
//!     .clock(clock.clone())
//!     .random(Rc::new(FixedRandom::new(0.0)))
//!     .strings(["ab"])
//!     .options(
//!         OptionsPatch::new()
//!             .typing_delay(ms(0))
//!             .delay_before_typing(ms(0))
//!             .typing_variation(ms(0)),
//!     )
//!     .callback({
//!         let seen = seen.clone();
//!         move |s| seen.borrow_mut().push(s.to_string())
//!     })
//!     .build();
//!
//! tw.start().unwrap();
//! for t in 1..=5 {
//!     frames.advance(ms(t));
//! }
//! assert_eq!(*seen.borrow(), vec!["a|", "ab|"]);
//! ```
//!
//! ## Stages
//!
//! Each tick runs one stage handler:
//!
//! `cycleStart → delayBeforeTyping → beforeTyping → typing → afterTyping →
//! delayAfterTyping → (beforeUntyping → untyping → afterUntyping →) cycleStart`
//!
//! The `before*`/`after*` stages fire subscribers and pass straight through.
//! `idle` blinks the cursor while paused, stopped, or finished.
//!
//! ## Deferred and immediate mutations
//!
//! `set_strings`, `set_callback`, `set_options` and `jump_to` take an
//! `immediate` flag. Deferred calls made while running land together at the
//! next `cycleStart`; immediate calls apply now and restart the cycle where
//! needed.

pub mod error;
mod machine;
pub mod prelude;
pub mod stage;
pub mod subscriptions;
mod typewriter;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use machine::Sink;
pub use stage::{Hook, InstanceState, Stage};
pub use subscriptions::Listener;
pub use typewriter::{Typewriter, TypewriterBuilder, sink};
