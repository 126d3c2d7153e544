pub use crate::clock::{Clock, SystemClock, TestClock, ms};
pub use crate::effects::Dispose;
pub use crate::frames::{FrameCallback, FrameId, FrameScheduler, ManualFrames};
pub use crate::options::{CursorGlyphs, CursorPatch, Field, Options, OptionsError, OptionsPatch};
pub use crate::random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use crate::sequencer::{Marker, Sequencer, SequencerOptions};
pub use crate::timer::TimerLoop;
