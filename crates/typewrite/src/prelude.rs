pub use crate::error::{Error, Result};
pub use crate::stage::{Hook, InstanceState, Stage};
pub use crate::{Sink, Typewriter, TypewriterBuilder, sink};
pub use typewrite_core::prelude::*;
