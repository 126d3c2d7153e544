use std::fmt;

/// Lifecycle of a [`Typewriter`](crate::Typewriter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstanceState {
    /// Missing strings or a callback.
    Uninitialized,
    /// Has strings and a callback, not started.
    Ready,
    Running,
    /// Terminal.
    Disposed,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstanceState::Uninitialized => "Uninitialized",
            InstanceState::Ready => "Ready",
            InstanceState::Running => "Running",
            InstanceState::Disposed => "Disposed",
        })
    }
}

/// Stage of the typing/untyping cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    #[default]
    Idle,
    CycleStart,
    DelayBeforeTyping,
    BeforeTyping,
    Typing,
    AfterTyping,
    DelayAfterTyping,
    BeforeUntyping,
    Untyping,
    AfterUntyping,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::CycleStart => "cycleStart",
            Stage::DelayBeforeTyping => "delayBeforeTyping",
            Stage::BeforeTyping => "beforeTyping",
            Stage::Typing => "typing",
            Stage::AfterTyping => "afterTyping",
            Stage::DelayAfterTyping => "delayAfterTyping",
            Stage::BeforeUntyping => "beforeUntyping",
            Stage::Untyping => "untyping",
            Stage::AfterUntyping => "afterUntyping",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points in the cycle (and lifecycle) that accept subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeTyping,
    AfterTyping,
    BeforeUntyping,
    AfterUntyping,
    ArrayFinished,
    InstanceDisposed,
}

impl Hook {
    pub const COUNT: usize = 6;

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}
