//! Error types for the typewriter engine

use thiserror::Error;

use crate::stage::InstanceState;

/// Result type alias for typewriter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised synchronously by public methods. The tick handler never fails.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument was rejected before any state changed
    #[error("invalid argument to `{method}`: {reason}")]
    InvalidArgument { method: &'static str, reason: String },

    /// The method isn't allowed in the current lifecycle state
    #[error(
        "`{method}` requires instance state {}, but it is {actual}{}",
        list(.required),
        hint(.actual)
    )]
    InvalidState {
        method: &'static str,
        actual: InstanceState,
        required: &'static [InstanceState],
    },

    /// Any call after `dispose()`
    #[error("`{method}` called on a disposed instance")]
    Disposed { method: &'static str },
}

fn list(states: &[InstanceState]) -> String {
    states
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

fn hint(actual: &InstanceState) -> &'static str {
    if *actual == InstanceState::Uninitialized {
        " (supply non-empty strings and a callback first)"
    } else {
        ""
    }
}
