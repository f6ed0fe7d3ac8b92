//! Navigation error types

use std::fmt;
use std::time::Duration;

use crate::navigation::NavigationKind;

/// Error raised by a screen lifecycle hook
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// Plain failure message
    #[error("{0}")]
    Message(String),

    /// Any other error from the screen implementation
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScreenError {
    /// Create an error from a message
    pub fn msg(message: impl Into<String>) -> Self {
        ScreenError::Message(message.into())
    }
}

/// Lifecycle hook that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// `Screen::activate`
    Activate,
    /// `Screen::deactivate`
    Deactivate,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::Activate => f.write_str("activate"),
            LifecyclePhase::Deactivate => f.write_str("deactivate"),
        }
    }
}

/// Navigation errors
///
/// Popping at the root is not an error: `pop` reports it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The screen factory has no screen registered under this name.
    /// The stack is unchanged.
    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    /// A push, replace or set-root request arrived without a destination.
    /// The stack is unchanged.
    #[error("{0:?} request has no target screen")]
    MissingTarget(NavigationKind),

    /// A `navigating` observer vetoed the request. The stack is unchanged.
    #[error("Navigation from {from:?} to {to:?} was cancelled")]
    Cancelled {
        /// Screen that was on top
        from: Option<String>,
        /// Requested destination
        to: Option<String>,
    },

    /// A lifecycle hook failed. The stack is left where the request stopped.
    #[error("Screen {screen} failed to {phase}: {source}")]
    ActivationFailure {
        /// Name of the failing screen
        screen: String,
        /// Hook that failed
        phase: LifecyclePhase,
        /// Underlying screen error
        #[source]
        source: ScreenError,
    },
}

impl NavigationError {
    /// Check if this is an observer veto rather than a fault
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigationError::Cancelled { .. })
    }
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Animator failures
///
/// These never reach navigation callers; the transition completes
/// immediately instead.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The rendering backend failed
    #[error("Rendering failed: {0}")]
    Rendering(String),

    /// The animator did not resolve in time
    #[error("Animation timed out after {0:?}")]
    TimedOut(Duration),
}
