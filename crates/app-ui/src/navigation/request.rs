//! Navigation requests

use serde::{Deserialize, Serialize};

use super::frame::Frame;
use crate::screen::RouteParams;

/// Kind of navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationKind {
    /// Append a frame
    Push,
    /// Remove the top frame
    Pop,
    /// Swap the top frame
    Replace,
    /// Clear the stack and install a single root
    SetRoot,
    /// Remove every frame above the root
    PopToRoot,
}

/// A request waiting for, or being processed by, the navigator
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    /// What to do
    pub kind: NavigationKind,
    /// Destination screen (push, replace, set-root)
    pub target_screen: Option<String>,
    /// Parameters for the destination screen
    pub parameters: RouteParams,
    /// Animate the transition; `None` uses the navigator default
    pub animated: Option<bool>,
}

impl NavigationRequest {
    fn new(kind: NavigationKind, target_screen: Option<String>) -> Self {
        Self {
            kind,
            target_screen,
            parameters: RouteParams::new(),
            animated: None,
        }
    }

    /// Request to push a screen
    pub fn push(screen_name: impl Into<String>) -> Self {
        Self::new(NavigationKind::Push, Some(screen_name.into()))
    }

    /// Request to pop the top screen
    pub fn pop() -> Self {
        Self::new(NavigationKind::Pop, None)
    }

    /// Request to replace the top screen
    pub fn replace(screen_name: impl Into<String>) -> Self {
        Self::new(NavigationKind::Replace, Some(screen_name.into()))
    }

    /// Request to reset the stack to a single root
    pub fn set_root(screen_name: impl Into<String>) -> Self {
        Self::new(NavigationKind::SetRoot, Some(screen_name.into()))
    }

    /// Request to pop back to the root
    pub fn pop_to_root() -> Self {
        Self::new(NavigationKind::PopToRoot, None)
    }

    /// Set the destination parameters
    pub fn with_params(mut self, parameters: RouteParams) -> Self {
        self.parameters = parameters;
        self
    }

    /// Add one destination parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Choose whether to animate
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = Some(animated);
        self
    }
}

/// Result of a processed request
#[derive(Debug, Clone, Default)]
pub struct NavigationOutcome {
    /// Frames removed from the stack, top first; already disposed
    pub removed: Vec<Frame>,
}

impl NavigationOutcome {
    pub(crate) fn removed(removed: Vec<Frame>) -> Self {
        Self { removed }
    }
}
