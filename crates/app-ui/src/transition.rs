//! Transition animation between screens
//!
//! The navigator awaits every transition inside its request queue, so two
//! animations never overlap. A transition always completes exactly once:
//! when the animator fails or stalls past the configured timeout, the
//! handles are settled into their final state immediately.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::NavigatorConfig;
use crate::error::AnimationError;
use crate::navigation::FrameId;

/// Visual effect played between two screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Incoming screen slides in over the outgoing one
    Enter,
    /// Outgoing screen slides away, revealing the incoming one
    Exit,
    /// One combined swap of the outgoing screen for the incoming one
    Replace,
}

/// Animator-facing reference to a frame's visual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenHandle {
    /// Frame the visual belongs to
    pub frame_id: FrameId,
    /// Registered screen name
    pub screen_name: String,
}

/// One transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Screen leaving the foreground, absent for the first screen shown
    pub outgoing: Option<ScreenHandle>,
    /// Screen entering the foreground
    pub incoming: ScreenHandle,
    /// Effect to play
    pub kind: TransitionKind,
}

/// Renders transitions on the host's drawing surface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransitionAnimator: Send + Sync {
    /// Play the transition and resolve when it has finished
    async fn animate(&self, transition: Transition) -> Result<(), AnimationError>;

    /// Move both handles straight to their final state
    ///
    /// Used for non-animated requests and whenever `animate` fails.
    fn settle(&self, _transition: &Transition) {}
}

/// Animator that completes every transition immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

#[async_trait]
impl TransitionAnimator for InstantAnimator {
    async fn animate(&self, _transition: Transition) -> Result<(), AnimationError> {
        Ok(())
    }
}

/// Animator that waits for the configured duration of each kind
///
/// Hosts without their own rendering clock use this to keep navigation
/// paced like the real animations.
#[derive(Debug, Clone)]
pub struct TimedAnimator {
    enter: Duration,
    exit: Duration,
    replace: Duration,
}

impl TimedAnimator {
    /// Create an animator from navigator config durations
    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self {
            enter: config.duration_for(TransitionKind::Enter),
            exit: config.duration_for(TransitionKind::Exit),
            replace: config.duration_for(TransitionKind::Replace),
        }
    }

    /// Duration of a transition kind
    pub fn duration(&self, kind: TransitionKind) -> Duration {
        match kind {
            TransitionKind::Enter => self.enter,
            TransitionKind::Exit => self.exit,
            TransitionKind::Replace => self.replace,
        }
    }
}

impl Default for TimedAnimator {
    fn default() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }
}

#[async_trait]
impl TransitionAnimator for TimedAnimator {
    async fn animate(&self, transition: Transition) -> Result<(), AnimationError> {
        tokio::time::sleep(self.duration(transition.kind)).await;
        Ok(())
    }
}

/// How a transition reached its final state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The animator played it to the end
    Animated,
    /// Non-animated request, settled directly
    Settled,
    /// The animator failed or timed out and the handles were settled
    Degraded,
}

/// Run one transition to completion
pub async fn play(
    animator: &Arc<dyn TransitionAnimator>,
    transition: Transition,
    animated: bool,
    timeout: Duration,
) -> Completion {
    if !animated {
        animator.settle(&transition);
        return Completion::Settled;
    }

    let result = match tokio::time::timeout(timeout, animator.animate(transition.clone())).await {
        Ok(result) => result,
        Err(_) => Err(AnimationError::TimedOut(timeout)),
    };

    match result {
        Ok(()) => Completion::Animated,
        Err(e) => {
            tracing::warn!(
                "{:?} transition to {} failed, completing immediately: {}",
                transition.kind,
                transition.incoming.screen_name,
                e
            );
            animator.settle(&transition);
            Completion::Degraded
        }
    }
}
