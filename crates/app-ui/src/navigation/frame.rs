//! Stack frames

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::screen::{RouteParams, Screen};
use crate::transition::ScreenHandle;

/// Unique identifier of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(Uuid);

impl FrameId {
    /// Generate a new random identifier
    pub fn new() -> Self {
        FrameId(Uuid::new_v4())
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stack entry: a screen instance and the parameters it was built with
#[derive(Clone)]
pub struct Frame {
    id: FrameId,
    screen_name: String,
    screen: Arc<dyn Screen>,
    parameters: RouteParams,
    created_at: DateTime<Utc>,
}

impl Frame {
    pub(crate) fn new(
        screen_name: impl Into<String>,
        screen: Arc<dyn Screen>,
        parameters: RouteParams,
    ) -> Self {
        Self {
            id: FrameId::new(),
            screen_name: screen_name.into(),
            screen,
            parameters,
            created_at: Utc::now(),
        }
    }

    /// Frame identifier
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Registered name of the screen
    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    /// The screen instance
    pub fn screen(&self) -> &Arc<dyn Screen> {
        &self.screen
    }

    /// Construction parameters
    pub fn parameters(&self) -> &RouteParams {
        &self.parameters
    }

    /// When the frame was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Handle passed to the transition animator
    pub fn handle(&self) -> ScreenHandle {
        ScreenHandle {
            frame_id: self.id,
            screen_name: self.screen_name.clone(),
        }
    }

    /// Serializable summary
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            id: self.id,
            screen_name: self.screen_name.clone(),
            parameters: self.parameters.clone(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("screen_name", &self.screen_name)
            .field("parameters", &self.parameters)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Diagnostic snapshot of a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    /// Frame identifier
    pub id: FrameId,
    /// Registered name of the screen
    pub screen_name: String,
    /// Construction parameters
    #[serde(default, skip_serializing_if = "RouteParams::is_empty")]
    pub parameters: RouteParams,
    /// When the frame was created
    pub created_at: DateTime<Utc>,
}
