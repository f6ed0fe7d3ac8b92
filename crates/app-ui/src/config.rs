//! Navigator configuration
//!
//! Loading the document from disk is the host's job; this module only
//! describes and validates it.

use app_platform::DeviceVariant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::transition::TransitionKind;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema
    #[error("Invalid navigator config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A zero timeout would degrade every animation
    #[error("animationTimeoutMs must be greater than zero")]
    ZeroTimeout,
}

fn default_true() -> bool {
    true
}

fn default_enter_duration_ms() -> u64 {
    300
}

fn default_exit_duration_ms() -> u64 {
    300
}

fn default_replace_duration_ms() -> u64 {
    200
}

fn default_animation_timeout_ms() -> u64 {
    2_000
}

fn default_event_buffer_size() -> usize {
    32
}

/// Navigator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorConfig {
    /// Animate requests that do not say otherwise
    #[serde(default = "default_true")]
    pub animated_by_default: bool,

    /// Duration of an enter (push) transition
    #[serde(default = "default_enter_duration_ms")]
    pub enter_duration_ms: u64,

    /// Duration of an exit (pop) transition
    #[serde(default = "default_exit_duration_ms")]
    pub exit_duration_ms: u64,

    /// Duration of a combined replace transition
    #[serde(default = "default_replace_duration_ms")]
    pub replace_duration_ms: u64,

    /// Upper bound on a single animation before it is settled immediately
    #[serde(default = "default_animation_timeout_ms")]
    pub animation_timeout_ms: u64,

    /// Capacity of the `navigated` broadcast channel
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Form factor passed to the screen factory
    #[serde(default)]
    pub device_variant: DeviceVariant,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            animated_by_default: true,
            enter_duration_ms: default_enter_duration_ms(),
            exit_duration_ms: default_exit_duration_ms(),
            replace_duration_ms: default_replace_duration_ms(),
            animation_timeout_ms: default_animation_timeout_ms(),
            event_buffer_size: default_event_buffer_size(),
            device_variant: DeviceVariant::default(),
        }
    }
}

impl NavigatorConfig {
    /// Parse and validate configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Duration of a transition kind
    pub fn duration_for(&self, kind: TransitionKind) -> Duration {
        let ms = match kind {
            TransitionKind::Enter => self.enter_duration_ms,
            TransitionKind::Exit => self.exit_duration_ms,
            TransitionKind::Replace => self.replace_duration_ms,
        };
        Duration::from_millis(ms)
    }

    /// Animation timeout as a duration
    pub fn animation_timeout(&self) -> Duration {
        Duration::from_millis(self.animation_timeout_ms)
    }
}
