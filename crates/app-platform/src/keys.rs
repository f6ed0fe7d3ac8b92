//! Raw hardware key signals delivered by the host shell

use serde::{Deserialize, Serialize};

/// A hardware key press as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "code", rename_all = "lowercase")]
pub enum HardwareKey {
    /// Dedicated back button
    Back,
    /// Escape key (desktop hosts)
    Escape,
    /// Menu button
    Menu,
    /// Home button
    Home,
    /// Any other key, with the host's raw code
    Other(u32),
}

impl HardwareKey {
    /// Check if this key should be treated as a back signal
    pub fn is_back(&self) -> bool {
        matches!(self, HardwareKey::Back | HardwareKey::Escape)
    }
}
