//! Device variants
//!
//! Screen factories may provide alternate implementations of a screen per
//! physical form factor. The variant is resolved once by the host from the
//! drawing surface width.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Breakpoint widths (logical pixels)
pub mod breakpoints {
    /// Tablet breakpoint (800px)
    pub const TABLET: u32 = 800;
    /// Desktop breakpoint (1300px)
    pub const DESKTOP: u32 = 1300;

    /// Check if width is at least tablet sized
    pub fn is_gte_tablet(width: u32) -> bool {
        width >= TABLET
    }

    /// Check if width is at least desktop sized
    pub fn is_gte_desktop(width: u32) -> bool {
        width >= DESKTOP
    }
}

/// Physical form factor used to pick a screen implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceVariant {
    /// Handheld device (< 800px)
    #[default]
    Phone,
    /// Tablet or small display (>= 800px)
    Tablet,
    /// Large display (>= 1300px)
    Desktop,
}

impl DeviceVariant {
    /// Resolve the variant for a surface width
    pub fn from_width(width: u32) -> Self {
        if breakpoints::is_gte_desktop(width) {
            DeviceVariant::Desktop
        } else if breakpoints::is_gte_tablet(width) {
            DeviceVariant::Tablet
        } else {
            DeviceVariant::Phone
        }
    }

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceVariant::Phone => "phone",
            DeviceVariant::Tablet => "tablet",
            DeviceVariant::Desktop => "desktop",
        }
    }

    /// Get all variants in order
    pub fn all() -> [DeviceVariant; 3] {
        [DeviceVariant::Phone, DeviceVariant::Tablet, DeviceVariant::Desktop]
    }
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised variant name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown device variant: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for DeviceVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(DeviceVariant::Phone),
            "tablet" => Ok(DeviceVariant::Tablet),
            "desktop" => Ok(DeviceVariant::Desktop),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}
