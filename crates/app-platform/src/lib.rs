//! Platform-facing inputs for the screen router
//!
//! This crate describes what the host shell hands to the router: the
//! physical form factor the app runs on and the raw hardware keys it
//! receives.
//!
//! - [`device`] - Device variants and width breakpoints
//! - [`keys`] - Raw hardware key signals

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod device;
pub mod keys;

pub use device::{breakpoints, DeviceVariant, UnknownVariant};
pub use keys::HardwareKey;
