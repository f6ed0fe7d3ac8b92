//! Process-wide UI state for the screen router
//!
//! This crate holds state that lives outside the navigation stack, most
//! notably the busy and alert overlays that render above every screen.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod overlay;

pub use overlay::{
    AlertAction, AlertOutcome, AlertTicket, OverlayConfig, OverlayController, OverlayError,
    OverlayEvent, OverlayState,
};
