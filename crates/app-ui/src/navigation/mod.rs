//! Navigation framework
//!
//! This module provides the stack-based screen router:
//! - Frames pairing a screen instance with its parameters
//! - Navigation requests (push, pop, replace, set-root, pop-to-root)
//! - Cancellable `navigating` and informational `navigated` events
//! - The [`Navigator`], which serializes requests and drives screen lifecycle

mod events;
mod frame;
mod navigator;
mod request;

pub use events::{NavigatedEvent, NavigatingEvent, SubscriptionId};
pub use frame::{Frame, FrameId, FrameSummary};
pub use navigator::Navigator;
pub use request::{NavigationKind, NavigationOutcome, NavigationRequest};
