//! Screen navigation engine
//!
//! This crate provides the stack-based screen router: which screen is
//! visible, when screens are activated and deactivated, how transitions are
//! sequenced, and how hardware back presses are resolved against screen
//! state.
//!
//! # Modules
//!
//! - [`screen`] - Screen capability trait and the open screen registry
//! - [`navigation`] - Navigation stack, requests and events
//! - [`transition`] - Transition animators
//! - [`input`] - Hardware back-button dispatch
//! - [`config`] - Navigator configuration
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust
//! use app_ui::{InstantAnimator, Navigator, NavigatorConfig, RouteParams, Screen, ScreenRegistry};
//! use std::sync::Arc;
//!
//! struct QrLogin;
//! impl Screen for QrLogin {}
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = ScreenRegistry::new();
//! registry.register("qr-login", |_: &RouteParams| Arc::new(QrLogin) as Arc<dyn Screen>);
//!
//! let navigator = Navigator::new(
//!     Arc::new(registry),
//!     Arc::new(InstantAnimator),
//!     NavigatorConfig::default(),
//! );
//! navigator.set_root("qr-login", RouteParams::new()).await.unwrap();
//! assert_eq!(navigator.current().unwrap().screen_name(), "qr-login");
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod input;
pub mod navigation;
pub mod screen;
pub mod transition;

// Re-export commonly used types
pub use config::{ConfigError, NavigatorConfig};

pub use error::{AnimationError, LifecyclePhase, NavigationError, Result, ScreenError};

pub use input::InputDispatcher;

pub use navigation::{
    Frame, FrameId, FrameSummary, NavigatedEvent, NavigatingEvent, NavigationKind,
    NavigationOutcome, NavigationRequest, Navigator, SubscriptionId,
};

pub use screen::{RouteParams, Screen, ScreenConstructor, ScreenFactory, ScreenRegistry};

pub use transition::{
    Completion, InstantAnimator, ScreenHandle, TimedAnimator, Transition, TransitionAnimator,
    TransitionKind,
};
