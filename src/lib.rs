//! Screen Router
//!
//! Bundles the navigation stack, the overlay controller and the input
//! dispatcher into one object a host shell can own.
//!
//! - [`app_ui`] - Navigator, screens, transitions and back-button dispatch
//! - [`app_state`] - Busy and alert overlays
//! - [`app_platform`] - Device variants and raw hardware keys

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use app_platform::{DeviceVariant, HardwareKey};
pub use app_state::{AlertAction, AlertOutcome, OverlayConfig, OverlayController, OverlayState};
pub use app_ui::{
    ConfigError, Frame, InputDispatcher, InstantAnimator, NavigatedEvent, NavigatingEvent,
    NavigationError, NavigationKind, NavigationRequest, Navigator, NavigatorConfig, RouteParams,
    Screen, ScreenError, ScreenFactory, ScreenRegistry, TimedAnimator, TransitionAnimator,
};

/// Combined configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Navigator settings
    #[serde(default)]
    pub navigator: NavigatorConfig,
    /// Overlay settings
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl RouterConfig {
    /// Parse and validate the configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.navigator.validate()?;
        Ok(config)
    }
}

/// The navigation engine as seen by a host shell
pub struct ScreenRouter {
    navigator: Arc<Navigator>,
    overlay: Arc<OverlayController>,
    input: InputDispatcher,
}

impl ScreenRouter {
    /// Wire a navigator, an overlay controller and an input dispatcher
    pub fn new(
        factory: Arc<dyn ScreenFactory>,
        animator: Arc<dyn TransitionAnimator>,
        config: RouterConfig,
    ) -> Self {
        tracing::info!(
            variant = %config.navigator.device_variant,
            animated = config.navigator.animated_by_default,
            "starting screen router"
        );

        let navigator = Arc::new(Navigator::new(factory, animator, config.navigator));
        let overlay = Arc::new(OverlayController::with_config(config.overlay));
        let input = InputDispatcher::new(Arc::clone(&navigator)).with_overlay(Arc::clone(&overlay));

        Self {
            navigator,
            overlay,
            input,
        }
    }

    /// The navigation stack
    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// The overlay controller
    pub fn overlay(&self) -> &Arc<OverlayController> {
        &self.overlay
    }

    /// The back-button dispatcher
    pub fn input(&self) -> &InputDispatcher {
        &self.input
    }
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`)
///
/// Calling it more than once is harmless.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
