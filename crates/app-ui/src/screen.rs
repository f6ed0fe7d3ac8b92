//! Screens and the screen factory
//!
//! A [`Screen`] is an opaque presentation unit. The navigator only drives its
//! lifecycle; layout and business logic live in the implementation.
//!
//! Screens are resolved by name through a [`ScreenFactory`]. The
//! [`ScreenRegistry`] is an open registry: any crate can register a
//! constructor under a string key, optionally per device variant, without the
//! navigator knowing the concrete type.

use app_platform::DeviceVariant;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{NavigationError, Result, ScreenError};

/// Parameters passed to a screen when it is constructed
pub type RouteParams = HashMap<String, String>;

/// Lifecycle capability every screen implements
///
/// `activate` runs once after the screen becomes the top of the stack and
/// `deactivate` once before it stops being the top. `dispose` runs when the
/// frame is removed from the stack, after `deactivate`.
#[async_trait]
pub trait Screen: Send + Sync {
    /// Called after the screen became the visible top of the stack
    async fn activate(&self) -> std::result::Result<(), ScreenError> {
        Ok(())
    }

    /// Called before the screen is covered or removed
    async fn deactivate(&self) -> std::result::Result<(), ScreenError> {
        Ok(())
    }

    /// Handle a hardware back press
    ///
    /// Return `true` to consume the press. The default lets the navigator pop.
    async fn handle_back(&self) -> bool {
        false
    }

    /// Release resources; the screen is never shown again
    async fn dispose(&self) {}
}

/// Builds screens by name
pub trait ScreenFactory: Send + Sync {
    /// Construct a screen
    ///
    /// Construction must be free of activation side effects.
    fn create(
        &self,
        screen_name: &str,
        variant: DeviceVariant,
        params: &RouteParams,
    ) -> Result<Arc<dyn Screen>>;
}

/// Constructor stored in the registry
pub type ScreenConstructor = Arc<dyn Fn(&RouteParams) -> Arc<dyn Screen> + Send + Sync>;

#[derive(Default, Clone)]
struct Registration {
    /// Used for any variant without an override
    fallback: Option<ScreenConstructor>,
    /// Per-variant overrides
    variants: HashMap<DeviceVariant, ScreenConstructor>,
}

impl Registration {
    fn resolve(&self, variant: DeviceVariant) -> Option<ScreenConstructor> {
        self.variants
            .get(&variant)
            .or(self.fallback.as_ref())
            .cloned()
    }
}

/// Open, string-keyed screen registry
///
/// # Example
///
/// ```rust
/// use app_platform::DeviceVariant;
/// use app_ui::screen::{RouteParams, Screen, ScreenFactory, ScreenRegistry};
/// use std::sync::Arc;
///
/// struct Login;
/// impl Screen for Login {}
///
/// let registry = ScreenRegistry::new();
/// registry.register("login", |_params: &RouteParams| Arc::new(Login) as Arc<dyn Screen>);
///
/// assert!(registry.contains("login"));
/// assert!(registry
///     .create("login", DeviceVariant::Phone, &RouteParams::new())
///     .is_ok());
/// ```
#[derive(Default)]
pub struct ScreenRegistry {
    screens: RwLock<HashMap<String, Registration>>,
}

impl ScreenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor used for every device variant
    pub fn register<F>(&self, screen_name: impl Into<String>, constructor: F) -> &Self
    where
        F: Fn(&RouteParams) -> Arc<dyn Screen> + Send + Sync + 'static,
    {
        let name = screen_name.into();
        tracing::debug!(screen = %name, "registering screen");
        self.screens.write().entry(name).or_default().fallback = Some(Arc::new(constructor));
        self
    }

    /// Register a constructor for one device variant only
    ///
    /// Overrides win over the constructor registered with [`Self::register`].
    pub fn register_variant<F>(
        &self,
        screen_name: impl Into<String>,
        variant: DeviceVariant,
        constructor: F,
    ) -> &Self
    where
        F: Fn(&RouteParams) -> Arc<dyn Screen> + Send + Sync + 'static,
    {
        let name = screen_name.into();
        tracing::debug!(screen = %name, variant = %variant, "registering screen variant");
        self.screens
            .write()
            .entry(name)
            .or_default()
            .variants
            .insert(variant, Arc::new(constructor));
        self
    }

    /// Remove a screen and all of its variants
    pub fn unregister(&self, screen_name: &str) -> bool {
        self.screens.write().remove(screen_name).is_some()
    }

    /// Check if a screen name is registered
    pub fn contains(&self, screen_name: &str) -> bool {
        self.screens.read().contains_key(screen_name)
    }

    /// Get all registered names, sorted
    pub fn screen_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.screens.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl ScreenFactory for ScreenRegistry {
    fn create(
        &self,
        screen_name: &str,
        variant: DeviceVariant,
        params: &RouteParams,
    ) -> Result<Arc<dyn Screen>> {
        // Clone the constructor out so user code never runs under the lock
        let constructor = self
            .screens
            .read()
            .get(screen_name)
            .and_then(|registration| registration.resolve(variant));

        match constructor {
            Some(constructor) => Ok(constructor(params)),
            None => {
                tracing::warn!("No screen registered for {} ({})", screen_name, variant);
                Err(NavigationError::UnknownScreen(screen_name.to_string()))
            }
        }
    }
}
