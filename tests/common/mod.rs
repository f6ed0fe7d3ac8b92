//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use screen_router::{
    DeviceVariant, InstantAnimator, NavigatorConfig, RouteParams, RouterConfig, Screen,
    ScreenError, ScreenRegistry, ScreenRouter,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle calls in the order they happened, as `"name:hook"`
pub type Log = Arc<Mutex<Vec<String>>>;

/// Screen that records lifecycle calls and answers back presses as told
pub struct RecordingScreen {
    name: String,
    log: Log,
    consume_back: Arc<AtomicBool>,
}

impl RecordingScreen {
    fn record(&self, hook: &str) {
        self.log.lock().push(format!("{}:{}", self.name, hook));
    }
}

#[async_trait]
impl Screen for RecordingScreen {
    async fn activate(&self) -> Result<(), ScreenError> {
        tokio::task::yield_now().await;
        self.record("activate");
        Ok(())
    }

    async fn deactivate(&self) -> Result<(), ScreenError> {
        tokio::task::yield_now().await;
        self.record("deactivate");
        Ok(())
    }

    async fn handle_back(&self) -> bool {
        self.record("back");
        self.consume_back.load(Ordering::SeqCst)
    }

    async fn dispose(&self) {
        self.record("dispose");
    }
}

/// A router over recording screens
pub struct Harness {
    pub router: ScreenRouter,
    pub log: Log,
    /// When set, every screen consumes back presses
    pub consume_back: Arc<AtomicBool>,
}

impl Harness {
    /// Build a router with the given screens registered, transitions instant
    pub fn new(screens: &[&str]) -> Self {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let consume_back = Arc::new(AtomicBool::new(false));
        let registry = ScreenRegistry::new();

        for name in screens {
            let name = name.to_string();
            let log = Arc::clone(&log);
            let consume_back = Arc::clone(&consume_back);
            registry.register(name.clone(), move |_: &RouteParams| {
                Arc::new(RecordingScreen {
                    name: name.clone(),
                    log: Arc::clone(&log),
                    consume_back: Arc::clone(&consume_back),
                }) as Arc<dyn Screen>
            });
        }

        let config = RouterConfig {
            navigator: NavigatorConfig {
                animated_by_default: false,
                device_variant: DeviceVariant::Phone,
                ..NavigatorConfig::default()
            },
            ..RouterConfig::default()
        };

        let router = ScreenRouter::new(
            Arc::new(registry),
            Arc::new(InstantAnimator),
            config,
        );

        Self {
            router,
            log,
            consume_back,
        }
    }

    /// Screen names on the stack, bottom to top
    pub fn stack(&self) -> Vec<String> {
        self.router
            .navigator()
            .snapshot()
            .into_iter()
            .map(|frame| frame.screen_name)
            .collect()
    }

    /// Drain the lifecycle log
    pub fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.lock())
    }

    /// Count log entries for one screen and hook
    pub fn count(log: &[String], entry: &str) -> usize {
        log.iter().filter(|e| e.as_str() == entry).count()
    }
}

/// Empty parameters
pub fn no_params() -> RouteParams {
    RouteParams::new()
}
