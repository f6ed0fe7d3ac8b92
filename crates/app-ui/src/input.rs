//! Hardware back-button dispatch
//!
//! Back presses are offered to the visible overlays first, then to the active
//! screen, and only then turned into a `pop`. The screen check and the pop
//! share one turn of the navigator's request queue. A press nothing consumes is
//! reported back to the host, which decides whether to exit or minimize.

use app_platform::HardwareKey;
use app_state::OverlayController;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::navigation::Navigator;

/// Routes hardware key signals into the navigator
pub struct InputDispatcher {
    navigator: Arc<Navigator>,
    overlay: Option<Arc<OverlayController>>,
}

impl InputDispatcher {
    /// Create a dispatcher for a navigator
    pub fn new(navigator: Arc<Navigator>) -> Self {
        Self {
            navigator,
            overlay: None,
        }
    }

    /// Let visible overlays take back presses before the stack does
    pub fn with_overlay(mut self, overlay: Arc<OverlayController>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Handle a back signal
    ///
    /// Returns `Ok(false)` when nothing consumed it and there is nothing left
    /// to pop. Lifecycle failures from the resulting pop are returned as
    /// errors; a pop vetoed by a `navigating` observer counts as handled.
    pub async fn on_back_signal(&self) -> Result<bool> {
        if let Some(overlay) = &self.overlay {
            if overlay.hide_alert() {
                tracing::debug!("back press dismissed alert");
                return Ok(true);
            }
            if overlay.state().busy_visible {
                tracing::debug!("back press swallowed while busy");
                return Ok(true);
            }
        }

        self.navigator.go_back().await
    }

    /// Handle a raw key; anything other than a back key is left unhandled
    pub async fn on_key(&self, key: HardwareKey) -> Result<bool> {
        if !key.is_back() {
            return Ok(false);
        }
        self.on_back_signal().await
    }

    /// Drive the dispatcher from a host key channel
    ///
    /// Keys that are not handled are forwarded on `unhandled`. Navigation
    /// errors are logged and the loop keeps running until either channel
    /// closes.
    pub async fn run(
        &self,
        mut keys: mpsc::Receiver<HardwareKey>,
        unhandled: mpsc::Sender<HardwareKey>,
    ) {
        while let Some(key) = keys.recv().await {
            match self.on_key(key).await {
                Ok(true) => {}
                Ok(false) => {
                    if unhandled.send(key).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!("Back navigation failed: {}", e),
            }
        }
        tracing::debug!("input dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigatorConfig;
    use crate::error::ScreenError;
    use crate::screen::{RouteParams, Screen, ScreenRegistry};
    use crate::transition::InstantAnimator;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Screen that consumes a fixed number of back presses
    struct Guarded {
        remaining: AtomicUsize,
    }

    #[async_trait]
    impl Screen for Guarded {
        async fn handle_back(&self) -> bool {
            self.remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    struct Plain;

    impl Screen for Plain {}

    /// Screen whose deactivation takes a while
    struct Slow;

    #[async_trait]
    impl Screen for Slow {
        async fn deactivate(&self) -> std::result::Result<(), ScreenError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        }
    }

    fn setup() -> Arc<Navigator> {
        let registry = ScreenRegistry::new();
        registry
            .register("home", |_: &RouteParams| Arc::new(Plain) as Arc<dyn Screen>)
            .register("slow", |_: &RouteParams| Arc::new(Slow) as Arc<dyn Screen>)
            .register("form", |_: &RouteParams| {
                Arc::new(Guarded {
                    remaining: AtomicUsize::new(1),
                }) as Arc<dyn Screen>
            });

        Arc::new(Navigator::new(
            Arc::new(registry),
            Arc::new(InstantAnimator),
            NavigatorConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_empty_stack_unhandled() {
        let dispatcher = InputDispatcher::new(setup());
        assert!(!dispatcher.on_back_signal().await.unwrap());
    }

    #[tokio::test]
    async fn test_screen_consumes_before_pop() {
        let navigator = setup();
        navigator.push("home", RouteParams::new()).await.unwrap();
        navigator.push("form", RouteParams::new()).await.unwrap();
        let dispatcher = InputDispatcher::new(Arc::clone(&navigator));

        // First press is consumed by the form itself
        assert!(dispatcher.on_back_signal().await.unwrap());
        assert_eq!(navigator.depth(), 2);

        // Second press pops
        assert!(dispatcher.on_back_signal().await.unwrap());
        assert_eq!(navigator.depth(), 1);

        // Nothing left to pop
        assert!(!dispatcher.on_back_signal().await.unwrap());
        assert_eq!(navigator.depth(), 1);
    }

    #[tokio::test]
    async fn test_overlays_take_precedence() {
        let navigator = setup();
        navigator.push("home", RouteParams::new()).await.unwrap();
        navigator.push("home", RouteParams::new()).await.unwrap();

        let overlay = Arc::new(OverlayController::new());
        let dispatcher =
            InputDispatcher::new(Arc::clone(&navigator)).with_overlay(Arc::clone(&overlay));

        let _ticket = overlay.show_alert("Error", "Network unavailable", Vec::new());
        assert!(dispatcher.on_back_signal().await.unwrap());
        assert!(!overlay.state().alert_visible);
        assert_eq!(navigator.depth(), 2);

        overlay.show_busy("Saving");
        assert!(dispatcher.on_back_signal().await.unwrap());
        assert_eq!(navigator.depth(), 2);

        overlay.hide_busy();
        assert!(dispatcher.on_back_signal().await.unwrap());
        assert_eq!(navigator.depth(), 1);
    }

    /// Waits until a spawned request holds the navigator
    async fn wait_in_flight(navigator: &Navigator) {
        while !navigator.is_navigating() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_goes_to_screen_being_pushed() {
        let navigator = setup();
        navigator.push("home", RouteParams::new()).await.unwrap();
        navigator.push("slow", RouteParams::new()).await.unwrap();
        let dispatcher = InputDispatcher::new(Arc::clone(&navigator));

        let pushing = {
            let navigator = Arc::clone(&navigator);
            tokio::spawn(async move { navigator.push("form", RouteParams::new()).await })
        };
        wait_in_flight(&navigator).await;

        // The form consumes the press once its push has settled
        assert!(dispatcher.on_back_signal().await.unwrap());
        pushing.await.unwrap().unwrap();

        let stack: Vec<String> = navigator
            .snapshot()
            .into_iter()
            .map(|frame| frame.screen_name)
            .collect();
        assert_eq!(stack, vec!["home", "slow", "form"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_at_root_waits_for_pending_push() {
        let navigator = setup();
        navigator.push("slow", RouteParams::new()).await.unwrap();
        let dispatcher = InputDispatcher::new(Arc::clone(&navigator));

        let pushing = {
            let navigator = Arc::clone(&navigator);
            tokio::spawn(async move { navigator.push("home", RouteParams::new()).await })
        };
        wait_in_flight(&navigator).await;

        // Not left to the host: by the time it runs there is a frame to pop
        assert!(dispatcher.on_back_signal().await.unwrap());
        pushing.await.unwrap().unwrap();
        assert_eq!(navigator.depth(), 1);
        assert_eq!(navigator.current().unwrap().screen_name(), "slow");
    }

    #[tokio::test]
    async fn test_vetoed_pop_counts_as_handled() {
        let navigator = setup();
        navigator.push("home", RouteParams::new()).await.unwrap();
        navigator.push("home", RouteParams::new()).await.unwrap();
        navigator.on_navigating(|event| event.cancel = true);

        let dispatcher = InputDispatcher::new(Arc::clone(&navigator));
        assert!(dispatcher.on_back_signal().await.unwrap());
        assert_eq!(navigator.depth(), 2);
    }

    #[tokio::test]
    async fn test_run_forwards_unhandled_keys() {
        let navigator = setup();
        navigator.push("home", RouteParams::new()).await.unwrap();
        let dispatcher = InputDispatcher::new(Arc::clone(&navigator));

        let (key_tx, key_rx) = mpsc::channel(8);
        let (host_tx, mut host_rx) = mpsc::channel(8);

        key_tx.send(HardwareKey::Menu).await.unwrap();
        key_tx.send(HardwareKey::Back).await.unwrap();
        drop(key_tx);

        dispatcher.run(key_rx, host_tx).await;

        assert_eq!(host_rx.recv().await, Some(HardwareKey::Menu));
        assert_eq!(host_rx.recv().await, Some(HardwareKey::Back));
        assert_eq!(host_rx.recv().await, None);
    }
}
