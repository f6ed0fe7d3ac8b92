//! The navigation stack
//!
//! [`Navigator`] owns the frame list and processes one request at a time.
//! Every request runs its full cycle (veto check, deactivate the old top,
//! construct and activate the new top, animate, dispatch `navigated`) while
//! holding the request queue, so a second request issued mid-flight waits
//! its turn in FIFO order.

use app_platform::DeviceVariant;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};

use super::events::{NavigatedEvent, NavigatingEvent, Observers, SubscriptionId};
use super::frame::{Frame, FrameSummary};
use super::request::{NavigationKind, NavigationOutcome, NavigationRequest};
use crate::config::NavigatorConfig;
use crate::error::{LifecyclePhase, NavigationError, Result};
use crate::screen::{RouteParams, ScreenFactory};
use crate::transition::{self, Completion, Transition, TransitionAnimator, TransitionKind};

// =============================================================================
// Queue bookkeeping
// =============================================================================

/// Counts a request while it waits for the queue
struct Waiting<'a>(&'a AtomicUsize);

impl<'a> Waiting<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Waiting(counter)
    }
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Marks a request as in flight until dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        InFlight(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Exclusive turn on the request queue
struct Slot<'a> {
    _queue: MutexGuard<'a, ()>,
    _in_flight: InFlight<'a>,
}

// =============================================================================
// Navigator
// =============================================================================

/// Stack-based screen router
///
/// # Example
///
/// ```rust
/// use app_ui::navigation::Navigator;
/// use app_ui::screen::{RouteParams, Screen, ScreenRegistry};
/// use app_ui::transition::InstantAnimator;
/// use app_ui::NavigatorConfig;
/// use std::sync::Arc;
///
/// struct Blank;
/// impl Screen for Blank {}
///
/// # #[tokio::main]
/// # async fn main() {
/// let registry = ScreenRegistry::new();
/// registry.register("qr-login", |_: &RouteParams| Arc::new(Blank) as Arc<dyn Screen>);
///
/// let navigator = Navigator::new(
///     Arc::new(registry),
///     Arc::new(InstantAnimator),
///     NavigatorConfig::default(),
/// );
/// navigator.push("qr-login", RouteParams::new()).await.unwrap();
/// assert_eq!(navigator.depth(), 1);
/// assert!(!navigator.can_go_back());
/// # }
/// ```
pub struct Navigator {
    factory: Arc<dyn ScreenFactory>,
    animator: Arc<dyn TransitionAnimator>,
    config: NavigatorConfig,
    /// Frames, bottom to top. Never locked across an await.
    frames: RwLock<Vec<Frame>>,
    /// FIFO request queue; held for a request's whole cycle
    queue: Mutex<()>,
    in_flight: AtomicBool,
    waiting: AtomicUsize,
    observers: Observers,
    events_tx: broadcast::Sender<NavigatedEvent>,
}

impl Navigator {
    /// Create an empty navigator
    pub fn new(
        factory: Arc<dyn ScreenFactory>,
        animator: Arc<dyn TransitionAnimator>,
        config: NavigatorConfig,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(config.event_buffer_size.max(1));

        Self {
            factory,
            animator,
            config,
            frames: RwLock::new(Vec::new()),
            queue: Mutex::new(()),
            in_flight: AtomicBool::new(false),
            waiting: AtomicUsize::new(0),
            observers: Observers::default(),
            events_tx,
        }
    }

    // -------------------------------------------------------------------------
    // Synchronous reads
    // -------------------------------------------------------------------------

    /// Number of frames on the stack
    pub fn depth(&self) -> usize {
        self.frames.read().len()
    }

    /// Check if a pop would do anything
    pub fn can_go_back(&self) -> bool {
        self.frames.read().len() > 1
    }

    /// The top frame
    pub fn current(&self) -> Option<Frame> {
        self.frames.read().last().cloned()
    }

    /// Summaries of every frame, bottom to top
    pub fn snapshot(&self) -> Vec<FrameSummary> {
        self.frames.read().iter().map(Frame::summary).collect()
    }

    /// Check if a request is being processed
    pub fn is_navigating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Number of requests waiting behind the one in flight
    pub fn pending_requests(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Device variant passed to the screen factory
    pub fn device_variant(&self) -> DeviceVariant {
        self.config.device_variant
    }

    /// Active configuration
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Observe requests before they run; set `cancel` to veto
    pub fn on_navigating<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&mut NavigatingEvent) + Send + Sync + 'static,
    {
        self.observers.add_navigating(Arc::new(observer))
    }

    /// Observe requests after they settle
    pub fn on_navigated<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&NavigatedEvent) + Send + Sync + 'static,
    {
        self.observers.add_navigated(Arc::new(observer))
    }

    /// Remove an observer registered with either `on_*` method
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Receive `navigated` events on a channel
    pub fn subscribe(&self) -> broadcast::Receiver<NavigatedEvent> {
        self.events_tx.subscribe()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Push a screen on top of the stack
    pub async fn push(&self, screen_name: impl Into<String>, params: RouteParams) -> Result<()> {
        self.navigate(NavigationRequest::push(screen_name).with_params(params))
            .await
            .map(|_| ())
    }

    /// Push a screen, choosing whether to animate
    pub async fn push_with(
        &self,
        screen_name: impl Into<String>,
        params: RouteParams,
        animated: bool,
    ) -> Result<()> {
        let request = NavigationRequest::push(screen_name)
            .with_params(params)
            .animated(animated);
        self.navigate(request).await.map(|_| ())
    }

    /// Pop the top screen
    ///
    /// Returns `None` without doing anything when the stack has one frame or
    /// none.
    pub async fn pop(&self) -> Result<Option<Frame>> {
        let outcome = self.navigate(NavigationRequest::pop()).await?;
        Ok(outcome.removed.into_iter().next())
    }

    /// Pop the top screen, choosing whether to animate
    pub async fn pop_with(&self, animated: bool) -> Result<Option<Frame>> {
        let outcome = self
            .navigate(NavigationRequest::pop().animated(animated))
            .await?;
        Ok(outcome.removed.into_iter().next())
    }

    /// Swap the top screen for another, with one combined transition
    pub async fn replace(&self, screen_name: impl Into<String>, params: RouteParams) -> Result<()> {
        self.navigate(NavigationRequest::replace(screen_name).with_params(params))
            .await
            .map(|_| ())
    }

    /// Swap the top screen, choosing whether to animate
    pub async fn replace_with(
        &self,
        screen_name: impl Into<String>,
        params: RouteParams,
        animated: bool,
    ) -> Result<()> {
        let request = NavigationRequest::replace(screen_name)
            .with_params(params)
            .animated(animated);
        self.navigate(request).await.map(|_| ())
    }

    /// Tear down the whole stack and install a single root
    pub async fn set_root(&self, screen_name: impl Into<String>, params: RouteParams) -> Result<()> {
        self.navigate(NavigationRequest::set_root(screen_name).with_params(params))
            .await
            .map(|_| ())
    }

    /// Install a single root, choosing whether to animate
    pub async fn set_root_with(
        &self,
        screen_name: impl Into<String>,
        params: RouteParams,
        animated: bool,
    ) -> Result<()> {
        let request = NavigationRequest::set_root(screen_name)
            .with_params(params)
            .animated(animated);
        self.navigate(request).await.map(|_| ())
    }

    /// Pop every frame above the root
    ///
    /// Returns how many frames were removed.
    pub async fn pop_to_root(&self) -> Result<usize> {
        let outcome = self.navigate(NavigationRequest::pop_to_root()).await?;
        Ok(outcome.removed.len())
    }

    /// Pop to the root, choosing whether to animate
    pub async fn pop_to_root_with(&self, animated: bool) -> Result<usize> {
        let outcome = self
            .navigate(NavigationRequest::pop_to_root().animated(animated))
            .await?;
        Ok(outcome.removed.len())
    }

    /// Offer a back press to the top screen, popping if it declines
    ///
    /// The whole decision runs in one turn of the request queue, so the
    /// screen asked is the one on top once earlier requests have settled.
    /// Returns `Ok(false)` when the stack is empty or the top screen is the
    /// root and declined. A pop vetoed by a `navigating` observer counts as
    /// handled.
    pub async fn go_back(&self) -> Result<bool> {
        let _slot = self.acquire().await;

        let Some(frame) = self.current() else {
            tracing::debug!("back press with empty stack");
            return Ok(false);
        };

        if frame.screen().handle_back().await {
            tracing::debug!(screen = %frame.screen_name(), "back press handled by screen");
            return Ok(true);
        }

        if !self.can_go_back() {
            tracing::debug!(screen = %frame.screen_name(), "back press at root left to host");
            return Ok(false);
        }

        match self.run_pop(self.config.animated_by_default).await {
            Ok(outcome) => Ok(!outcome.removed.is_empty()),
            Err(e) if e.is_cancelled() => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Process a request once every earlier request has settled
    pub async fn navigate(&self, request: NavigationRequest) -> Result<NavigationOutcome> {
        let _slot = self.acquire().await;

        let NavigationRequest {
            kind,
            target_screen,
            parameters,
            animated,
        } = request;
        let animated = animated.unwrap_or(self.config.animated_by_default);

        tracing::debug!(
            kind = ?kind,
            screen = ?target_screen,
            animated,
            depth = self.depth(),
            "processing navigation request"
        );

        let target = move || {
            target_screen.ok_or_else(|| {
                tracing::warn!("{:?} request without a target screen", kind);
                NavigationError::MissingTarget(kind)
            })
        };

        match kind {
            NavigationKind::Push => self.run_push(target()?, parameters, animated).await,
            NavigationKind::Pop => self.run_pop(animated).await,
            NavigationKind::Replace => self.run_replace(target()?, parameters, animated).await,
            NavigationKind::SetRoot => self.run_set_root(target()?, parameters, animated).await,
            NavigationKind::PopToRoot => self.run_pop_to_root(animated).await,
        }
    }

    /// Wait for the queue, counting the wait in `pending_requests`
    async fn acquire(&self) -> Slot<'_> {
        let queue = {
            let _waiting = Waiting::enter(&self.waiting);
            self.queue.lock().await
        };
        Slot {
            _queue: queue,
            _in_flight: InFlight::enter(&self.in_flight),
        }
    }

    // -------------------------------------------------------------------------
    // Request cycles
    // -------------------------------------------------------------------------

    async fn run_push(
        &self,
        target: String,
        params: RouteParams,
        animated: bool,
    ) -> Result<NavigationOutcome> {
        let from = self.current();
        self.check_navigating(NavigationKind::Push, from.as_ref(), &target, &params)?;

        let screen = self
            .factory
            .create(&target, self.config.device_variant, &params)?;

        if let Some(previous) = &from {
            self.deactivate(previous).await?;
        }

        let frame = Frame::new(target, screen, params);
        self.frames.write().push(frame.clone());
        self.activate(&frame).await?;

        self.animate(from.as_ref(), &frame, TransitionKind::Enter, animated)
            .await;
        self.finish(NavigationKind::Push, from.as_ref(), &frame);

        Ok(NavigationOutcome::default())
    }

    async fn run_pop(&self, animated: bool) -> Result<NavigationOutcome> {
        let (top, beneath) = {
            let frames = self.frames.read();
            match frames.as_slice() {
                [.., beneath, top] => (top.clone(), beneath.clone()),
                _ => {
                    tracing::debug!("pop ignored at depth {}", frames.len());
                    return Ok(NavigationOutcome::default());
                }
            }
        };

        self.check_navigating(
            NavigationKind::Pop,
            Some(&top),
            beneath.screen_name(),
            beneath.parameters(),
        )?;

        self.deactivate(&top).await?;
        self.frames.write().pop();
        self.dispose(&top).await;

        self.activate(&beneath).await?;

        self.animate(Some(&top), &beneath, TransitionKind::Exit, animated)
            .await;
        self.finish(NavigationKind::Pop, Some(&top), &beneath);

        Ok(NavigationOutcome::removed(vec![top]))
    }

    async fn run_replace(
        &self,
        target: String,
        params: RouteParams,
        animated: bool,
    ) -> Result<NavigationOutcome> {
        let from = self.current();
        self.check_navigating(NavigationKind::Replace, from.as_ref(), &target, &params)?;

        let screen = self
            .factory
            .create(&target, self.config.device_variant, &params)?;

        if let Some(previous) = &from {
            self.deactivate(previous).await?;
            self.frames.write().pop();
            self.dispose(previous).await;
        }

        let frame = Frame::new(target, screen, params);
        self.frames.write().push(frame.clone());
        self.activate(&frame).await?;

        self.animate(from.as_ref(), &frame, TransitionKind::Replace, animated)
            .await;
        self.finish(NavigationKind::Replace, from.as_ref(), &frame);

        Ok(NavigationOutcome::removed(from.into_iter().collect()))
    }

    async fn run_set_root(
        &self,
        target: String,
        params: RouteParams,
        animated: bool,
    ) -> Result<NavigationOutcome> {
        let from = self.current();
        self.check_navigating(NavigationKind::SetRoot, from.as_ref(), &target, &params)?;

        let screen = self
            .factory
            .create(&target, self.config.device_variant, &params)?;

        // Only the top is active; suspended frames were deactivated when covered
        if let Some(top) = &from {
            self.deactivate(top).await?;
        }

        let removed: Vec<Frame> = self.frames.write().drain(..).rev().collect();
        for frame in &removed {
            self.dispose(frame).await;
        }

        let frame = Frame::new(target, screen, params);
        self.frames.write().push(frame.clone());
        self.activate(&frame).await?;

        self.animate(from.as_ref(), &frame, TransitionKind::Replace, animated)
            .await;
        self.finish(NavigationKind::SetRoot, from.as_ref(), &frame);

        Ok(NavigationOutcome::removed(removed))
    }

    async fn run_pop_to_root(&self, animated: bool) -> Result<NavigationOutcome> {
        let (top, root) = {
            let frames = self.frames.read();
            match frames.as_slice() {
                [root, .., top] => (top.clone(), root.clone()),
                _ => {
                    tracing::debug!("pop to root ignored at depth {}", frames.len());
                    return Ok(NavigationOutcome::default());
                }
            }
        };

        self.check_navigating(
            NavigationKind::PopToRoot,
            Some(&top),
            root.screen_name(),
            root.parameters(),
        )?;

        self.deactivate(&top).await?;

        // Intermediate frames go without their own transitions
        let removed: Vec<Frame> = self.frames.write().drain(1..).rev().collect();
        for frame in &removed {
            self.dispose(frame).await;
        }

        self.activate(&root).await?;

        self.animate(Some(&top), &root, TransitionKind::Exit, animated)
            .await;
        self.finish(NavigationKind::PopToRoot, Some(&top), &root);

        Ok(NavigationOutcome::removed(removed))
    }

    // -------------------------------------------------------------------------
    // Cycle steps
    // -------------------------------------------------------------------------

    fn check_navigating(
        &self,
        kind: NavigationKind,
        from: Option<&Frame>,
        to: &str,
        params: &RouteParams,
    ) -> Result<()> {
        let mut event = NavigatingEvent {
            kind,
            from: from.map(|f| f.screen_name().to_string()),
            to: Some(to.to_string()),
            parameters: params.clone(),
            cancel: false,
        };
        self.observers.dispatch_navigating(&mut event);

        if event.cancel {
            tracing::info!(kind = ?kind, from = ?event.from, to = ?event.to, "navigation cancelled");
            return Err(NavigationError::Cancelled {
                from: event.from,
                to: event.to,
            });
        }
        Ok(())
    }

    async fn activate(&self, frame: &Frame) -> Result<()> {
        tracing::debug!(screen = %frame.screen_name(), frame = %frame.id(), "activating");
        frame.screen().activate().await.map_err(|source| {
            tracing::warn!("Screen {} failed to activate: {}", frame.screen_name(), source);
            NavigationError::ActivationFailure {
                screen: frame.screen_name().to_string(),
                phase: LifecyclePhase::Activate,
                source,
            }
        })
    }

    async fn deactivate(&self, frame: &Frame) -> Result<()> {
        tracing::debug!(screen = %frame.screen_name(), frame = %frame.id(), "deactivating");
        frame.screen().deactivate().await.map_err(|source| {
            tracing::warn!("Screen {} failed to deactivate: {}", frame.screen_name(), source);
            NavigationError::ActivationFailure {
                screen: frame.screen_name().to_string(),
                phase: LifecyclePhase::Deactivate,
                source,
            }
        })
    }

    async fn dispose(&self, frame: &Frame) {
        tracing::debug!(screen = %frame.screen_name(), frame = %frame.id(), "disposing");
        frame.screen().dispose().await;
    }

    async fn animate(
        &self,
        outgoing: Option<&Frame>,
        incoming: &Frame,
        kind: TransitionKind,
        animated: bool,
    ) -> Completion {
        let step = Transition {
            outgoing: outgoing.map(Frame::handle),
            incoming: incoming.handle(),
            kind,
        };
        transition::play(
            &self.animator,
            step,
            animated,
            self.config.animation_timeout(),
        )
        .await
    }

    fn finish(&self, kind: NavigationKind, from: Option<&Frame>, to: &Frame) {
        let event = NavigatedEvent {
            kind,
            from: from.map(|f| f.screen_name().to_string()),
            to: Some(to.screen_name().to_string()),
            parameters: to.parameters().clone(),
            depth: self.depth(),
        };

        tracing::info!(
            kind = ?kind,
            from = ?event.from,
            to = %to.screen_name(),
            depth = event.depth,
            "navigated"
        );

        self.observers.dispatch_navigated(&event);
        let _ = self.events_tx.send(event);
    }
}

// =============================================================================
// Tests
// =============================================================================
