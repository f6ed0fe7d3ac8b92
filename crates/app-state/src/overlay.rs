//! Always-on-top overlay state
//!
//! This module owns the two overlay layers that render above the navigation
//! stack: a busy indicator and a blocking alert. The layers are independent
//! of each other and of navigation, so any task may toggle them without
//! waiting on a pending screen transition.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, oneshot, watch};

/// Overlay errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// No alert is currently visible
    #[error("No alert is visible")]
    NoAlert,

    /// The visible alert has no action with this id
    #[error("Unknown alert action: {0}")]
    UnknownAction(String),

    /// Malformed configuration
    #[error("Invalid overlay config: {0}")]
    Config(String),
}

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

fn default_ok_label() -> String {
    "OK".to_string()
}

fn default_retry_label() -> String {
    "Retry".to_string()
}

fn default_event_buffer_size() -> usize {
    16
}

/// Overlay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Label of the default confirm action
    #[serde(default = "default_ok_label")]
    pub ok_label: String,

    /// Label of the default retry action
    #[serde(default = "default_retry_label")]
    pub retry_label: String,

    /// Capacity of the overlay event channel
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            ok_label: default_ok_label(),
            retry_label: default_retry_label(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl OverlayConfig {
    /// Parse configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| OverlayError::Config(e.to_string()))
    }
}

/// An action button on an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertAction {
    /// Stable identifier reported back when chosen
    pub id: String,
    /// Button label
    pub label: String,
}

impl AlertAction {
    /// Identifier of the default confirm action
    pub const OK: &'static str = "ok";
    /// Identifier of the default retry action
    pub const RETRY: &'static str = "retry";

    /// Create a new action
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Snapshot of both overlay layers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    /// Busy indicator visible
    pub busy_visible: bool,
    /// Busy indicator caption
    pub busy_message: Option<String>,
    /// Alert visible
    pub alert_visible: bool,
    /// Alert title
    pub alert_title: Option<String>,
    /// Alert body
    pub alert_message: Option<String>,
    /// Alert buttons, in display order
    pub alert_actions: Vec<AlertAction>,
}

impl OverlayState {
    /// Check if either layer is visible
    pub fn is_blocking(&self) -> bool {
        self.busy_visible || self.alert_visible
    }
}

/// How an alert was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// The user picked an action
    Action(AlertAction),
    /// The alert was hidden without a choice
    Dismissed,
    /// Another alert replaced this one
    Superseded,
}

/// Events broadcast when overlay layers change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Busy indicator shown or its message changed
    BusyShown(Option<String>),
    /// Busy indicator hidden
    BusyHidden,
    /// Alert shown or its content replaced
    AlertShown {
        /// Alert title
        title: String,
    },
    /// Alert resolved and hidden
    AlertResolved(AlertOutcome),
}

/// Handle to the outcome of a shown alert
#[derive(Debug)]
pub struct AlertTicket {
    rx: oneshot::Receiver<AlertOutcome>,
}

impl AlertTicket {
    /// Wait until the alert is resolved
    ///
    /// If the controller is dropped first the alert counts as dismissed.
    pub async fn outcome(self) -> AlertOutcome {
        self.rx.await.unwrap_or(AlertOutcome::Dismissed)
    }
}

/// Controller for the busy and alert overlays
///
/// State is published on a watch channel so a renderer always sees the
/// latest snapshot, and every change is also broadcast as an
/// [`OverlayEvent`].
///
/// # Example
///
/// ```no_run
/// use app_state::overlay::{AlertOutcome, OverlayController};
///
/// #[tokio::main]
/// async fn main() {
///     let overlay = OverlayController::new();
///
///     overlay.show_busy("Signing in");
///     overlay.hide_busy();
///
///     let ticket = overlay.show_alert("Login failed", "Check your password", Vec::new());
///     overlay.choose("retry").unwrap();
///     assert!(matches!(ticket.outcome().await, AlertOutcome::Action(_)));
/// }
/// ```
pub struct OverlayController {
    config: OverlayConfig,
    state_tx: watch::Sender<OverlayState>,
    events_tx: broadcast::Sender<OverlayEvent>,
    pending_alert: Mutex<Option<oneshot::Sender<AlertOutcome>>>,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayController {
    /// Create a controller with default configuration
    pub fn new() -> Self {
        Self::with_config(OverlayConfig::default())
    }

    /// Create a controller with custom configuration
    pub fn with_config(config: OverlayConfig) -> Self {
        let (state_tx, _) = watch::channel(OverlayState::default());
        let (events_tx, _) = broadcast::channel(config.event_buffer_size.max(1));

        Self {
            config,
            state_tx,
            events_tx,
            pending_alert: Mutex::new(None),
        }
    }

    /// Get a snapshot of the current overlay state
    pub fn state(&self) -> OverlayState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to overlay state snapshots
    pub fn subscribe(&self) -> watch::Receiver<OverlayState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to overlay events
    pub fn subscribe_events(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events_tx.subscribe()
    }

    /// The default alert actions (OK, Retry)
    pub fn default_actions(&self) -> Vec<AlertAction> {
        vec![
            AlertAction::new(AlertAction::OK, self.config.ok_label.clone()),
            AlertAction::new(AlertAction::RETRY, self.config.retry_label.clone()),
        ]
    }

    /// Show the busy indicator, or update its message if already visible
    pub fn show_busy(&self, message: impl Into<String>) {
        let message: String = message.into();
        let message = Some(message).filter(|m| !m.is_empty());
        tracing::debug!(message = ?message, "showing busy overlay");

        self.state_tx.send_modify(|state| {
            state.busy_visible = true;
            state.busy_message = message.clone();
        });
        let _ = self.events_tx.send(OverlayEvent::BusyShown(message));
    }

    /// Hide the busy indicator
    pub fn hide_busy(&self) {
        let changed = self.state_tx.send_if_modified(|state| {
            if !state.busy_visible {
                return false;
            }
            state.busy_visible = false;
            state.busy_message = None;
            true
        });

        if changed {
            tracing::debug!("hiding busy overlay");
            let _ = self.events_tx.send(OverlayEvent::BusyHidden);
        }
    }

    /// Show an alert
    ///
    /// An empty `actions` list selects the default OK/Retry pair. If an alert
    /// is already visible its content is replaced and its ticket resolves
    /// with [`AlertOutcome::Superseded`].
    pub fn show_alert(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> AlertTicket {
        let title = title.into();
        let message = message.into();
        let actions = if actions.is_empty() {
            self.default_actions()
        } else {
            actions
        };

        let (tx, rx) = oneshot::channel();

        // The ticket swap and the state change happen under one lock
        let mut pending = self.pending_alert.lock();
        if let Some(previous) = pending.replace(tx) {
            tracing::debug!("replacing visible alert");
            let _ = previous.send(AlertOutcome::Superseded);
        }

        tracing::info!(title = %title, "showing alert overlay");
        self.state_tx.send_modify(|state| {
            state.alert_visible = true;
            state.alert_title = Some(title.clone());
            state.alert_message = Some(message);
            state.alert_actions = actions;
        });
        let _ = self.events_tx.send(OverlayEvent::AlertShown { title });
        drop(pending);

        AlertTicket { rx }
    }

    /// Hide the alert without a choice
    ///
    /// Returns `false` when no alert was visible.
    pub fn hide_alert(&self) -> bool {
        let mut pending = self.pending_alert.lock();
        if !self.state_tx.borrow().alert_visible {
            return false;
        }
        self.resolve_alert(&mut pending, AlertOutcome::Dismissed);
        true
    }

    /// Resolve the visible alert with one of its actions
    pub fn choose(&self, action_id: &str) -> Result<AlertAction> {
        let mut pending = self.pending_alert.lock();
        let action = {
            let state = self.state_tx.borrow();
            if !state.alert_visible {
                return Err(OverlayError::NoAlert);
            }
            state
                .alert_actions
                .iter()
                .find(|a| a.id == action_id)
                .cloned()
                .ok_or_else(|| OverlayError::UnknownAction(action_id.to_string()))?
        };

        self.resolve_alert(&mut pending, AlertOutcome::Action(action.clone()));
        Ok(action)
    }

    /// Hide both layers
    pub fn reset(&self) {
        self.hide_busy();
        self.hide_alert();
    }

    /// Caller holds the `pending_alert` lock
    fn resolve_alert(
        &self,
        pending: &mut Option<oneshot::Sender<AlertOutcome>>,
        outcome: AlertOutcome,
    ) {
        tracing::debug!(outcome = ?outcome, "resolving alert overlay");

        if let Some(tx) = pending.take() {
            let _ = tx.send(outcome.clone());
        }

        self.state_tx.send_modify(|state| {
            state.alert_visible = false;
            state.alert_title = None;
            state.alert_message = None;
            state.alert_actions.clear();
        });
        let _ = self.events_tx.send(OverlayEvent::AlertResolved(outcome));
    }
}
