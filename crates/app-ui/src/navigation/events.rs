//! Navigation events and observers

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::request::NavigationKind;
use crate::screen::RouteParams;

/// Raised before a request mutates the stack
///
/// Setting `cancel` aborts the request with no state change.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatingEvent {
    /// Request kind
    pub kind: NavigationKind,
    /// Screen currently on top
    pub from: Option<String>,
    /// Screen that will be on top afterwards
    pub to: Option<String>,
    /// Parameters of the destination screen
    pub parameters: RouteParams,
    /// Veto flag
    pub cancel: bool,
}

/// Raised after a request has fully settled
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatedEvent {
    /// Request kind
    pub kind: NavigationKind,
    /// Screen that was on top
    pub from: Option<String>,
    /// Screen now on top
    pub to: Option<String>,
    /// Parameters of the screen now on top
    pub parameters: RouteParams,
    /// Stack depth after the request
    pub depth: usize,
}

/// Identifies an observer registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type NavigatingObserver = Arc<dyn Fn(&mut NavigatingEvent) + Send + Sync>;
type NavigatedObserver = Arc<dyn Fn(&NavigatedEvent) + Send + Sync>;

/// Observer lists
///
/// Observers are cloned out before being invoked, so a callback may
/// subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: AtomicU64,
    navigating: RwLock<Vec<(SubscriptionId, NavigatingObserver)>>,
    navigated: RwLock<Vec<(SubscriptionId, NavigatedObserver)>>,
}

impl Observers {
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn add_navigating(&self, observer: NavigatingObserver) -> SubscriptionId {
        let id = self.next_id();
        self.navigating.write().push((id, observer));
        id
    }

    pub(crate) fn add_navigated(&self, observer: NavigatedObserver) -> SubscriptionId {
        let id = self.next_id();
        self.navigated.write().push((id, observer));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.navigating.write().retain(|(existing, _)| {
            let keep = *existing != id;
            removed |= !keep;
            keep
        });
        self.navigated.write().retain(|(existing, _)| {
            let keep = *existing != id;
            removed |= !keep;
            keep
        });
        removed
    }

    /// Run `navigating` observers in registration order, stopping at the first veto
    pub(crate) fn dispatch_navigating(&self, event: &mut NavigatingEvent) {
        let observers: Vec<NavigatingObserver> = self
            .navigating
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(event);
            if event.cancel {
                break;
            }
        }
    }

    pub(crate) fn dispatch_navigated(&self, event: &NavigatedEvent) {
        let observers: Vec<NavigatedObserver> = self
            .navigated
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(event);
        }
    }
}
