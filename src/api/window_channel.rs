use std::cell::{Cell, RefCell};
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::TimeWindow;
use crate::error::{ChartError, ChartResult};

/// Stable identity of one view controller on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerId(u32);

impl ControllerId {
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Who produced a window change.
///
/// `Reset` is never equal to any controller, so reset broadcasts reach every
/// subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Controller(ControllerId),
    Reset,
}

/// One published window change. `window == None` means "no selection".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowChange {
    pub origin: Origin,
    pub window: Option<TimeWindow>,
}

impl WindowChange {
    #[must_use]
    pub fn is_from(&self, id: ControllerId) -> bool {
        self.origin == Origin::Controller(id)
    }
}

pub type WindowHandler = Box<dyn FnMut(&WindowChange)>;

struct Subscription {
    qualifier: String,
    handler: WindowHandler,
}

/// Synchronous publish/subscribe channel for the shared time window.
///
/// It also stores the last published window, so it doubles as the single
/// window store both views read from. Delivery runs every handler, in
/// subscription order, before `publish` returns.
pub struct WindowChannel {
    subscriptions: RefCell<SmallVec<[Subscription; 2]>>,
    current: Cell<Option<TimeWindow>>,
    revision: Cell<u64>,
    next_id: Cell<u32>,
}

impl Default for WindowChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WindowChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowChannel")
            .field("subscribers", &self.subscriber_count())
            .field("current", &self.current.get())
            .field("revision", &self.revision.get())
            .finish()
    }
}

impl WindowChannel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(SmallVec::new()),
            current: Cell::new(None),
            revision: Cell::new(0),
            next_id: Cell::new(0),
        }
    }

    /// Hands out a fresh controller identity.
    pub fn register(&self) -> ControllerId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        ControllerId(id)
    }

    /// Registers `handler` under `qualifier`.
    ///
    /// An existing subscription with the same qualifier is replaced in place
    /// and keeps its delivery position.
    pub fn subscribe(
        &self,
        qualifier: impl Into<String>,
        handler: impl FnMut(&WindowChange) + 'static,
    ) -> ChartResult<()> {
        let qualifier = qualifier.into();
        let mut subscriptions = self.subscriptions.try_borrow_mut().map_err(|_| busy())?;
        let handler: WindowHandler = Box::new(handler);
        match subscriptions
            .iter_mut()
            .find(|entry| entry.qualifier == qualifier)
        {
            Some(existing) => existing.handler = handler,
            None => subscriptions.push(Subscription { qualifier, handler }),
        }
        Ok(())
    }

    /// Removes a subscription. Returns `true` when one was removed.
    pub fn unsubscribe(&self, qualifier: &str) -> ChartResult<bool> {
        let mut subscriptions = self.subscriptions.try_borrow_mut().map_err(|_| busy())?;
        match subscriptions
            .iter()
            .position(|entry| entry.qualifier == qualifier)
        {
            Some(position) => {
                subscriptions.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stores `window` and delivers it to every subscriber.
    ///
    /// Returns the number of handlers invoked. Handlers must not publish;
    /// doing so fails with `ChartError::ReentrantPublish`.
    pub fn publish(&self, origin: Origin, window: Option<TimeWindow>) -> ChartResult<usize> {
        let mut subscriptions = self
            .subscriptions
            .try_borrow_mut()
            .map_err(|_| ChartError::ReentrantPublish)?;

        self.current.set(window);
        self.revision.set(self.revision.get() + 1);
        debug!(
            ?origin,
            ?window,
            revision = self.revision.get(),
            subscribers = subscriptions.len(),
            "publish time window"
        );

        let change = WindowChange { origin, window };
        for entry in subscriptions.iter_mut() {
            (entry.handler)(&change);
        }
        Ok(subscriptions.len())
    }

    /// Last published window.
    #[must_use]
    pub fn current(&self) -> Option<TimeWindow> {
        self.current.get()
    }

    /// Number of publications so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .try_borrow()
            .map_or(0, |subscriptions| subscriptions.len())
    }

    #[must_use]
    pub fn has_subscriber(&self, qualifier: &str) -> bool {
        self.subscriptions.try_borrow().is_ok_and(|subscriptions| {
            subscriptions
                .iter()
                .any(|entry| entry.qualifier == qualifier)
        })
    }
}

fn busy() -> ChartError {
    ChartError::InvalidData(
        "cannot change subscriptions while a window change is being delivered".to_owned(),
    )
}
