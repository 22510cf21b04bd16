// App shell: the selected user (passed explicitly as a UserContext) and the
// refresh counter that panels bump after mutations and the sidebar observes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};

/// Selected user plus the selection generation it was taken at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub user_id: String,
    pub generation: u64,
}

/// Result of a load that may have been overtaken by a new selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Current(T),
    /// The selection changed while the response was in flight; the response was dropped.
    Superseded,
}

impl<T> Loaded<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Loaded::Current(v) => Some(v),
            Loaded::Superseded => None,
        }
    }
}

/// Sent to sidebar observers each time a mutation lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshEvent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user_id: String,
    pub counter: u64,
}

pub struct RefreshCounter {
    counter: AtomicU64,
    tx: broadcast::Sender<RefreshEvent>,
}

impl RefreshCounter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            counter: AtomicU64::new(0),
            tx,
        }
    }

    pub fn value(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Increment and notify observers. Returns the new value.
    pub fn bump(&self, user_id: &str) -> u64 {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let event = RefreshEvent {
            kind: "refresh",
            user_id: user_id.to_string(),
            counter,
        };
        if self.tx.send(event).is_err() {
            tracing::debug!(counter, "refresh bumped with no observers");
        }
        counter
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.tx.subscribe()
    }
}

pub struct Shell {
    selection: RwLock<UserContext>,
    generation: AtomicU64,
    refresh: RefreshCounter,
}

impl Shell {
    pub fn new(default_user_id: &str, refresh_capacity: usize) -> Self {
        Self {
            selection: RwLock::new(UserContext {
                user_id: default_user_id.to_string(),
                generation: 0,
            }),
            generation: AtomicU64::new(0),
            refresh: RefreshCounter::new(refresh_capacity),
        }
    }

    pub async fn context(&self) -> UserContext {
        self.selection.read().await.clone()
    }

    /// Switch the selected user. Always starts a new generation, so loads
    /// started before the switch are discarded even if the id is unchanged.
    pub async fn select(&self, user_id: &str) -> UserContext {
        let mut selection = self.selection.write().await;
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        *selection = UserContext {
            user_id: user_id.to_string(),
            generation,
        };
        tracing::info!(user_id, generation, "user selected");
        selection.clone()
    }

    pub async fn is_current(&self, ctx: &UserContext) -> bool {
        *self.selection.read().await == *ctx
    }

    /// Keep `value` only if `ctx` is still the active selection.
    pub async fn settle<T>(&self, ctx: &UserContext, value: T) -> Loaded<T> {
        if self.is_current(ctx).await {
            Loaded::Current(value)
        } else {
            tracing::debug!(
                user_id = %ctx.user_id,
                generation = ctx.generation,
                "discarding response for superseded selection"
            );
            Loaded::Superseded
        }
    }

    pub fn refresh(&self) -> &RefreshCounter {
        &self.refresh
    }
}
