use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::models::notification::NotificationEvent;

/// The per-user notification channel registry.
///
/// Channels are named after user IDs. Each connected client session holds one
/// subscription; multiple sessions may subscribe to the same channel (multiple
/// tabs) and each receives an independent copy of every published event. The
/// table lives for the process lifetime and is never persisted: a session that
/// is not subscribed at dispatch time receives nothing.
///
/// Business logic only ever calls [`publish`](NotificationBus::publish); the
/// WebSocket transport owns subscribe/unsubscribe.
#[derive(Clone, Default)]
pub struct NotificationBus {
    inner: Arc<RwLock<Registry>>,
}

#[derive(Default)]
struct Registry {
    /// channel (user ID) -> session ID -> sender.
    channels: HashMap<String, HashMap<Uuid, UnboundedSender<NotificationEvent>>>,
    /// session ID -> channel it is currently subscribed to.
    sessions: HashMap<Uuid, String>,
}

impl NotificationBus {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a session to a channel, returning the receiving end of its
    /// event queue.
    ///
    /// A session subscribes to at most one channel: re-subscribing moves it to
    /// the new channel and drops the old queue.
    pub async fn subscribe(
        &self,
        session_id: Uuid,
        channel: &str,
    ) -> UnboundedReceiver<NotificationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut registry = self.inner.write().await;
        registry.remove_session(session_id);
        registry
            .channels
            .entry(channel.to_string())
            .or_default()
            .insert(session_id, tx);
        registry.sessions.insert(session_id, channel.to_string());

        tracing::debug!("Session {} joined channel {}", session_id, channel);
        rx
    }

    /// Publishes an event to every session subscribed to the channel.
    ///
    /// Sessions whose receiver is gone are pruned. Returns the number of
    /// sessions the event was delivered to; zero when nobody is listening.
    pub async fn publish(&self, channel: &str, event: NotificationEvent) -> usize {
        let mut registry = self.inner.write().await;

        let Some(sessions) = registry.channels.get_mut(channel) else {
            return 0;
        };

        let mut dead = Vec::new();
        let mut delivered = 0;
        for (session_id, tx) in sessions.iter() {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*session_id);
            }
        }

        for session_id in dead {
            registry.remove_session(session_id);
        }

        tracing::debug!(
            "Published {:?} event to channel {} ({} sessions)",
            event.kind,
            channel,
            delivered
        );
        delivered
    }

    /// Removes a session from whatever channel it is subscribed to.
    /// Idempotent; called on connection teardown.
    pub async fn unsubscribe(&self, session_id: Uuid) {
        self.inner.write().await.remove_session(session_id);
    }
}

impl Registry {
    fn remove_session(&mut self, session_id: Uuid) {
        let Some(channel) = self.sessions.remove(&session_id) else {
            return;
        };
        if let Some(sessions) = self.channels.get_mut(&channel) {
            sessions.remove(&session_id);
            if sessions.is_empty() {
                self.channels.remove(&channel);
            }
        }
    }
}
