//! Session state change events.
//!
//! Rendering layers subscribe here instead of being called from inside the
//! session logic.

use tokio::sync::broadcast;

/// Events broadcast when the stored session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A sign-in or sign-up stored a new credential.
    SignedIn { user: String },
    /// The user signed out explicitly.
    SignedOut,
    /// The API rejected the stored token and the session was cleared.
    Invalidated,
}

impl SessionEvent {
    /// Get a description of the event for logging.
    pub fn description(&self) -> String {
        match self {
            Self::SignedIn { user } => format!("Signed in as {}", user),
            Self::SignedOut => "Signed out".to_string(),
            Self::Invalidated => "Session invalidated by the server".to_string(),
        }
    }

    /// Whether the session is gone after this event.
    #[inline]
    pub fn is_sign_out(&self) -> bool {
        matches!(self, Self::SignedOut | Self::Invalidated)
    }
}

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Broadcaster for [`SessionEvent`]s.
#[derive(Clone)]
pub struct SessionEventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event.
    ///
    /// Returns the number of receivers that received the event.
    pub fn publish(&self, event: SessionEvent) -> usize {
        tracing::debug!("Publishing session event: {}", event.description());
        // send() returns Err if there are no receivers, which is fine
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = SessionEventBus::new();
        assert_eq!(bus.publish(SessionEvent::SignedOut), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let bus = SessionEventBus::new();
        let mut rx = bus.subscribe();
        let clone = bus.clone();

        clone.publish(SessionEvent::SignedIn { user: "A".into() });
        bus.publish(SessionEvent::Invalidated);

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::SignedIn { user: "A".into() }
        );
        let next = rx.recv().await.unwrap();
        assert!(next.is_sign_out());
    }
}
