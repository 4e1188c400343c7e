//! Fan-out of domain events from request handlers to background
//! subscribers over a `tokio::sync::broadcast` channel.
//!
//! Publishing never blocks a request. Events are not persisted: a subscriber
//! that falls more than the channel capacity behind loses the oldest ones.

use chrono::{DateTime, Utc};
use pressroom_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event names published by the API.
pub mod event_types {
    pub const RELEASE_CREATED: &str = "release.created";
    pub const RELEASE_DELETED: &str = "release.deleted";
    pub const RELEASE_STATUS_CHANGED: &str = "release.status_changed";
    pub const RELEASE_UPGRADED: &str = "release.upgraded";
    pub const APPROVAL_REQUESTED: &str = "approval.requested";
    pub const APPROVAL_SIGNED: &str = "approval.signed";
    pub const CREDITS_GRANTED: &str = "credits.granted";
}

/// The row an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Table-level kind such as `"release"` or `"user"`.
    pub kind: String,
    pub id: DbId,
}

/// Something that happened, as seen by subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// One of [`event_types`].
    pub event_type: String,
    pub subject: Option<Subject>,
    /// User who caused the event. `None` for unauthenticated stakeholders.
    pub actor_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            subject: None,
            actor_id: None,
            payload: serde_json::json!({}),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_source(mut self, kind: impl Into<String>, id: DbId) -> Self {
        self.subject = Some(Subject {
            kind: kind.into(),
            id,
        });
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}

const DEFAULT_CAPACITY: usize = 256;

pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Hand `event` to every live subscriber. With none attached the event
    /// is dropped.
    pub fn publish(&self, event: DomainEvent) {
        match self.sender.send(event) {
            Ok(receivers) => tracing::trace!(receivers, "Event published"),
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(event_type = %event.event_type, "Event dropped, no subscribers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn subscriber_sees_subject_actor_and_payload() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            DomainEvent::new(event_types::RELEASE_CREATED)
                .with_source("release", 42)
                .with_actor(7)
                .with_payload(serde_json::json!({ "company_id": 3 })),
        );

        let event = rx.recv().await.unwrap();
        assert!(event.is(event_types::RELEASE_CREATED));
        assert_eq!(
            event.subject,
            Some(Subject {
                kind: "release".to_string(),
                id: 42
            })
        );
        assert_eq!(event.actor_id, Some(7));
        assert_eq!(event.payload["company_id"], 3);
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_copy() {
        let bus = EventBus::default();
        let mut notifier = bus.subscribe();
        let mut audit = bus.subscribe();

        bus.publish(DomainEvent::new(event_types::CREDITS_GRANTED));

        assert!(notifier.recv().await.unwrap().is(event_types::CREDITS_GRANTED));
        assert!(audit.recv().await.unwrap().is(event_types::CREDITS_GRANTED));
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for _ in 0..3 {
            bus.publish(DomainEvent::new(event_types::RELEASE_UPGRADED));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
    }

    #[test]
    fn publishing_with_nobody_listening_is_fine() {
        EventBus::default().publish(DomainEvent::new(event_types::RELEASE_DELETED));
    }
}
