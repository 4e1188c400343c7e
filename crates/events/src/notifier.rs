//! Background subscriber that turns sign-off requests into emails.
//!
//! [`ApprovalNotifier`] listens on the [`EventBus`](crate::bus::EventBus)
//! and, for every `approval.requested` event, mails the stakeholder a link
//! to the public sign-off page. Other events are ignored. The loop exits
//! when the bus is dropped.

use tokio::sync::broadcast;

use crate::bus::{event_types, DomainEvent};
use crate::delivery::email::{Mailer, OutgoingEmail};

/// Mails stakeholder sign-off requests.
pub struct ApprovalNotifier<M> {
    mailer: Option<M>,
    base_url: String,
}

impl<M: Mailer> ApprovalNotifier<M> {
    /// With `mailer = None` requests are only logged.
    pub fn new(mailer: Option<M>, base_url: impl Into<String>) -> Self {
        Self {
            mailer,
            base_url: base_url.into(),
        }
    }

    /// Run until the event bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Approval notifier lagged, events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, approval notifier shutting down");
                    break;
                }
            }
        }
    }

    async fn handle(&self, event: &DomainEvent) {
        if !event.is(event_types::APPROVAL_REQUESTED) {
            return;
        }

        let Some(email) = self.compose(event) else {
            tracing::warn!(payload = %event.payload, "Malformed approval.requested payload");
            return;
        };

        match &self.mailer {
            Some(mailer) => {
                if let Err(e) = mailer.send(&email).await {
                    tracing::error!(error = %e, to = %email.to, "Failed to send approval request");
                }
            }
            None => {
                tracing::info!(to = %email.to, "Email disabled, approval request not sent");
            }
        }
    }

    /// Build the request email from an `approval.requested` payload.
    pub fn compose(&self, event: &DomainEvent) -> Option<OutgoingEmail> {
        let payload = &event.payload;
        let to = payload.get("email_to")?.as_str()?;
        let uuid = payload.get("approval_uuid")?.as_str()?;
        let title = payload.get("release_title")?.as_str()?;
        let requested_by = payload
            .get("requested_by")
            .and_then(|v| v.as_str())
            .unwrap_or("a colleague");

        let link = format!("{}/approvals/{uuid}", self.base_url.trim_end_matches('/'));
        Some(OutgoingEmail {
            to: to.to_string(),
            subject: format!("Approval requested: {title}"),
            body: format!(
                "{requested_by} has asked you to review the press release \"{title}\".\n\n\
                 Approve or decline it here:\n{link}\n"
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::bus::EventBus;
    use crate::delivery::email::EmailError;

    #[derive(Clone, Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn requested_event() -> DomainEvent {
        DomainEvent::new(event_types::APPROVAL_REQUESTED).with_payload(serde_json::json!({
            "approval_uuid": "5b1f8f0e-8d7e-4a43-9d0e-3f3c2f0a9b11",
            "email_to": "cfo@acme.test",
            "requested_by": "author@acme.test",
            "release_title": "Acme Q3 Results",
        }))
    }

    #[test]
    fn compose_builds_sign_link() {
        let notifier = ApprovalNotifier::new(None::<RecordingMailer>, "https://app.test/");
        let email = notifier.compose(&requested_event()).unwrap();

        assert_eq!(email.to, "cfo@acme.test");
        assert_eq!(email.subject, "Approval requested: Acme Q3 Results");
        assert!(email
            .body
            .contains("https://app.test/approvals/5b1f8f0e-8d7e-4a43-9d0e-3f3c2f0a9b11"));
        assert!(email.body.contains("author@acme.test"));
    }

    #[test]
    fn compose_rejects_incomplete_payload() {
        let notifier = ApprovalNotifier::new(None::<RecordingMailer>, "https://app.test");
        let event = DomainEvent::new(event_types::APPROVAL_REQUESTED)
            .with_payload(serde_json::json!({"email_to": "cfo@acme.test"}));
        assert!(notifier.compose(&event).is_none());
    }

    #[tokio::test]
    async fn run_sends_only_approval_requests_and_stops_on_close() {
        let mailer = RecordingMailer::default();
        let sent = Arc::clone(&mailer.sent);
        let bus = EventBus::default();
        let notifier = ApprovalNotifier::new(Some(mailer), "https://app.test");
        let handle = tokio::spawn(notifier.run(bus.subscribe()));

        bus.publish(DomainEvent::new(event_types::RELEASE_CREATED));
        bus.publish(requested_event());
        drop(bus);

        handle.await.expect("notifier task should finish");
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "cfo@acme.test");
    }
}
