//! Pressroom event bus and outbound notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] -- the domain event envelope published by handlers.
//! - [`delivery`] -- outbound channels (SMTP email).
//! - [`ApprovalNotifier`] -- background subscriber that mails stakeholder
//!   sign-off requests.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{event_types, DomainEvent, EventBus, Subject};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, Mailer, OutgoingEmail};
pub use notifier::ApprovalNotifier;
