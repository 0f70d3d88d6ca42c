//! Outbound side effects.
//!
//! Services publish [`DomainEvent`]s on an unbounded channel and move on; a
//! dispatcher task turns them into emails and hands them to a [`Mailer`].
//! Delivery failures are logged and never reach the caller that produced the
//! event.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BookingRequested {
        appointment_id: Uuid,
        salon_name: String,
        service_name: String,
        client_name: String,
        client_email: String,
        start_time: DateTime<Utc>,
    },
    BookingConfirmed {
        appointment_id: Uuid,
        salon_name: String,
        service_name: String,
        client_name: String,
        client_email: Option<String>,
        start_time: DateTime<Utc>,
    },
    StaffInvited {
        staff_id: Uuid,
        email: String,
        inviter_name: String,
        salon_name: String,
        #[serde(skip_serializing)]
        invitation_token: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::BookingRequested { .. } => "booking_requested",
            DomainEvent::BookingConfirmed { .. } => "booking_confirmed",
            DomainEvent::StaffInvited { .. } => "staff_invited",
        }
    }

    /// Renders the email for this event, if it has a recipient.
    pub fn to_email(&self) -> Option<OutboundEmail> {
        match self {
            DomainEvent::BookingRequested {
                salon_name,
                service_name,
                client_name,
                client_email,
                start_time,
                ..
            } => Some(OutboundEmail {
                to: client_email.clone(),
                subject: format!("Your booking request - {salon_name}"),
                body: format!(
                    "Hello {client_name},\n\nWe received your request for {service_name} at {salon_name} on {}.\nThe salon will confirm it shortly.",
                    start_time.format("%A %d %B at %H:%M")
                ),
            }),
            DomainEvent::BookingConfirmed {
                salon_name,
                service_name,
                client_name,
                client_email,
                start_time,
                ..
            } => client_email.as_ref().map(|to| OutboundEmail {
                to: to.clone(),
                subject: format!("Booking confirmation - {salon_name}"),
                body: format!(
                    "Hello {client_name},\n\nYour appointment for {service_name} at {salon_name} is confirmed for {}.\nSee you soon!",
                    start_time.format("%A %d %B at %H:%M")
                ),
            }),
            DomainEvent::StaffInvited {
                email,
                inviter_name,
                salon_name,
                invitation_token,
                ..
            } => Some(OutboundEmail {
                to: email.clone(),
                subject: format!("Invitation to join {salon_name}"),
                body: format!(
                    "Hello,\n\n{inviter_name} invites you to join the team of {salon_name}.\nActivate your account with this email address and the invitation code below.\n\n{invitation_token}"
                ),
            }),
        }
    }
}

#[derive(Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl EventPublisher {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn publish(&self, event: DomainEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            tracing::warn!(event = name, "event dropped: dispatcher is not running");
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()>;
}

/// Writes emails to the log instead of delivering them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, subject = %email.subject, "email dispatched");
        Ok(())
    }
}

pub fn spawn_mail_dispatcher(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    mailer: Arc<dyn Mailer>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Some(email) = event.to_email() else {
                tracing::debug!(event = event.name(), "event has no recipient");
                continue;
            };
            if let Err(err) = mailer.send(&email).await {
                tracing::warn!(error = %err, event = event.name(), to = %email.to, "email delivery failed");
            }
        }
        tracing::info!("mail dispatcher stopped");
    })
}
