//! Simulated notification channels.
//!
//! A [`Notifier`] validates the recipient for its channel and logs the
//! message instead of delivering it.

use flight_booking_core::environment::{IdGenerator, PrefixedIdGenerator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Notification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Recipient, subject or message is empty
    #[error("Recipient, subject, and message are required (missing {0})")]
    MissingField(&'static str),

    /// Recipient is not addressable on this channel
    #[error("Invalid {channel} recipient: {recipient}")]
    InvalidRecipient {
        /// Channel that rejected the recipient
        channel: Channel,
        /// Rejected recipient
        recipient: String,
    },

    /// Bulk send without recipients
    #[error("At least one recipient is required")]
    NoRecipients,
}

/// Delivery channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Email
    Email,
    /// Text message
    Sms,
    /// Mobile push
    Push,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Push => "PUSH",
        })
    }
}

/// What a notification is about
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// General message
    #[default]
    Standard,
    /// Booking confirmation or change
    Booking,
    /// Payment confirmation
    Payment,
    /// Refund confirmation
    Refund,
}

/// Outcome status of a send
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// Handed to the channel
    Sent,
    /// Bulk batch finished
    Completed,
}

/// Result of a single send
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    /// Channel-prefixed ID, e.g. `EMAIL-1A2B3C4D`
    pub notification_id: String,
    /// Always [`NotificationStatus::Sent`]
    pub status: NotificationStatus,
    /// Channel used
    pub channel: Channel,
    /// Who it went to
    pub recipient: String,
    /// What it was about
    pub kind: NotificationKind,
}

/// Result of a bulk send
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkNotificationReport {
    /// Always [`NotificationStatus::Completed`]
    pub status: NotificationStatus,
    /// Channel used
    pub channel: Channel,
    /// Recipients attempted
    pub total_recipients: usize,
    /// Sends that succeeded
    pub successfully_sent: usize,
    /// Sends that failed
    pub failed: usize,
}

/// A notification channel.
pub trait Notifier: Send + Sync {
    /// Channel this notifier sends on
    fn channel(&self) -> Channel;

    /// Hands one message to the channel and returns its notification ID.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::InvalidRecipient`] if the recipient is
    /// not valid for the channel.
    fn deliver(&self, recipient: &str, subject: &str, message: &str) -> Result<String, NotificationError>;

    /// Sends one notification after checking that no field is empty.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::MissingField`] for an empty field, or
    /// whatever [`Notifier::deliver`] returns.
    fn send_notification(
        &self,
        recipient: &str,
        subject: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<NotificationReceipt, NotificationError> {
        for (name, value) in [("recipient", recipient), ("subject", subject), ("message", message)] {
            if value.trim().is_empty() {
                return Err(NotificationError::MissingField(name));
            }
        }
        let notification_id = self.deliver(recipient, subject, message)?;
        Ok(NotificationReceipt {
            notification_id,
            status: NotificationStatus::Sent,
            channel: self.channel(),
            recipient: recipient.to_string(),
            kind,
        })
    }

    /// Sends the same notification to every recipient.
    ///
    /// Individual failures are logged and counted, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::NoRecipients`] if `recipients` is empty.
    fn send_bulk_notification(
        &self,
        recipients: &[String],
        subject: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<BulkNotificationReport, NotificationError> {
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }
        let mut sent = 0;
        for recipient in recipients {
            match self.send_notification(recipient, subject, message, kind) {
                Ok(_) => sent += 1,
                Err(error) => {
                    tracing::warn!(channel = %self.channel(), recipient, %error, "Skipping failed notification");
                },
            }
        }
        Ok(BulkNotificationReport {
            status: NotificationStatus::Completed,
            channel: self.channel(),
            total_recipients: recipients.len(),
            successfully_sent: sent,
            failed: recipients.len() - sent,
        })
    }
}

fn invalid(channel: Channel, recipient: &str) -> NotificationError {
    NotificationError::InvalidRecipient {
        channel,
        recipient: recipient.to_string(),
    }
}

/// ID source and sent counter shared by the simulators.
#[derive(Debug)]
struct Outbox {
    ids: PrefixedIdGenerator,
    sent: AtomicU64,
}

impl Outbox {
    fn new(channel: Channel) -> Self {
        Self {
            ids: PrefixedIdGenerator::new(channel.to_string()),
            sent: AtomicU64::new(0),
        }
    }

    fn next(&self) -> String {
        self.sent.fetch_add(1, Ordering::Relaxed);
        self.ids.next_id()
    }

    fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

/// Email over SMTP (simulated).
#[derive(Debug)]
pub struct EmailNotifier {
    smtp_server: String,
    port: u16,
    outbox: Outbox,
}

impl EmailNotifier {
    /// Creates a notifier relaying through `smtp_server:port`
    #[must_use]
    pub fn new(smtp_server: impl Into<String>, port: u16) -> Self {
        Self {
            smtp_server: smtp_server.into(),
            port,
            outbox: Outbox::new(Channel::Email),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(smtp_server: impl Into<String>, port: u16) -> Arc<dyn Notifier> {
        Arc::new(Self::new(smtp_server, port))
    }

    /// Emails handed to the relay so far
    #[must_use]
    pub fn notifications_sent(&self) -> u64 {
        self.outbox.sent()
    }
}

impl Notifier for EmailNotifier {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn deliver(&self, recipient: &str, subject: &str, message: &str) -> Result<String, NotificationError> {
        if !recipient.contains('@') {
            return Err(invalid(Channel::Email, recipient));
        }
        let id = self.outbox.next();
        tracing::info!(
            notification_id = %id,
            smtp_server = %self.smtp_server,
            port = self.port,
            recipient,
            subject,
            message_len = message.len(),
            "Email sent"
        );
        Ok(id)
    }
}

/// Text messages (simulated). Recipients need at least ten digits.
#[derive(Debug)]
pub struct SmsNotifier {
    api_key: String,
    outbox: Outbox,
}

impl SmsNotifier {
    const MIN_DIGITS: usize = 10;

    /// Creates a notifier authenticated with `api_key`
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            outbox: Outbox::new(Channel::Sms),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(api_key: impl Into<String>) -> Arc<dyn Notifier> {
        Arc::new(Self::new(api_key))
    }

    /// Messages sent so far
    #[must_use]
    pub fn notifications_sent(&self) -> u64 {
        self.outbox.sent()
    }
}

impl Notifier for SmsNotifier {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    fn deliver(&self, recipient: &str, subject: &str, message: &str) -> Result<String, NotificationError> {
        let digits = recipient.chars().filter(char::is_ascii_digit).count();
        if digits < Self::MIN_DIGITS {
            return Err(invalid(Channel::Sms, recipient));
        }
        let id = self.outbox.next();
        tracing::info!(
            notification_id = %id,
            authenticated = !self.api_key.is_empty(),
            recipient,
            subject,
            message_len = message.len(),
            "SMS sent"
        );
        Ok(id)
    }
}

/// Mobile push (simulated). Recipients are user or device IDs.
#[derive(Debug)]
pub struct PushNotifier {
    api_key: String,
    outbox: Outbox,
}

impl PushNotifier {
    /// Creates a notifier authenticated with `api_key`
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            outbox: Outbox::new(Channel::Push),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(api_key: impl Into<String>) -> Arc<dyn Notifier> {
        Arc::new(Self::new(api_key))
    }

    /// Pushes sent so far
    #[must_use]
    pub fn notifications_sent(&self) -> u64 {
        self.outbox.sent()
    }
}

impl Notifier for PushNotifier {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    fn deliver(&self, recipient: &str, subject: &str, message: &str) -> Result<String, NotificationError> {
        if recipient.trim().is_empty() {
            return Err(invalid(Channel::Push, recipient));
        }
        let id = self.outbox.next();
        tracing::info!(
            notification_id = %id,
            authenticated = !self.api_key.is_empty(),
            recipient,
            subject,
            message_len = message.len(),
            "Push notification sent"
        );
        Ok(id)
    }
}
