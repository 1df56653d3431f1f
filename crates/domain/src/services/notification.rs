//! Guest notification service.
//!
//! Provides abstractions for emailing guests about their reservation.
//! Delivery is best-effort: a failed send never undoes a committed change.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use validator::Validate;

/// Confirmation email contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConfirmationNotice {
    #[validate(email(message = "Invalid recipient email"))]
    pub to: String,
    pub first_name: String,
    pub last_name: String,
    pub date: NaiveDate,
    #[serde(with = "shared::time_format")]
    pub time: NaiveTime,
    /// Table description, e.g. "Table 4 (4 seats)".
    pub table: String,
}

/// Rejection (cancellation) email contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RejectionNotice {
    #[validate(email(message = "Invalid recipient email"))]
    pub to: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Full name, accepted instead of the name parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "shared::time_format")]
    pub time: NaiveTime,
}

impl RejectionNotice {
    pub fn guest_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
        }
    }
}

/// A notice produced by a reservation state change.
#[derive(Debug, Clone, PartialEq)]
pub enum GuestNotice {
    Confirmation(ConfirmationNotice),
    Rejection(RejectionNotice),
}

impl GuestNotice {
    pub fn recipient(&self) -> &str {
        match self {
            GuestNotice::Confirmation(n) => &n.to,
            GuestNotice::Rejection(n) => &n.to,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GuestNotice::Confirmation(_) => "confirmation",
            GuestNotice::Rejection(_) => "rejection",
        }
    }
}

/// Result of a notification send attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationResult {
    /// Notification was sent successfully.
    Sent,
    /// Sending failed (but was non-blocking).
    Failed(String),
    /// Nothing to send, or email delivery is disabled.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Failed,
    Skipped,
}

/// Notification outcome as reported to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationReport {
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<NotificationResult> for NotificationReport {
    fn from(result: NotificationResult) -> Self {
        match result {
            NotificationResult::Sent => Self {
                status: NotificationStatus::Sent,
                warning: None,
            },
            NotificationResult::Skipped => Self {
                status: NotificationStatus::Skipped,
                warning: None,
            },
            NotificationResult::Failed(reason) => Self {
                status: NotificationStatus::Failed,
                warning: Some(format!("Guest email could not be sent: {}", reason)),
            },
        }
    }
}

/// Sends reservation emails to guests.
#[async_trait::async_trait]
pub trait GuestNotifier: Send + Sync {
    /// Send a reservation confirmation.
    async fn send_confirmation(&self, notice: &ConfirmationNotice) -> NotificationResult;

    /// Send a rejection / cancellation notice.
    async fn send_rejection(&self, notice: &RejectionNotice) -> NotificationResult;

    async fn notify(&self, notice: &GuestNotice) -> NotificationResult {
        match notice {
            GuestNotice::Confirmation(n) => self.send_confirmation(n).await,
            GuestNotice::Rejection(n) => self.send_rejection(n).await,
        }
    }
}

/// Mock notifier for development and testing.
///
/// Records every notice it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct MockGuestNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<GuestNotice>>>,
}

impl MockGuestNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock notifier that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Notices recorded so far, including failed attempts.
    pub fn sent(&self) -> Vec<GuestNotice> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, notice: GuestNotice) -> NotificationResult {
        let recipient = notice.recipient().to_string();
        let kind = notice.kind();
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notice);
        }

        if self.simulate_failure {
            tracing::warn!(to = %recipient, kind, "Mock notifier simulating failure");
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(to = %recipient, kind, "Mock: Would send guest email");
        NotificationResult::Sent
    }
}

#[async_trait::async_trait]
impl GuestNotifier for MockGuestNotifier {
    async fn send_confirmation(&self, notice: &ConfirmationNotice) -> NotificationResult {
        self.record(GuestNotice::Confirmation(notice.clone()))
    }

    async fn send_rejection(&self, notice: &RejectionNotice) -> NotificationResult {
        self.record(GuestNotice::Rejection(notice.clone()))
    }
}
