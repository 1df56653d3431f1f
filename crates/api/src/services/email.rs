//! Email service for guest notifications and staff magic links.
//!
//! Supports two providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses the SendGrid v3 API

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use domain::services::{ConfirmationNotice, GuestNotifier, NotificationResult, RejectionNotice};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::EmailConfig;
use crate::middleware::metrics::record_email;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Email service disabled")]
    Disabled,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

/// What a magic link is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicLinkKind {
    Invite,
    Login,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(subject = %message.subject, "Email service disabled, skipping send");
            return Err(EmailError::Disabled);
        }
        if !message.to.contains('@') {
            return Err(EmailError::InvalidAddress(message.to));
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send the "reservation confirmed" email.
    pub async fn send_confirmation_email(&self, notice: &ConfirmationNotice) -> Result<(), EmailError> {
        let result = self.send(self.confirmation_message(notice)).await;
        record_outcome("confirmation", &result);
        result
    }

    /// Send the "reservation not available" email.
    pub async fn send_rejection_email(&self, notice: &RejectionNotice) -> Result<(), EmailError> {
        let result = self.send(self.rejection_message(notice)).await;
        record_outcome("rejection", &result);
        result
    }

    /// Send a staff invite or login link.
    pub async fn send_magic_link(
        &self,
        to: &str,
        name: &str,
        token: &str,
        kind: MagicLinkKind,
        valid_for: &str,
    ) -> Result<(), EmailError> {
        let result = self
            .send(self.magic_link_message(to, name, token, kind, valid_for))
            .await;
        let label = match kind {
            MagicLinkKind::Invite => "invite",
            MagicLinkKind::Login => "login",
        };
        record_outcome(label, &result);
        result
    }

    /// Builds the callback URL carrying a magic link token.
    pub fn magic_link_url(&self, token: &str) -> String {
        format!(
            "{}/auth/callback?token={}",
            self.config.base_url.trim_end_matches('/'),
            token
        )
    }

    pub fn confirmation_message(&self, notice: &ConfirmationNotice) -> EmailMessage {
        let c = &self.config;
        let guest = format!("{} {}", notice.first_name, notice.last_name).trim().to_string();
        let long_date = long_date(notice.date);
        let time = shared::time_format::format(&notice.time);

        let body_text = format!(
            r#"{restaurant_upper} - RESERVATION CONFIRMED

Hi {guest},

Great news! Your reservation has been confirmed.

Reservation details:
Date: {short_date}
Time: {time}
Table: {table}

We look forward to serving you!

If you need to make changes to your reservation, please contact us:
Email: {contact_email}
Phone: {contact_phone}

{restaurant}
{address}"#,
            restaurant_upper = c.restaurant_name.to_uppercase(),
            guest = guest,
            short_date = short_date(notice.date),
            time = time,
            table = notice.table,
            contact_email = c.contact_email,
            contact_phone = c.contact_phone,
            restaurant = c.restaurant_name,
            address = c.address,
        );

        let content = format!(
            r#"<h2 style="color: #92400e; margin-top: 0;">Reservation Confirmed!</h2>
        <p>Hi {guest},</p>
        <p>Great news! Your reservation has been confirmed.</p>
        <div style="background: white; border: 1px solid #fde68a; border-radius: 8px; padding: 20px; margin: 24px 0;">
            <p style="margin: 4px 0;"><strong>Date:</strong> {date}</p>
            <p style="margin: 4px 0;"><strong>Time:</strong> {time}</p>
            <p style="margin: 4px 0;"><strong>Table:</strong> {table}</p>
        </div>
        <p>We look forward to serving you!</p>"#,
            guest = escape_html(&guest),
            date = long_date,
            time = time,
            table = escape_html(&notice.table),
        );

        EmailMessage {
            to: notice.to.clone(),
            to_name: Some(guest),
            subject: format!("🎉 Your Reservation is Confirmed - {}", c.restaurant_name),
            body_text,
            body_html: Some(self.html_layout("Reservation Confirmed", &content)),
        }
    }

    pub fn rejection_message(&self, notice: &RejectionNotice) -> EmailMessage {
        let c = &self.config;
        let guest = notice.guest_name();
        let time = shared::time_format::format(&notice.time);

        let body_text = format!(
            r#"{restaurant_upper} - RESERVATION UPDATE

Hi {guest},

We regret to inform you that your reservation request could not be confirmed.

Requested reservation:
Date: {short_date}
Time: {time}

We sincerely apologize for any inconvenience. You may want to:
- Try a different date or time
- Contact us directly for special arrangements
- Visit us during less busy hours

Email: {contact_email}
Phone: {contact_phone}

{restaurant}
{address}"#,
            restaurant_upper = c.restaurant_name.to_uppercase(),
            guest = guest,
            short_date = short_date(notice.date),
            time = time,
            contact_email = c.contact_email,
            contact_phone = c.contact_phone,
            restaurant = c.restaurant_name,
            address = c.address,
        );

        let content = format!(
            r#"<h2 style="color: #b91c1c; margin-top: 0;">Reservation Not Available</h2>
        <p>Hi {guest},</p>
        <p>We regret to inform you that your reservation request could not be confirmed.</p>
        <div style="background: white; border: 1px solid #fecaca; border-radius: 8px; padding: 20px; margin: 24px 0;">
            <p style="margin: 4px 0;"><strong>Requested date:</strong> {date}</p>
            <p style="margin: 4px 0;"><strong>Requested time:</strong> {time}</p>
        </div>
        <p>We sincerely apologize for any inconvenience. You may want to:</p>
        <ul>
            <li>Try a different date or time</li>
            <li>Contact us directly for special arrangements</li>
            <li>Visit us during less busy hours</li>
        </ul>"#,
            guest = escape_html(&guest),
            date = long_date(notice.date),
            time = time,
        );

        EmailMessage {
            to: notice.to.clone(),
            to_name: Some(guest),
            subject: format!("❌ Reservation Update - {}", c.restaurant_name),
            body_text,
            body_html: Some(self.html_layout("Reservation Update", &content)),
        }
    }

    pub fn magic_link_message(
        &self,
        to: &str,
        name: &str,
        token: &str,
        kind: MagicLinkKind,
        valid_for: &str,
    ) -> EmailMessage {
        let c = &self.config;
        let url = self.magic_link_url(token);
        let (subject, intro, button) = match kind {
            MagicLinkKind::Invite => (
                format!("You're invited to join {} staff", c.restaurant_name),
                format!(
                    "You have been invited to the {} staff portal. Click the link below to activate your account:",
                    c.restaurant_name
                ),
                "Accept Invite",
            ),
            MagicLinkKind::Login => (
                format!("Your sign-in link - {}", c.restaurant_name),
                "Click the link below to sign in to the staff portal:".to_string(),
                "Sign In",
            ),
        };

        let body_text = format!(
            r#"Hi {name},

{intro}

{url}

This link will expire in {valid_for} and can only be used once.

If you didn't expect this email, you can safely ignore it.

{restaurant}"#,
            name = name,
            intro = intro,
            url = url,
            valid_for = valid_for,
            restaurant = c.restaurant_name,
        );

        let content = format!(
            r#"<p>Hi {name},</p>
        <p>{intro}</p>
        <div style="text-align: center; margin: 30px 0;">
            <a href="{url}" style="background: #d97706; color: white; padding: 14px 28px; text-decoration: none; border-radius: 6px; font-weight: bold; display: inline-block;">{button}</a>
        </div>
        <p style="color: #666; font-size: 14px;">This link will expire in {valid_for} and can only be used once.</p>
        <p style="color: #666; font-size: 14px;">If you didn't expect this email, you can safely ignore it.</p>"#,
            name = escape_html(name),
            intro = escape_html(&intro),
            url = url,
            button = button,
            valid_for = valid_for,
        );

        EmailMessage {
            to: to.to_string(),
            to_name: Some(name.to_string()),
            subject,
            body_text,
            body_html: Some(self.html_layout(button, &content)),
        }
    }

    fn html_layout(&self, title: &str, content: &str) -> String {
        let c = &self.config;
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="font-family: Georgia, 'Times New Roman', serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: linear-gradient(135deg, #f59e0b 0%, #d97706 100%); padding: 30px; border-radius: 10px 10px 0 0; text-align: center;">
        <h1 style="color: white; margin: 0; font-size: 26px;">{restaurant}</h1>
        <p style="color: #fef3c7; margin: 4px 0 0;">Fine Dining Experience</p>
    </div>
    <div style="background: #fffbeb; padding: 30px;">
        {content}
        <hr style="border: none; border-top: 1px solid #fde68a; margin: 30px 0;">
        <p style="color: #666; font-size: 14px;">Questions? Contact us at <a href="mailto:{contact_email}" style="color: #d97706;">{contact_email}</a> or {contact_phone}.</p>
    </div>
    <div style="background: #292524; color: #a8a29e; padding: 20px; border-radius: 0 0 10px 10px; text-align: center; font-size: 12px;">
        <p style="margin: 0;">&copy; {year} {restaurant}. All rights reserved.</p>
        <p style="margin: 4px 0 0;">{address}</p>
    </div>
</body>
</html>"#,
            title = escape_html(title),
            restaurant = escape_html(&c.restaurant_name),
            content = content,
            contact_email = escape_html(&c.contact_email),
            contact_phone = escape_html(&c.contact_phone),
            year = chrono::Utc::now().year(),
            address = escape_html(&c.address),
        )
    }

    /// Console provider - logs email to console (for development).
    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );
        info!(body_text = %message.body_text, "Email body (plain text)");

        if let Some(html) = &message.body_html {
            debug!(body_html_length = html.len(), "Email body (HTML)");
        }

        Ok(())
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let mut recipient = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            recipient["name"] = serde_json::json!(name);
        }

        let mut content = vec![serde_json::json!({
            "type": "text/plain",
            "value": message.body_text
        })];
        if let Some(html) = &message.body_html {
            content.push(serde_json::json!({
                "type": "text/html",
                "value": html
            }));
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [recipient] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": content
        });

        let response = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %shared::crypto::mask_email(&message.to),
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "SendGrid API error");
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

fn record_outcome(kind: &'static str, result: &Result<(), EmailError>) {
    let outcome = match result {
        Ok(()) => "sent",
        Err(EmailError::Disabled) => "skipped",
        Err(_) => "failed",
    };
    record_email(kind, outcome);
}

fn to_notification(kind: &'static str, to: &str, result: Result<(), EmailError>) -> NotificationResult {
    match result {
        Ok(()) => NotificationResult::Sent,
        Err(EmailError::Disabled) => NotificationResult::Skipped,
        Err(e) => {
            warn!(
                kind,
                to = %shared::crypto::mask_email(to),
                error = %e,
                "Guest notification failed"
            );
            NotificationResult::Failed(e.to_string())
        }
    }
}

#[async_trait]
impl GuestNotifier for EmailService {
    async fn send_confirmation(&self, notice: &ConfirmationNotice) -> NotificationResult {
        to_notification(
            "confirmation",
            &notice.to,
            self.send_confirmation_email(notice).await,
        )
    }

    async fn send_rejection(&self, notice: &RejectionNotice) -> NotificationResult {
        to_notification(
            "rejection",
            &notice.to,
            self.send_rejection_email(notice).await,
        )
    }
}

/// `Saturday, June 1, 2030`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `6/1/2030`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Minimal escaping for text interpolated into HTML templates.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
