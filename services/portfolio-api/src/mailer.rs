// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outgoing mail: the owner notification and the sender's confirmation.
//!
//! Both messages go through one SMTP transport. Templates are plain
//! functions producing an [`OutgoingEmail`] so they can be inspected without
//! a relay.

use crate::config::{ContactConfig, SmtpConfig};
use crate::contact::ContactSubmission;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const NOTIFICATION_SUBJECT_PREFIX: &str = "Portfolio Contact: ";
pub const CONFIRMATION_SUBJECT: &str = "Thank you for reaching out!";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP user is not configured")]
    MissingSender,

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A message ready to hand to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Display name on the From header; the address is the relay's user
    pub from_name: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: String,
}

/// Delivers outgoing messages.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// SMTP relay mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Option<String>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };
        let mut builder = builder.port(config.port);

        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            sender: config.user.clone(),
        })
    }
}

/// Assemble a lettre message sent from the relay account `sender`.
///
/// A Reply-To the relay cannot parse is dropped rather than failing the send.
pub fn build_message(sender: Option<&str>, email: OutgoingEmail) -> Result<Message, MailError> {
    let sender = sender.ok_or(MailError::MissingSender)?;

    let mut builder = Message::builder()
        .from(Mailbox::new(Some(email.from_name), sender.parse()?))
        .to(Mailbox::new(None, email.to.parse()?))
        .subject(email.subject);

    if let Some(reply_to) = email.reply_to {
        match reply_to.parse() {
            Ok(address) => builder = builder.reply_to(Mailbox::new(None, address)),
            Err(e) => warn!(reply_to = %reply_to, error = %e, "Dropping unparsable Reply-To"),
        }
    }

    let message = match email.text {
        Some(text) => builder.multipart(MultiPart::alternative_plain_html(text, email.html))?,
        None => builder.singlepart(SinglePart::html(email.html))?,
    };
    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let to = email.to.clone();
        let message = build_message(self.sender.as_deref(), email)?;
        let response = self.transport.send(message).await?;
        info!(to = %to, code = %response.code(), "Mail accepted by relay");
        Ok(())
    }
}

/// Message to the site owner carrying the submission.
pub fn notification_email(submission: &ContactSubmission, contact: &ContactConfig) -> OutgoingEmail {
    let ContactSubmission {
        name,
        email,
        subject,
        message,
        ..
    } = submission;

    let text = format!(
        "Name: {name}\nEmail: {email}\nSubject: {subject}\n\nMessage:\n{message}\n"
    );

    let (name, email, subject) = (escape_html(name), escape_html(email), escape_html(subject));
    let body = html_paragraphs(message);
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px;">New Contact Form Submission</h2>
  <div style="background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin: 20px 0;">
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
    <p><strong>Subject:</strong> {subject}</p>
  </div>
  <div style="background-color: #ffffff; padding: 20px; border: 1px solid #dee2e6; border-radius: 5px;">
    <h3 style="color: #333; margin-top: 0;">Message:</h3>
    <p style="line-height: 1.6; color: #555;">{body}</p>
  </div>
  <div style="margin-top: 20px; padding: 10px; background-color: #e9ecef; border-radius: 5px; font-size: 12px; color: #6c757d;">
    <p>This email was sent from your portfolio contact form.</p>
  </div>
</div>"#
    );

    debug!(to = %contact.recipient, "Built notification email");
    OutgoingEmail {
        from_name: submission.name.clone(),
        to: contact.recipient.clone(),
        reply_to: Some(submission.email.clone()),
        subject: format!("{NOTIFICATION_SUBJECT_PREFIX}{}", submission.subject),
        text: Some(text),
        html,
    }
}

/// Auto-reply to the sender echoing their message.
pub fn confirmation_email(submission: &ContactSubmission, contact: &ContactConfig) -> OutgoingEmail {
    let name = escape_html(&submission.name);
    let body = html_paragraphs(&submission.message);
    let owner = escape_html(&contact.owner_name);
    let site = escape_html(&contact.site_url);

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px;">Thank You for Reaching Out!</h2>
  <div style="background-color: #ffffff; padding: 20px; border: 1px solid #dee2e6; border-radius: 5px;">
    <h3 style="color: #333; margin-top: 0;">You sent me:</h3>
    <p style="line-height: 1.6; color: #555;">{body}</p>
  </div>
  <br/>
  <p>Hi {name},</p>
  <p>Thank you for contacting me through my portfolio website. I appreciate you taking the time to reach out.</p>
  <p>I have received your message and will get back to you as soon as possible. In the meantime, feel free to explore my projects and skills on my website.</p>
  <p>Best regards,<br/>{owner}</p>
  <div style="margin-top: 20px; padding: 10px; background-color: #e9ecef; border-radius: 5px; font-size: 12px; color: #6c757d;">
    <p>This is an automated confirmation email for your contact form submission on <a href="{site}">my portfolio website</a>.</p>
  </div>
</div>"#
    );

    OutgoingEmail {
        from_name: contact.owner_name.clone(),
        to: submission.email.clone(),
        reply_to: None,
        subject: CONFIRMATION_SUBJECT.to_string(),
        text: None,
        html,
    }
}

/// Escape text for an HTML body and turn newlines into `<br>`.
fn html_paragraphs(text: &str) -> String {
    escape_html(&text.replace("\r\n", "\n")).replace('\n', "<br>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
