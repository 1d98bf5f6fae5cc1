// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form submission pipeline.
//!
//! Steps run strictly in order and stop at the first failure:
//!
//! 1. honeypot (bots get a fake success)
//! 2. required fields
//! 3. spam heuristic
//! 4. captcha
//! 5. email syntax
//! 6. MX record
//! 7. notification to the owner
//! 8. confirmation to the sender (best-effort)

use crate::captcha::{self, CaptchaProvider};
use crate::config::ContactConfig;
use crate::dns::{self, DnsResolver};
use crate::mailer::{self, Mailer};
use crate::validator::{SubmissionValidator, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const SUCCESS_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";
pub const INVALID_DOMAIN_MESSAGE: &str =
    "The email domain does not seem valid. Please use a different email address.";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send email. Please try again later.";

/// One contact form post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Token issued by the Turnstile widget
    #[serde(default, rename = "cf-turnstile-response")]
    pub captcha_token: String,
    /// Hidden decoy input; humans leave it empty
    #[serde(default, rename = "website_url")]
    pub honeypot: String,
    /// Filled by the HTTP layer, never by the form
    #[serde(skip)]
    pub client_ip: Option<String>,
}

/// What the form renders after a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
}

impl SubmissionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for SubmissionResult {
    fn from(err: ValidationError) -> Self {
        Self::rejected(err.to_string())
    }
}

/// Orchestrates validation, verification and delivery of submissions.
pub struct ContactService {
    validator: SubmissionValidator,
    captcha: Arc<dyn CaptchaProvider>,
    resolver: Arc<dyn DnsResolver>,
    mailer: Arc<dyn Mailer>,
    config: ContactConfig,
}

impl ContactService {
    pub fn new(
        validator: SubmissionValidator,
        captcha: Arc<dyn CaptchaProvider>,
        resolver: Arc<dyn DnsResolver>,
        mailer: Arc<dyn Mailer>,
        config: ContactConfig,
    ) -> Self {
        Self {
            validator,
            captcha,
            resolver,
            mailer,
            config,
        }
    }

    /// Run a submission through the pipeline. Never fails: every problem is
    /// reported as an unsuccessful [`SubmissionResult`].
    pub async fn submit(&self, submission: ContactSubmission) -> SubmissionResult {
        let ip = submission.client_ip.as_deref().unwrap_or("unknown");

        if self.validator.is_honeypot_filled(&submission) {
            // Report success so the bot learns nothing.
            warn!(ip = %ip, "Honeypot field filled, dropping submission");
            return SubmissionResult::ok();
        }

        if let ValidationResult::Invalid(err) = self.validator.validate_required(&submission) {
            info!(ip = %ip, error = ?err, "Incomplete submission");
            return err.into();
        }

        if let ValidationResult::Invalid(err) = self.validator.validate_content(&submission) {
            if let ValidationError::Spam(reason) = &err {
                warn!(ip = %ip, email = %submission.email, reason = %reason, "Submission flagged as spam");
            }
            return err.into();
        }

        let verification = self
            .captcha
            .verify(&submission.captcha_token, submission.client_ip.as_deref())
            .await;
        if !verification.success {
            info!(ip = %ip, message = ?verification.message, "Captcha verification failed");
            return SubmissionResult::rejected(
                verification
                    .message
                    .unwrap_or_else(|| captcha::DEFAULT_FAILURE.to_string()),
            );
        }

        if let ValidationResult::Invalid(err) = self.validator.validate_email(&submission) {
            info!(ip = %ip, "Malformed email address");
            return err.into();
        }

        if !dns::has_valid_mx_record(self.resolver.as_ref(), &submission.email).await {
            info!(ip = %ip, email = %submission.email, "Email domain has no MX record");
            return SubmissionResult::rejected(INVALID_DOMAIN_MESSAGE);
        }

        let notification = mailer::notification_email(&submission, &self.config);
        if let Err(e) = self.mailer.send(notification).await {
            error!(error = %e, "Failed to send notification email");
            return SubmissionResult::rejected(SEND_FAILED_MESSAGE);
        }
        info!(ip = %ip, email = %submission.email, "Contact submission delivered");

        let confirmation = mailer::confirmation_email(&submission, &self.config);
        match self.mailer.send(confirmation).await {
            Ok(()) => debug!(to = %submission.email, "Confirmation email sent"),
            Err(e) => error!(error = %e, to = %submission.email, "Failed to send confirmation email"),
        }

        SubmissionResult::ok()
    }
}
