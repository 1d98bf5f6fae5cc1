// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Implements the local (no network) checks of the contact pipeline:
//! - Honeypot detection
//! - Required field presence
//! - Spam heuristic
//! - Email address syntax

use crate::contact::ContactSubmission;
use crate::spam::{SpamFilter, SpamReason};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Validation error types. The display text is what the sender sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields and complete the captcha.")]
    MissingFields(Vec<&'static str>),

    #[error("Your message was flagged as spam. Please revise it and try again.")]
    Spam(SpamReason),

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission passed the check
    Valid,
    /// Submission failed the check
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Contact submission validator.
pub struct SubmissionValidator {
    spam: SpamFilter,
}

impl SubmissionValidator {
    /// Create a new validator with the given spam filter.
    pub fn new(spam: SpamFilter) -> Self {
        Self { spam }
    }

    /// True when the hidden decoy field was filled in, which only bots do.
    pub fn is_honeypot_filled(&self, submission: &ContactSubmission) -> bool {
        !submission.honeypot.is_empty()
    }

    /// Check that every visible field and the captcha token are present.
    pub fn validate_required(&self, submission: &ContactSubmission) -> ValidationResult {
        let fields = [
            ("name", &submission.name),
            ("email", &submission.email),
            ("subject", &submission.subject),
            ("message", &submission.message),
            ("captcha", &submission.captcha_token),
        ];

        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if missing.is_empty() {
            ValidationResult::Valid
        } else {
            debug!(missing = ?missing, "Missing required fields");
            ValidationResult::Invalid(ValidationError::MissingFields(missing))
        }
    }

    /// Run the spam heuristic over subject and message.
    pub fn validate_content(&self, submission: &ContactSubmission) -> ValidationResult {
        match self.spam.classify(&submission.subject, &submission.message) {
            Some(reason) => ValidationResult::Invalid(ValidationError::Spam(reason)),
            None => ValidationResult::Valid,
        }
    }

    /// Check the sender address has the `local@domain.tld` shape.
    pub fn validate_email(&self, submission: &ContactSubmission) -> ValidationResult {
        if is_valid_email(&submission.email) {
            ValidationResult::Valid
        } else {
            debug!(email = %submission.email, "Invalid email format");
            ValidationResult::Invalid(ValidationError::InvalidEmail)
        }
    }
}

/// Simple `local@domain.tld` syntax check; deliverability is the MX lookup's job.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(email)
}
