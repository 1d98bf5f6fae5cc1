// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio API
//!
//! Server side of the portfolio site:
//!
//! - Contact form relay with bot mitigation (honeypot, spam heuristic,
//!   Turnstile captcha, MX check) and SMTP delivery
//! - GitHub public repository listing with normalized pagination
//! - OpenGraph preview image lookup for project links

pub mod captcha;
pub mod config;
pub mod contact;
pub mod dns;
pub mod error;
pub mod github;
pub mod handlers;
pub mod mailer;
pub mod opengraph;
pub mod spam;
pub mod validator;

pub use config::Config;
pub use contact::{ContactService, ContactSubmission, SubmissionResult};
pub use handlers::{router, AppState};
pub use spam::SpamFilter;
pub use validator::{SubmissionValidator, ValidationError, ValidationResult};
