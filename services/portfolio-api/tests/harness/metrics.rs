// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for contact form traffic simulations.

use portfolio_api::{
    captcha,
    contact::{INVALID_DOMAIN_MESSAGE, SEND_FAILED_MESSAGE},
    SubmissionResult,
};
use std::collections::HashMap;
use std::fmt;

/// Where a submission ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Mail went out
    Delivered,
    /// Reported success without sending anything
    SilentlyDropped,
    MissingFields,
    Spam,
    CaptchaRejected,
    InvalidEmail,
    InvalidDomain,
    SendFailed,
}

impl Outcome {
    /// Classify a result given how many mails the submission caused.
    pub fn classify(result: &SubmissionResult, mails_sent: usize) -> Self {
        if result.success {
            return if mails_sent > 0 {
                Outcome::Delivered
            } else {
                Outcome::SilentlyDropped
            };
        }

        let message = result.message.as_str();
        if message.starts_with("Please fill in all fields") {
            Outcome::MissingFields
        } else if message.contains("flagged as spam") {
            Outcome::Spam
        } else if message == "Please enter a valid email address." {
            Outcome::InvalidEmail
        } else if message == INVALID_DOMAIN_MESSAGE {
            Outcome::InvalidDomain
        } else if message == SEND_FAILED_MESSAGE {
            Outcome::SendFailed
        } else if [
            captcha::DEFAULT_FAILURE,
            captcha::TIMED_OUT,
            captcha::EXPIRED_OR_REUSED,
            captcha::INVALID,
            captcha::NOT_CONFIGURED,
            captcha::UNAVAILABLE,
        ]
        .contains(&message)
        {
            Outcome::CaptchaRejected
        } else {
            panic!("unexpected submission message: {message}")
        }
    }

    pub fn is_blocked(self) -> bool {
        !matches!(self, Outcome::Delivered)
    }
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct SubmissionMetrics {
    outcomes: HashMap<Outcome, usize>,
    requests_per_ip: HashMap<String, usize>,
}

impl SubmissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome, ip: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_ip.entry(ip.to_string()).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn blocked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_blocked())
            .map(|(_, n)| n)
            .sum()
    }

    pub fn unique_ips(&self) -> usize {
        self.requests_per_ip.len()
    }
}

impl fmt::Display for SubmissionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Submission Simulation ===")?;
        writeln!(f, "Total submissions: {}", self.total())?;
        writeln!(f, "Unique IPs:        {}", self.unique_ips())?;
        writeln!(f, "Blocked:           {}", self.blocked())?;
        for outcome in [
            Outcome::Delivered,
            Outcome::SilentlyDropped,
            Outcome::MissingFields,
            Outcome::Spam,
            Outcome::CaptchaRejected,
            Outcome::InvalidEmail,
            Outcome::InvalidDomain,
            Outcome::SendFailed,
        ] {
            writeln!(f, "  {:<16} {}", format!("{outcome:?}"), self.count(outcome))?;
        }
        Ok(())
    }
}
