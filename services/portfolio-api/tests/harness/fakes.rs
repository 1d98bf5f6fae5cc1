// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for the contact pipeline's outside dependencies.

use async_trait::async_trait;
use hickory_resolver::error::ResolveError;
use portfolio_api::{
    captcha::{CaptchaProvider, CaptchaVerification},
    config::ContactConfig,
    contact::ContactService,
    dns::{DnsError, DnsResolver, MxRecord},
    mailer::{MailError, Mailer, OutgoingEmail},
    spam::SpamFilter,
    validator::SubmissionValidator,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every message instead of delivering it.
#[derive(Debug, Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    attempts: AtomicUsize,
    fail_to: Vec<String>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse any message addressed to `recipient`.
    pub fn failing_for(recipient: &str) -> Self {
        Self {
            fail_to: vec![recipient.to_string()],
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Messages that were accepted, in send order.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_to.contains(&email.to) {
            return Err(MailError::MissingSender);
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Answers MX lookups from a fixed table. Unknown domains fail to resolve.
#[derive(Debug, Default)]
pub struct FakeResolver {
    records: HashMap<String, Vec<MxRecord>>,
    lookups: AtomicUsize,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mx(mut self, domain: &str, exchange: &str) -> Self {
        self.records
            .entry(domain.to_string())
            .or_default()
            .push(MxRecord {
                preference: 10,
                exchange: exchange.to_string(),
            });
        self
    }

    /// A domain that resolves but publishes no mail exchangers.
    pub fn without_mx(mut self, domain: &str) -> Self {
        self.records.insert(domain.to_string(), Vec::new());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for FakeResolver {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(domain)
            .cloned()
            .ok_or_else(|| DnsError::Resolve(ResolveError::from("no such domain")))
    }
}

/// Captcha provider with a canned verdict.
#[derive(Debug)]
pub struct FakeCaptcha {
    verdict: CaptchaVerification,
    calls: AtomicUsize,
    last_ip: Mutex<Option<String>>,
}

impl FakeCaptcha {
    pub fn passing() -> Self {
        Self::with_verdict(CaptchaVerification::passed())
    }

    pub fn failing(message: &str) -> Self {
        Self::with_verdict(CaptchaVerification::failed(message))
    }

    pub fn with_verdict(verdict: CaptchaVerification) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
            last_ip: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_ip(&self) -> Option<String> {
        self.last_ip.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptchaProvider for FakeCaptcha {
    async fn verify(&self, _token: &str, remote_ip: Option<&str>) -> CaptchaVerification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_ip.lock().unwrap() = remote_ip.map(String::from);
        self.verdict.clone()
    }
}

/// A contact service wired to fakes, with handles kept for assertions.
pub struct Pipeline {
    pub service: ContactService,
    pub captcha: Arc<FakeCaptcha>,
    pub resolver: Arc<FakeResolver>,
    pub mailer: Arc<FakeMailer>,
    pub contact: ContactConfig,
}

impl Pipeline {
    pub fn new(captcha: FakeCaptcha, resolver: FakeResolver, mailer: FakeMailer) -> Self {
        let captcha = Arc::new(captcha);
        let resolver = Arc::new(resolver);
        let mailer = Arc::new(mailer);
        let contact = contact_config();

        let service = ContactService::new(
            SubmissionValidator::new(SpamFilter::default()),
            captcha.clone(),
            resolver.clone(),
            mailer.clone(),
            contact.clone(),
        );

        Self {
            service,
            captcha,
            resolver,
            mailer,
            contact,
        }
    }

    /// Passing captcha, `example.com` accepts mail, delivery succeeds.
    pub fn healthy() -> Self {
        Self::new(
            FakeCaptcha::passing(),
            FakeResolver::new().with_mx("example.com", "mx.example.com"),
            FakeMailer::new(),
        )
    }
}

pub fn contact_config() -> ContactConfig {
    ContactConfig {
        recipient: "owner@portfolio.test".to_string(),
        owner_name: "Site Owner".to_string(),
        site_url: "https://portfolio.test".to_string(),
    }
}
