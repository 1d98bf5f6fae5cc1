// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! MX record checks for sender domains.

use crate::config::DnsConfig;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DnsError {
    #[error("MX lookup failed: {0}")]
    Resolve(#[from] hickory_resolver::error::ResolveError),
}

/// A mail exchange record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

/// Resolves mail exchangers for a domain.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;
}

/// Resolver backed by hickory.
pub struct HickoryResolver {
    inner: TokioAsyncResolver,
}

impl HickoryResolver {
    /// Build a resolver from the host's resolv.conf, falling back to public
    /// upstreams when the system configuration can't be read.
    pub fn new(config: &DnsConfig) -> Self {
        let (resolver_config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(system) => system,
            Err(e) => {
                debug!(error = %e, "System resolver config unavailable, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = config.timeout();
        opts.attempts = config.attempts;

        Self {
            inner: TokioAsyncResolver::tokio(resolver_config, opts),
        }
    }
}

#[async_trait]
impl DnsResolver for HickoryResolver {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        let lookup = self.inner.mx_lookup(fully_qualified(domain)).await?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord {
                preference: mx.preference(),
                exchange: mx.exchange().to_utf8(),
            })
            .collect())
    }
}

/// Absolute form of `domain`, so resolv.conf `search` suffixes are never tried.
pub fn fully_qualified(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// Domain part of an address, if there is a non-empty one.
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim())
        .filter(|domain| !domain.is_empty())
}

/// True iff the address's domain publishes at least one MX record.
///
/// Lookup failures (NXDOMAIN, timeouts, malformed names) all count as
/// "no record".
pub async fn has_valid_mx_record(resolver: &dyn DnsResolver, email: &str) -> bool {
    let Some(domain) = email_domain(email) else {
        return false;
    };

    match resolver.resolve_mx(domain).await {
        Ok(records) => {
            debug!(domain, records = records.len(), "MX lookup complete");
            !records.is_empty()
        }
        Err(e) => {
            debug!(domain, error = %e, "MX lookup failed");
            false
        }
    }
}
