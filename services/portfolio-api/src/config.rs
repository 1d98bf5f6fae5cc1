// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the portfolio API.
//!
//! Values are read from an optional TOML file and then overridden by the
//! flat environment variables the site is deployed with (`SMTP_HOST`,
//! `TURNSTILE_SECRET_KEY`, `GITHUB_TOKEN`, ...). The result is built once at
//! start-up and handed to each component.

use crate::spam::DEFAULT_KEYWORDS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the portfolio API service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origins allowed by CORS. Empty means same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// SMTP relay used for both outgoing messages
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Contact form addressing and signature
    #[serde(default)]
    pub contact: ContactConfig,

    /// Turnstile verification
    #[serde(default)]
    pub captcha: CaptchaConfig,

    /// GitHub repository proxy
    #[serde(default)]
    pub github: GithubConfig,

    /// MX lookups
    #[serde(default)]
    pub dns: DnsConfig,

    /// Spam heuristic tuning
    #[serde(default)]
    pub spam: SpamConfig,
}

/// SMTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host (default: smtp.gmail.com)
    #[serde(default = "default_smtp_host")]
    pub host: String,

    /// Relay port (default: 587, STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Login user, also used as the envelope sender address
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

/// Where contact submissions go and who signs the auto-reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Destination of notification messages (default: hi@notedwin.dev)
    #[serde(default = "default_recipient")]
    pub recipient: String,

    /// Name used to sign the confirmation message
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    /// Site linked from the confirmation footer
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

/// Captcha provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaConfig {
    /// Provider secret. Submissions fail closed when this is unset.
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,

    /// Siteverify endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: String,

    /// Hard bound on the verification round trip (default: 10)
    #[serde(default = "default_captcha_timeout_secs")]
    pub timeout_secs: u64,
}

/// GitHub proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token, only raises upstream rate limits
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// REST API base (default: https://api.github.com)
    #[serde(default = "default_github_api_base")]
    pub api_base: String,

    /// Username listed when the query omits one
    #[serde(default = "default_github_username")]
    pub default_username: String,

    /// Page size when the query omits one (default: 12)
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,

    /// `s-maxage` advertised on successful listings (default: 300)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

/// Resolver settings for MX checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsConfig {
    #[serde(default = "default_dns_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_dns_attempts")]
    pub attempts: usize,
}

/// Spam heuristic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Case-insensitive substrings that mark a submission as spam
    #[serde(default = "default_spam_keywords")]
    pub keywords: Vec<String>,

    /// Link occurrences tolerated before a submission counts as spam (default: 2)
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_recipient() -> String {
    "hi@notedwin.dev".to_string()
}

fn default_owner_name() -> String {
    "Edwin Ng".to_string()
}

fn default_site_url() -> String {
    "https://notedwin.dev".to_string()
}

fn default_verify_url() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string()
}

fn default_captcha_timeout_secs() -> u64 {
    10
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_github_username() -> String {
    "notedwin-dev".to_string()
}

fn default_per_page() -> u32 {
    12
}

fn default_cache_ttl_secs() -> u64 {
    300 // five minutes
}

fn default_dns_timeout_secs() -> u64 {
    5
}

fn default_dns_attempts() -> usize {
    2
}

fn default_spam_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_max_links() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origins: Vec::new(),
            smtp: SmtpConfig::default(),
            contact: ContactConfig::default(),
            captcha: CaptchaConfig::default(),
            github: GithubConfig::default(),
            dns: DnsConfig::default(),
            spam: SpamConfig::default(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            user: None,
            password: None,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            owner_name: default_owner_name(),
            site_url: default_site_url(),
        }
    }
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            verify_url: default_verify_url(),
            timeout_secs: default_captcha_timeout_secs(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_github_api_base(),
            default_username: default_github_username(),
            default_per_page: default_per_page(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_dns_timeout_secs(),
            attempts: default_dns_attempts(),
        }
    }
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            keywords: default_spam_keywords(),
            max_links: default_max_links(),
        }
    }
}

impl SmtpConfig {
    /// Port 465 speaks TLS from the first byte; everything else upgrades with STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

impl CaptchaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Environment variable to configuration key.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("BIND_ADDR", "bind_addr"),
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_USER", "smtp.user"),
    ("SMTP_PASS", "smtp.password"),
    ("CONTACT_RECIPIENT", "contact.recipient"),
    ("CONTACT_OWNER_NAME", "contact.owner_name"),
    ("CONTACT_SITE_URL", "contact.site_url"),
    ("TURNSTILE_SECRET_KEY", "captcha.secret_key"),
    ("TURNSTILE_VERIFY_URL", "captcha.verify_url"),
    ("CAPTCHA_TIMEOUT_SECS", "captcha.timeout_secs"),
    ("GITHUB_TOKEN", "github.token"),
    ("GITHUB_API_BASE", "github.api_base"),
    ("GITHUB_DEFAULT_USERNAME", "github.default_username"),
    ("GITHUB_CACHE_TTL_SECS", "github.cache_ttl_secs"),
    ("DNS_TIMEOUT_SECS", "dns.timeout_secs"),
];

impl Config {
    /// Load configuration from `path` (if it exists) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        for (var, key) in ENV_OVERRIDES {
            // Blank variables count as unset so `SMTP_USER=` doesn't shadow the file.
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
            builder = builder.set_override("allowed_origins", origins)?;
        }

        builder.build()?.try_deserialize()
    }
}
