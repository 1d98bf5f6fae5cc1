// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Cloudflare Turnstile token verification.
//!
//! The token produced by the browser widget is relayed server-to-server to
//! the provider's siteverify endpoint together with the site secret. Every
//! outcome is folded into a [`CaptchaVerification`] carrying the message the
//! sender should see; nothing here returns an error to the caller.

use crate::config::CaptchaConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_FAILURE: &str = "Captcha verification failed. Please try again.";
pub const TIMED_OUT: &str = "Captcha verification timed out. Please try again.";
pub const EXPIRED_OR_REUSED: &str =
    "Captcha has expired or was already used. Please refresh and try again.";
pub const INVALID: &str = "Invalid captcha. Please try again.";
pub const NOT_CONFIGURED: &str =
    "Captcha verification is not configured. Please try again later.";
pub const UNAVAILABLE: &str =
    "Captcha verification service unavailable. Please try again later.";

/// Provider error code for a token that was already redeemed or has expired.
const TIMEOUT_OR_DUPLICATE: &str = "timeout-or-duplicate";

/// Outcome of a captcha check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaVerification {
    pub success: bool,
    pub message: Option<String>,
}

impl CaptchaVerification {
    pub fn passed() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Something that can vouch for a captcha token.
#[async_trait]
pub trait CaptchaProvider: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> CaptchaVerification;
}

#[derive(Debug, Serialize)]
struct SiteverifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(rename = "remoteip", skip_serializing_if = "Option::is_none")]
    remote_ip: Option<&'a str>,
}

/// Siteverify response body.
#[derive(Debug, Deserialize)]
pub struct SiteverifyResponse {
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

/// Turnstile siteverify client.
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret_key: Option<String>,
    verify_url: String,
    timeout: Duration,
}

impl TurnstileVerifier {
    pub fn new(client: reqwest::Client, config: &CaptchaConfig) -> Self {
        Self {
            client,
            secret_key: config.secret_key.clone(),
            verify_url: config.verify_url.clone(),
            timeout: config.timeout(),
        }
    }

    async fn siteverify(
        &self,
        secret: &str,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<SiteverifyResponse, reqwest::Error> {
        self.client
            .post(&self.verify_url)
            .timeout(self.timeout)
            .form(&SiteverifyRequest {
                secret,
                response: token,
                remote_ip,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl CaptchaProvider for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> CaptchaVerification {
        let Some(secret) = self.secret_key.as_deref() else {
            error!("Captcha secret key is not configured, rejecting submission");
            return CaptchaVerification::failed(NOT_CONFIGURED);
        };

        match self.siteverify(secret, token, remote_ip).await {
            Ok(body) if body.success => {
                debug!(hostname = ?body.hostname, "Captcha verified");
                CaptchaVerification::passed()
            }
            Ok(body) => {
                warn!(error_codes = ?body.error_codes, "Captcha rejected by provider");
                CaptchaVerification::failed(rejection_message(&body.error_codes))
            }
            Err(e) if e.is_timeout() => {
                warn!(timeout_secs = self.timeout.as_secs(), "Captcha verification timed out");
                CaptchaVerification::failed(TIMED_OUT)
            }
            Err(e) => {
                error!(error = %e, "Captcha verification request failed");
                CaptchaVerification::failed(UNAVAILABLE)
            }
        }
    }
}

/// Map provider error codes to the message shown to the sender.
pub fn rejection_message(error_codes: &[String]) -> &'static str {
    if error_codes.iter().any(|c| c == TIMEOUT_OR_DUPLICATE) {
        EXPIRED_OR_REUSED
    } else {
        INVALID
    }
}
