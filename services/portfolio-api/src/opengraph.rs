// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! OpenGraph preview image lookup.

use crate::error::{AppError, Result};
use regex::Regex;
use reqwest::header::USER_AGENT;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

/// Some sites only serve meta tags to browsers.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Meta tag patterns in priority order, each in both attribute orders.
const PREVIEW_PATTERNS: &[&str] = &[
    r#"(?i)<meta\s+property=["']og:image["']\s+content=["']([^"']+)["']"#,
    r#"(?i)<meta\s+content=["']([^"']+)["']\s+property=["']og:image["']"#,
    r#"(?i)<meta\s+property=["']og:image:url["']\s+content=["']([^"']+)["']"#,
    r#"(?i)<meta\s+content=["']([^"']+)["']\s+property=["']og:image:url["']"#,
    r#"(?i)<meta\s+name=["']twitter:image["']\s+content=["']([^"']+)["']"#,
    r#"(?i)<meta\s+content=["']([^"']+)["']\s+name=["']twitter:image["']"#,
];

fn preview_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PREVIEW_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("preview pattern compiles"))
            .collect()
    })
}

/// Find the page's preview image, made absolute against `base_url`.
pub fn extract_preview_image(html: &str, base_url: &Url) -> Option<String> {
    let raw = preview_patterns().iter().find_map(|re| {
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    })?;

    if raw.starts_with("http") {
        return Some(raw.to_string());
    }
    base_url.join(raw).ok().map(|u| u.to_string())
}

/// Fetches pages and extracts their preview image.
pub struct OpenGraphScraper {
    client: reqwest::Client,
}

impl OpenGraphScraper {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// `Ok(None)` means the page loaded but advertises no preview image.
    pub async fn fetch_preview_image(&self, url: &str) -> Result<Option<String>> {
        let page = Url::parse(url)?;
        if !matches!(page.scheme(), "http" | "https") {
            return Err(AppError::UnsupportedScheme(page.scheme().to_string()));
        }

        let response = self
            .client
            .get(page)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus(status));
        }

        // Relative paths resolve against where we ended up after redirects.
        let base = response.url().clone();
        let html = response.text().await?;
        let image = extract_preview_image(&html, &base);
        debug!(url = %base, image = ?image, "OpenGraph lookup complete");

        Ok(image)
    }
}
