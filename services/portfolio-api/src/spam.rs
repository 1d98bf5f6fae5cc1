// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Keyword and link-density spam heuristic for contact submissions.
//!
//! A coarse first-pass filter: no state, no learning. A submission is spam
//! when its subject or message contains any listed keyword, or when the two
//! together carry more than `max_links` `http://`/`https://` occurrences.

use crate::config::SpamConfig;
use std::fmt;
use tracing::debug;

/// Marketing, crypto and scam vocabulary rejected by default.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "seo services",
    "backlinks",
    "guest post",
    "rank your website",
    "web traffic",
    "crypto",
    "bitcoin",
    "forex",
    "investment opportunity",
    "passive income",
    "make money",
    "work from home",
    "buy now",
    "click here",
    "limited time offer",
    "guaranteed",
    "100% free",
    "casino",
    "viagra",
    "loan approval",
    "lottery",
    "you have won",
    "wire transfer",
    "inheritance",
];

/// Why a submission was classified as spam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpamReason {
    /// A listed keyword appeared in the subject or message
    Keyword(String),
    /// More links than tolerated
    TooManyLinks(usize),
}

impl fmt::Display for SpamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "matched keyword {keyword:?}"),
            Self::TooManyLinks(count) => write!(f, "{count} links"),
        }
    }
}

/// Keyword and link-count spam filter.
#[derive(Debug, Clone)]
pub struct SpamFilter {
    keywords: Vec<String>,
    max_links: usize,
}

impl Default for SpamFilter {
    fn default() -> Self {
        Self::new(SpamConfig::default())
    }
}

impl SpamFilter {
    /// Create a filter from configuration. Keywords are case-folded once here.
    pub fn new(config: SpamConfig) -> Self {
        Self {
            keywords: config
                .keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            max_links: config.max_links,
        }
    }

    pub fn is_spam(&self, subject: &str, message: &str) -> bool {
        self.classify(subject, message).is_some()
    }

    /// Classify a submission, returning the first rule it trips.
    pub fn classify(&self, subject: &str, message: &str) -> Option<SpamReason> {
        let text = format!("{subject} {message}").to_lowercase();

        if let Some(keyword) = self.keywords.iter().find(|k| text.contains(k.as_str())) {
            debug!(keyword = %keyword, "Spam keyword matched");
            return Some(SpamReason::Keyword(keyword.clone()));
        }

        let links = count_links(&text);
        if links > self.max_links {
            debug!(links, max_links = self.max_links, "Too many links");
            return Some(SpamReason::TooManyLinks(links));
        }

        None
    }
}

/// Count `http://` and `https://` occurrences in already case-folded text.
fn count_links(text: &str) -> usize {
    // "https://" never contains "http://", so the two counts don't overlap.
    text.matches("http://").count() + text.matches("https://").count()
}
