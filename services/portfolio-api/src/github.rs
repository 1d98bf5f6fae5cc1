// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! GitHub repository listing proxy.
//!
//! Fetches one page of a user's public repositories, most recently updated
//! first, and normalizes GitHub's `Link` header into a [`PaginationInfo`].

use crate::config::GithubConfig;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// GitHub caps `per_page` at 100.
pub const MAX_PER_PAGE: u32 = 100;

/// A public repository as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationInfo {
    /// Derive pagination from the `Link` header of a page holding `returned` repos.
    ///
    /// Without a header the page is assumed to be followed by another one
    /// whenever it came back full. With a header, `rel="next"` decides and
    /// `rel="last"` supplies the page count.
    pub fn from_link_header(link: Option<&str>, page: u32, per_page: u32, returned: usize) -> Self {
        let mut total_pages = page;
        let mut has_next_page = returned == per_page as usize;

        if let Some(link) = link {
            let relations: Vec<&str> = link.split(',').collect();

            if let Some(last) = relations.iter().find(|r| r.contains(r#"rel="last""#)) {
                if let Some(n) = page_param(last) {
                    total_pages = n;
                }
            }

            has_next_page = relations.iter().any(|r| r.contains(r#"rel="next""#));
        }

        Self {
            current_page: page,
            total_pages,
            per_page,
            has_next_page,
            has_prev_page: page > 1,
        }
    }
}

fn page_param(relation: &str) -> Option<u32> {
    static PAGE: OnceLock<Regex> = OnceLock::new();
    PAGE.get_or_init(|| Regex::new(r"[?&]page=(\d+)").expect("page pattern compiles"))
        .captures(relation)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoListing {
    pub repos: Vec<GitHubRepo>,
    pub pagination: PaginationInfo,
}

/// A normalized listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoQuery {
    pub username: String,
    pub per_page: u32,
    pub page: u32,
}

impl RepoQuery {
    /// Build a query from raw parameters. Missing, unparsable or zero values
    /// fall back to the configured defaults.
    pub fn from_params(
        username: Option<&str>,
        per_page: Option<&str>,
        page: Option<&str>,
        config: &GithubConfig,
    ) -> Self {
        let positive = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n > 0);

        Self {
            username: username
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(&config.default_username)
                .to_string(),
            per_page: positive(per_page)
                .unwrap_or(config.default_per_page)
                .min(MAX_PER_PAGE),
            page: positive(page).unwrap_or(1),
        }
    }
}

/// GitHub REST client.
pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(client: reqwest::Client, config: &GithubConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Fetch one page of public repositories, newest update first.
    pub async fn list_repos(&self, query: &RepoQuery) -> Result<RepoListing> {
        let url = format!(
            "{}/users/{}/repos",
            self.api_base,
            urlencoding::encode(&query.username)
        );

        let mut request = self
            .client
            .get(&url)
            .query(&[("sort", "updated"), ("direction", "desc"), ("type", "public")])
            .query(&[("per_page", query.per_page), ("page", query.page)])
            .header(ACCEPT, "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus(status));
        }

        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let repos: Vec<GitHubRepo> = response.json().await?;

        let pagination =
            PaginationInfo::from_link_header(link.as_deref(), query.page, query.per_page, repos.len());
        debug!(
            username = %query.username,
            page = query.page,
            returned = repos.len(),
            total_pages = pagination.total_pages,
            "Fetched repositories"
        );

        Ok(RepoListing { repos, pagination })
    }
}
