// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the portfolio API.
//!
//! The site calls three endpoints: the contact form post, the GitHub
//! repository listing and the OpenGraph image lookup.

use crate::config::Config;
use crate::contact::{ContactService, ContactSubmission, SubmissionResult};
use crate::error::ApiError;
use crate::github::{GithubClient, RepoListing, RepoQuery};
use crate::opengraph::OpenGraphScraper;
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub contact: ContactService,
    pub github: GithubClient,
    pub opengraph: OpenGraphScraper,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Repository listing query string. Values stay raw so bad input falls back
/// to defaults instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct RepoParams {
    pub username: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenGraphParams {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraphResponse {
    pub image_url: Option<String>,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(contact))
        .route("/api/github/repos", get(github_repos))
        .route("/api/opengraph", get(opengraph))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "portfolio-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Contact form post.
///
/// Always answers 200; success or rejection is in the body so the form can
/// render the message.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Form(mut submission): Form<ContactSubmission>,
) -> Json<SubmissionResult> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    submission.client_ip = client_ip(&headers, peer);

    debug!(
        ip = ?submission.client_ip,
        email = %submission.email,
        "Processing contact submission"
    );

    Json(state.contact.submit(submission).await)
}

/// GitHub repository listing.
pub async fn github_repos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RepoParams>,
) -> Result<Response, ApiError> {
    let query = RepoQuery::from_params(
        params.username.as_deref(),
        params.per_page.as_deref(),
        params.page.as_deref(),
        &state.config.github,
    );

    let listing: RepoListing = state.github.list_repos(&query).await.map_err(|e| {
        error!(username = %query.username, page = query.page, error = %e, "Error fetching GitHub repos");
        ApiError::upstream("Failed to fetch GitHub repositories")
    })?;

    let cache_control = format!(
        "public, s-maxage={}, stale-while-revalidate=60",
        state.config.github.cache_ttl_secs
    );
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(listing)).into_response())
}

/// OpenGraph preview image lookup.
pub async fn opengraph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OpenGraphParams>,
) -> Result<Json<OpenGraphResponse>, ApiError> {
    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::missing_parameter("URL parameter is required"))?;

    let image_url = state
        .opengraph
        .fetch_preview_image(url.trim())
        .await
        .map_err(|e| {
            error!(url = %url, error = %e, "Error fetching OpenGraph data");
            ApiError::upstream("Failed to fetch OpenGraph data")
        })?;

    Ok(Json(OpenGraphResponse { image_url }))
}

/// Best guess at the sender's address: proxy headers first, then the peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<String> {
    header_value(headers, "cf-connecting-ip")
        .or_else(|| {
            header_value(headers, "x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .or_else(|| header_value(headers, "x-real-ip"))
        .map(String::from)
        .or_else(|| peer.map(|ip| ip.to_string()))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
