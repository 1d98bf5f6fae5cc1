// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio API Service
//!
//! Backs the portfolio site's contact form, GitHub project listing and
//! project preview images.
//!
//! ## Configuration
//!
//! Configuration is loaded from an optional TOML file (`PORTFOLIO_CONFIG`,
//! default `portfolio.toml`) and environment variables, after reading `.env`:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`: Mail relay
//! - `CONTACT_RECIPIENT`: Where contact submissions are sent
//! - `TURNSTILE_SECRET_KEY`: Captcha secret; without it every submission is rejected
//! - `GITHUB_TOKEN`: Optional, raises GitHub rate limits

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_api::{
    captcha::TurnstileVerifier,
    config::Config,
    contact::ContactService,
    dns::HickoryResolver,
    github::GithubClient,
    handlers::{router, AppState},
    mailer::SmtpMailer,
    opengraph::OpenGraphScraper,
    spam::SpamFilter,
    validator::SubmissionValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config_path = std::env::var("PORTFOLIO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("portfolio.toml"));
    let config = Config::load(Some(&config_path))?;
    info!(
        bind_addr = %config.bind_addr,
        smtp_host = %config.smtp.host,
        smtp_port = config.smtp.port,
        recipient = %config.contact.recipient,
        github_user = %config.github.default_username,
        github_token = config.github.token.is_some(),
        "Starting portfolio API"
    );
    if config.captcha.secret_key.is_none() {
        warn!("TURNSTILE_SECRET_KEY is not set, contact submissions will be rejected");
    }
    if config.smtp.user.is_none() || config.smtp.password.is_none() {
        warn!("SMTP credentials are incomplete, mail delivery will fail");
    }

    // Create application state
    let http = reqwest::Client::builder()
        .user_agent(concat!("portfolio-api/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let contact = ContactService::new(
        SubmissionValidator::new(SpamFilter::new(config.spam.clone())),
        Arc::new(TurnstileVerifier::new(http.clone(), &config.captcha)),
        Arc::new(HickoryResolver::new(&config.dns)),
        Arc::new(SmtpMailer::new(&config.smtp)?),
        config.contact.clone(),
    );

    let state = Arc::new(AppState {
        contact,
        github: GithubClient::new(http.clone(), &config.github),
        opengraph: OpenGraphScraper::new(http),
        config: config.clone(),
    });

    // Build router
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
