// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the document visit notifier.
//!
//! Every document visit runs the same pipeline: classify the path, resolve
//! a webhook, check the rate limiter, then dispatch. Scanner noise gets an
//! empty 404; everything else gets a 200 status page.

use crate::classifier::{classify, Classification, RejectReason};
use crate::config::ConfigSource;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::notifier::{resolve_webhook, DispatchOutcome, NotificationPayload, WebhookClient};
use crate::pages;
use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state.
pub struct AppState {
    pub config: Arc<dyn ConfigSource>,
    pub limiter: RateLimiter,
    pub webhooks: WebhookClient,
    /// Accepted document visits since startup
    pub visits: AtomicU64,
}

impl AppState {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        limiter: RateLimiter,
        webhooks: WebhookClient,
    ) -> Self {
        Self {
            config,
            limiter,
            webhooks,
            visits: AtomicU64::new(0),
        }
    }
}

/// How a classified visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyStatus {
    /// Webhook answered 200
    Notified,
    /// Webhook call timed out, failed, or returned non-200
    DispatchFailed,
    /// Same visitor, same document, inside the window
    RateLimited,
    /// No mapping and no default webhook
    NotConfigured,
}

impl NotifyStatus {
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Notified => None,
            Self::DispatchFailed => Some("Webhook delivery failed"),
            Self::RateLimited => Some("Visited recently, please don't refresh repeatedly"),
            Self::NotConfigured => Some("No webhook configured"),
        }
    }
}

/// What the visitor is told about their visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotifyOutcome {
    pub document: String,
    pub notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NotifyOutcome {
    pub fn new(document: impl Into<String>, status: NotifyStatus) -> Self {
        Self {
            document: document.into(),
            notified: status == NotifyStatus::Notified,
            reason: status.reason().map(str::to_string),
        }
    }
}

/// Result of running a path through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitResult {
    /// Scanner noise, answered with an empty 404
    Rejected(RejectReason),
    /// A document visit, answered with a status page
    Handled {
        status: NotifyStatus,
        outcome: NotifyOutcome,
    },
}

impl VisitResult {
    fn handled(document: String, status: NotifyStatus) -> Self {
        VisitResult::Handled {
            outcome: NotifyOutcome::new(document, status),
            status,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Diagnostic counters.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub status: &'static str,
    pub total_visits: u64,
    pub active_rate_limits: usize,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/favicon.ico", get(favicon))
        .route("/health", get(health))
        .route("/api/stats", get(stats))
        .route("/*document", get(visit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Caller address: first `X-Forwarded-For` hop if present, else the peer.
pub fn source_identifier(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Run one visit through classify, resolve, rate check and dispatch.
pub async fn process_visit(state: &AppState, raw_path: &str, source: &str) -> VisitResult {
    let config = state.config.load();

    let document = match classify(raw_path, &config) {
        Classification::Accepted(document) => document,
        Classification::Rejected { document, reason } => {
            match reason {
                RejectReason::SuspiciousChars { .. } => {
                    warn!(%document, %source, reason = reason.code(), "Suspicious path")
                }
                _ => info!(%document, %source, reason = reason.code(), "Ignoring scanner request"),
            }
            return VisitResult::Rejected(reason);
        }
    };

    state.visits.fetch_add(1, Ordering::Relaxed);
    info!(%document, %source, "Document visit");

    let webhook = resolve_webhook(
        &document,
        &config.webhooks,
        config.default_webhook.as_deref(),
    );
    let Some(webhook) = webhook else {
        warn!(%document, "No webhook configured for document");
        return VisitResult::handled(document, NotifyStatus::NotConfigured);
    };

    let decision = state
        .limiter
        .should_notify(
            source,
            &document,
            config.rate_limit_window(),
            config.enable_rate_limit,
        )
        .await;
    if let RateLimitResult::Suppressed { retry_after } = decision {
        info!(
            %document,
            %source,
            retry_after_secs = retry_after.as_secs(),
            "Notification skipped, rate limited"
        );
        return VisitResult::handled(document, NotifyStatus::RateLimited);
    }

    // The slot stays consumed even if delivery fails.
    let payload = NotificationPayload::new(document.as_str(), source);
    let status = match state.webhooks.dispatch(webhook, &payload).await {
        DispatchOutcome::Delivered => NotifyStatus::Notified,
        DispatchOutcome::Failed(_) => NotifyStatus::DispatchFailed,
    };
    VisitResult::handled(document, status)
}

/// Document visit endpoint.
pub async fn visit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let source = source_identifier(&headers, peer);
    let path = uri.path();
    let raw_path = path.strip_prefix('/').unwrap_or(path);

    match process_visit(&state, raw_path, &source).await {
        VisitResult::Rejected(_) => StatusCode::NOT_FOUND.into_response(),
        VisitResult::Handled { outcome, .. } => Html(pages::status_page(&outcome)).into_response(),
    }
}

/// Landing page.
pub async fn index() -> Html<String> {
    Html(pages::index_page())
}

/// Browsers ask for this on every page; keep it out of the pipeline.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
    })
}

/// Visit and rate limiter counters.
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        status: "success",
        total_visits: state.visits.load(Ordering::Relaxed),
        active_rate_limits: state.limiter.tracked_sources().await,
    })
}
