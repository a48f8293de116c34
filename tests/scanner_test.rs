// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scanner traffic tests.
//!
//! Replays probe paths against the full pipeline and checks that none of
//! them reach a webhook or leave rate limiter state behind.

mod harness;

use axum::http::StatusCode;
use doc_visit_notifier::{
    config::{NotifyConfig, StaticConfigSource},
    handlers::{process_visit, AppState, NotifyStatus, VisitResult},
    limiter::RateLimiter,
    notifier::WebhookClient,
};
use harness::{generators, receiver::WebhookReceiver};
use std::sync::Arc;

async fn open_state(receiver: &WebhookReceiver, config: NotifyConfig) -> Arc<AppState> {
    let config = NotifyConfig {
        default_webhook: Some(receiver.url.clone()),
        enable_rate_limit: true,
        ..config
    };
    Arc::new(AppState::new(
        Arc::new(StaticConfigSource(config)),
        RateLimiter::new(),
        WebhookClient::new().unwrap(),
    ))
}

async fn assert_all_rejected(state: &AppState, paths: &[String], expected_code: Option<&str>) {
    for path in paths {
        match process_visit(state, path, "203.0.113.9").await {
            VisitResult::Rejected(reason) => {
                if let Some(code) = expected_code {
                    assert_eq!(reason.code(), code, "wrong reason for {path}");
                }
            }
            VisitResult::Handled { status, .. } => {
                panic!("{path} should be rejected, got {status:?}")
            }
        }
    }
}

#[tokio::test]
async fn test_scanner_paths_never_notify() {
    let receiver = WebhookReceiver::start(StatusCode::OK).await;
    let state = open_state(&receiver, NotifyConfig::default()).await;

    assert_all_rejected(&state, &generators::scanner_paths(), None).await;

    assert_eq!(receiver.count(), 0);
    assert_eq!(state.limiter.tracked_entries().await, 0);
}

#[tokio::test]
async fn test_scan_extensions_rejected() {
    let receiver = WebhookReceiver::start(StatusCode::OK).await;
    let state = open_state(&receiver, NotifyConfig::default()).await;

    assert_all_rejected(&state, &generators::extension_paths(), None).await;
    assert_eq!(receiver.count(), 0);
}

#[tokio::test]
async fn test_injection_attempts_rejected() {
    let receiver = WebhookReceiver::start(StatusCode::OK).await;
    let state = open_state(&receiver, NotifyConfig::default()).await;

    assert_all_rejected(
        &state,
        &generators::injection_paths(),
        Some("suspicious-chars"),
    )
    .await;
    assert_eq!(receiver.count(), 0);
}

#[tokio::test]
async fn test_configured_blocklist_applies() {
    let receiver = WebhookReceiver::start(StatusCode::OK).await;
    let config = NotifyConfig {
        blocked_paths: vec!["内部".to_string(), "DRAFT".to_string()],
        ..Default::default()
    };
    let state = open_state(&receiver, config).await;

    let paths: Vec<String> = ["内部资料", "draft-plan", "%E5%86%85%E9%83%A8"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_all_rejected(&state, &paths, Some("scan-path")).await;
    assert_eq!(receiver.count(), 0);
}

#[tokio::test]
async fn test_legitimate_documents_pass_during_scan() {
    let receiver = WebhookReceiver::start(StatusCode::OK).await;
    let state = open_state(&receiver, NotifyConfig::default()).await;

    // Interleave probes with real visits from the same address.
    let probes = generators::scanner_paths();
    let names = generators::document_names();
    for (i, name) in names.iter().enumerate() {
        let probe = &probes[i % probes.len()];
        assert!(matches!(
            process_visit(&state, probe, "198.51.100.1").await,
            VisitResult::Rejected(_)
        ));

        let result = process_visit(&state, &generators::encode_path(name), "198.51.100.1").await;
        match result {
            VisitResult::Handled { status, outcome } => {
                assert_eq!(status, NotifyStatus::Notified, "{name}");
                assert_eq!(outcome.document, *name);
            }
            VisitResult::Rejected(reason) => panic!("{name} rejected: {reason}"),
        }
    }

    assert_eq!(receiver.count(), names.len());
    assert_eq!(state.limiter.tracked_entries().await, names.len());
}
