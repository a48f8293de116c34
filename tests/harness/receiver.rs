// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process webhook receiver that records every payload it is sent.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use doc_visit_notifier::NotificationPayload;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone)]
struct ReceiverState {
    received: Arc<Mutex<Vec<Received>>>,
    status: StatusCode,
    delay: Duration,
}

/// One recorded webhook call.
#[derive(Debug, Clone)]
pub struct Received {
    pub payload: NotificationPayload,
    pub content_type: Option<String>,
}

/// Webhook endpoint bound to an ephemeral localhost port.
pub struct WebhookReceiver {
    pub url: String,
    received: Arc<Mutex<Vec<Received>>>,
    handle: JoinHandle<()>,
}

impl WebhookReceiver {
    /// Receiver answering every call with `status`.
    pub async fn start(status: StatusCode) -> Self {
        Self::start_with_delay(status, Duration::ZERO).await
    }

    /// Receiver that waits `delay` before answering.
    pub async fn start_with_delay(status: StatusCode, delay: Duration) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/hook", post(record))
            .with_state(ReceiverState {
                received: received.clone(),
                status,
                delay,
            });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/hook"),
            received,
            handle,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl Drop for WebhookReceiver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    Json(payload): Json<NotificationPayload>,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.received.lock().unwrap().push(Received {
        payload,
        content_type,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    state.status
}
