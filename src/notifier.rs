// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Webhook resolution and delivery.
//!
//! One POST per notification, no retries and no queue. Callers only learn
//! whether the receiver answered 200.

use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};

/// Per-request timeout for webhook delivery
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Format of `access_time` in the payload
pub const ACCESS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Body of the outbound webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub doc_name: String,
    pub access_time: String,
    pub ip_address: String,
}

impl NotificationPayload {
    /// Build a payload stamped with the current local time.
    pub fn new(doc_name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            doc_name: doc_name.into(),
            access_time: chrono::Local::now().format(ACCESS_TIME_FORMAT).to_string(),
            ip_address: ip_address.into(),
        }
    }
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Find the webhook for a document: exact name first, then the default.
///
/// An empty default counts as unset.
pub fn resolve_webhook<'a>(
    document: &str,
    webhooks: &'a HashMap<String, String>,
    default_webhook: Option<&'a str>,
) -> Option<&'a str> {
    webhooks
        .get(document)
        .map(String::as_str)
        .filter(|url| !url.is_empty())
        .or(default_webhook)
        .filter(|url| !url.is_empty())
}

/// HTTP client for webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// Create a client with the standard delivery timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DISPATCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// POST the payload. Only a 200 response counts as delivered.
    pub async fn send(&self, url: &str, payload: &NotificationPayload) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RelayError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Deliver a notification, logging the result. Never returns an error.
    pub async fn dispatch(&self, url: &str, payload: &NotificationPayload) -> DispatchOutcome {
        match self.send(url, payload).await {
            Ok(()) => {
                info!(doc_name = %payload.doc_name, webhook = %url, "Webhook delivered");
                DispatchOutcome::Delivered
            }
            Err(err) => {
                error!(
                    doc_name = %payload.doc_name,
                    webhook = %url,
                    error = %err,
                    "Webhook delivery failed"
                );
                DispatchOutcome::Failed(err.to_string())
            }
        }
    }
}
