// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Document Visit Notifier
//!
//! Turns visits to `/<document name>` into webhook notifications while
//! keeping scanner traffic out:
//!
//! - Blocklist, scan-extension and traversal filtering of request paths
//! - Optional CJK-only document names
//! - Per-visitor, per-document suppression window (60s default)
//! - Exact-name webhook mapping with a default fallback
//! - Config re-read from YAML on every request

pub mod classifier;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod notifier;
pub mod pages;

pub use classifier::{classify, Classification, RejectReason};
pub use config::{ConfigSource, FileConfigSource, NotifyConfig, ServerConfig};
pub use error::RelayError;
pub use handlers::{router, AppState, NotifyOutcome, NotifyStatus, VisitResult};
pub use limiter::{RateLimitResult, RateLimiter};
pub use notifier::{resolve_webhook, DispatchOutcome, NotificationPayload, WebhookClient};
