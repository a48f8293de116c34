// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-visitor, per-document notification suppression.
//!
//! Remembers only the instant of the last allowed notification for each
//! (source, document) pair. A new notification is allowed once a full
//! window has passed since that instant. Suppressed attempts do not move
//! the window.

use crate::clock::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Notification may go out; the slot has been consumed
    Allowed,
    /// A notification for this pair went out too recently
    Suppressed {
        /// Time until the pair is allowed again
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

/// Thread-safe single-slot limiter keyed by source, then document.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    /// source -> document -> last allowed notification
    visits: Arc<RwLock<HashMap<String, HashMap<String, Instant>>>>,
}

impl RateLimiter {
    /// Create a limiter using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a limiter reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            visits: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Decide whether `source` may trigger a notification for `document`.
    ///
    /// The lookup and the update happen under one write lock, so concurrent
    /// requests for the same pair cannot both be allowed within a window.
    /// When `enabled` is false every call is allowed and nothing is stored.
    pub async fn should_notify(
        &self,
        source: &str,
        document: &str,
        window: Duration,
        enabled: bool,
    ) -> RateLimitResult {
        if !enabled {
            return RateLimitResult::Allowed;
        }

        let mut visits = self.visits.write().await;
        let now = self.clock.now();

        let last = visits.get(source).and_then(|docs| docs.get(document)).copied();
        if let Some(last) = last {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < window {
                let retry_after = window - elapsed;
                debug!(%source, %document, ?retry_after, "Notification suppressed");
                return RateLimitResult::Suppressed { retry_after };
            }
        }

        visits
            .entry(source.to_string())
            .or_default()
            .insert(document.to_string(), now);
        RateLimitResult::Allowed
    }

    /// Instant of the last allowed notification for a pair.
    pub async fn last_notified(&self, source: &str, document: &str) -> Option<Instant> {
        let visits = self.visits.read().await;
        visits.get(source).and_then(|docs| docs.get(document)).copied()
    }

    /// Number of distinct sources with at least one tracked document.
    pub async fn tracked_sources(&self) -> usize {
        self.visits.read().await.len()
    }

    /// Number of tracked (source, document) pairs.
    pub async fn tracked_entries(&self) -> usize {
        self.visits.read().await.values().map(HashMap::len).sum()
    }

    /// Drop entries older than `retain_for` (should be called periodically).
    ///
    /// With `retain_for` equal to the active window this never changes a
    /// decision: an entry that old can no longer suppress anything.
    pub async fn cleanup(&self, retain_for: Duration) -> usize {
        let now = self.clock.now();
        let mut visits = self.visits.write().await;
        let mut removed = 0;

        visits.retain(|_, docs| {
            let before = docs.len();
            docs.retain(|_, last| now.saturating_duration_since(*last) < retain_for);
            removed += before - docs.len();
            !docs.is_empty()
        });

        if removed > 0 {
            debug!(removed, remaining_sources = visits.len(), "Rate limiter sweep");
        }
        removed
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
