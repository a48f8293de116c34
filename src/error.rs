// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the document visit notifier

use thiserror::Error;

/// Failures that can occur outside the request pipeline's normal outcomes.
///
/// None of these are fatal: config errors degrade to defaults and webhook
/// errors degrade to a logged `Failed` dispatch.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration unavailable: {0}")]
    ConfigUnavailable(#[from] std::io::Error),

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(#[from] serde_yaml::Error),

    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RelayError>;
