// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request path classifier.
//!
//! Document links are public URLs, so they attract the same scanners as any
//! other web host. The classifier separates document visits from that noise:
//! - Well-known scan targets (admin panels, dotfiles, CMS paths)
//! - Scanner file extensions
//! - Path traversal and shell metacharacters
//! - Optionally, names without any CJK ideograph

use crate::config::NotifyConfig;
use thiserror::Error;
use tracing::debug;

/// Substrings that mark a path as a scan probe. Matched against the
/// lower-cased document name.
pub const BLOCKED_PATHS: &[&str] = &[
    "sitemap.xml",
    "robots.txt",
    "favicon.ico",
    "login",
    "admin",
    "wp-admin",
    "wp-login.php",
    "phpmyadmin",
    ".env",
    ".git",
    "config",
    "api",
    "test",
    "debug",
    "upload",
    ".well-known",
    "xmlrpc.php",
    "wp-content",
    "administrator",
    "manager",
    "console",
    "shell",
    "cmd",
    "sql",
    "backup",
    "index.php",
    "index.html",
    "index.htm",
    "default.asp",
    "default.aspx",
];

/// File extensions scanners probe for.
pub const SCAN_EXTENSIONS: &[&str] = &[
    ".php", ".asp", ".aspx", ".jsp", ".cgi", ".xml", ".json", ".txt", ".sql", ".zip", ".tar",
    ".gz",
];

/// Traversal and injection sequences. Not a sanitizer.
pub const SUSPICIOUS_SEQUENCES: &[&str] = &["..", "//", "\\", "<", ">", "|", "&", ";", "`"];

/// CJK Unified Ideographs, Extension A, and Compatibility Ideographs.
const CJK_RANGES: &[(char, char)] = &[
    ('\u{4E00}', '\u{9FFF}'),
    ('\u{3400}', '\u{4DBF}'),
    ('\u{F900}', '\u{FAFF}'),
];

/// Why a path was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("scan-path: matched blocklist entry {pattern:?}")]
    ScanPath { pattern: String },

    #[error("scan-extension: ends with {extension:?}")]
    ScanExtension { extension: &'static str },

    #[error("suspicious-chars: contains {sequence:?}")]
    SuspiciousChars { sequence: &'static str },

    #[error("non-target-script: no CJK ideograph")]
    NonTargetScript,
}

impl RejectReason {
    /// Short stable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ScanPath { .. } => "scan-path",
            Self::ScanExtension { .. } => "scan-extension",
            Self::SuspiciousChars { .. } => "suspicious-chars",
            Self::NonTargetScript => "non-target-script",
        }
    }
}

/// Result of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A document visit worth notifying about
    Accepted(String),
    /// Scanner noise; the decoded name is kept for logging
    Rejected { document: String, reason: RejectReason },
}

impl Classification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Classification::Accepted(_))
    }

    pub fn document(&self) -> &str {
        match self {
            Classification::Accepted(document) => document,
            Classification::Rejected { document, .. } => document,
        }
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Classification::Accepted(_) => None,
            Classification::Rejected { reason, .. } => Some(reason),
        }
    }
}

/// Percent-decode a raw path segment.
///
/// Multi-byte UTF-8 sequences are reassembled; invalid sequences become
/// U+FFFD. `+` is left alone since this is a path, not a query string.
pub fn decode_path(raw: &str) -> String {
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Classify a raw (still percent-encoded) path against a config snapshot.
pub fn classify(raw_path: &str, config: &NotifyConfig) -> Classification {
    let document = decode_path(raw_path);
    match check_document(&document, config) {
        Ok(()) => Classification::Accepted(document),
        Err(reason) => {
            debug!(document = %document, reason = reason.code(), "Path rejected");
            Classification::Rejected { document, reason }
        }
    }
}

/// Run the rejection rules in order against an already decoded name.
pub fn check_document(document: &str, config: &NotifyConfig) -> Result<(), RejectReason> {
    let lower = document.to_lowercase();

    if let Some(pattern) = match_blocklist(&lower, &config.blocked_paths) {
        return Err(RejectReason::ScanPath { pattern });
    }

    if let Some(extension) = SCAN_EXTENSIONS.iter().copied().find(|ext| lower.ends_with(*ext)) {
        return Err(RejectReason::ScanExtension { extension });
    }

    if let Some(sequence) = SUSPICIOUS_SEQUENCES
        .iter()
        .copied()
        .find(|seq| document.contains(*seq))
    {
        return Err(RejectReason::SuspiciousChars { sequence });
    }

    if config.chinese_only && !contains_cjk(document) {
        return Err(RejectReason::NonTargetScript);
    }

    Ok(())
}

fn match_blocklist(lower: &str, extra: &[String]) -> Option<String> {
    if let Some(pattern) = BLOCKED_PATHS.iter().find(|p| lower.contains(*p)) {
        return Some((*pattern).to_string());
    }

    // An empty entry would match every name.
    extra
        .iter()
        .map(|p| p.to_lowercase())
        .find(|p| !p.is_empty() && lower.contains(p.as_str()))
}

/// Whether the text has at least one CJK ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars()
        .any(|c| CJK_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)))
}
