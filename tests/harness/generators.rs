// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request path generators for scanner simulation.

use doc_visit_notifier::classifier::{BLOCKED_PATHS, SCAN_EXTENSIONS};

/// Paths commonly probed by vulnerability scanners.
pub fn scanner_paths() -> Vec<String> {
    let mut paths: Vec<String> = vec![
        "wp-admin",
        "wp-login.php",
        "phpmyadmin/index.php",
        ".env",
        ".git/HEAD",
        "robots.txt",
        "sitemap.xml",
        ".well-known/security.txt",
        "xmlrpc.php",
        "api/v1/users",
        "admin/login",
        "Administrator",
        "manager/html",
        "console",
        "cgi-bin/test.cgi",
        "backup.zip",
        "db.sql",
        "site.tar.gz",
        "upload.aspx",
        "shell.jsp",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    // Every base entry, in upper case to exercise case folding.
    paths.extend(BLOCKED_PATHS.iter().map(|p| p.to_uppercase()));
    paths
}

/// Otherwise harmless names carrying each scan extension.
pub fn extension_paths() -> Vec<String> {
    SCAN_EXTENSIONS
        .iter()
        .map(|ext| format!("季度报告{}", ext.to_uppercase()))
        .collect()
}

/// Traversal and injection attempts, already percent-encoded.
pub fn injection_paths() -> Vec<String> {
    [
        "..%2F..%2Fetc%2Fpasswd",
        "%2E%2E/secret",
        "docs//x",
        "a%5Cwindows",
        "%3Cscript%3Ealert(1)%3C%2Fscript%3E",
        "name%3Evalue",
        "a%7Cid",
        "a%26b%3Dc",
        "x%3Brm%20-rf",
        "%60whoami%60",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Legitimate document names that should reach the notifier.
pub fn document_names() -> Vec<&'static str> {
    vec![
        "产品需求文档",
        "技术方案",
        "项目进度表",
        "2024年度总结",
        "设计稿/首页",
        "会议纪要 第3期",
    ]
}

/// Percent-encode a document name the way a browser would.
pub fn encode_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
