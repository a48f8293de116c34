// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML pages shown to visitors.

use crate::handlers::NotifyOutcome;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
       display: flex; justify-content: center; align-items: center; min-height: 100vh;
       margin: 0; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
.card { background: white; border-radius: 15px; padding: 40px; max-width: 560px;
        box-shadow: 0 20px 60px rgba(0,0,0,0.3); }
.status { text-align: center; }
.icon { font-size: 64px; margin-bottom: 20px; }
.message { color: #666; font-size: 16px; line-height: 1.6; margin-bottom: 30px; }
.back-link { display: inline-block; padding: 12px 30px; background: #667eea; color: white;
             text-decoration: none; border-radius: 25px; }
.timestamp { margin-top: 20px; font-size: 12px; color: #999; }
code { background: #f4f4f4; padding: 2px 6px; border-radius: 3px; }
"#;

/// Landing page describing how document links work.
pub fn index_page() -> String {
    let body = r#"<h1>📄 Document visit notifier</h1>
<p>Link to a document name under this host, for example
<code>/产品需求文档</code>. Each visit sends a notification to the webhook
configured for that document in <code>config.yaml</code>.</p>
<p>Repeat visits from the same address are collapsed within the configured
rate limit window.</p>"#;
    layout("Document visit notifier", body)
}

/// Status page for a document visit that passed classification.
pub fn status_page(outcome: &NotifyOutcome) -> String {
    let document = escape(&outcome.document);
    let (icon, title, color, mut message) = if outcome.notified {
        (
            "✅",
            "Notification sent",
            "#10b981",
            format!("The owners of <strong>{document}</strong> have been notified."),
        )
    } else {
        (
            "⚠️",
            "Notification not sent",
            "#f59e0b",
            format!("Your visit to <strong>{document}</strong> was recorded."),
        )
    };
    if let Some(reason) = &outcome.reason {
        message.push_str(&format!("<br><small>Reason: {}</small>", escape(reason)));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let body = format!(
        r#"<div class="status">
<div class="icon">{icon}</div>
<h1 style="color: {color}">{title}</h1>
<div class="message">{message}</div>
<a href="/" class="back-link">Back to home</a>
<div class="timestamp">{timestamp}</div>
</div>"#
    );
    layout(title, &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="card">
{body}
</div>
</body>
</html>
"#
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
