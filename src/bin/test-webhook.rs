// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Send one sample notification to a webhook receiver.
//!
//! Uses the same payload and client as the service, so a receiver that
//! passes here will accept real visits.

use clap::Parser;
use doc_visit_notifier::notifier::{NotificationPayload, WebhookClient, DISPATCH_TIMEOUT};
use doc_visit_notifier::RelayError;

#[derive(Parser)]
#[command(
    name = "test-webhook",
    about = "Send a sample document visit notification to a webhook"
)]
struct Args {
    /// Webhook URL to POST to
    webhook_url: String,

    /// Document name to report
    #[arg(default_value = "测试文档")]
    doc_name: String,

    /// Visitor address to report
    #[arg(long, default_value = "127.0.0.1")]
    ip_address: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Target URL:    {}", args.webhook_url);
    println!("Document name: {}", args.doc_name);
    println!();

    let payload = NotificationPayload::new(args.doc_name, args.ip_address);
    println!("Payload:");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    println!();

    let client = WebhookClient::new()?;
    match client.send(&args.webhook_url, &payload).await {
        Ok(()) => {
            println!("✅ Webhook accepted the notification (HTTP 200)");
            Ok(())
        }
        Err(RelayError::UnexpectedStatus { status, body }) => {
            println!("Response body: {body}");
            anyhow::bail!("webhook returned HTTP {status}, expected 200")
        }
        Err(RelayError::Transport(err)) if err.is_timeout() => {
            anyhow::bail!("request timed out after {}s", DISPATCH_TIMEOUT.as_secs())
        }
        Err(RelayError::Transport(err)) if err.is_connect() => {
            anyhow::bail!("could not connect, check the webhook URL: {err}")
        }
        Err(err) => Err(err.into()),
    }
}
