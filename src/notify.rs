//! notify.rs — Delivery of the final report to the evaluation callback.
//!
//! Fire-and-forget from the request path: delivery runs as a background task
//! and any failure is logged, never surfaced to the HTTP caller.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};

use crate::report::FinalReport;

/// POST the report and log the outcome. Intended for `tokio::spawn`.
pub async fn send_final_report(client: Client, url: String, report: FinalReport) {
    match post_report(&client, &url, &report).await {
        Ok(status) => tracing::info!(
            session = %report.session_id,
            %status,
            "final report callback delivered"
        ),
        Err(e) => tracing::error!(
            session = %report.session_id,
            error = %e,
            "final report callback failed"
        ),
    }
}

async fn post_report(client: &Client, url: &str, report: &FinalReport) -> Result<StatusCode> {
    let resp = client
        .post(url)
        .json(report)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .context("callback post")?;
    // Non-2xx is the consumer's business; we only record the status.
    Ok(resp.status())
}
