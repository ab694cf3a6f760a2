//! HTTP retrieval of the incident feed.

mod basic;
mod client;
mod headers;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use headers::WithHeader;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::incidents::{Incident, parse_incidents};

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid URL {url}"))?,
    );

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("Request to {url} failed"))?
        .error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Issues one GET against `url` and decodes the incident envelope.
///
/// # Errors
///
/// Transport errors, non-success statuses and malformed bodies are all
/// returned as-is; nothing is retried.
#[tracing::instrument(skip(client))]
pub async fn fetch_incidents<C: HttpClient>(client: &C, url: &str) -> Result<Vec<Incident>> {
    let bytes = fetch_bytes(client, url).await?;
    debug!(bytes = bytes.len(), "Incident feed received");

    let incidents = parse_incidents(&bytes)?;
    info!(count = incidents.len(), "Incident records fetched");
    Ok(incidents)
}
