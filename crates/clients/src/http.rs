//! Shared transport plumbing for the collaborator clients.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::LookupError;

/// Response envelope both collaborators wrap their payloads in.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
}

/// Issue a single `GET {url}` and decode the enveloped record.
///
/// Classification: a 5xx status or any transport-level failure is
/// `Unavailable`; any other non-200 status, or a 200 whose envelope carries
/// `success: false` (or no data), is `NotFound`.
pub(crate) async fn fetch_one<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> Result<T, LookupError> {
    let response = http.get(url).send().await.map_err(|e| {
        tracing::warn!(url, error = %e, "collaborator request failed");
        LookupError::Unavailable(e.to_string())
    })?;

    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(url, %status, "collaborator returned server error");
        return Err(LookupError::Unavailable(format!("{url} returned {status}")));
    }
    if !status.is_success() {
        return Err(LookupError::NotFound);
    }

    let envelope: Envelope<T> = response.json().await.map_err(|e| {
        tracing::warn!(url, error = %e, "collaborator response was not decodable");
        LookupError::Unavailable(e.to_string())
    })?;

    match envelope {
        Envelope {
            success: true,
            data: Some(data),
        } => Ok(data),
        _ => Err(LookupError::NotFound),
    }
}

/// Build the shared HTTP client: bounded per-request timeout, no retries.
pub(crate) fn build_client(
    timeout: std::time::Duration,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Normalize a configured base URL so joining with `/segment/{id}` works.
pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    let mut url = base_url.into();
    while url.ends_with('/') {
        url.pop();
    }
    url
}
