//! HTTP fetcher — one authenticated GET, raw body or error descriptor

use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::credential::Credential;
use crate::error::FetchError;

/// Issues single GET requests against the appointment service.
///
/// Holds no per-request state; the reqwest client is only a connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// `timeout` of `None` leaves the request unbounded.
    pub fn new(
        base_url: &str,
        credential: &Credential,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credential.header_value()?);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a resolved path onto the service base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET `path`. Status in [200, 300) yields the body text unparsed.
    pub async fn get(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        debug!(url = %url, "sending request");

        let response = self.client.get(&url).send().await.map_err(|e| {
            debug!(url = %url, "request failed: {e}");
            FetchError::from_transport(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "non-success status");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                status_text: reason_phrase(&response),
            });
        }

        let body = response.text().await.map_err(|e| {
            debug!(url = %url, "failed to read body: {e}");
            FetchError::from_transport(&e)
        })?;

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "request complete");
        Ok(body)
    }

    /// Like [`get`](Self::get), but gives up with `Cancelled` once `token`
    /// fires. The request future is dropped, which aborts the connection.
    pub async fn get_cancellable(
        &self,
        path: &str,
        token: &CancellationToken,
    ) -> Result<String, FetchError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(path, "request cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.get(path) => result,
        }
    }
}

/// The reason phrase the server sent. hyper only records it when it differs
/// from the canonical one, so fall back to that, then to `""`.
fn reason_phrase(response: &reqwest::Response) -> String {
    if let Some(reason) = response.extensions().get::<hyper::ext::ReasonPhrase>() {
        return String::from_utf8_lossy(reason.as_bytes()).into_owned();
    }
    response
        .status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string()
}
