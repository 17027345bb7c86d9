use std::time::Duration;

use crate::client::lookup::LoadRequest;
use crate::client::record::{ErrorEnvelope, RowsPayload};
use crate::constants::CLIENT_TIMEOUT_SECS;
use crate::model::KeysetPage;

/// One page fetch: which listing, where to start, how many rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub target: LoadRequest,
    pub after_id: Option<i64>,
    pub limit: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// The server looked at the request and refused or failed it, as opposed
    /// to the request never completing.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if (400..500).contains(status))
    }
}

/// Anything that can serve keyset pages of trees.
#[allow(async_fn_in_trait)]
pub trait TreeSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<KeysetPage, FetchError>;
}

/// Fetches pages from the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTreeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTreeSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_default_timeout(base_url: &str) -> Self {
        Self::new(base_url, Duration::from_secs(CLIENT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_for(request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut query = request.target.query_pairs();
        query.push(("limit", request.limit.to_string()));
        if let Some(after_id) = request.after_id {
            query.push(("after_id", after_id.to_string()));
        }
        query
    }
}

impl TreeSource for HttpTreeSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<KeysetPage, FetchError> {
        let url = format!("{}{}", self.base_url, request.target.path());
        tracing::debug!(%url, after_id = ?request.after_id, limit = request.limit, "Fetching tree page");

        let response = self
            .client
            .get(&url)
            .query(&Self::query_for(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let envelope = response
                .json::<ErrorEnvelope>()
                .await
                .unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                code: envelope.code,
                message: envelope
                    .message
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            });
        }

        let payload = response
            .json::<RowsPayload>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(payload.into())
    }
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}
