//! reqwest-backed transport

use crate::error::{Error, Result};
use crate::traits::Transport;
use crate::types::{ApiRequest, HttpResponse};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use std::time::Instant;

const USER_AGENT: &str = concat!("kubigo-actions/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Release-management API client
///
/// Sends exactly one `POST` per request with the request's own timeout.
/// Never retries.
#[derive(Debug, Clone)]
pub struct ReleaseApiClient {
    client: reqwest::Client,
}

impl ReleaseApiClient {
    /// Create a new client
    ///
    /// Redirects are never followed: a 3xx is answered to the caller as is,
    /// so the `POST` cannot be replayed against another URL.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReleaseApiClient {
    async fn send(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let api_key = HeaderValue::from_str(&request.api_key).map_err(|_| {
            Error::Validation("Input \"api-key\" contains characters not allowed in an HTTP header".to_string())
        })?;

        tracing::debug!(
            action = %request.action,
            url = %request.url,
            timeout_secs = request.timeout.as_secs(),
            "sending request"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(&request.url)
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .timeout(request.timeout)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| transport_error(request, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(request, e))?;

        tracing::debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "response received"
        );

        Ok(HttpResponse { status, body })
    }
}

/// Classify a client-side failure
///
/// Anything that means "no usable response arrived" is a network error; the
/// rest (request construction, redirects) is unknown.
fn transport_error(request: &ApiRequest, err: reqwest::Error) -> Error {
    tracing::debug!(error = %err, "request failed");
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        Error::Network(format!(
            "Could not reach Kubigo API at {}",
            request.base_url
        ))
    } else {
        Error::Unknown(err.to_string())
    }
}
