//! Authenticated HTTP transport
//!
//! Every stage of the launch pipeline talks to the control plane through the
//! [`Transport`] trait, so the stages can be exercised against a scripted
//! transport in tests.

use async_trait::async_trait;
use atomrun_core::domain::credentials::Credentials;
use atomrun_core::retry::RetryPolicy;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Connect timeout for every request; no overall request timeout is applied
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A completed HTTP exchange with an acceptable status code
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Parsed JSON body (`Null` when the body was empty)
    pub body: Value,
    pub status: StatusCode,
    /// Reason phrase for `status`
    pub reason: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            body,
            status,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Request/response exchange with the control-plane API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to `endpoint` (relative to the configured path prefix)
    ///
    /// # Errors
    /// Fails with [`ClientError::Transport`] when the server never answers
    /// with one of `acceptable` codes within the retry bound.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        acceptable: &[StatusCode],
    ) -> Result<ApiResponse>;
}

/// [`Transport`] over HTTPS with Basic authentication
///
/// Connection pooling is disabled: each call opens its own connection and
/// releases it when the response has been read.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    credentials: Credentials,
    client: Client,
    policy: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport for the given credentials
    ///
    /// The authorization header is built once here and attached to every request.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(&credentials)?)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            credentials,
            client,
            policy: RetryPolicy::transport(),
        })
    }

    /// Override the fast retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

fn default_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let token = STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
    let mut authorization = HeaderValue::from_str(&format!("Basic {}", token))
        .map_err(|e| ClientError::InvalidRequest(format!("Invalid credentials: {}", e)))?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, authorization);
    Ok(headers)
}

/// Parse a response body, treating an empty body as JSON `null`
pub(crate) fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(text)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        acceptable: &[StatusCode],
    ) -> Result<ApiResponse> {
        let url = self.credentials.url_for(endpoint);
        let mut backoff = self.policy.backoff.start();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let mut request = self.client.request(method.clone(), &url);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            debug!("{} {} -> {}", method, endpoint, status);

            if acceptable.contains(&status) {
                let text = response.text().await?;
                return Ok(ApiResponse::new(status, parse_body(&text)?));
            }

            if self.policy.is_exhausted(attempts, attempts) {
                return Err(ClientError::transport(
                    method.as_str(),
                    endpoint,
                    status.as_u16(),
                    attempts,
                ));
            }

            let delay = backoff.advance();
            warn!(
                "{} {} returned {} (attempt {}/{}). Retrying in {:?}",
                method, endpoint, status, attempts, self.policy.max_attempts, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
