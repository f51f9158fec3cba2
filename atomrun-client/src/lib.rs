//! Atomrun HTTP Client
//!
//! Client for the control-plane endpoints needed to launch an integration
//! process on an atom and follow its execution.
//!
//! The pipeline is strictly sequential:
//! - Resolver chain: atom name → atom id → environment id → deployment
//! - Execution trigger: submit the run, get back an execution id
//! - Status poller: follow the execution record with exponential backoff
//!
//! [`Launcher`] drives the three stages for a single [`RunRequest`].
//!
//! # Example
//!
//! ```no_run
//! use atomrun_client::{ControlPlaneClient, Launcher};
//! use atomrun_core::domain::credentials::Credentials;
//! use atomrun_core::domain::run::RunRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new(
//!         "https://api.example.com",
//!         "/api/rest/v1/account-123",
//!         "user",
//!         "secret",
//!     );
//!     let client = ControlPlaneClient::new(credentials)?;
//!     let request = RunRequest::parse("myatom", "myprocess", true, "key1:value1")?;
//!
//!     let verdict = Launcher::new(client).run(&request).await?;
//!     println!("{:?}", verdict);
//!     Ok(())
//! }
//! ```

pub mod error;
mod launcher;
mod poller;
mod resolver;
pub mod transport;
mod trigger;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use launcher::Launcher;
pub use poller::parse_recorded_date;
pub use transport::{ApiResponse, HttpTransport, Transport};

use atomrun_core::domain::credentials::Credentials;
use atomrun_core::retry::RetryPolicy;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Client for the control-plane API
///
/// Owns the transport handle and the retry policies used by the slow-poll
/// wrapper and the status poller.
#[derive(Clone)]
pub struct ControlPlaneClient {
    transport: Arc<dyn Transport>,
    slow_policy: RetryPolicy,
    status_policy: RetryPolicy,
}

impl ControlPlaneClient {
    /// Create a client that talks HTTPS with the given credentials
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(
            credentials,
        )?)))
    }

    /// Create a client on top of an existing transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            slow_policy: RetryPolicy::slow_poll(),
            status_policy: RetryPolicy::status_poll(),
        }
    }

    /// Override the slow-poll policy used by the resolvers and the trigger
    pub fn with_slow_policy(mut self, policy: RetryPolicy) -> Self {
        self.slow_policy = policy;
        self
    }

    /// Override the status polling policy
    pub fn with_status_policy(mut self, policy: RetryPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn status_policy(&self) -> &RetryPolicy {
        &self.status_policy
    }

    // =============================================================================
    // Slow Retry
    // =============================================================================

    /// POST `body` and wait out non-200 answers
    ///
    /// Returns the body of the first 200 response, or `None` when the
    /// slow-poll policy runs out of attempts. Transport failures are returned
    /// as errors immediately.
    async fn post_with_slow_retry(
        &self,
        endpoint: &str,
        body: &Value,
        description: &str,
    ) -> Result<Option<Value>> {
        let mut backoff = self.slow_policy.backoff.start();
        let mut attempts = 0;

        while !self.slow_policy.is_exhausted(attempts, attempts) {
            attempts += 1;

            let response = self
                .transport
                .send(Method::POST, endpoint, Some(body), &[StatusCode::OK])
                .await?;
            info!(
                "POST {} ID: {} {}",
                description,
                response.status.as_u16(),
                response.reason
            );

            if response.status == StatusCode::OK {
                return Ok(Some(response.body));
            }

            let delay = backoff.advance();
            warn!("Failed: {}. Retrying in {:?}", description, delay);
            tokio::time::sleep(delay).await;
        }

        Ok(None)
    }
}

impl std::fmt::Debug for ControlPlaneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPlaneClient")
            .field("slow_policy", &self.slow_policy)
            .field("status_policy", &self.status_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn test_client_default_policies() {
        let client = ControlPlaneClient::with_transport(Arc::new(ScriptedTransport::new()));
        assert_eq!(client.slow_policy, RetryPolicy::slow_poll());
        assert_eq!(*client.status_policy(), RetryPolicy::status_poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_retry_waits_out_non_200() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(StatusCode::SERVICE_UNAVAILABLE, Value::Null)
                .respond(StatusCode::OK, json!({"numberOfResults": 1})),
        );
        let client = ControlPlaneClient::with_transport(transport.clone());

        let start = tokio::time::Instant::now();
        let body = client
            .post_with_slow_retry("/Atom/query", &json!({}), "Atom")
            .await
            .unwrap();

        assert_eq!(body, Some(json!({"numberOfResults": 1})));
        assert_eq!(start.elapsed(), std::time::Duration::from_secs(60));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_retry_gives_up() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(StatusCode::BAD_GATEWAY, Value::Null)
                .respond(StatusCode::BAD_GATEWAY, Value::Null),
        );
        let client = ControlPlaneClient::with_transport(transport.clone())
            .with_slow_policy(RetryPolicy::slow_poll().with_max_attempts(2));

        let body = client
            .post_with_slow_retry("/Atom/query", &json!({}), "Atom")
            .await
            .unwrap();

        assert!(body.is_none());
        assert_eq!(transport.requests().len(), 2);
    }
}
