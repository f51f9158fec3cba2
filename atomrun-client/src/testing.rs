//! Scripted transport for unit tests

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::transport::{ApiResponse, Transport};

/// A request seen by [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<Value>,
}

enum Scripted {
    Response(ApiResponse),
    Exhausted(u16),
}

/// Replays canned responses in order and records every request
///
/// Responses are returned as-is regardless of the acceptable codes, which lets
/// tests reach the branches that handle unexpected statuses.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: StatusCode, body: Value) -> Self {
        self.push(Scripted::Response(ApiResponse::new(status, body)))
    }

    /// Queue the same response `times` times
    pub fn respond_times(self, times: usize, status: StatusCode, body: Value) -> Self {
        (0..times).fold(self, |transport, _| transport.respond(status, body.clone()))
    }

    /// Queue a transport failure, as if the fast retry had been exhausted
    pub fn exhaust(self, status: StatusCode) -> Self {
        self.push(Scripted::Exhausted(status.as_u16()))
    }

    fn push(self, entry: Scripted) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to endpoints starting with `prefix`
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint.starts_with(prefix))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        _acceptable: &[StatusCode],
    ) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            body: body.cloned(),
        });

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Exhausted(status)) => {
                Err(ClientError::transport(method.as_str(), endpoint, status, 3))
            }
            None => Err(ClientError::InvalidRequest(format!(
                "no scripted response for {} {}",
                method, endpoint
            ))),
        }
    }
}
