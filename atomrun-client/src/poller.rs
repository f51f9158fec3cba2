//! Execution status poller
//!
//! Follows an execution record until it reports a status worth returning.
//! Each iteration is one of:
//! - 202: record not ready yet, back off and poll again
//! - 200 with a status: adopt it; keep polling only while waiting on `INPROCESS`
//! - 200 without a status: the run was aborted
//! - anything else: count an error, back off and poll again
//!
//! The loop also stops once the status policy runs out of attempts or errors,
//! leaving the last observed status in place.

use atomrun_core::domain::execution::ExecutionOutcome;
use atomrun_core::domain::run::ExecutionHandle;
use atomrun_core::dto::execution::ExecutionRecord;
use atomrun_core::retry::BackoffState;
use atomrun_core::status::ExecutionStatus;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::ControlPlaneClient;
use crate::error::{ClientError, Result};

const RECORDED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Convert a `YYYY-MM-DDTHH:MM:SSZ` UTC timestamp to local time
pub fn parse_recorded_date(value: &str) -> Option<DateTime<Local>> {
    NaiveDateTime::parse_from_str(value, RECORDED_DATE_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

fn execution_record_endpoint(handle: &ExecutionHandle) -> String {
    format!("/ExecutionRecord/async/{}", handle.execution_id)
}

/// First record of a status response, if there is one
fn first_record(body: &Value) -> Result<Option<ExecutionRecord>> {
    let Some(record) = body.get("result").and_then(|r| r.get(0)) else {
        return Ok(None);
    };

    serde_json::from_value(record.clone())
        .map(Some)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse execution record: {}", e)))
}

impl ControlPlaneClient {
    /// Poll the execution record for `handle`
    ///
    /// With `wait` set, an `INPROCESS` status keeps the loop going; otherwise
    /// the first status reported is returned. `backoff` is advanced on every
    /// delay so a later call continues the same sequence.
    ///
    /// # Errors
    /// [`ClientError::Aborted`] when a 200 response carries no status, and any
    /// transport failure.
    pub async fn poll_status(
        &self,
        handle: &ExecutionHandle,
        wait: bool,
        backoff: &mut BackoffState,
    ) -> Result<ExecutionOutcome> {
        let endpoint = execution_record_endpoint(handle);
        let policy = self.status_policy;
        let mut outcome = ExecutionOutcome::default();
        let mut attempts = 0;
        let mut errors = 0;

        while !policy.is_exhausted(attempts, errors) {
            attempts += 1;

            let response = self
                .transport
                .send(
                    Method::GET,
                    &endpoint,
                    None,
                    &[StatusCode::OK, StatusCode::ACCEPTED],
                )
                .await?;

            match response.status {
                StatusCode::ACCEPTED => {
                    debug!(
                        "GET Execution Status: {} {} ({})",
                        response.status.as_u16(),
                        response.reason,
                        outcome.status
                    );
                }
                StatusCode::OK => {
                    let record = first_record(&response.body)?;
                    let Some(record) = record.filter(|r| r.status.is_some()) else {
                        warn!("{}: Process aborted", response.status.as_u16());
                        return Err(ClientError::Aborted(handle.execution_id.clone()));
                    };

                    outcome.status = record.status.unwrap_or_default();
                    info!(
                        "GET Execution Status: {} {} ({})",
                        response.status.as_u16(),
                        response.reason,
                        outcome.status
                    );

                    if !(wait && outcome.status.is_processing()) {
                        outcome.completed_at =
                            record.recorded_date.as_deref().and_then(|date| {
                                let parsed = parse_recorded_date(date);
                                if parsed.is_none() {
                                    warn!("Ignoring unparsable recordedDate '{}'", date);
                                }
                                parsed
                            });
                        outcome.raw_message = record.message;
                        return Ok(outcome);
                    }
                }
                other => {
                    errors += 1;
                    outcome.status = ExecutionStatus::Unknown;
                    warn!(
                        "GET Execution Status: {} {} ({})",
                        other.as_u16(),
                        response.reason,
                        outcome.status
                    );
                }
            }

            let delay = backoff.advance();
            debug!("Retrying in {:?}", delay);
            tokio::time::sleep(delay).await;
        }

        warn!(
            "Stopped polling execution {} after {} attempt(s) and {} error(s) ({})",
            handle, attempts, errors, outcome.status
        );
        Ok(outcome)
    }
}
