//! Launch protocol
//!
//! Resolve → trigger → poll, then turn the last observed status into a
//! [`RunVerdict`].

use atomrun_core::domain::execution::{ExecutionOutcome, RunVerdict};
use atomrun_core::domain::run::RunRequest;
use atomrun_core::status::ExecutionStatus;
use tracing::{info, warn};

use crate::ControlPlaneClient;
use crate::error::Result;

/// Drives one launch from a [`RunRequest`] to a [`RunVerdict`]
#[derive(Debug, Clone)]
pub struct Launcher {
    client: ControlPlaneClient,
}

impl Launcher {
    pub fn new(client: ControlPlaneClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ControlPlaneClient {
        &self.client
    }

    /// Run the whole pipeline
    ///
    /// Without `wait`, the verdict is based on the first status seen after the
    /// trigger; no status at all is unresolved, not submitted. With `wait`, an `INPROCESS` run is followed until it leaves
    /// that state; a run already failed on the first poll is reported at once.
    pub async fn run(&self, request: &RunRequest) -> Result<RunVerdict> {
        let ids = self.client.resolve_all(request).await?;
        let handle = self
            .client
            .trigger(&ids.atom_id, &ids.component_id, &request.dynamic_properties)
            .await?;

        let mut backoff = self.client.status_policy().backoff.start();
        let mut outcome = self.client.poll_status(&handle, false, &mut backoff).await?;

        if !request.wait {
            if outcome.status == ExecutionStatus::Pending {
                warn!(
                    "No status reported for process {} before polling gave up",
                    request.process_name
                );
                return Ok(RunVerdict::Unresolved {
                    status: outcome.status,
                });
            }

            if outcome.status.is_terminated() {
                warn!(
                    "Process {} failed to start ({})",
                    request.process_name, outcome.status
                );
                return Ok(failed(outcome));
            }

            info!(
                "Process {} successfully sent to Atom {}",
                request.process_name, request.atom_name
            );
            return Ok(RunVerdict::Submitted);
        }

        if outcome.status.is_terminated() {
            return Ok(failed(outcome));
        }

        if outcome.status.is_processing() {
            tokio::time::sleep(backoff.current()).await;
            outcome = self.client.poll_status(&handle, true, &mut backoff).await?;
        }

        Ok(verdict_after_wait(outcome))
    }
}

fn failed(outcome: ExecutionOutcome) -> RunVerdict {
    RunVerdict::Failed {
        status: outcome.status,
        message: outcome.raw_message,
    }
}

/// Only `COMPLETE` counts as success once we have waited
fn verdict_after_wait(outcome: ExecutionOutcome) -> RunVerdict {
    match outcome.status {
        ExecutionStatus::Complete => RunVerdict::Completed {
            completed_at: outcome.completed_at,
        },
        ExecutionStatus::Pending | ExecutionStatus::InProcess | ExecutionStatus::Unknown => {
            RunVerdict::Unresolved {
                status: outcome.status,
            }
        }
        _ => failed(outcome),
    }
}
