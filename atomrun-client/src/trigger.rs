//! Execution trigger

use atomrun_core::domain::run::ExecutionHandle;
use atomrun_core::dto::execution::{ExecutionAccepted, ExecutionRequest};
use atomrun_core::properties::DynamicProperties;
use tracing::info;

use crate::ControlPlaneClient;
use crate::error::{ClientError, Result};

pub(crate) const EXECUTION_REQUEST: &str = "/ExecutionRequest";

impl ControlPlaneClient {
    /// Submit a run of `component_id` on `atom_id`
    ///
    /// # Returns
    /// The handle used to follow the execution record
    ///
    /// # Errors
    /// [`ClientError::Start`] when the server never accepts the request or
    /// answers without a request id.
    pub async fn trigger(
        &self,
        atom_id: &str,
        component_id: &str,
        dynamic_properties: &DynamicProperties,
    ) -> Result<ExecutionHandle> {
        for property in dynamic_properties {
            info!("Dynamic Prop: {}:{}", property.name, property.value);
        }

        let request = ExecutionRequest::new(atom_id, component_id, dynamic_properties);
        let body = serde_json::to_value(&request).map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to encode execution request: {}", e))
        })?;

        let Some(response) = self
            .post_with_slow_retry(EXECUTION_REQUEST, &body, "Request")
            .await?
        else {
            return Err(ClientError::Start(format!(
                "execution request for atom {} was never accepted",
                atom_id
            )));
        };

        let accepted: ExecutionAccepted = serde_json::from_value(response).map_err(|e| {
            ClientError::ParseError(format!("Failed to parse execution response: {}", e))
        })?;

        match accepted.request_id {
            Some(id) if !id.is_empty() => {
                info!("Request ID: {}", id);
                Ok(ExecutionHandle::new(id))
            }
            _ => Err(ClientError::Start(format!(
                "no request id returned for atom {} component {}",
                atom_id, component_id
            ))),
        }
    }
}
