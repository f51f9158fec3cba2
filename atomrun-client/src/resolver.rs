//! Resolver chain
//!
//! Turns the names in a run request into the remote identifiers the execution
//! request needs. Each step filters one query endpoint and must match exactly
//! one entity; each filter depends on the id found by the previous step.

use atomrun_core::domain::run::{ResolvedIds, RunRequest};
use atomrun_core::dto::query::{
    AtomRecord, DeployedPackage, EnvironmentAttachment, Expression, QueryRequest, QueryResult,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::ControlPlaneClient;
use crate::error::{ClientError, Result};

pub(crate) const ATOM_QUERY: &str = "/Atom/query";
pub(crate) const ENVIRONMENT_QUERY: &str = "/EnvironmentAtomAttachment/query";
pub(crate) const DEPLOYMENT_QUERY: &str = "/DeployedPackage/query";

impl ControlPlaneClient {
    // =============================================================================
    // Resolver Chain
    // =============================================================================

    /// Resolve an atom name to its id
    pub async fn resolve_atom(&self, atom_name: &str) -> Result<String> {
        let request = QueryRequest::new(Expression::equals("name", atom_name));
        let atom: AtomRecord = self
            .query_single(ATOM_QUERY, &request, "Atom", atom_name)
            .await?;

        info!("Atom ID: {}", atom.id);
        Ok(atom.id)
    }

    /// Resolve the environment an atom is attached to
    ///
    /// `atom_name` only labels the error message.
    pub async fn resolve_environment(&self, atom_id: &str, atom_name: &str) -> Result<String> {
        let request = QueryRequest::new(Expression::equals("atomId", atom_id));
        let attachment: EnvironmentAttachment = self
            .query_single(ENVIRONMENT_QUERY, &request, "Environment", atom_name)
            .await?;

        info!("Environment ID: {}", attachment.environment_id);
        Ok(attachment.environment_id)
    }

    /// Resolve the active deployment of a process within an environment
    ///
    /// # Returns
    /// `(deployment_id, component_id)`
    pub async fn resolve_deployment(
        &self,
        environment_id: &str,
        process_name: &str,
    ) -> Result<(String, String)> {
        let request = QueryRequest::new(Expression::and(vec![
            Expression::equals("environmentId", environment_id),
            Expression::equals("componentType", "process"),
            Expression::equals("active", true),
            Expression::equals("componentName", process_name),
        ]));
        let package: DeployedPackage = self
            .query_single(DEPLOYMENT_QUERY, &request, "Deployment", process_name)
            .await?;

        info!(
            "Deployment ID: {} (component {})",
            package.deployment_id, package.component_id
        );
        Ok((package.deployment_id, package.component_id))
    }

    /// Run the whole chain for a request, in dependency order
    pub async fn resolve_all(&self, request: &RunRequest) -> Result<ResolvedIds> {
        let atom_id = self.resolve_atom(&request.atom_name).await?;
        let environment_id = self
            .resolve_environment(&atom_id, &request.atom_name)
            .await?;
        let (deployment_id, component_id) = self
            .resolve_deployment(&environment_id, &request.process_name)
            .await?;

        Ok(ResolvedIds {
            atom_id,
            environment_id,
            deployment_id,
            component_id,
        })
    }

    /// Run a query and return its only record
    ///
    /// # Errors
    /// [`ClientError::Resolution`] unless the server reports exactly one match.
    async fn query_single<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &QueryRequest,
        kind: &str,
        value: &str,
    ) -> Result<T> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode query: {}", e)))?;

        let Some(response) = self.post_with_slow_retry(endpoint, &body, kind).await? else {
            return Err(ClientError::Resolution(format!(
                "No {} found with name '{}'",
                kind, value
            )));
        };

        let envelope: QueryResult<Value> = serde_json::from_value(response).map_err(|e| {
            ClientError::ParseError(format!("Failed to parse {} query result: {}", kind, e))
        })?;

        if envelope.count() != 1 {
            return Err(ClientError::Resolution(format!(
                "{} {} found with name '{}'",
                envelope.count(),
                kind,
                value
            )));
        }

        let record = envelope.result.into_iter().next().ok_or_else(|| {
            ClientError::ParseError(format!("{} query reported one match but no record", kind))
        })?;

        serde_json::from_value(record)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {} record: {}", kind, e)))
    }
}
