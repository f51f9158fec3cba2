//! Execution DTOs

use serde::{Deserialize, Serialize};

use crate::properties::DynamicProperties;
use crate::status::ExecutionStatus;

/// Body of `POST .../ExecutionRequest`
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionRequest {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "atomId")]
    pub atom_id: String,
    #[serde(rename = "processId")]
    pub process_id: String,
    #[serde(
        rename = "DynamicProcessProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub dynamic_process_properties: Option<DynamicProcessProperties>,
}

impl ExecutionRequest {
    /// Build a request; no property block is sent when `properties` is empty
    pub fn new(
        atom_id: impl Into<String>,
        process_id: impl Into<String>,
        properties: &DynamicProperties,
    ) -> Self {
        let dynamic_process_properties = (!properties.is_empty()).then(|| DynamicProcessProperties {
            kind: "ExecutionRequestDynamicProcessProperties",
            dynamic_process_property: properties
                .iter()
                .map(|p| DynamicProcessProperty {
                    kind: "",
                    name: p.name.clone(),
                    value: p.value.clone(),
                })
                .collect(),
        });

        Self {
            kind: "ExecutionRequest",
            atom_id: atom_id.into(),
            process_id: process_id.into(),
            dynamic_process_properties,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicProcessProperties {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "DynamicProcessProperty")]
    pub dynamic_process_property: Vec<DynamicProcessProperty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicProcessProperty {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub value: String,
}

/// Response to an accepted execution request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionAccepted {
    pub request_id: Option<String>,
}

/// Execution record, as returned by `ExecutionRecord/async/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub status: Option<ExecutionStatus>,
    /// `YYYY-MM-DDTHH:MM:SSZ`, UTC
    pub recorded_date: Option<String>,
    pub message: Option<String>,
}
