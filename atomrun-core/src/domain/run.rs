//! Launch request and the identifiers it resolves to

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::properties::DynamicProperties;

/// What to run, where, and whether to wait for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub atom_name: String,
    pub process_name: String,
    pub wait: bool,
    pub dynamic_properties: DynamicProperties,
}

impl RunRequest {
    /// Build a validated request
    ///
    /// Names are trimmed; a blank atom or process name is rejected.
    pub fn new(
        atom_name: &str,
        process_name: &str,
        wait: bool,
        dynamic_properties: DynamicProperties,
    ) -> Result<Self, ValidationError> {
        let atom_name = atom_name.trim();
        if atom_name.is_empty() {
            return Err(ValidationError::BlankName("Atom"));
        }

        let process_name = process_name.trim();
        if process_name.is_empty() {
            return Err(ValidationError::BlankName("Process"));
        }

        Ok(Self {
            atom_name: atom_name.to_string(),
            process_name: process_name.to_string(),
            wait,
            dynamic_properties,
        })
    }

    /// Build a request from the raw `key:value;...` property string
    pub fn parse(
        atom_name: &str,
        process_name: &str,
        wait: bool,
        dynamic_properties: &str,
    ) -> Result<Self, ValidationError> {
        let request = Self::new(atom_name, process_name, wait, DynamicProperties::default())?;
        Ok(Self {
            dynamic_properties: DynamicProperties::parse(dynamic_properties)?,
            ..request
        })
    }
}

/// Remote identifiers a [`RunRequest`] resolves to
///
/// Only constructed once every lookup has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIds {
    pub atom_id: String,
    pub environment_id: String,
    pub deployment_id: String,
    pub component_id: String,
}

/// Tracking token for a submitted execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionHandle {
    pub execution_id: String,
}

impl ExecutionHandle {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
        }
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.execution_id)
    }
}
