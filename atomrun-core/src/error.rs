//! Validation errors raised before any request is sent

use thiserror::Error;

/// Input rejected before the pipeline touches the network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required name was empty or whitespace
    #[error("{0} name cannot be blank")]
    BlankName(&'static str),

    /// A dynamic property segment had no `:` separator
    #[error("Invalid key:pair data format for pair '{0}'")]
    MalformedProperty(String),
}
