//! Atomrun Core
//!
//! Core types and abstractions for launching integration processes on a
//! remote atom.
//!
//! This crate contains:
//! - Domain types: run requests, resolved ids, execution outcomes
//! - DTOs: the query-filter and execution-request wire schema
//! - Execution status classification and the shared retry policy

pub mod domain;
pub mod dto;
pub mod error;
pub mod properties;
pub mod retry;
pub mod status;

pub use error::ValidationError;
pub use status::ExecutionStatus;
