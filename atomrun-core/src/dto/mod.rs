//! Data Transfer Objects for the control-plane API
//!
//! Request bodies and response envelopes exchanged with the remote system.
//! Field names follow the remote schema (`camelCase`, `@type` markers).

pub mod execution;
pub mod query;
