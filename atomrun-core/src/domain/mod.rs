//! Core domain types
//!
//! These types describe one launch: who we talk to, what we ask for, which
//! remote entities the request resolves to, and what the run reported back.

pub mod credentials;
pub mod execution;
pub mod run;
