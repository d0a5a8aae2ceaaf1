//! Shared test utilities.

pub mod github_api;
pub mod runtime;
