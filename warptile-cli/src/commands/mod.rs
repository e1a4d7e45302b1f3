//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`fetch`] - Single tile fetch

pub mod config;
pub mod fetch;
