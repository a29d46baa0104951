//! # decompose-common
//!
//! Shared project model, options, error types, and constants used across
//! the docker-decompose workspace.
//!
//! This crate is the leaf of the dependency graph. The loader produces the
//! [`Project`](types::Project) defined here and the core consumes it.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
