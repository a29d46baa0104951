//! # decompose-compose
//!
//! Loads a docker-compose file into a resolved
//! [`Project`](decompose_common::types::Project).
//!
//! Handles:
//! - **Env**: `.env` files merged with the process environment.
//! - **Interpolate**: `$VAR`, `${VAR}`, and `${VAR:-default}` substitution.
//! - **Model**: the raw compose file shapes (short and long syntaxes).
//! - **Loader**: normalization of the raw model into the project.

pub mod env;
pub mod interpolate;
pub mod loader;
pub mod model;

pub use loader::{LoadOptions, load, load_str};
