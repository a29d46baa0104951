//! Network create-commands and the implicit default network.

use decompose_common::constants::{DEFAULT_NETWORK, DOCKER_BIN};
use decompose_common::types::Network;

use crate::command::CommandLine;

/// Returns `true` for the implicit per-project network.
#[must_use]
pub fn is_default(name: &str) -> bool {
    name == DEFAULT_NETWORK
}

/// Builds `docker network create <name>`.
#[must_use]
pub fn create_command(name: &str) -> CommandLine {
    CommandLine::with_args(DOCKER_BIN, ["network", "create", name])
}

/// Produces a create-command for every declared network, in declaration order.
///
/// Whether a command is emitted is decided later from the networks the
/// in-scope services actually attach.
pub fn resolve_networks(networks: &[Network]) -> Vec<(String, CommandLine)> {
    networks
        .iter()
        .map(|network| {
            tracing::debug!(network = %network.name, "resolved network");
            (network.name.clone(), create_command(&network.name))
        })
        .collect()
}
