//! Final command sequence assembly.

use std::collections::BTreeSet;

use decompose_common::config::Options;

use crate::command::CommandLine;
use crate::synth::ServiceCommands;

/// Everything computed for one run, ready to be assembled.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Create-command for every declared network, in declaration order.
    pub network_commands: Vec<(String, CommandLine)>,
    /// Networks attached by at least one in-scope service.
    pub used_networks: BTreeSet<String>,
    /// Per-service commands in emission order.
    pub services: Vec<ServiceCommands>,
}

impl Plan {
    /// Create-commands of the networks in-scope services actually use.
    pub fn used_network_commands(&self) -> impl Iterator<Item = &CommandLine> {
        self.network_commands
            .iter()
            .filter(|(name, _)| self.used_networks.contains(name))
            .map(|(_, cmd)| cmd)
    }
}

/// Flattens a plan into the ordered command sequence requested by `options`.
///
/// Network creation comes first, then each service's build command followed
/// immediately by its run command.
pub fn assemble<'a>(plan: &'a Plan, options: &Options) -> Vec<&'a CommandLine> {
    let mut commands = Vec::new();
    if options.include_networks {
        commands.extend(plan.used_network_commands());
    }
    for service in &plan.services {
        if options.include_build {
            commands.extend(service.build.as_ref());
        }
        if options.include_run {
            commands.push(&service.run);
        }
    }
    commands
}
