//! # decompose-core
//!
//! Turns a resolved compose [`Project`] into the `docker network create`,
//! `docker build`, and `docker run` commands that reproduce it without an
//! orchestrator.
//!
//! Each phase reads the results of the previous one:
//! - **Volume**: named-volume host paths.
//! - **Network**: create-commands for declared networks.
//! - **Filter**: the in-scope services.
//! - **Synth**: build and run commands per service.
//! - **Scheduler**: dependency-respecting order.
//! - **Assembler**: the final command sequence.

pub mod assembler;
pub mod command;
pub mod filter;
pub mod network;
pub mod scheduler;
pub mod synth;
pub mod volume;

use std::collections::{BTreeSet, HashMap};

use decompose_common::config::Options;
use decompose_common::error::Result;
use decompose_common::types::{Project, Service};

use crate::assembler::Plan;
use crate::scheduler::DependencyGraph;
use crate::synth::{ServiceCommands, SynthContext};

/// Computes every command for `project` without flattening them.
///
/// # Errors
///
/// Returns an error if the in-scope services depend on each other in a cycle.
pub fn plan(project: &Project, options: &Options) -> Result<Plan> {
    let volumes = volume::resolve_volumes(&project.volumes);
    let network_commands = network::resolve_networks(&project.networks);

    let services = filter::filter_services(&project.services, &options.services);
    tracing::info!(
        in_scope = services.len(),
        declared = project.services.len(),
        "decomposing services"
    );
    warn_undeclared_dependencies(project, &services);

    let ctx = SynthContext {
        volumes: &volumes,
        restart: options.restart,
    };
    let mut synthesized: HashMap<String, ServiceCommands> = services
        .iter()
        .map(|s| (s.name.clone(), synth::synthesize(s, ctx)))
        .collect();

    let used_networks: BTreeSet<String> = synthesized
        .values()
        .flat_map(|s| s.networks.iter().cloned())
        .collect();

    let order = DependencyGraph::from_services(services.iter().copied()).resolve_order()?;
    let services = order
        .iter()
        .filter_map(|name| synthesized.remove(name))
        .collect();

    Ok(Plan {
        network_commands,
        used_networks,
        services,
    })
}

/// Decomposes `project` into ordered, printable commands.
///
/// # Errors
///
/// Returns an error if the in-scope services depend on each other in a cycle.
pub fn decompose(project: &Project, options: &Options) -> Result<Vec<String>> {
    let plan = plan(project, options)?;
    let commands: Vec<String> = assembler::assemble(&plan, options)
        .into_iter()
        .map(ToString::to_string)
        .collect();
    tracing::info!(commands = commands.len(), "decomposition complete");
    Ok(commands)
}

fn warn_undeclared_dependencies(project: &Project, services: &[&Service]) {
    for service in services {
        for dep in &service.depends_on {
            if project.service(dep).is_none() {
                tracing::warn!(
                    service = %service.name,
                    dependency = %dep,
                    "dependency names no declared service, ignoring"
                );
            }
        }
    }
}
