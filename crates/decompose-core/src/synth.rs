//! Command synthesis: `docker build` and `docker run` for one service.

use decompose_common::config::RestartPolicy;
use decompose_common::constants::{DEFAULT_BUILD_CONTEXT, DOCKER_BIN};
use decompose_common::types::{BuildSpec, MountKind, Service};

use crate::command::{CommandLine, key_value};
use crate::network;
use crate::volume::VolumePaths;

/// The commands generated for one in-scope service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommands {
    /// Service name.
    pub name: String,
    /// Build command, present when the service declares a build section.
    pub build: Option<CommandLine>,
    /// Run command.
    pub run: CommandLine,
    /// User-defined networks the run command attaches.
    pub networks: Vec<String>,
}

/// Inputs shared by every service's synthesis.
#[derive(Debug, Clone, Copy)]
pub struct SynthContext<'a> {
    /// Resolved named-volume paths.
    pub volumes: &'a VolumePaths,
    /// Run-wide restart override.
    pub restart: Option<RestartPolicy>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Name used as the image tag and image argument.
///
/// Precedence: image reference, then container name, then service name.
#[must_use]
pub fn effective_name(service: &Service) -> &str {
    non_empty(service.image.as_deref())
        .or_else(|| non_empty(service.container_name.as_deref()))
        .unwrap_or(&service.name)
}

/// Networks a service attaches, minus the implicit default network.
pub fn attached_networks(service: &Service) -> impl Iterator<Item = &str> {
    service
        .networks
        .iter()
        .map(String::as_str)
        .filter(|n| !network::is_default(n))
}

/// Builds the `docker build` command for a build section.
#[must_use]
pub fn build_command(build: &BuildSpec, image: &str) -> CommandLine {
    let mut cmd = CommandLine::with_args(DOCKER_BIN, ["build"]);
    if let Some(dockerfile) = non_empty(build.dockerfile.as_deref()) {
        cmd.flag("-f", dockerfile);
    }
    cmd.flag("-t", image);
    for (name, value) in &build.args {
        cmd.flag("--build-arg", key_value(name, value.as_deref(), '='));
    }
    for cache_from in &build.cache_from {
        cmd.flag("--cache-from", cache_from);
    }
    if let Some(target) = non_empty(build.target.as_deref()) {
        cmd.flag("--target", target);
    }
    cmd.bare(non_empty(build.context.as_deref()).unwrap_or(DEFAULT_BUILD_CONTEXT));
    cmd
}

/// Builds the `docker run` command for a service.
#[must_use]
pub fn run_command(service: &Service, image: &str, ctx: SynthContext<'_>) -> CommandLine {
    let mut cmd = CommandLine::with_args(DOCKER_BIN, ["run", "-d"]);
    cmd.flag("--name", &service.name);

    if !service.entrypoint.is_empty() {
        cmd.flag("--entrypoint", service.entrypoint.join(" "));
    }

    for (name, value) in &service.environment {
        cmd.flag("-e", key_value(name, value.as_deref(), '='));
    }

    for name in attached_networks(service) {
        cmd.flag("--network", name);
    }

    for port in &service.ports {
        cmd.flag("-p", format!("{}:{}", port.published, port.target));
    }

    let restart = ctx
        .restart
        .map(RestartPolicy::as_str)
        .or_else(|| non_empty(service.restart.as_deref()));
    if let Some(restart) = restart {
        cmd.flag("--restart", restart);
    }

    if let Some(hostname) = non_empty(service.hostname.as_deref()) {
        cmd.flag("-h", hostname);
    }

    for mount in &service.volumes {
        let source = match mount.kind {
            MountKind::Volume => ctx.volumes.resolve(&mount.source),
            _ => mount.source.as_str(),
        };
        if !source.is_empty() && !mount.target.is_empty() {
            cmd.flag("-v", key_value(source, Some(&mount.target), ':'));
        }
    }

    cmd.quoted(image);

    if !service.command.is_empty() {
        cmd.quoted(service.command.join(" "));
    }

    cmd
}

/// Synthesizes every command for one service.
#[must_use]
pub fn synthesize(service: &Service, ctx: SynthContext<'_>) -> ServiceCommands {
    let image = effective_name(service);
    tracing::debug!(service = %service.name, image, "synthesizing commands");
    ServiceCommands {
        name: service.name.clone(),
        build: service.build.as_ref().map(|b| build_command(b, image)),
        run: run_command(service, image, ctx),
        networks: attached_networks(service).map(str::to_owned).collect(),
    }
}
