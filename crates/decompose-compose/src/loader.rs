//! Loading a compose file into a resolved [`Project`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use decompose_common::constants::{DEFAULT_DOCKERFILE, DEFAULT_NETWORK, DRIVER_OPT_DEVICE};
use decompose_common::error::{DecomposeError, Result};
use decompose_common::types::{
    BuildSpec, MountKind, Network, PortMapping, Project, Service, Volume, VolumeMount,
};
use serde_yaml::{Mapping, Value};

use crate::interpolate::Interpolator;
use crate::model::{
    BuildConfig, CommandConfig, ComposeFile, EnvFileConfig, KeyValues, NameList, PortConfig,
    ServiceConfig, VolumeConfig, VolumeMountConfig, scalar_to_string,
};

/// Where to read the project from and how to build its environment.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Compose file path.
    pub compose_file: PathBuf,
    /// Env file applied before the process environment, if any.
    pub env_file: Option<PathBuf>,
    /// Whether the process environment takes part in substitution.
    pub inherit_env: bool,
}

impl LoadOptions {
    /// Options reading `compose_file` with the process environment only.
    #[must_use]
    pub fn new(compose_file: impl Into<PathBuf>) -> Self {
        Self {
            compose_file: compose_file.into(),
            env_file: None,
            inherit_env: true,
        }
    }
}

/// Reads, substitutes, and normalizes a compose file.
///
/// # Errors
///
/// Returns an error if the compose or env file cannot be read, or the
/// compose file is not a valid compose document.
pub fn load(opts: &LoadOptions) -> Result<Project> {
    tracing::info!(path = %opts.compose_file.display(), "loading compose file");
    let env = crate::env::environment(opts.env_file.as_deref(), opts.inherit_env)?;
    let content = std::fs::read_to_string(&opts.compose_file).map_err(|e| DecomposeError::Io {
        path: opts.compose_file.clone(),
        source: e,
    })?;
    load_str(&content, &opts.compose_file, &env)
}

/// Normalizes compose file `content` using `env` for substitution.
///
/// `path` names the file in error messages, and its directory anchors
/// relative `env_file` entries.
///
/// # Errors
///
/// Returns an error if `content` is not a valid compose document.
pub fn load_str(content: &str, path: &Path, env: &HashMap<String, String>) -> Result<Project> {
    let parse_err = |message: String| DecomposeError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut document: Value = serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
    if document.is_null() {
        document = Value::Mapping(Mapping::new());
    }
    document.apply_merge().map_err(|e| parse_err(e.to_string()))?;
    Interpolator::new(env)?.interpolate_value(&mut document);
    let file: ComposeFile = serde_yaml::from_value(document).map_err(|e| parse_err(e.to_string()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut services = Vec::with_capacity(file.services.len());
    for (key, value) in file.services {
        let name = key_name(&key).map_err(&parse_err)?;
        let mut config: ServiceConfig = if value.is_null() {
            ServiceConfig::default()
        } else {
            serde_yaml::from_value(value).map_err(|e| parse_err(format!("service \"{name}\": {e}")))?
        };
        let file_vars = env_file_vars(config.env_file.take(), base_dir)?;
        services.push(service(name, config, file_vars, env).map_err(&parse_err)?);
    }

    let networks = file
        .networks
        .keys()
        .map(|k| key_name(k).map(Network::new))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(&parse_err)?;

    let mut volumes = Vec::with_capacity(file.volumes.len());
    for (key, value) in file.volumes {
        let name = key_name(&key).map_err(&parse_err)?;
        let config: VolumeConfig = if value.is_null() {
            VolumeConfig::default()
        } else {
            serde_yaml::from_value(value).map_err(|e| parse_err(format!("volume \"{name}\": {e}")))?
        };
        volumes.push(volume(name, &config));
    }

    tracing::debug!(
        services = services.len(),
        networks = networks.len(),
        volumes = volumes.len(),
        "compose file loaded"
    );
    Ok(Project {
        services,
        networks,
        volumes,
    })
}

fn key_name(key: &Value) -> std::result::Result<String, String> {
    scalar_to_string(key).ok_or_else(|| format!("invalid key: {key:?}"))
}

fn env_file_vars(
    config: Option<EnvFileConfig>,
    base_dir: &Path,
) -> Result<Vec<(String, String)>> {
    let mut vars = Vec::new();
    for path in config.map(EnvFileConfig::into_paths).unwrap_or_default() {
        vars.extend(crate::env::read_env_file(&base_dir.join(path))?);
    }
    Ok(vars)
}

fn upsert(vars: &mut Vec<(String, Option<String>)>, key: String, value: Option<String>) {
    match vars.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => vars.push((key, value)),
    }
}

/// Env file variables overridden by `environment:` entries.
///
/// Entries without a value take it from `env`; when `env` has none either,
/// an env file value for the same key is kept.
fn merge_environment(
    file_vars: Vec<(String, String)>,
    declared: Vec<(String, Option<String>)>,
    env: &HashMap<String, String>,
) -> Vec<(String, Option<String>)> {
    let mut merged = Vec::with_capacity(file_vars.len() + declared.len());
    for (key, value) in file_vars {
        upsert(&mut merged, key, Some(value));
    }
    for (key, value) in declared {
        match value.or_else(|| env.get(&key).cloned()) {
            Some(value) => upsert(&mut merged, key, Some(value)),
            None if merged.iter().any(|(k, _)| *k == key) => {}
            None => merged.push((key, None)),
        }
    }
    merged
}

fn service(
    name: String,
    config: ServiceConfig,
    file_vars: Vec<(String, String)>,
    env: &HashMap<String, String>,
) -> std::result::Result<Service, String> {
    let context = |e: String| format!("service \"{name}\": {e}");
    let declared = config
        .environment
        .map(key_values)
        .transpose()
        .map_err(context)?
        .unwrap_or_default();
    let environment = merge_environment(file_vars, declared, env);
    let networks = match config.networks {
        Some(list) => dedup(names(list).map_err(context)?),
        None => vec![DEFAULT_NETWORK.to_owned()],
    };
    let depends_on = config
        .depends_on
        .map(names)
        .transpose()
        .map_err(context)?
        .map(dedup)
        .unwrap_or_default();
    let build = config.build.map(build_spec).transpose().map_err(context)?;

    Ok(Service {
        image: config.image,
        container_name: config.container_name,
        build,
        environment,
        ports: config.ports.into_iter().map(port_mapping).collect(),
        volumes: config.volumes.into_iter().map(volume_mount).collect(),
        networks,
        hostname: config.hostname,
        restart: config.restart,
        entrypoint: config.entrypoint.map(tokens).unwrap_or_default(),
        command: config.command.map(tokens).unwrap_or_default(),
        depends_on,
        name,
    })
}

fn build_spec(config: BuildConfig) -> std::result::Result<BuildSpec, String> {
    let spec = match config {
        BuildConfig::Simple(context) => BuildSpec {
            context: Some(context),
            ..BuildSpec::default()
        },
        BuildConfig::Full(full) => BuildSpec {
            dockerfile: full.dockerfile,
            context: full.context,
            args: full.args.map(key_values).transpose()?.unwrap_or_default(),
            cache_from: full.cache_from,
            target: full.target,
        },
    };
    Ok(BuildSpec {
        dockerfile: spec
            .dockerfile
            .filter(|d| !d.is_empty())
            .or_else(|| Some(DEFAULT_DOCKERFILE.to_owned())),
        ..spec
    })
}

fn key_values(config: KeyValues) -> std::result::Result<Vec<(String, Option<String>)>, String> {
    match config {
        KeyValues::List(items) => Ok(items
            .into_iter()
            .map(|item| match item.split_once('=') {
                Some((k, v)) => (k.to_owned(), Some(v.to_owned())),
                None => (item, None),
            })
            .collect()),
        KeyValues::Map(map) => map
            .iter()
            .map(|(k, v)| Ok((key_name(k)?, scalar_to_string(v))))
            .collect(),
    }
}

fn names(config: NameList) -> std::result::Result<Vec<String>, String> {
    match config {
        NameList::List(items) => Ok(items),
        NameList::Map(map) => map.keys().map(key_name).collect(),
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn tokens(config: CommandConfig) -> Vec<String> {
    match config {
        CommandConfig::Shell(line) => line.split_whitespace().map(str::to_owned).collect(),
        CommandConfig::Exec(args) => args,
    }
}

fn port_mapping(config: PortConfig) -> PortMapping {
    match config {
        PortConfig::Number(port) => PortMapping::new(port.to_string(), port.to_string()),
        PortConfig::Short(spec) => {
            let spec = spec.split_once('/').map_or(spec.as_str(), |(ports, _proto)| ports);
            match spec.rsplit_once(':') {
                Some((published, target)) => PortMapping::new(published, target),
                None => PortMapping::new(spec, spec),
            }
        }
        PortConfig::Long(long) => {
            let target = long.target.to_string();
            let published = long
                .published
                .as_ref()
                .and_then(scalar_to_string)
                .unwrap_or_else(|| target.clone());
            let published = match long.host_ip.filter(|ip| !ip.is_empty()) {
                Some(ip) => format!("{ip}:{published}"),
                None => published,
            };
            PortMapping::new(published, target)
        }
    }
}

fn is_host_path(source: &str) -> bool {
    source.starts_with(['/', '.', '~'])
}

fn volume_mount(config: VolumeMountConfig) -> VolumeMount {
    match config {
        VolumeMountConfig::Short(spec) => {
            let mut parts = spec.splitn(3, ':');
            let first = parts.next().unwrap_or_default();
            match parts.next() {
                Some(target) => {
                    let kind = if is_host_path(first) {
                        MountKind::Bind
                    } else {
                        MountKind::Volume
                    };
                    VolumeMount::new(first, target, kind)
                }
                None => VolumeMount::new("", first, MountKind::Volume),
            }
        }
        VolumeMountConfig::Long(long) => {
            let source = long.source.unwrap_or_default();
            let kind = long
                .mount_type
                .as_deref()
                .and_then(|t| t.parse().ok())
                .unwrap_or(if is_host_path(&source) {
                    MountKind::Bind
                } else {
                    MountKind::Volume
                });
            VolumeMount::new(source, long.target, kind)
        }
    }
}

fn volume(name: String, config: &VolumeConfig) -> Volume {
    let device = config
        .driver_opts
        .get(DRIVER_OPT_DEVICE)
        .and_then(scalar_to_string)
        .filter(|d| !d.is_empty());
    Volume { name, device }
}
