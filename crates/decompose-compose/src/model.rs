//! Raw docker-compose file shapes.
//!
//! Only the keys with a single-container equivalent are modelled; anything
//! else in the file is ignored. Maps are kept as [`Mapping`] so that
//! declaration order survives deserialization.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Top-level compose file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComposeFile {
    /// Service name to service definition.
    pub services: Mapping,
    /// Network name to (ignored) network options.
    pub networks: Mapping,
    /// Volume name to volume options.
    pub volumes: Mapping,
}

/// One entry under `services:`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Image name
    pub image: Option<String>,
    /// Container name
    pub container_name: Option<String>,
    /// Build configuration
    pub build: Option<BuildConfig>,
    /// Environment variables
    pub environment: Option<KeyValues>,
    /// Environment files, relative to the compose file
    pub env_file: Option<EnvFileConfig>,
    /// Port mappings
    pub ports: Vec<PortConfig>,
    /// Volume mounts
    pub volumes: Vec<VolumeMountConfig>,
    /// Networks to connect to
    pub networks: Option<NameList>,
    /// Hostname
    pub hostname: Option<String>,
    /// Restart policy
    pub restart: Option<String>,
    /// Entrypoint
    pub entrypoint: Option<CommandConfig>,
    /// Command to run
    pub command: Option<CommandConfig>,
    /// Service dependencies
    pub depends_on: Option<NameList>,
}

/// `build:` in short or long form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BuildConfig {
    /// Context path only.
    Simple(String),
    /// Full build configuration.
    Full(BuildConfigFull),
}

/// Long-form `build:`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfigFull {
    /// Build context
    pub context: Option<String>,
    /// Dockerfile path
    pub dockerfile: Option<String>,
    /// Build arguments
    pub args: Option<KeyValues>,
    /// Cache from images
    pub cache_from: Vec<String>,
    /// Target stage
    pub target: Option<String>,
}

/// `KEY: value` map or `KEY=value` list, as used by `environment` and `args`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyValues {
    /// Array of `KEY=value` or bare `KEY` strings.
    List(Vec<String>),
    /// Map of key to scalar or null.
    Map(Mapping),
}

/// `env_file:` as a single path or a list of paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvFileConfig {
    /// Single file
    Single(String),
    /// Multiple files
    Multiple(Vec<String>),
}

impl EnvFileConfig {
    /// The declared paths, in order.
    #[must_use]
    pub fn into_paths(self) -> Vec<String> {
        match self {
            Self::Single(path) => vec![path],
            Self::Multiple(paths) => paths,
        }
    }
}

/// A list of names, or a map whose keys are the names.
///
/// Covers `networks` and `depends_on`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    /// Array of names.
    List(Vec<String>),
    /// Map keyed by name; values are ignored.
    Map(Mapping),
}

/// `command` / `entrypoint`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommandConfig {
    /// Shell string, split on whitespace.
    Shell(String),
    /// Exec form array.
    Exec(Vec<String>),
}

/// One entry under `ports:`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortConfig {
    /// Long syntax.
    Long(PortConfigLong),
    /// Bare container port number.
    Number(u32),
    /// Short syntax: `"8080:80"`.
    Short(String),
}

/// Long port syntax.
#[derive(Debug, Clone, Deserialize)]
pub struct PortConfigLong {
    /// Target port in container
    pub target: u32,
    /// Published port on host
    #[serde(default)]
    pub published: Option<Value>,
    /// Host IP to bind to
    #[serde(default)]
    pub host_ip: Option<String>,
}

/// One entry under a service's `volumes:`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VolumeMountConfig {
    /// Short syntax: `"source:target[:mode]"`.
    Short(String),
    /// Long syntax.
    Long(VolumeMountLong),
}

/// Long volume mount syntax.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeMountLong {
    /// Mount type (volume, bind, tmpfs, npipe)
    #[serde(rename = "type", default)]
    pub mount_type: Option<String>,
    /// Source path or volume name
    #[serde(default)]
    pub source: Option<String>,
    /// Target path in container
    pub target: String,
}

/// One entry under top-level `volumes:`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Driver-specific options, including `device`.
    pub driver_opts: Mapping,
}

/// Renders a YAML scalar as a string; `None` for null and collections.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
