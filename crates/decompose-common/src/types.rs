//! The resolved project model handed from the loader to the core.
//!
//! Every collection keeps declaration order so that the generated
//! commands are reproducible run to run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecomposeError;

/// A fully resolved compose project: services, networks, and volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Declared services, in declaration order.
    pub services: Vec<Service>,
    /// Declared top-level networks.
    pub networks: Vec<Network>,
    /// Declared top-level volumes.
    pub volumes: Vec<Volume>,
}

impl Project {
    /// Looks up a service by its declared name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// One declared container workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service name.
    pub name: String,
    /// Image reference.
    pub image: Option<String>,
    /// Container name override.
    pub container_name: Option<String>,
    /// Build section, if the image is built locally.
    pub build: Option<BuildSpec>,
    /// Environment variables; `None` values pass the bare name through.
    pub environment: Vec<(String, Option<String>)>,
    /// Published ports.
    pub ports: Vec<PortMapping>,
    /// Volume and bind mounts.
    pub volumes: Vec<VolumeMount>,
    /// Attached network names, without duplicates.
    pub networks: Vec<String>,
    /// Container hostname.
    pub hostname: Option<String>,
    /// Declared restart policy, kept verbatim.
    pub restart: Option<String>,
    /// Entrypoint override tokens. Empty means no override.
    pub entrypoint: Vec<String>,
    /// Command override tokens. Empty means the image default.
    pub command: Vec<String>,
    /// Names of services this one depends on.
    pub depends_on: Vec<String>,
}

impl Service {
    /// Creates a service with the given name and no configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A `build:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    /// Dockerfile path relative to the context.
    pub dockerfile: Option<String>,
    /// Build context. Falls back to the current directory.
    pub context: Option<String>,
    /// Build arguments; `None` values pass the bare name through.
    pub args: Vec<(String, Option<String>)>,
    /// Images to use as cache sources.
    pub cache_from: Vec<String>,
    /// Target build stage.
    pub target: Option<String>,
}

/// A `host:container` port publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    /// Host side, optionally prefixed with a bind address.
    pub published: String,
    /// Container side.
    pub target: String,
}

impl PortMapping {
    /// Creates a port mapping.
    #[must_use]
    pub fn new(published: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            published: published.into(),
            target: target.into(),
        }
    }
}

/// Kind of a service mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    /// A named volume, resolved through the project's volume table.
    Volume,
    /// A host path.
    Bind,
    /// An in-memory filesystem.
    Tmpfs,
    /// A Windows named pipe.
    Npipe,
}

impl fmt::Display for MountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume => write!(f, "volume"),
            Self::Bind => write!(f, "bind"),
            Self::Tmpfs => write!(f, "tmpfs"),
            Self::Npipe => write!(f, "npipe"),
        }
    }
}

impl FromStr for MountKind {
    type Err = DecomposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volume" => Ok(Self::Volume),
            "bind" => Ok(Self::Bind),
            "tmpfs" => Ok(Self::Tmpfs),
            "npipe" => Ok(Self::Npipe),
            other => Err(DecomposeError::Config {
                message: format!("unknown mount type: {other}"),
            }),
        }
    }
}

/// One mount of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    /// Volume name or host path. May be empty for anonymous volumes.
    pub source: String,
    /// Path inside the container.
    pub target: String,
    /// Mount kind.
    pub kind: MountKind,
}

impl VolumeMount {
    /// Creates a mount.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: MountKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// A declared top-level network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Network name.
    pub name: String,
}

impl Network {
    /// Creates a network declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A declared top-level volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume name.
    pub name: String,
    /// Host path from `driver_opts.device`, if any.
    pub device: Option<String>,
}

impl Volume {
    /// Creates a volume declaration without a device override.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            device: None,
        }
    }

    /// Sets the host-device override.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_finds_service_by_name() {
        let project = Project {
            services: vec![Service::new("web"), Service::new("db")],
            ..Project::default()
        };
        assert_eq!(project.service("db").map(|s| s.name.as_str()), Some("db"));
        assert!(project.service("cache").is_none());
    }

    #[test]
    fn mount_kind_parses_known_types() {
        assert_eq!("volume".parse::<MountKind>().ok(), Some(MountKind::Volume));
        assert_eq!("bind".parse::<MountKind>().ok(), Some(MountKind::Bind));
        assert!("cluster".parse::<MountKind>().is_err());
    }

    #[test]
    fn mount_kind_display_matches_compose_names() {
        assert_eq!(MountKind::Tmpfs.to_string(), "tmpfs");
        assert_eq!(MountKind::Volume.to_string(), "volume");
    }

    #[test]
    fn volume_device_override() {
        let vol = Volume::new("pgdata").with_device("/var/pgdata");
        assert_eq!(vol.device.as_deref(), Some("/var/pgdata"));
        assert!(Volume::new("cache").device.is_none());
    }
}
