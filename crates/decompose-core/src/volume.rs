//! Named-volume host path resolution.

use std::collections::HashMap;

use decompose_common::types::Volume;

/// Mapping from declared volume name to the host path it mounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumePaths {
    paths: HashMap<String, String>,
}

impl VolumePaths {
    /// Returns the resolved path of a declared volume.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.paths.get(name).map(String::as_str)
    }

    /// Resolves a mount source, keeping the raw name for undeclared volumes.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    /// Number of declared volumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no volumes were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Maps every declared volume to its host path.
///
/// The path is the volume's own name unless a non-empty `driver_opts.device`
/// overrides it. Volumes no service mounts are resolved all the same.
pub fn resolve_volumes(volumes: &[Volume]) -> VolumePaths {
    let paths = volumes
        .iter()
        .map(|volume| {
            let path = volume
                .device
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(&volume.name);
            tracing::debug!(volume = %volume.name, path, "resolved volume");
            (volume.name.clone(), path.to_owned())
        })
        .collect();
    VolumePaths { paths }
}
