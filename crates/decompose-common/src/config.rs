//! Options controlling a single decompose run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecomposeError;

/// Container restart policy accepted as a run-wide override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Never restart.
    No,
    /// Always restart.
    Always,
    /// Restart on a non-zero exit.
    OnFailure,
    /// Restart unless explicitly stopped.
    UnlessStopped,
}

impl RestartPolicy {
    /// Returns the flag value understood by `docker run --restart`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestartPolicy {
    type Err = DecomposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(Self::No),
            "always" => Ok(Self::Always),
            "on-failure" => Ok(Self::OnFailure),
            "unless-stopped" => Ok(Self::UnlessStopped),
            other => Err(DecomposeError::Config {
                message: format!(
                    "invalid restart value \"{other}\", expected one of [no, always, on-failure, unless-stopped]"
                ),
            }),
        }
    }
}

/// What to emit and how to override per-service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Emit `docker build` commands.
    pub include_build: bool,
    /// Emit `docker run` commands.
    pub include_run: bool,
    /// Emit `docker network create` commands.
    pub include_networks: bool,
    /// Restart policy applied to every service, replacing their own.
    pub restart: Option<RestartPolicy>,
    /// Services to decompose. Empty means all of them.
    pub services: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            include_build: true,
            include_run: true,
            include_networks: true,
            restart: None,
            services: Vec::new(),
        }
    }
}
