//! Command-line arguments and dispatch.

use std::path::{Path, PathBuf};

use clap::Parser;
use decompose_common::config::{Options, RestartPolicy};
use decompose_common::constants::{DEFAULT_COMPOSE_FILE, DEFAULT_ENV_FILE};
use decompose_compose::LoadOptions;

/// Decompose docker compose files to docker build and run commands.
#[derive(Parser, Debug)]
#[command(name = decompose_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Path to a docker-compose.yaml file.
    #[arg(default_value = DEFAULT_COMPOSE_FILE)]
    pub compose_file: PathBuf,

    /// Service names to decompose. Defaults to all services in the compose file.
    pub services: Vec<String>,

    /// Skip printing docker-build commands.
    #[arg(long)]
    pub no_build: bool,

    /// Skip printing docker-run commands.
    #[arg(long)]
    pub no_run: bool,

    /// Skip printing docker-network-create commands.
    #[arg(long)]
    pub no_network: bool,

    /// Don't pass on external environment variables.
    #[arg(long)]
    pub no_env_inherit: bool,

    /// Env file applied when rendering the compose file. Skipped if it does not exist.
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    pub env: PathBuf,

    /// Restart flag for docker-run, one of [no, always, on-failure, unless-stopped].
    /// Taken from the compose file when not given.
    #[arg(short, long)]
    pub restart: Option<String>,

    /// Print the commands as a JSON array.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Loader options, dropping an env file that does not exist.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            compose_file: self.compose_file.clone(),
            env_file: existing_env_file(&self.env),
            inherit_env: !self.no_env_inherit,
        }
    }

    /// Decompose options, ignoring an invalid restart value.
    pub fn options(&self) -> Options {
        Options {
            include_build: !self.no_build,
            include_run: !self.no_run,
            include_networks: !self.no_network,
            restart: self.restart.as_deref().and_then(restart_policy),
            services: self.services.clone(),
        }
    }
}

fn existing_env_file(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    if path != Path::new(DEFAULT_ENV_FILE) {
        tracing::warn!(path = %path.display(), "env file does not exist, skipping");
    }
    None
}

fn restart_policy(value: &str) -> Option<RestartPolicy> {
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(policy) => Some(policy),
        Err(e) => {
            tracing::warn!("{e}, defaulting to compose config");
            None
        }
    }
}

/// Loads the compose file, decomposes it, and prints the commands.
///
/// # Errors
///
/// Returns an error if the compose file is missing or invalid, or the
/// services depend on each other in a cycle.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    if !cli.compose_file.exists() {
        anyhow::bail!(
            "docker compose file does not exist at '{}'",
            cli.compose_file.display()
        );
    }

    let project = decompose_compose::load(&cli.load_options())?;
    let commands = decompose_core::decompose(&project, &cli.options())?;

    let rendered = if cli.json {
        crate::output::render_json(&commands)?
    } else {
        crate::output::render_text(&commands)
    };
    print!("{rendered}");
    Ok(())
}
