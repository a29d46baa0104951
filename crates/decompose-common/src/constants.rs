//! System-wide constants and defaults.

/// Compose file read when no path is given on the command line.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yaml";

/// Env file applied when rendering the compose file, if it exists.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// The implicit per-project network. Never created, never attached.
pub const DEFAULT_NETWORK: &str = "default";

/// Build context used when a build section declares none.
pub const DEFAULT_BUILD_CONTEXT: &str = ".";

/// Dockerfile name assumed for every build section without one.
pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";

/// Container runtime CLI the generated commands invoke.
pub const DOCKER_BIN: &str = "docker";

/// Driver option naming the host path backing a volume.
pub const DRIVER_OPT_DEVICE: &str = "device";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "docker-decompose";
