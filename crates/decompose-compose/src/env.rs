//! Environment assembly for variable substitution.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

use decompose_common::error::{DecomposeError, Result};

/// Parses `KEY=VALUE` lines of an env file.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is
/// accepted, and one level of matching single or double quotes is removed.
pub fn parse_env(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_owned(), unquote(value.trim()).to_owned()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Reads and parses an env file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path).map_err(|e| DecomposeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let vars = parse_env(&content);
    tracing::debug!(path = %path.display(), count = vars.len(), "read env file");
    Ok(vars)
}

/// Builds the substitution environment.
///
/// Starts from the env file, then overlays the process environment unless
/// `inherit` is off. Process values win over file values.
///
/// # Errors
///
/// Returns an error if the env file cannot be read.
pub fn environment(env_file: Option<&Path>, inherit: bool) -> Result<HashMap<String, String>> {
    let mut env: HashMap<String, String> = match env_file {
        Some(path) => read_env_file(path)?.into_iter().collect(),
        None => HashMap::new(),
    };
    if inherit {
        env.extend(unicode_vars(std::env::vars_os()));
    }
    Ok(env)
}

/// Keeps the variables whose name and value are both valid Unicode.
fn unicode_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> impl Iterator<Item = (String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(variable = ?key, "skipping non-unicode environment variable");
                None
            }
        })
}
