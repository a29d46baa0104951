//! Compose variable substitution.
//!
//! Supported forms: `$$` (a literal `$`), `$VAR`, `${VAR}`,
//! `${VAR:-default}` (default when unset or empty), and `${VAR-default}`
//! (default when unset). Unset variables without a default become empty.

use std::collections::HashMap;

use decompose_common::error::{DecomposeError, Result};
use regex::{Captures, Regex};
use serde_yaml::Value;

const PATTERN: &str = r"\$(?:(?P<escaped>\$)|\{(?P<braced>[A-Za-z_][A-Za-z0-9_]*)(?:(?P<sep>:?-)(?P<default>[^}]*))?\}|(?P<named>[A-Za-z_][A-Za-z0-9_]*))";

/// Substitutes variables from a fixed environment.
#[derive(Debug)]
pub struct Interpolator<'a> {
    env: &'a HashMap<String, String>,
    pattern: Regex,
}

impl<'a> Interpolator<'a> {
    /// Creates an interpolator over `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the substitution pattern fails to compile.
    pub fn new(env: &'a HashMap<String, String>) -> Result<Self> {
        let pattern = Regex::new(PATTERN).map_err(|e| DecomposeError::Config {
            message: format!("variable substitution pattern: {e}"),
        })?;
        Ok(Self { env, pattern })
    }

    /// Substitutes every variable reference in `input`.
    #[must_use]
    pub fn interpolate(&self, input: &str) -> String {
        if !input.contains('$') {
            return input.to_owned();
        }
        self.pattern
            .replace_all(input, |caps: &Captures<'_>| self.substitute(caps))
            .into_owned()
    }

    /// Substitutes variables in every string scalar of a YAML tree.
    pub fn interpolate_value(&self, value: &mut Value) {
        match value {
            Value::String(s) => *s = self.interpolate(s),
            Value::Sequence(items) => items.iter_mut().for_each(|v| self.interpolate_value(v)),
            Value::Mapping(map) => map.values_mut().for_each(|v| self.interpolate_value(v)),
            Value::Tagged(tagged) => self.interpolate_value(&mut tagged.value),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    fn substitute(&self, caps: &Captures<'_>) -> String {
        if caps.name("escaped").is_some() {
            return "$".to_owned();
        }
        let Some(name) = caps.name("braced").or_else(|| caps.name("named")) else {
            return String::new();
        };
        let name = name.as_str();
        let value = self.env.get(name);
        let default = caps.name("default").map_or("", |m| m.as_str());

        match (caps.name("sep").map(|m| m.as_str()), value) {
            (Some(":-"), Some(v)) if v.is_empty() => default.to_owned(),
            (Some(_), None) => default.to_owned(),
            (_, Some(v)) => v.clone(),
            (None, None) => {
                tracing::warn!(variable = name, "variable is not set, substituting an empty string");
                String::new()
            }
        }
    }
}
