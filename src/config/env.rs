//! Environment binding.
//!
//! Every schema option is bound to `VULNMAP_IAC_CAPTURE_<NORMALIZED_NAME>`.
//! One value sits outside that rule: the extra trusted CA bundle is read
//! from the unprefixed `NODE_EXTRA_CA_CERTS`, the variable the Vulnmap
//! node CLI already exports when it shells out to this tool.
//!
//! Environment access goes through [`EnvSource`] so resolution can run
//! against a fixed map instead of the process environment.

use std::collections::HashMap;

use crate::config::normalize::{env_var_name, normalize};
use crate::config::schema::Schema;
use crate::{Error, Result};

/// Prefix for every bound environment variable.
pub const ENV_PREFIX: &str = "VULNMAP_IAC_CAPTURE";

/// Unprefixed variable holding the extra CA certificate path.
pub const NODE_EXTRA_CA_CERTS_ENV: &str = "NODE_EXTRA_CA_CERTS";

/// Read access to environment variables.
pub trait EnvSource {
    /// Value of `name`, or `None` if unset or not valid unicode.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// One option-to-variable binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Normalized option key.
    pub key: String,
    /// Bound environment variable name.
    pub var: String,
}

/// The set of environment bindings for a schema.
#[derive(Debug, Clone)]
pub struct Bindings {
    prefix: String,
    entries: Vec<Binding>,
}

impl Bindings {
    /// Start an empty binding set under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    /// Bind one option.
    ///
    /// Fails with [`Error::UnknownOption`] if `name` is not registered in
    /// `schema`. Binding the same option twice is a no-op.
    pub fn bind(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let def = schema
            .get(name)
            .ok_or_else(|| Error::UnknownOption(name.to_string()))?;
        let key = def.key();
        if self.entries.iter().any(|b| b.key == key) {
            return Ok(());
        }
        self.entries.push(Binding {
            var: env_var_name(&self.prefix, def.name),
            key,
        });
        Ok(())
    }

    /// Bound variable name for an option, by either spelling.
    pub fn var_for(&self, name: &str) -> Option<&str> {
        let key = normalize(name);
        self.entries
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.var.as_str())
    }

    /// Read the bound variable for `name`.
    ///
    /// Returns the variable name with its value. Empty values count as unset.
    pub fn lookup(&self, name: &str, env: &dyn EnvSource) -> Option<(String, String)> {
        let var = self.var_for(name)?;
        env.var(var)
            .filter(|v| !v.is_empty())
            .map(|v| (var.to_string(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }
}

/// Bind every option in `schema`, disabled ones included.
pub fn bind_schema(schema: &Schema, prefix: &str) -> Result<Bindings> {
    let mut bindings = Bindings::new(prefix);
    for def in schema.options() {
        bindings.bind(schema, def.name)?;
    }
    Ok(bindings)
}

/// Extra CA certificate path from `NODE_EXTRA_CA_CERTS`, or empty.
pub fn extra_ca_certs(env: &dyn EnvSource) -> String {
    env.var(NODE_EXTRA_CA_CERTS_ENV).unwrap_or_default()
}

/// Parse a boolean the way flags and environment values are written.
///
/// Accepts `1 t true` and `0 f false` in any letter case. Surrounding
/// whitespace is not trimmed.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
