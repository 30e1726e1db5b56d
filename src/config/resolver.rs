//! Precedence resolution for every schema option.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Flag explicitly passed on the command line
//! 2. Bound `VULNMAP_IAC_CAPTURE_*` environment variable (non-empty)
//! 3. Schema default
//!
//! Resolution is eager and all-or-nothing: [`resolve`] produces a complete
//! [`ResolvedConfig`] or an error, never a partial one.

use crate::cli::FlagValues;
use crate::config::env::{Bindings, EnvSource, NODE_EXTRA_CA_CERTS_ENV, extra_ca_certs, parse_bool};
use crate::config::normalize::normalize;
use crate::config::schema::{self, OptionDef, OptionKind, OptionValue, Schema};
use crate::{Error, Result};

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from a command-line flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Schema default
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved::new(f(self.value), self.source)
    }
}

/// Resolve one option.
///
/// Returns the value and, for an unparseable boolean environment value, a
/// warning. Such values resolve to `false` and still count as coming from
/// the environment.
pub fn resolve_option(
    def: &OptionDef,
    flags: &FlagValues,
    bindings: &Bindings,
    env: &dyn EnvSource,
) -> (Resolved<OptionValue>, Option<String>) {
    if def.enabled {
        if let Some(value) = flags.get(def.name) {
            return (Resolved::new(value.clone(), ValueSource::CliFlag), None);
        }
    }

    if let Some((var, raw)) = bindings.lookup(def.name, env) {
        let source = ValueSource::EnvVar(var.clone());
        return match def.kind() {
            OptionKind::String => (Resolved::new(OptionValue::String(raw), source), None),
            OptionKind::Bool => match parse_bool(&raw) {
                Some(b) => (Resolved::new(OptionValue::Bool(b), source), None),
                None => (
                    Resolved::new(OptionValue::Bool(false), source),
                    Some(format!("{}: invalid boolean {:?}, using false", var, raw)),
                ),
            },
        };
    }

    (Resolved::new(def.default.clone(), ValueSource::Default), None)
}

/// Fully resolved configuration with source tracking.
///
/// Built once per process by [`resolve`] and not modified afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub debug: Resolved<bool>,
    pub api_rest_url: Resolved<String>,
    pub path: Resolved<String>,
    pub api_rest_token: Resolved<String>,
    pub org: Resolved<String>,
    pub stdin: Resolved<bool>,
    /// Reserved option; only reachable through its environment binding.
    pub http_tls_skip_verify: Resolved<bool>,
    /// From the unprefixed `NODE_EXTRA_CA_CERTS`.
    pub extra_ca_certs: Resolved<String>,
    /// Problems found while reading environment values.
    pub warnings: Vec<String>,
}

impl ResolvedConfig {
    /// Get the masked API token for display purposes.
    pub fn masked_token(&self) -> String {
        let token = &self.api_rest_token.value;
        if token.is_empty() {
            String::new()
        } else if token.len() <= 12 {
            format!("{}...", token.get(..4.min(token.len())).unwrap_or(""))
        } else {
            format!(
                "{}...{}",
                token.get(..4).unwrap_or(""),
                token.get(token.len() - 4..).unwrap_or("")
            )
        }
    }

    /// One `name=value (source)` line per option, token masked.
    pub fn summary(&self) -> Vec<String> {
        let masked = Resolved::new(self.masked_token(), self.api_rest_token.source.clone());
        let rows: [(&str, String, &ValueSource); 8] = [
            (schema::DEBUG, self.debug.value.to_string(), &self.debug.source),
            (schema::API_REST_URL, self.api_rest_url.value.clone(), &self.api_rest_url.source),
            (schema::PATH, self.path.value.clone(), &self.path.source),
            (schema::API_REST_TOKEN, masked.value, &masked.source),
            (schema::ORG, self.org.value.clone(), &self.org.source),
            (schema::STDIN, self.stdin.value.to_string(), &self.stdin.source),
            (
                schema::HTTP_TLS_SKIP_VERIFY,
                self.http_tls_skip_verify.value.to_string(),
                &self.http_tls_skip_verify.source,
            ),
            (
                "extra-ca-certs",
                self.extra_ca_certs.value.clone(),
                &self.extra_ca_certs.source,
            ),
        ];
        rows.iter()
            .map(|(name, value, source)| format!("{}={:?} ({})", name, value, source))
            .collect()
    }
}

/// Resolve every option in `schema`.
///
/// Fails with [`Error::UnknownOption`] if the schema lacks one of the
/// options the capture command needs.
pub fn resolve(
    schema: &Schema,
    bindings: &Bindings,
    flags: &FlagValues,
    env: &dyn EnvSource,
) -> Result<ResolvedConfig> {
    let mut values = Vec::with_capacity(schema.len());
    let mut warnings = Vec::new();
    for def in schema.options() {
        let (resolved, warning) = resolve_option(def, flags, bindings, env);
        warnings.extend(warning);
        values.push((def.key(), resolved));
    }

    let take = |name: &str| -> Result<Resolved<OptionValue>> {
        let key = normalize(name);
        values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| Error::UnknownOption(name.to_string()))
    };

    let extra_ca_certs = match extra_ca_certs(env) {
        path if path.is_empty() => Resolved::new(path, ValueSource::Default),
        path => Resolved::new(path, ValueSource::EnvVar(NODE_EXTRA_CA_CERTS_ENV.to_string())),
    };

    Ok(ResolvedConfig {
        debug: take(schema::DEBUG)?.map(|v| v.as_bool()),
        api_rest_url: take(schema::API_REST_URL)?.map(|v| v.as_string()),
        path: take(schema::PATH)?.map(|v| v.as_string()),
        api_rest_token: take(schema::API_REST_TOKEN)?.map(|v| v.as_string()),
        org: take(schema::ORG)?.map(|v| v.as_string()),
        stdin: take(schema::STDIN)?.map(|v| v.as_bool()),
        http_tls_skip_verify: take(schema::HTTP_TLS_SKIP_VERIFY)?.map(|v| v.as_bool()),
        extra_ca_certs,
        warnings,
    })
}
