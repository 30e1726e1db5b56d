//! Flag schema: the closed set of options the tool recognizes.
//!
//! Each option is declared once with its kind, default and help text. The
//! schema is built before parsing and is read-only afterwards; both the
//! command-line builder ([`crate::cli`]) and the environment binder
//! ([`crate::config::env`]) are driven from it.
//!
//! # Options
//!
//! | Flag | Kind | Default |
//! |---|---|---|
//! | `--debug`, `-d` | bool | `false` |
//! | `--api-rest-url` | string | `https://api.vulnmap.khulnasoft.com` |
//! | `--path` | string | `.` |
//! | `--api-rest-token` | string | `""` |
//! | `--org` | string | `""` |
//! | `--stdin` | bool | `false` |
//! | `http-tls-skip-verify` | bool | `false` (reserved, not on the command line) |

use crate::config::normalize::normalize;
use crate::{Error, Result};

pub const DEBUG: &str = "debug";
pub const API_REST_URL: &str = "api-rest-url";
pub const PATH: &str = "path";
pub const API_REST_TOKEN: &str = "api-rest-token";
pub const ORG: &str = "org";
pub const STDIN: &str = "stdin";
pub const HTTP_TLS_SKIP_VERIFY: &str = "http-tls-skip-verify";

/// Default Vulnmap REST API endpoint.
pub const DEFAULT_API_REST_URL: &str = "https://api.vulnmap.khulnasoft.com";

/// Type of value an option carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    String,
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    String(String),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::String(_) => OptionKind::String,
        }
    }

    /// Boolean view. String values are never truthy.
    pub fn as_bool(&self) -> bool {
        matches!(self, OptionValue::Bool(true))
    }

    /// String view. Booleans render as `true` / `false`.
    pub fn as_string(&self) -> String {
        match self {
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::String(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Declaration of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    /// Display name, hyphenated (e.g. `api-rest-url`).
    pub name: &'static str,
    /// Optional single-character short flag.
    pub short: Option<char>,
    /// Value used when neither flag nor environment provides one.
    pub default: OptionValue,
    /// Help text shown by `--help`.
    pub help: &'static str,
    /// Disabled options are bound and resolved but never appear on the
    /// command line.
    pub enabled: bool,
}

impl OptionDef {
    /// Declare a boolean option.
    pub fn bool(name: &'static str, default: bool, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            default: OptionValue::Bool(default),
            help,
            enabled: true,
        }
    }

    /// Declare a string option.
    pub fn string(name: &'static str, default: &str, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            default: OptionValue::String(default.to_string()),
            help,
            enabled: true,
        }
    }

    /// Attach a short flag.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Keep the option in the schema but off the command line.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn kind(&self) -> OptionKind {
        self.default.kind()
    }

    /// Internal lookup key (hyphens replaced by underscores).
    pub fn key(&self) -> String {
        normalize(self.name)
    }
}

/// The registered option set.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    options: Vec<OptionDef>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option.
    ///
    /// Registering an identical definition again is a no-op. Registering a
    /// different definition under a name that normalizes to an existing key
    /// is a [`Error::DuplicateOption`].
    pub fn register(&mut self, def: OptionDef) -> Result<()> {
        validate_name(def.name)?;

        if let Some(existing) = self.get(def.name) {
            if *existing == def {
                return Ok(());
            }
            return Err(Error::DuplicateOption(def.name.to_string()));
        }

        if let Some(short) = def.short {
            if self.options.iter().any(|o| o.short == Some(short)) {
                return Err(Error::DuplicateOption(format!("-{}", short)));
            }
        }

        self.options.push(def);
        Ok(())
    }

    /// Look up an option by either spelling of its name.
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        let key = normalize(name);
        self.options.iter().find(|o| o.key() == key)
    }

    /// All options in registration order, disabled ones included.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// Options exposed on the command line.
    pub fn enabled(&self) -> impl Iterator<Item = &OptionDef> {
        self.options.iter().filter(|o| o.enabled)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidOptionName(name.to_string()))
    }
}

/// Build the schema for the capture tool.
pub fn capture_schema() -> Result<Schema> {
    let mut schema = Schema::new();
    schema.register(OptionDef::bool(DEBUG, false, "Show debug information").with_short('d'))?;
    schema.register(
        OptionDef::bool(
            HTTP_TLS_SKIP_VERIFY,
            false,
            "If set, skip client validation of TLS certificates",
        )
        .disabled(),
    )?;
    schema.register(OptionDef::string(
        API_REST_URL,
        DEFAULT_API_REST_URL,
        "Url for Vulnmap REST API",
    ))?;
    schema.register(OptionDef::string(
        PATH,
        ".",
        "Path to look for Terraform state files (can be a file, a directory or a glob pattern)",
    ))?;
    schema.register(OptionDef::string(
        API_REST_TOKEN,
        "",
        "Auth token for the API Usage (Required)",
    ))?;
    schema.register(OptionDef::string(ORG, "", "Organization public id (Required)"))?;
    schema.register(OptionDef::bool(
        STDIN,
        false,
        "Read Terraform state from the standard input instead of path",
    ))?;
    Ok(schema)
}
