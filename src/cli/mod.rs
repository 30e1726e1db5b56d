//! Command-line definition built from the option schema.
//!
//! Every enabled schema option becomes a long flag spelled with hyphens
//! and keyed internally by its normalized name. Disabled options are not
//! registered, so passing them is a usage error. No clap defaults are
//! attached: an option shows up in [`FlagValues`] only when it was
//! explicitly given on the command line.
//!
//! Parsing is lenient the way wrapper scripts expect: a repeated flag keeps
//! its last value, a string value may start with `-`, and positional
//! arguments are accepted and ignored.

use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::Result;
use crate::config::env::parse_bool;
use crate::config::normalize::normalize;
use crate::config::schema::{OptionDef, OptionKind, OptionValue, Schema};

/// Binary name as shown in usage output.
pub const BIN_NAME: &str = "vulnmap-iac-capture";

/// Id of the catch-all for positional arguments. Not a valid option name,
/// so it never collides with a schema key.
const POSITIONAL_ID: &str = "-positional";

/// Build the clap command for `schema`.
pub fn command(schema: &Schema) -> Command {
    schema.enabled().fold(
        Command::new(BIN_NAME)
            .about("Capture Terraform state and forward it to the Vulnmap API")
            .disable_version_flag(true)
            .args_override_self(true)
            .arg(
                Arg::new(POSITIONAL_ID)
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .hide(true),
            ),
        |cmd, def| cmd.arg(flag_arg(def)),
    )
}

fn flag_arg(def: &OptionDef) -> Arg {
    let mut arg = Arg::new(def.key())
        .long(def.name)
        .help(help_text(def));
    if let Some(short) = def.short {
        arg = arg.short(short);
    }

    match def.kind() {
        // `--stdin`, `--stdin=true` and `--stdin=false` are all accepted.
        OptionKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_name("BOOL")
            .value_parser(|raw: &str| {
                parse_bool(raw).ok_or_else(|| format!("invalid boolean {:?}", raw))
            }),
        OptionKind::String => arg
            .num_args(1)
            .allow_hyphen_values(true)
            .value_name(def.key().to_uppercase())
            .value_parser(clap::value_parser!(String)),
    }
}

fn help_text(def: &OptionDef) -> String {
    match &def.default {
        OptionValue::Bool(false) => def.help.to_string(),
        OptionValue::String(s) if s.is_empty() => def.help.to_string(),
        default => format!("{} (default {})", def.help, default),
    }
}

/// Values explicitly passed on the command line, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: Vec<(String, OptionValue)>,
}

impl FlagValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an explicit value.
    pub fn with(mut self, name: &str, value: OptionValue) -> Self {
        self.insert(name, value);
        self
    }

    fn insert(&mut self, name: &str, value: OptionValue) {
        let key = normalize(name);
        self.values.retain(|(k, _)| *k != key);
        self.values.push((key, value));
    }

    /// Explicit value for `name`, by either spelling.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        let key = normalize(name);
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Collect the explicitly passed options from parsed matches.
    pub fn from_matches(schema: &Schema, matches: &ArgMatches) -> Self {
        let mut flags = Self::new();
        for def in schema.enabled() {
            let key = def.key();
            if matches.value_source(&key) != Some(ValueSource::CommandLine) {
                continue;
            }
            let value = match def.kind() {
                OptionKind::Bool => matches.get_one::<bool>(&key).copied().map(OptionValue::Bool),
                OptionKind::String => matches
                    .get_one::<String>(&key)
                    .cloned()
                    .map(OptionValue::String),
            };
            if let Some(value) = value {
                flags.insert(&key, value);
            }
        }
        flags
    }
}

/// Parse `args` (program name first) against `schema`.
///
/// Help requests and malformed arguments come back as
/// [`crate::Error::Usage`].
pub fn parse<I, T>(schema: &Schema, args: I) -> Result<FlagValues>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(schema).try_get_matches_from(args)?;
    Ok(FlagValues::from_matches(schema, &matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::schema::{self, capture_schema};

    fn parse_args(args: &[&str]) -> Result<FlagValues> {
        let schema = capture_schema().unwrap();
        parse(&schema, std::iter::once(BIN_NAME).chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        command(&capture_schema().unwrap()).debug_assert();
    }

    #[test]
    fn test_no_args_yields_no_explicit_values() {
        let flags = parse_args(&[]).unwrap();
        assert!(flags.is_empty());
    }

    #[test]
    fn test_string_flags() {
        let flags = parse_args(&["--org=acme", "--api-rest-url", "https://custom", "--path", "./tf"])
            .unwrap();
        assert_eq!(flags.get("org"), Some(&OptionValue::String("acme".into())));
        assert_eq!(
            flags.get("api_rest_url"),
            Some(&OptionValue::String("https://custom".into()))
        );
        assert_eq!(flags.get("path"), Some(&OptionValue::String("./tf".into())));
        assert_eq!(flags.get("api-rest-token"), None);
    }

    #[test]
    fn test_explicit_empty_string_is_kept() {
        let flags = parse_args(&["--org="]).unwrap();
        assert_eq!(flags.get("org"), Some(&OptionValue::String(String::new())));
    }

    #[test]
    fn test_bool_flag_forms() {
        let flags = parse_args(&["--debug"]).unwrap();
        assert_eq!(flags.get(schema::DEBUG), Some(&OptionValue::Bool(true)));

        let flags = parse_args(&["-d"]).unwrap();
        assert_eq!(flags.get(schema::DEBUG), Some(&OptionValue::Bool(true)));

        let flags = parse_args(&["--stdin=false"]).unwrap();
        assert_eq!(flags.get(schema::STDIN), Some(&OptionValue::Bool(false)));

        let flags = parse_args(&["--stdin=T"]).unwrap();
        assert_eq!(flags.get(schema::STDIN), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn test_bool_flag_rejects_words_outside_true_false() {
        for raw in ["--stdin=yes", "--debug=off"] {
            let err = parse_args(&[raw]).unwrap_err();
            assert!(matches!(err, Error::Usage(_)), "{raw}");
        }
    }

    // ==================== Lenient Parsing Tests ====================

    #[test]
    fn test_repeated_flag_keeps_last_value() {
        let flags = parse_args(&["--org", "a", "--org", "b"]).unwrap();
        assert_eq!(flags.get("org"), Some(&OptionValue::String("b".into())));

        let flags = parse_args(&["-d", "--debug"]).unwrap();
        assert_eq!(flags.get("debug"), Some(&OptionValue::Bool(true)));

        let flags = parse_args(&["--stdin", "--stdin=false"]).unwrap();
        assert_eq!(flags.get("stdin"), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_string_value_may_start_with_hyphen() {
        let flags = parse_args(&["--api-rest-token", "-abc", "--org", "acme"]).unwrap();
        assert_eq!(
            flags.get("api-rest-token"),
            Some(&OptionValue::String("-abc".into()))
        );
        assert_eq!(flags.get("org"), Some(&OptionValue::String("acme".into())));
    }

    #[test]
    fn test_positional_arguments_are_ignored() {
        let flags = parse_args(&["plan.tfstate", "--org", "acme", "extra"]).unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.get("org"), Some(&OptionValue::String("acme".into())));
    }

    #[test]
    fn test_bool_flag_does_not_swallow_next_arg() {
        let flags = parse_args(&["--debug", "--org", "acme"]).unwrap();
        assert_eq!(flags.get("debug"), Some(&OptionValue::Bool(true)));
        assert_eq!(flags.get("org"), Some(&OptionValue::String("acme".into())));
    }

    #[test]
    fn test_disabled_option_is_not_on_command_line() {
        let err = parse_args(&["--http-tls-skip-verify"]).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = parse_args(&["--nope"]).unwrap_err();
        match err {
            Error::Usage(e) => assert_eq!(e.kind(), clap::error::ErrorKind::UnknownArgument),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_help_is_reported_as_usage() {
        let err = parse_args(&["--help"]).unwrap_err();
        match err {
            Error::Usage(e) => assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_help_text_shows_defaults() {
        let schema = capture_schema().unwrap();
        let url = schema.get(schema::API_REST_URL).unwrap();
        assert_eq!(
            help_text(url),
            "Url for Vulnmap REST API (default \"https://api.vulnmap.khulnasoft.com\")"
        );
        let org = schema.get(schema::ORG).unwrap();
        assert_eq!(help_text(org), "Organization public id (Required)");
    }

    #[test]
    fn test_flag_values_last_write_wins() {
        let flags = FlagValues::new()
            .with("api-rest-url", OptionValue::String("a".into()))
            .with("api_rest_url", OptionValue::String("b".into()));
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.get("api-rest-url"), Some(&OptionValue::String("b".into())));
    }
}
