//! Startup sequence.
//!
//! A single pass through
//! `Unstarted → SchemaRegistered → Parsed → Normalized → Bound → Resolved →
//! SinkSelected → Invoked → Terminated`. Any error before `Invoked` stops
//! the sequence; the collaborator is never built from a partial
//! configuration. Once invoked, the collaborator's status is returned
//! unchanged.

use std::ffi::OsString;
use std::io::Write;

use crate::capture::{Collaborator, CommandSpec};
use crate::cli::{self, FlagValues};
use crate::config::{ENV_PREFIX, EnvSource, Schema, bind_schema, capture_schema, resolve};
use crate::diagnostics::{self, Logger};
use crate::{COMMIT, Result, VERSION};

/// Bootstrap progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unstarted,
    SchemaRegistered,
    Parsed,
    Normalized,
    Bound,
    Resolved,
    SinkSelected,
    Invoked,
    Terminated,
}

/// Result of a completed bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Exit status returned by the collaborator.
    pub status: i32,
    /// Every stage entered, in order.
    pub stages: Vec<Stage>,
}

/// One-shot startup sequencer.
#[derive(Debug)]
pub struct Bootstrap {
    schema: Option<Schema>,
    stages: Vec<Stage>,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap {
    /// Bootstrap with the capture tool's schema.
    pub fn new() -> Self {
        Self {
            schema: None,
            stages: vec![Stage::Unstarted],
        }
    }

    /// Bootstrap with a caller-supplied schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            stages: vec![Stage::Unstarted],
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(self.stages.last().is_some_and(|s| *s < next));
        self.stages.push(next);
    }

    /// Run the full sequence.
    ///
    /// `args` includes the program name. `stderr` receives diagnostics when
    /// debug resolves to true. `build` constructs the collaborator from the
    /// finished [`CommandSpec`].
    pub fn run<I, T, W, F, C>(
        mut self,
        args: I,
        env: &dyn EnvSource,
        stderr: W,
        build: F,
    ) -> Result<Completed>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        W: Write + Send + 'static,
        F: FnOnce(CommandSpec) -> C,
        C: Collaborator,
    {
        let schema = match self.schema.take() {
            Some(schema) => schema,
            None => capture_schema()?,
        };
        self.advance(Stage::SchemaRegistered);

        let matches = cli::command(&schema).try_get_matches_from(args)?;
        self.advance(Stage::Parsed);

        let flags = FlagValues::from_matches(&schema, &matches);
        self.advance(Stage::Normalized);

        let bindings = bind_schema(&schema, ENV_PREFIX)?;
        self.advance(Stage::Bound);

        let config = resolve(&schema, &bindings, &flags, env)?;
        self.advance(Stage::Resolved);

        let logger = Logger::select(config.debug.value, stderr);
        self.advance(Stage::SinkSelected);

        let status = diagnostics::scope(&logger, || {
            tracing::info!("vulnmap-iac-capture {} ({})", VERSION, COMMIT);
            for warning in &config.warnings {
                tracing::warn!("{}", warning);
            }
            for line in config.summary() {
                tracing::debug!("{}", line);
            }

            let mut collaborator = build(CommandSpec::from_resolved(config, logger.clone()));
            self.advance(Stage::Invoked);
            collaborator.run()
        });
        self.advance(Stage::Terminated);

        Ok(Completed {
            status,
            stages: self.stages,
        })
    }
}

/// Run the capture tool's bootstrap and return the collaborator's status.
pub fn run<I, T, W, F, C>(args: I, env: &dyn EnvSource, stderr: W, build: F) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write + Send + 'static,
    F: FnOnce(CommandSpec) -> C,
    C: Collaborator,
{
    Bootstrap::new()
        .run(args, env, stderr, build)
        .map(|done| done.status)
}
