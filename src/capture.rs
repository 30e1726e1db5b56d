//! Boundary to the capture engine.
//!
//! [`CommandSpec`] is the finished configuration record; a [`Collaborator`]
//! consumes it and returns the process exit status. Reading Terraform state
//! and talking to the REST API happen on the far side of this boundary.
//!
//! [`Preflight`] is the collaborator the binary runs: it performs the
//! checks that belong to the capture side (required settings, a usable
//! state source) and reports what would be captured.

use std::path::Path;

use crate::config::ResolvedConfig;
use crate::diagnostics::Logger;

/// Exit status: capture inputs are usable.
pub const EXIT_OK: i32 = 0;
/// Exit status: the state path does not exist.
pub const EXIT_STATE_NOT_FOUND: i32 = 1;
/// Exit status: a required setting is empty.
pub const EXIT_MISSING_SETTING: i32 = 2;

/// Configuration handed to the collaborator. Consumed once.
#[derive(Clone)]
pub struct CommandSpec {
    pub logger: Logger,
    pub org: String,
    pub state_path: String,
    pub http_tls_skip_verify: bool,
    pub api_url: String,
    pub api_token: String,
    pub extra_ssl_certs: String,
    pub state_from_stdin: bool,
}

impl CommandSpec {
    /// Build the record from a resolved configuration.
    pub fn from_resolved(config: ResolvedConfig, logger: Logger) -> Self {
        Self {
            logger,
            org: config.org.value,
            state_path: config.path.value,
            http_tls_skip_verify: config.http_tls_skip_verify.value,
            api_url: config.api_rest_url.value,
            api_token: config.api_rest_token.value,
            extra_ssl_certs: config.extra_ca_certs.value,
            state_from_stdin: config.stdin.value,
        }
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.api_token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("CommandSpec")
            .field("logger", &self.logger)
            .field("org", &self.org)
            .field("state_path", &self.state_path)
            .field("http_tls_skip_verify", &self.http_tls_skip_verify)
            .field("api_url", &self.api_url)
            .field("api_token", &token)
            .field("extra_ssl_certs", &self.extra_ssl_certs)
            .field("state_from_stdin", &self.state_from_stdin)
            .finish()
    }
}

/// The unit that does the capture work.
pub trait Collaborator {
    /// Run to completion and return the process exit status.
    fn run(&mut self) -> i32;
}

/// Input checks run before any state is read or uploaded.
#[derive(Debug)]
pub struct Preflight {
    spec: CommandSpec,
}

impl Preflight {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.spec.org.is_empty() {
            missing.push("org");
        }
        if self.spec.api_token.is_empty() {
            missing.push("api-rest-token");
        }
        missing
    }
}

impl Collaborator for Preflight {
    fn run(&mut self) -> i32 {
        let missing = self.missing_settings();
        if !missing.is_empty() {
            eprintln!("Error: missing required setting(s): {}", missing.join(", "));
            return EXIT_MISSING_SETTING;
        }

        if self.spec.state_from_stdin {
            self.spec
                .logger
                .line(format_args!("reading state from stdin"));
        } else {
            // Glob patterns are expanded by the engine; only plain paths are checked here.
            let is_glob = self.spec.state_path.contains(['*', '?', '[']);
            if !is_glob && !Path::new(&self.spec.state_path).exists() {
                eprintln!("Error: state path not found: {}", self.spec.state_path);
                return EXIT_STATE_NOT_FOUND;
            }
            self.spec
                .logger
                .line(format_args!("reading state from {}", self.spec.state_path));
        }

        if !self.spec.extra_ssl_certs.is_empty() {
            self.spec
                .logger
                .line(format_args!("trusting extra CA certificates from {}", self.spec.extra_ssl_certs));
        }
        if self.spec.http_tls_skip_verify {
            self.spec
                .logger
                .line(format_args!("TLS certificate verification disabled"));
        }
        self.spec.logger.line(format_args!(
            "target {} for org {}",
            self.spec.api_url, self.spec.org
        ));
        EXIT_OK
    }
}
