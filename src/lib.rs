//! vulnmap-iac-capture - configuration resolution and bootstrap for the
//! infrastructure-as-code capture tool.
//!
//! This library owns everything that happens before the capture engine
//! runs: declaring the command-line options, binding them to
//! `VULNMAP_IAC_CAPTURE_*` environment variables, resolving one value per
//! option, selecting the diagnostic sink, and handing a finished
//! [`capture::CommandSpec`] to the collaborator that does the actual work.

pub mod bootstrap;
pub mod capture;
pub mod cli;
pub mod config;
pub mod diagnostics;

/// Crate version as declared in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit the binary was built from, or `unknown`.
pub const COMMIT: &str = env!("VULNMAP_GIT_COMMIT");

/// Library-level error type for startup failures.
///
/// Every variant is fatal: the bootstrap stops before the collaborator is
/// constructed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Option registered twice: {0}")]
    DuplicateOption(String),

    #[error("Cannot bind unregistered option: {0}")]
    UnknownOption(String),

    #[error("Invalid option name: {0:?}")]
    InvalidOptionName(String),

    #[error(transparent)]
    Usage(#[from] clap::Error),
}

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, Error>;
