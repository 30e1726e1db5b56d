//! Common test utilities for vulnmap-iac-capture integration tests.
//!
//! Every command starts from an environment with all bound variables
//! removed, so a developer's shell cannot leak into the assertions.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// Variables the binary reads.
pub const BOUND_VARS: &[&str] = &[
    "VULNMAP_IAC_CAPTURE_DEBUG",
    "VULNMAP_IAC_CAPTURE_API_REST_URL",
    "VULNMAP_IAC_CAPTURE_PATH",
    "VULNMAP_IAC_CAPTURE_API_REST_TOKEN",
    "VULNMAP_IAC_CAPTURE_ORG",
    "VULNMAP_IAC_CAPTURE_STDIN",
    "VULNMAP_IAC_CAPTURE_HTTP_TLS_SKIP_VERIFY",
    "NODE_EXTRA_CA_CERTS",
];

/// A scratch working directory containing a state file.
pub struct TestEnv {
    pub work_dir: TempDir,
}

impl TestEnv {
    /// Create a working directory with a `terraform.tfstate` in it.
    pub fn new() -> Self {
        let work_dir = TempDir::new().unwrap();
        std::fs::write(work_dir.path().join("terraform.tfstate"), "{}").unwrap();
        Self { work_dir }
    }

    /// Get a Command for the binary, run from the working directory with a
    /// clean environment.
    pub fn capture(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vulnmap-iac-capture"));
        cmd.current_dir(self.work_dir.path());
        for var in BOUND_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Same as [`capture`](Self::capture) with org and token already supplied
    /// through the environment.
    pub fn configured(&self) -> Command {
        let mut cmd = self.capture();
        cmd.env("VULNMAP_IAC_CAPTURE_ORG", "acme")
            .env("VULNMAP_IAC_CAPTURE_API_REST_TOKEN", "test-token-0000");
        cmd
    }

    pub fn path(&self) -> &std::path::Path {
        self.work_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
