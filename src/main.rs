//! vulnmap-iac-capture CLI.

use std::io;
use std::process;

use vulnmap_iac_capture::Error;
use vulnmap_iac_capture::bootstrap;
use vulnmap_iac_capture::capture::Preflight;
use vulnmap_iac_capture::config::ProcessEnv;

fn main() {
    let result = bootstrap::run(std::env::args_os(), &ProcessEnv, io::stderr(), Preflight::new);

    match result {
        Ok(status) => process::exit(status),
        // clap prints help (exit 0) or the usage error (exit 2) itself
        Err(Error::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
