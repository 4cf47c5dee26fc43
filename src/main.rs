//! Kodegen Bundler NSIS - Windows installer builder for Python distributions.
//!
//! This binary stages a Python distribution, generates an NSIS script that
//! installs it into every matching Python or Maya runtime, and compiles it
//! with makensis.

use clap::Parser;
use kodegen_bundler_nsis::cli::{self, Args, OutputManager};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // RUST_LOG wins; otherwise follow --verbose / --quiet
    let default_filter = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Run CLI and get exit code
    let exit_code = match cli::run_with(args).await {
        Ok(code) => code,
        Err(e) => {
            let output = OutputManager::new(false, false);
            output.error(&format!("Error: {}", e));
            for suggestion in e.recovery_suggestions() {
                output.error(&format!("  hint: {}", suggestion));
            }
            if e.is_recoverable() {
                output.error("  nothing was staged; rerun after fixing the input");
            }
            1
        }
    };

    process::exit(exit_code);
}
