//! Release assembler - builds, stages and packs a portable release.
//!
//! Exit code 0 means the release directory (and the archive, when requested)
//! is complete. Any failure exits with 1 and the cause on stderr.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match release_assembler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
