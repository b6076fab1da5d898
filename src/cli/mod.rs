//! Command line interface for the release assembler.
//!
//! Parses invocation flags, builds [`ReleaseSettings`] once, runs the
//! pipeline against real processes and maps its result to an exit code.

mod args;

pub use args::Args;

use crate::error::{ReleaseError, Result};
use crate::release::{ReleaseConfig, ReleasePipeline, ReleaseSettings, SettingsBuilder, SystemRunner};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    run_with(&args).await
}

/// Runs the pipeline for already-parsed arguments.
pub async fn run_with(args: &Args) -> Result<i32> {
    let settings = create_settings(args)?;

    let result = ReleasePipeline::new(&settings, SystemRunner).run().await;
    if let Some(step) = result.failed_step {
        eprintln!("Error in {step}: {}", result.error_detail);
    } else if let Some(archive) = &result.archive {
        println!("{}  {}", archive.checksum, archive.path.display());
    }

    Ok(result.exit_code())
}

/// Create release settings from arguments
pub fn create_settings(args: &Args) -> Result<ReleaseSettings> {
    args.validate()
        .map_err(|reason| ReleaseError::Config { reason })?;

    let config = ReleaseConfig::load(&args.config_path())?;
    let mut builder = SettingsBuilder::new()
        .root(&args.root)
        .arch(args.arch())
        .config(config)
        .portable(args.portable)
        .installer(args.installer);
    if let Some(build_config) = &args.build_config {
        builder = builder.build_config(build_config.clone());
    }

    builder.build()
}
