//! Release assembly.
//!
//! This module turns a source checkout into a self-contained release
//! directory and, on request, a portable archive of it.
//!
//! # Overview
//!
//! The [`ReleasePipeline`]:
//! 1. Recreates the release directory
//! 2. Builds the native application ([`build`])
//! 3. Stages the executable and its runtime dependencies ([`utils::fs`])
//! 4. Optionally packs a portable archive ([`archive`])
//! 5. Returns a single [`PipelineResult`]
//!
//! # Module Organization
//!
//! - [`settings`] - configuration, build target and path resolution
//! - [`process`] - external process seam
//! - [`build`] - native build plan and execution
//! - [`archive`] - archiver lookup, invocation and checksum
//! - [`pipeline`] - step sequencing
//! - [`utils`] - file staging helpers

pub mod archive;
pub mod build;
pub mod pipeline;
pub mod process;
pub mod settings;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

/// Release subfolder holding the portable settings.
pub const PORTABLE_CONFIG_DIR: &str = "portable_config";

pub use archive::{ArchiveArtifact, ArchiveBuilder};
pub use build::{BuildInvoker, BuildPlan, BuildStep};
pub use pipeline::{PipelineResult, PipelineStep, ReleasePipeline};
pub use process::{CommandSpec, ProcessRunner, SystemRunner};
pub use settings::{
    Arch, BuildTarget, PathSet, ReleaseConfig, ReleaseSettings, ResourceKey, SettingsBuilder,
};
pub use utils::fs::{CopyMode, CopySpec, CopySummary};
