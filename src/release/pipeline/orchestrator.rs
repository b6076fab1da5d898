//! Main release orchestration.
//!
//! This module provides the [`ReleasePipeline`] that sequences cleaning,
//! building, assembly and optional archiving, and turns the outcome into a
//! single [`PipelineResult`].

use super::{PipelineResult, PipelineStep, assemble::assemble};
use crate::error::{ReleaseError, Result};
use crate::metadata::extract_version;
use crate::release::archive::{ArchiveArtifact, ArchiveBuilder};
use crate::release::build::BuildInvoker;
use crate::release::process::ProcessRunner;
use crate::release::settings::{ReleaseSettings, ResourceKey};
use crate::release::utils::fs;

/// Main release orchestrator.
///
/// Runs `Cleaning → Building → Assembling → (PortableArchiving | skip)`
/// strictly in order. The first failing step aborts the run; nothing is
/// retried.
///
/// # Examples
///
/// ```no_run
/// use release_assembler::release::{ReleasePipeline, SettingsBuilder, SystemRunner};
///
/// # async fn example() -> release_assembler::Result<()> {
/// let settings = SettingsBuilder::new().root(".").portable(true).build()?;
/// let result = ReleasePipeline::new(&settings, SystemRunner).run().await;
/// std::process::exit(result.exit_code());
/// # }
/// ```
pub struct ReleasePipeline<'a, R> {
    settings: &'a ReleaseSettings,
    runner: R,
}

impl<R> std::fmt::Debug for ReleasePipeline<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleasePipeline")
            .field("settings", &self.settings)
            .field("runner", &"<ProcessRunner>")
            .finish()
    }
}

/// A failure tagged with the step it happened in.
struct StepFailure {
    step: PipelineStep,
    error: ReleaseError,
}

fn at(step: PipelineStep) -> impl FnOnce(ReleaseError) -> StepFailure {
    move |error| StepFailure { step, error }
}

impl<'a, R: ProcessRunner> ReleasePipeline<'a, R> {
    pub fn new(settings: &'a ReleaseSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Consumes the pipeline, returning its process runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Runs every step and reports the outcome.
    pub async fn run(&self) -> PipelineResult {
        match self.execute().await {
            Ok(archive) => {
                log::info!("All done!");
                PipelineResult::success(archive)
            }
            Err(StepFailure { step, error }) => {
                log::error!("{step} failed: {error}");
                PipelineResult::failure(step, &error)
            }
        }
    }

    async fn execute(&self) -> std::result::Result<Option<ArchiveArtifact>, StepFailure> {
        let settings = self.settings;
        log::info!("=== Building for {} ===", settings.arch().as_str().to_uppercase());

        self.clean().await.map_err(at(PipelineStep::Cleaning))?;
        self.build().await.map_err(at(PipelineStep::Building))?;

        log::info!(
            "=== Assembling files in '{}' ===",
            settings.paths().release_dir().display()
        );
        assemble(settings)
            .await
            .map_err(at(PipelineStep::Assembling))?;
        log::info!("=== Release folder preparation complete. ===");

        if settings.installer() {
            log::warn!("Installer generation is not handled by this tool; skipping --installer.");
        }

        if !settings.portable() {
            log::warn!("Skipping archive creation. Use --portable flag to build it.");
            return Ok(None);
        }

        log::info!("--- Building Portable .{} Archive ---", settings.config().archive.extension);
        let version = extract_version(
            settings.paths().get(ResourceKey::Manifest),
            settings.project_name(),
        );
        let artifact = ArchiveBuilder::new(settings, version)
            .build(&self.runner)
            .await
            .map_err(at(PipelineStep::PortableArchiving))?;
        Ok(Some(artifact))
    }

    /// Removes the previous release and recreates the output directories.
    async fn clean(&self) -> Result<()> {
        log::info!("--- Cleaning up previous build artifacts ---");
        let paths = self.settings.paths();
        fs::remove_dir_all(paths.release_dir()).await?;
        fs::ensure_dir(paths.build_dir()).await?;
        fs::ensure_dir(paths.release_dir()).await
    }

    async fn build(&self) -> Result<()> {
        log::info!(
            "=== Configuring and Building in '{}' ===",
            self.settings.paths().build_dir().display()
        );
        let invoker = BuildInvoker::new(self.settings)?;
        invoker.run(&self.runner).await
    }
}
