//! Portable archive creation.
//!
//! Packs the assembled release directory into a single compressed archive
//! using an installed 7-Zip.
//!
//! # Module Organization
//!
//! - `toolset` - archiver executable lookup
//! - `checksum` - SHA-256 of the produced archive

mod checksum;
mod toolset;

pub use checksum::calculate_sha256;
pub use toolset::locate_archiver;

use crate::error::{ErrorExt, ReleaseError, Result};
use crate::release::PORTABLE_CONFIG_DIR;
use crate::release::process::{CommandSpec, ProcessRunner};
use crate::release::settings::{ReleaseSettings, ResourceKey};
use crate::release::utils::fs::{self, CopyMode, CopySpec};
use std::path::{Path, PathBuf};

/// A produced archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveArtifact {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
}

/// Builds the portable archive of an assembled release directory.
#[derive(Debug)]
pub struct ArchiveBuilder<'a> {
    settings: &'a ReleaseSettings,
    version: String,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(settings: &'a ReleaseSettings, version: impl Into<String>) -> Self {
        Self {
            settings,
            version: version.into(),
        }
    }

    /// `<project>-<version>-<arch>.<ext>`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.{}",
            self.settings.project_name(),
            self.version,
            self.settings.arch(),
            self.settings.config().archive.extension
        )
    }

    /// Where the archive is written: the top of the release directory.
    pub fn output_path(&self) -> PathBuf {
        self.settings.paths().release_dir().join(self.file_name())
    }

    fn settings_dir(&self) -> PathBuf {
        self.settings.paths().release_dir().join(PORTABLE_CONFIG_DIR)
    }

    /// Archiver invocation at maximum compression over the whole release directory.
    pub fn command(&self, archiver: &Path) -> CommandSpec {
        let release_dir = self.settings.paths().release_dir();
        CommandSpec::new(archiver)
            .arg("a")
            .arg(format!("-t{}", self.settings.config().archive.extension))
            .arg("-mx=9")
            .arg(self.output_path())
            .arg(release_dir.join("*"))
    }

    /// Creates the archive.
    ///
    /// # Process
    ///
    /// 1. Locate the archiver (nothing is staged if it is missing)
    /// 2. Stage the webview runtime into the release settings folder
    /// 3. Run the archiver
    /// 4. Remove the staged webview subfolder
    /// 5. Measure and checksum the archive
    pub async fn build<R: ProcessRunner>(&self, runner: &R) -> Result<ArchiveArtifact> {
        let archiver = locate_archiver(&self.settings.config().archive)?;
        log::info!("Using 7-Zip at: {}", archiver.display());

        let archive_config = &self.settings.config().archive;
        let webview = CopySpec::new(
            self.settings.paths().get(ResourceKey::WebviewRuntime),
            self.settings_dir(),
            CopyMode::PreserveStructure,
        )
        .exclude(archive_config.exclude_suffixes.iter().cloned());
        fs::copy_folder(&webview).await?;

        let command = self.command(&archiver);
        log::info!("Running: {command}");
        runner.run(&command).await?;

        let output = self.output_path();
        if !output.is_file() {
            return Err(ReleaseError::ExternalProcess {
                command: command.to_string(),
                reason: format!("archiver succeeded but {} was not created", output.display()),
            });
        }
        log::info!("Portable archive created: {}", output.display());

        let transient = self.settings_dir().join(&archive_config.webview_subfolder);
        if transient.exists() {
            log::info!("Cleaning up temporary files...");
            fs::remove_dir_all(&transient).await?;
        }

        let size = tokio::fs::metadata(&output)
            .await
            .fs_context("reading archive metadata", &output)?
            .len();
        let checksum = calculate_sha256(&output).await?;
        log::info!("SHA256 {}  {}", checksum, self.file_name());

        Ok(ArchiveArtifact {
            path: output,
            size,
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::settings::{ReleaseConfig, SettingsBuilder};
    use crate::release::testing::{FakeRunner, files_under, write};

    struct Fixture {
        _dir: tempfile::TempDir,
        settings: ReleaseSettings,
    }

    fn fixture(with_archiver: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("project");
        let archiver = dir.path().join("7-Zip").join("7z.exe");
        if with_archiver {
            write(&archiver, "");
        }

        let webview = root.join("resources/windows/WebviewRuntime/x64");
        write(&webview.join("EdgeWebView/msedge.dll"), "edge");
        write(&webview.join("EdgeWebView/old.zip"), "zip");
        write(&root.join("release/portable_config/mpv.conf"), "conf");
        write(&root.join("release/Stremato.exe"), "exe");

        let mut config = ReleaseConfig::default();
        config.archive.candidates = vec![archiver];
        config.archive.search_path = false;

        let settings = SettingsBuilder::new()
            .root(&root)
            .config(config)
            .portable(true)
            .build()
            .unwrap();
        Fixture {
            _dir: dir,
            settings,
        }
    }

    #[test]
    fn archive_is_named_after_project_version_and_arch() {
        let f = fixture(true);
        let builder = ArchiveBuilder::new(&f.settings, "2.3.1");
        assert_eq!(builder.file_name(), "Stremato-2.3.1-x64.7z");

        let args = builder.command(Path::new("7z")).args_lossy();
        assert_eq!(&args[..3], &["a", "-t7z", "-mx=9"]);
        assert!(args[3].ends_with("Stremato-2.3.1-x64.7z"));
        assert!(args[4].ends_with('*'));
    }

    #[tokio::test]
    async fn stages_webview_archives_then_cleans_up() {
        let f = fixture(true);
        let runner = FakeRunner::default();
        let artifact = ArchiveBuilder::new(&f.settings, "2.3.1")
            .build(&runner)
            .await
            .unwrap();

        assert_eq!(runner.archiver_runs(), 1);
        let archived = runner.archived_files.borrow();
        assert!(archived.contains(&"portable_config/EdgeWebView/msedge.dll".to_string()));
        assert!(!archived.iter().any(|f| f.ends_with("old.zip")));

        let release = f.settings.paths().release_dir();
        assert_eq!(
            files_under(release),
            vec!["Stremato-2.3.1-x64.7z", "Stremato.exe", "portable_config/mpv.conf"]
        );
        assert_eq!(artifact.path, release.join("Stremato-2.3.1-x64.7z"));
        assert_eq!(artifact.size, b"7z archive".len() as u64);
        assert_eq!(artifact.checksum.len(), 64);
    }

    #[tokio::test]
    async fn missing_archiver_fails_before_staging() {
        let f = fixture(false);
        let runner = FakeRunner::default();
        let err = ArchiveBuilder::new(&f.settings, "1.0.0")
            .build(&runner)
            .await
            .unwrap_err();

        assert!(matches!(err, ReleaseError::ArchiverNotFound { .. }));
        assert!(runner.ran.borrow().is_empty());
        assert!(!f.settings.paths().release_dir().join("portable_config/EdgeWebView").exists());
    }

    #[tokio::test]
    async fn archiver_failure_is_fatal_and_skips_cleanup() {
        let f = fixture(true);
        let runner = FakeRunner::failing_on("-mx=9");
        let err = ArchiveBuilder::new(&f.settings, "1.0.0")
            .build(&runner)
            .await
            .unwrap_err();

        assert!(matches!(err, ReleaseError::ExternalProcess { .. }));
        let release = f.settings.paths().release_dir();
        assert!(!release.join("Stremato-1.0.0-x64.7z").exists());
        assert!(release.join("portable_config/EdgeWebView/msedge.dll").exists());
    }
}
