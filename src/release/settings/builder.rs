//! Builder for constructing ReleaseSettings.

use super::{Arch, BuildTarget, PathSet, ReleaseConfig, ReleaseSettings, ResourceKey};
use crate::error::{ReleaseError, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`ReleaseSettings`].
///
/// # Examples
///
/// ```no_run
/// use release_assembler::release::{Arch, SettingsBuilder};
///
/// # fn example() -> release_assembler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root("C:/src/stremato")
///     .arch(Arch::X86)
///     .portable(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    root: Option<PathBuf>,
    arch: Arch,
    build_config: Option<String>,
    config: Option<ReleaseConfig>,
    portable: bool,
    installer: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root. Relative roots are resolved against the current directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target architecture.
    ///
    /// Default: [`Arch::X64`]
    pub fn arch(mut self, arch: Arch) -> Self {
        self.arch = arch;
        self
    }

    /// Overrides the build configuration from the config file.
    pub fn build_config(mut self, build_config: impl Into<String>) -> Self {
        self.build_config = Some(build_config.into());
        self
    }

    /// Sets the release configuration.
    ///
    /// Default: [`ReleaseConfig::default()`]
    pub fn config(mut self, config: ReleaseConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn portable(mut self, portable: bool) -> Self {
        self.portable = portable;
        self
    }

    pub fn installer(mut self, installer: bool) -> Self {
        self.installer = installer;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Config`] if the root is missing, cannot be made
    /// absolute, the build configuration is empty, or the release directory
    /// is not a dedicated folder inside the root.
    pub fn build(self) -> Result<ReleaseSettings> {
        let root = self.root.ok_or_else(|| ReleaseError::Config {
            reason: "project root is required".to_string(),
        })?;
        let root = root
            .absolutize()
            .map_err(|e| ReleaseError::Config {
                reason: format!("cannot resolve project root {}: {}", root.display(), e),
            })?
            .into_owned();

        let config = self.config.unwrap_or_default();
        let build_config = self
            .build_config
            .unwrap_or_else(|| config.build_config.clone());
        if build_config.trim().is_empty() {
            return Err(ReleaseError::Config {
                reason: "build configuration cannot be empty".to_string(),
            });
        }

        let target = BuildTarget {
            arch: self.arch,
            build_config,
        };

        let settings = ReleaseSettings::new(root, target, config, self.portable, self.installer);
        check_release_dir(settings.root(), settings.paths())?;
        Ok(settings)
    }
}

/// Rejects layouts where wiping the release directory would destroy anything
/// else.
///
/// The release directory must sit strictly below `root` and must not contain
/// any other resolved location. Paths are compared after lexical
/// normalisation, so `"."`, `""` and `".."` segments are caught.
fn check_release_dir(root: &Path, paths: &PathSet) -> Result<()> {
    let root = normalize(root)?;
    let release = normalize(paths.release_dir())?;

    if release == root || !release.starts_with(&root) {
        return Err(ReleaseError::Config {
            reason: format!(
                "release directory {} must be a subdirectory of the project root {}",
                release.display(),
                root.display()
            ),
        });
    }

    for (key, path) in paths.iter() {
        if key == ResourceKey::ReleaseDir {
            continue;
        }
        if normalize(path)?.starts_with(&release) {
            return Err(ReleaseError::Config {
                reason: format!(
                    "release directory {} would contain {} ({})",
                    release.display(),
                    key,
                    path.display()
                ),
            });
        }
    }

    Ok(())
}

fn normalize(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| ReleaseError::Config {
            reason: format!("cannot resolve {}: {}", path.display(), e),
        })
}
