//! Core settings structs shared by every pipeline component.

use super::{Arch, PathSet, ReleaseConfig};
use std::path::Path;

/// Architecture and build configuration of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildTarget {
    pub arch: Arch,
    pub build_config: String,
}

/// Main settings for a release run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and passed
/// by reference into every component. Nothing downstream reads invocation
/// flags or process environment on its own.
#[derive(Clone, Debug)]
pub struct ReleaseSettings {
    /// Absolute project root.
    root: std::path::PathBuf,

    target: BuildTarget,

    config: ReleaseConfig,

    paths: PathSet,

    /// Pack a portable archive after assembly.
    portable: bool,

    /// Installer requested on the command line. Installers are not produced here.
    installer: bool,
}

impl ReleaseSettings {
    /// Returns the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the build target.
    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    /// Returns the target architecture.
    pub fn arch(&self) -> Arch {
        self.target.arch
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Returns the resolved paths.
    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    /// Returns the product name.
    pub fn project_name(&self) -> &str {
        &self.config.project_name
    }

    pub fn portable(&self) -> bool {
        self.portable
    }

    pub fn installer(&self) -> bool {
        self.installer
    }

    pub(super) fn new(
        root: std::path::PathBuf,
        target: BuildTarget,
        config: ReleaseConfig,
        portable: bool,
        installer: bool,
    ) -> Self {
        let paths = PathSet::resolve(&root, target.arch, &config.layout);
        Self {
            root,
            target,
            config,
            paths,
            portable,
            installer,
        }
    }
}
