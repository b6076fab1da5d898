//! Native toolchain prerequisite lookup.
//!
//! Locates the developer shell of an installed Visual Studio and the vcpkg
//! toolchain file. Both must exist before any build process is spawned.

use crate::error::{ReleaseError, Result};
use crate::release::settings::{ResourceKey, ReleaseSettings};
use std::path::PathBuf;

/// Installed toolchain the build runs under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    /// Visual Studio installation directory.
    pub installation: PathBuf,
    /// Developer shell entry point inside `installation`.
    pub dev_shell: PathBuf,
    /// CMake toolchain file.
    pub toolchain_file: PathBuf,
}

/// Finds the first installation with a developer shell, then checks the toolchain file.
pub fn locate(settings: &ReleaseSettings) -> Result<Toolchain> {
    let config = &settings.config().toolchain;

    let expected: Vec<(PathBuf, PathBuf)> = config
        .installations
        .iter()
        .map(|install| (install.clone(), install.join(&config.dev_shell)))
        .collect();

    let Some((installation, dev_shell)) = expected.iter().find(|(_, shell)| shell.is_file()).cloned()
    else {
        return Err(ReleaseError::MissingPrerequisite {
            what: "Visual Studio Developer Command Prompt".to_string(),
            paths: expected.into_iter().map(|(_, shell)| shell).collect(),
        });
    };
    log::info!("Using developer shell at: {}", dev_shell.display());

    let toolchain_file = settings.paths().get(ResourceKey::ToolchainFile).to_path_buf();
    if !toolchain_file.is_file() {
        return Err(ReleaseError::MissingPrerequisite {
            what: "VCPKG toolchain file".to_string(),
            paths: vec![toolchain_file],
        });
    }

    Ok(Toolchain {
        installation,
        dev_shell,
        toolchain_file,
    })
}
