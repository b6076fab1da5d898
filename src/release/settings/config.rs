//! File-backed release configuration.
//!
//! Everything here has a default matching the project's standard checkout, so
//! `release.toml` is optional and only needs the keys that differ.

use super::Arch;
use crate::error::{ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up under the project root.
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Top-level release configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Product name, used for the executable, the version match and the archive name.
    pub project_name: String,

    /// Built executable file name. Defaults to `<project_name>.exe`.
    pub executable: Option<String>,

    /// Build configuration passed to the configure and build commands.
    pub build_config: String,

    /// Shared libraries produced by the build that ship next to the executable.
    pub build_libraries: Vec<String>,

    /// Source tree layout.
    pub layout: ProjectLayout,

    /// Native toolchain location and invocation.
    pub toolchain: ToolchainConfig,

    /// Portable archive settings.
    pub archive: ArchiveConfig,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            project_name: "Stremato".to_string(),
            executable: None,
            build_config: "Release".to_string(),
            build_libraries: vec!["libcurl.dll".to_string(), "fmt.dll".to_string()],
            layout: ProjectLayout::default(),
            toolchain: ToolchainConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Loads the configuration file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No configuration file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).fs_context("reading configuration", path)?;
        let config: ReleaseConfig = toml::from_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// File name of the built executable.
    pub fn executable_name(&self) -> String {
        self.executable
            .clone()
            .unwrap_or_else(|| format!("{}.exe", self.project_name))
    }
}

/// Path pair keyed by architecture.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ArchPaths {
    /// Path used for 32-bit releases
    pub x86: PathBuf,
    /// Path used for 64-bit releases
    pub x64: PathBuf,
}

impl ArchPaths {
    /// Returns the entry for `arch`.
    pub fn for_arch(&self, arch: Arch) -> &Path {
        match arch {
            Arch::X86 => &self.x86,
            Arch::X64 => &self.x64,
        }
    }
}

/// Locations of inputs and outputs, relative to the project root.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectLayout {
    pub mpv_library: ArchPaths,
    pub server_script: PathBuf,
    pub runtime_executable: PathBuf,
    pub ffmpeg_folder: PathBuf,
    pub default_settings_folder: PathBuf,
    pub webview_runtime: ArchPaths,
    pub manifest: PathBuf,
    pub toolchain_file: PathBuf,
    pub build_dir: PathBuf,
    pub release_dir: PathBuf,
}

fn rel(parts: &[&str]) -> PathBuf {
    parts.iter().collect()
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            mpv_library: ArchPaths {
                x86: rel(&["deps", "libmpv", "i686", "libmpv-2.dll"]),
                x64: rel(&["deps", "libmpv", "x86_64", "libmpv-2.dll"]),
            },
            server_script: rel(&["resources", "Stremato", "server.js"]),
            runtime_executable: rel(&["resources", "stremato", "stremio-runtime.exe"]),
            ffmpeg_folder: rel(&["resources", "ffmpeg"]),
            default_settings_folder: rel(&["resources", "portable_config"]),
            webview_runtime: ArchPaths {
                x86: rel(&["resources", "windows", "WebviewRuntime", "x86"]),
                x64: rel(&["resources", "windows", "WebviewRuntime", "x64"]),
            },
            manifest: rel(&["CMakeLists.txt"]),
            toolchain_file: rel(&["vcpkg", "scripts", "buildsystems", "vcpkg.cmake"]),
            build_dir: rel(&["prod"]),
            release_dir: rel(&["release"]),
        }
    }
}

/// Native build toolchain settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Candidate Visual Studio installation directories, probed in order.
    pub installations: Vec<PathBuf>,

    /// Developer shell entry point, relative to an installation directory.
    pub dev_shell: PathBuf,

    /// Variable pointing the dependency manager at the chosen installation.
    pub install_env_var: String,

    /// Configure/build driver program.
    pub cmake: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        let program_files = std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"));
        let vs = program_files.join("Microsoft Visual Studio");

        Self {
            installations: vec![
                vs.join("18").join("Insiders"),
                vs.join("2022").join("Community"),
                vs.join("2022").join("Professional"),
                vs.join("2022").join("Enterprise"),
            ],
            dev_shell: rel(&["Common7", "Tools", "VsDevCmd.bat"]),
            install_env_var: "VCPKG_VISUAL_STUDIO_PATH".to_string(),
            cmake: PathBuf::from("cmake"),
        }
    }
}

/// Portable archive settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Well-known archiver install paths, probed in order.
    pub candidates: Vec<PathBuf>,

    /// Fall back to a `PATH` lookup of `program_names` when no candidate exists.
    pub search_path: bool,

    /// Program names tried on `PATH`.
    pub program_names: Vec<String>,

    /// Archive file extension, also the archiver `-t` type.
    pub extension: String,

    /// Subfolder of the staged webview runtime removed once the archive exists.
    pub webview_subfolder: String,

    /// File name suffixes never copied into the settings folder.
    pub exclude_suffixes: Vec<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                PathBuf::from(r"C:\Program Files\7-Zip\7z.exe"),
                PathBuf::from(r"C:\Program Files (x86)\7-Zip\7z.exe"),
            ],
            search_path: true,
            program_names: vec!["7z".to_string(), "7za".to_string()],
            extension: "7z".to_string(),
            webview_subfolder: "EdgeWebView".to_string(),
            exclude_suffixes: vec!["zip".to_string(), "7z".to_string()],
        }
    }
}
