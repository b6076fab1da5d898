//! Command line argument parsing and validation.

use crate::release::Arch;
use clap::Parser;
use std::path::PathBuf;

/// Builds and stages a release of the native application
#[derive(Parser, Debug)]
#[command(
    name = "release_assembler",
    version,
    about = "Builds the native application and assembles a self-contained release",
    long_about = "Builds the native application with CMake inside the Visual Studio developer \
environment, copies it and its runtime dependencies into <root>/release, and optionally packs \
that directory into <project>-<version>-<arch>.7z.

Usage:
  release_assembler
  release_assembler --x86 --portable
  release_assembler --root C:/src/stremato --config release.toml --portable

Exit code 0 = release directory (and archive, if requested) is complete."
)]
pub struct Args {
    /// Build a 32-bit release
    #[arg(long, conflicts_with = "x64")]
    pub x86: bool,

    /// Build a 64-bit release (default)
    #[arg(long)]
    pub x64: bool,

    /// Request an installer (not produced by this tool; logged and ignored)
    #[arg(long)]
    pub installer: bool,

    /// Pack the release directory into a portable archive
    #[arg(long)]
    pub portable: bool,

    /// Project root containing CMakeLists.txt
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: <root>/release.toml, optional)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build configuration, overriding the configuration file
    #[arg(long, value_name = "NAME")]
    pub build_config: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Selected architecture.
    pub fn arch(&self) -> Arch {
        if self.x86 { Arch::X86 } else { Arch::X64 }
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.x86 && self.x64 {
            return Err("--x86 and --x64 are mutually exclusive".to_string());
        }
        if self
            .build_config
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err("Build configuration cannot be empty".to_string());
        }
        Ok(())
    }

    /// Configuration file to load.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(crate::release::settings::CONFIG_FILE_NAME))
    }
}
