//! Configuration structures for release runs.
//!
//! This module provides the file-backed [`ReleaseConfig`], the per-run
//! [`BuildTarget`], resolved [`PathSet`] and the [`ReleaseSettings`] bundle
//! built once at the entry point via [`SettingsBuilder`].

mod arch;
mod builder;
mod config;
mod core;
mod paths;

// Re-export all public types
pub use arch::Arch;
pub use builder::SettingsBuilder;
pub use config::{
    ArchPaths, ArchiveConfig, CONFIG_FILE_NAME, ProjectLayout, ReleaseConfig, ToolchainConfig,
};
pub use self::core::{BuildTarget, ReleaseSettings};
pub use paths::{PathSet, ResourceKey};
