//! Archiver executable lookup.

use crate::error::{ReleaseError, Result};
use crate::release::settings::ArchiveConfig;
use std::path::PathBuf;

/// Locate the archiver.
///
/// Probes the configured install paths in order and takes the first that
/// exists. When none does and `search_path` is enabled, falls back to a
/// `PATH` lookup of each configured program name.
pub fn locate_archiver(config: &ArchiveConfig) -> Result<PathBuf> {
    if let Some(found) = config.candidates.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }

    let mut searched = config.candidates.clone();
    if config.search_path {
        for name in &config.program_names {
            match which::which(name) {
                Ok(path) => {
                    log::debug!("Found {} on PATH at: {}", name, path.display());
                    return Ok(path);
                }
                Err(e) => {
                    log::debug!("{} not found in PATH: {}", name, e);
                    searched.push(PathBuf::from(format!("PATH:{name}")));
                }
            }
        }
    }

    Err(ReleaseError::ArchiverNotFound { searched })
}
