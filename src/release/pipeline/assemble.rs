//! Release directory assembly.

use crate::error::Result;
use crate::release::PORTABLE_CONFIG_DIR;
use crate::release::settings::{ReleaseSettings, ResourceKey};
use crate::release::utils::fs::{self, CopyMode, CopySpec};
use std::path::Path;

/// Copies every runtime artifact into the release directory.
///
/// Order is fixed: executable, mpv library, server script, build libraries,
/// runtime executable, ffmpeg (flattened), default settings (nested under
/// `portable_config`). A missing required file aborts assembly.
pub async fn assemble(settings: &ReleaseSettings) -> Result<()> {
    let paths = settings.paths();
    let build_dir = paths.build_dir();
    let release_dir = paths.release_dir();

    let executable = settings.config().executable_name();
    fs::copy_file(&build_dir.join(&executable), &release_dir.join(&executable)).await?;

    for key in [ResourceKey::MpvLibrary, ResourceKey::ServerScript] {
        copy_into(paths.get(key), release_dir).await?;
    }
    for library in &settings.config().build_libraries {
        fs::copy_file(&build_dir.join(library), &release_dir.join(library)).await?;
    }
    copy_into(paths.get(ResourceKey::RuntimeExecutable), release_dir).await?;

    fs::copy_folder(&CopySpec::new(
        paths.get(ResourceKey::FfmpegFolder),
        release_dir,
        CopyMode::Flatten,
    ))
    .await?;

    let settings_spec = CopySpec::new(
        paths.get(ResourceKey::DefaultSettingsFolder),
        release_dir.join(PORTABLE_CONFIG_DIR),
        CopyMode::PreserveStructure,
    )
    .exclude(settings.config().archive.exclude_suffixes.iter().cloned());
    fs::copy_folder(&settings_spec).await?;

    Ok(())
}

/// Copies `source` into `dir`, keeping its file name.
async fn copy_into(source: &Path, dir: &Path) -> Result<()> {
    let name = source.file_name().unwrap_or(source.as_os_str());
    fs::copy_file(source, &dir.join(name)).await
}
