//! Resolution of every input and output location of a release run.

use super::{Arch, ProjectLayout};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Logical name of a resource the pipeline reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKey {
    MpvLibrary,
    ServerScript,
    RuntimeExecutable,
    FfmpegFolder,
    DefaultSettingsFolder,
    WebviewRuntime,
    Manifest,
    ToolchainFile,
    BuildDir,
    ReleaseDir,
}

impl ResourceKey {
    /// Every key, in resolution order.
    pub const ALL: [ResourceKey; 10] = [
        ResourceKey::MpvLibrary,
        ResourceKey::ServerScript,
        ResourceKey::RuntimeExecutable,
        ResourceKey::FfmpegFolder,
        ResourceKey::DefaultSettingsFolder,
        ResourceKey::WebviewRuntime,
        ResourceKey::Manifest,
        ResourceKey::ToolchainFile,
        ResourceKey::BuildDir,
        ResourceKey::ReleaseDir,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKey::MpvLibrary => "mpvLibrary",
            ResourceKey::ServerScript => "serverScript",
            ResourceKey::RuntimeExecutable => "runtimeExecutable",
            ResourceKey::FfmpegFolder => "ffmpegFolder",
            ResourceKey::DefaultSettingsFolder => "defaultSettingsFolder",
            ResourceKey::WebviewRuntime => "webviewRuntime",
            ResourceKey::Manifest => "manifest",
            ResourceKey::ToolchainFile => "toolchainFile",
            ResourceKey::BuildDir => "buildDir",
            ResourceKey::ReleaseDir => "releaseDir",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Absolute path of every [`ResourceKey`] for one run.
///
/// Built once by [`PathSet::resolve`] and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct PathSet {
    paths: BTreeMap<ResourceKey, PathBuf>,
}

impl PathSet {
    /// Joins each layout entry onto `root`, picking the `arch` variant of
    /// architecture-keyed entries.
    ///
    /// Does not touch the filesystem. `root` is expected to be absolute
    /// already; the CLI absolutizes it before settings are built.
    pub fn resolve(root: &Path, arch: Arch, layout: &ProjectLayout) -> Self {
        let paths = ResourceKey::ALL
            .into_iter()
            .map(|key| {
                let relative: &Path = match key {
                    ResourceKey::MpvLibrary => layout.mpv_library.for_arch(arch),
                    ResourceKey::ServerScript => &layout.server_script,
                    ResourceKey::RuntimeExecutable => &layout.runtime_executable,
                    ResourceKey::FfmpegFolder => &layout.ffmpeg_folder,
                    ResourceKey::DefaultSettingsFolder => &layout.default_settings_folder,
                    ResourceKey::WebviewRuntime => layout.webview_runtime.for_arch(arch),
                    ResourceKey::Manifest => &layout.manifest,
                    ResourceKey::ToolchainFile => &layout.toolchain_file,
                    ResourceKey::BuildDir => &layout.build_dir,
                    ResourceKey::ReleaseDir => &layout.release_dir,
                };
                (key, root.join(relative))
            })
            .collect();

        Self { paths }
    }

    /// Path of `key`.
    pub fn get(&self, key: ResourceKey) -> &Path {
        // resolve() fills every key
        &self.paths[&key]
    }

    /// Iterates `(key, path)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &Path)> {
        self.paths.iter().map(|(k, p)| (*k, p.as_path()))
    }

    pub fn build_dir(&self) -> &Path {
        self.get(ResourceKey::BuildDir)
    }

    pub fn release_dir(&self) -> &Path {
        self.get(ResourceKey::ReleaseDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        std::env::temp_dir().join("release-root")
    }

    #[test]
    fn every_key_resolves_to_absolute_path_for_every_arch() {
        let layout = ProjectLayout::default();
        for arch in Arch::ALL {
            let set = PathSet::resolve(&root(), arch, &layout);
            assert_eq!(set.iter().count(), ResourceKey::ALL.len());
            for (key, path) in set.iter() {
                assert!(!path.as_os_str().is_empty(), "{key} is empty");
                assert!(path.is_absolute(), "{key} is not absolute: {}", path.display());
                assert!(path.starts_with(root()));
            }
        }
    }

    #[test]
    fn architecture_keyed_entries_differ() {
        let layout = ProjectLayout::default();
        let x86 = PathSet::resolve(&root(), Arch::X86, &layout);
        let x64 = PathSet::resolve(&root(), Arch::X64, &layout);

        assert!(x86.get(ResourceKey::MpvLibrary).ends_with("i686/libmpv-2.dll"));
        assert!(x64.get(ResourceKey::MpvLibrary).ends_with("x86_64/libmpv-2.dll"));
        assert!(x86.get(ResourceKey::WebviewRuntime).ends_with("WebviewRuntime/x86"));
        assert!(x64.get(ResourceKey::WebviewRuntime).ends_with("WebviewRuntime/x64"));
        assert_eq!(x86.release_dir(), x64.release_dir());
    }

    #[test]
    fn key_names_are_camel_case() {
        assert_eq!(ResourceKey::MpvLibrary.to_string(), "mpvLibrary");
        assert_eq!(ResourceKey::DefaultSettingsFolder.name(), "defaultSettingsFolder");
    }
}
