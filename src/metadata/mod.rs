//! Version discovery from the CMake project manifest.

use regex::Regex;
use std::path::Path;

/// Version used when the manifest is absent or declares none.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Extracts the version from a `project(<name> VERSION "x.y.z")` declaration.
///
/// Matching is case-insensitive and the quotes are optional. Returns
/// [`DEFAULT_VERSION`] when the file is missing, unreadable, or has no
/// matching declaration. Never fails: the version only names the archive.
pub fn extract_version(manifest: &Path, project_name: &str) -> String {
    let content = match std::fs::read_to_string(manifest) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("Cannot read manifest {}: {}", manifest.display(), e);
            return DEFAULT_VERSION.to_string();
        }
    };

    match version_from_str(&content, project_name) {
        Some(version) => {
            log::info!("Found {} version {}", project_name, version);
            version
        }
        None => {
            log::warn!(
                "No version declaration for {} in {}, using {}",
                project_name,
                manifest.display(),
                DEFAULT_VERSION
            );
            DEFAULT_VERSION.to_string()
        }
    }
}

fn version_from_str(content: &str, project_name: &str) -> Option<String> {
    let pattern = format!(
        r#"(?i)project\s*\(\s*{}\s+VERSION\s+"?([0-9.]+)"?\s*\)"#,
        regex::escape(project_name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
