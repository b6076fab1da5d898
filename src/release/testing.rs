//! In-process [`ProcessRunner`] used by unit tests.

use crate::error::{ReleaseError, Result};
use crate::release::process::{CommandSpec, ProcessRunner};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Records every invocation instead of spawning anything.
///
/// An archiver call (`<program> a ... <output> <dir>/*`) writes a small file
/// at `<output>` and snapshots the files present under `<dir>` at that moment.
#[derive(Default)]
pub struct FakeRunner {
    pub ran: RefCell<Vec<CommandSpec>>,
    pub activations: RefCell<Vec<PathBuf>>,
    /// Fail any command whose rendered line contains this text.
    pub fail_when: Option<String>,
    pub archived_files: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_when: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    pub fn archiver_runs(&self) -> usize {
        self.ran
            .borrow()
            .iter()
            .filter(|c| c.args.first().is_some_and(|a| a == "a"))
            .count()
    }
}

impl ProcessRunner for FakeRunner {
    async fn run(&self, command: &CommandSpec) -> Result<()> {
        self.ran.borrow_mut().push(command.clone());
        let line = command.to_string();

        if self
            .fail_when
            .as_deref()
            .is_some_and(|pattern| line.contains(pattern))
        {
            return Err(ReleaseError::ExternalProcess {
                command: line,
                reason: "process exited with exit status: 1".into(),
            });
        }

        if command.args.first().is_some_and(|a| a == "a") {
            let output = PathBuf::from(&command.args[3]);
            let root = output.parent().unwrap_or(Path::new("/")).to_path_buf();
            *self.archived_files.borrow_mut() = files_under(&root);
            std::fs::write(&output, b"7z archive").map_err(|e| ReleaseError::Io {
                context: "writing fake archive".into(),
                path: output.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    async fn capture_environment(
        &self,
        script: &Path,
        _args: &[String],
    ) -> Result<Vec<(String, String)>> {
        self.activations.borrow_mut().push(script.to_path_buf());
        Ok(Vec::new())
    }
}

/// Relative paths of every file under `root`, sorted, with `/` separators.
pub fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}

/// Writes `content` to `path`, creating parents.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
