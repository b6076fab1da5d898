//! Release pipeline sequencing and its result.

mod assemble;
mod orchestrator;

pub use assemble::assemble;
pub use orchestrator::ReleasePipeline;

use crate::error::ReleaseError;
use crate::release::archive::ArchiveArtifact;
use std::fmt;

/// A step of the release pipeline that can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStep {
    Cleaning,
    Building,
    Assembling,
    PortableArchiving,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStep::Cleaning => "Cleaning",
            PipelineStep::Building => "Building",
            PipelineStep::Assembling => "Assembling",
            PipelineStep::PortableArchiving => "PortableArchiving",
        })
    }
}

/// Outcome of a pipeline run, consumed by the process boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineResult {
    pub succeeded: bool,
    pub failed_step: Option<PipelineStep>,
    /// Empty on success; otherwise the error kind and message.
    pub error_detail: String,
    /// Set when a portable archive was produced.
    pub archive: Option<ArchiveArtifact>,
}

impl PipelineResult {
    pub fn success(archive: Option<ArchiveArtifact>) -> Self {
        Self {
            succeeded: true,
            failed_step: None,
            error_detail: String::new(),
            archive,
        }
    }

    pub fn failure(step: PipelineStep, error: &ReleaseError) -> Self {
        Self {
            succeeded: false,
            failed_step: Some(step),
            error_detail: format!("{}: {}", error.kind(), error),
            archive: None,
        }
    }

    /// 0 on success, 1 on any failure.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded { 0 } else { 1 }
    }
}
