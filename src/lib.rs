//! Release assembler library.
//!
//! Builds a native Windows application with CMake and vcpkg, stages it with
//! its runtime dependencies into a self-contained release directory, and
//! optionally packs that directory into a portable 7-Zip archive.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod metadata;
pub mod release;

// Re-export commonly used types
pub use error::{ReleaseError, Result};
