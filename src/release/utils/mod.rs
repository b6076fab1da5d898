//! Shared helpers for release staging.

pub mod fs;
