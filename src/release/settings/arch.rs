//! CPU architecture types and utilities.

use std::fmt;

/// CPU architecture of the release.
///
/// Only the two Windows desktop targets are supported. The architecture is
/// picked once from the command line and drives every architecture-keyed
/// path, the developer shell `-arch=` switch and the vcpkg triplet.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86 / i686 (32-bit)
    X86,
    /// x86_64 / AMD64 (64-bit)
    #[default]
    X64,
}

impl Arch {
    /// Every supported architecture, in declaration order.
    pub const ALL: [Arch; 2] = [Arch::X86, Arch::X64];

    /// Short name used in file names and the developer shell switch.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X64 => "x64",
        }
    }

    /// vcpkg target triplet for this architecture.
    pub fn vcpkg_triplet(self) -> &'static str {
        match self {
            Arch::X86 => "x86-windows",
            Arch::X64 => "x64-windows",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
