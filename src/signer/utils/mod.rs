//! Filesystem and desktop helpers used by the signing engine.

pub mod browser;
pub mod fs;
