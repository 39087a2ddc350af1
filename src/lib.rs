//! Batch code-signing driver for Windows artifacts.
//!
//! This library locates `signtool.exe`, installs the Windows SDK when it is
//! missing, and signs executables, libraries, installers and drivers with a
//! PFX certificate, one file at a time with a result per file.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod signer;

// Re-export commonly used types
pub use error::{AppError, CliError, Result};
