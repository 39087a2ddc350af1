//! Error types for the signing engine.
//!
//! Per-file signing failures are not errors: they are recorded as
//! [`JobOutcome`](crate::signer::JobOutcome) values and never abort a batch.
//! The variants here cover batch-level conditions that stop work before any
//! job runs, and failures of the tool recovery protocol.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for signing engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Batch preconditions that block a batch from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No certificate path supplied
    #[error("Please select a PFX certificate file")]
    MissingCertificate,

    /// Certificate path does not exist on disk
    #[error("PFX file does not exist: {}", .0.display())]
    CertificateNotFound(PathBuf),

    /// Nothing to sign
    #[error("Please select at least one file to sign")]
    NoArtifacts,
}

/// Main error type for the signing engine
#[derive(Error, Debug)]
pub enum Error {
    /// Batch precondition failed, no job was started
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// signtool could not be discovered
    #[error("{tool} not found in PATH or any known Windows SDK location")]
    ToolNotFound {
        /// Executable name that was searched for
        tool: String,
    },

    /// A manually supplied tool path does not exist
    #[error("signtool path does not exist: {}", .0.display())]
    InvalidToolPath(PathBuf),

    /// Package manager ran but reported failure
    #[error("Windows SDK installation via {backend} failed (exit code: {exit_code:?})")]
    ProvisionFailed {
        /// Backend that ran the install
        backend: String,
        /// Exit code of the installer, if it exited normally
        exit_code: Option<i32>,
        /// Combined installer output, for display
        output: Vec<String>,
    },

    /// No package manager backend is available on this system
    #[error("No package manager (winget/choco) found; install the Windows SDK manually from {url}")]
    ManualInstallRequired {
        /// Download page for manual installation
        url: String,
    },

    /// A provisioning run is already in progress
    #[error("Windows SDK installation is already in progress")]
    ProvisionInFlight,

    /// A batch is already running
    #[error("A signing batch is already running")]
    BatchInFlight,

    /// Operator abandoned tool recovery
    #[error("Signing cancelled: signtool is required to sign files")]
    RecoveryAborted,

    /// Filesystem error with context
    #[error("{context} ({}): {source}", path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Background task failed to complete
    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Attach filesystem context to io results.
pub trait ErrorExt<T> {
    /// Wrap an io error with a description of the operation and the path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Return early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::signer::Error::GenericError(format!($($arg)*)))
    };
}
