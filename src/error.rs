//! Application-level error types.
//!
//! Wraps signing engine errors together with CLI and IO failures, and maps
//! each to actionable suggestions for the operator.

use crate::signer;
use thiserror::Error;

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for the signing CLI
#[derive(Error, Debug)]
pub enum AppError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Signing engine errors
    #[error("{0}")]
    Signer(#[from] signer::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl AppError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use signer::{Error as E, ValidationError as V};

        match self {
            AppError::Signer(E::Validation(V::MissingCertificate)) => {
                vec!["Pass the certificate with --pfx <PATH> or SIGNTOOL_PFX".to_string()]
            }
            AppError::Signer(E::Validation(V::CertificateNotFound(_))) => {
                vec!["Check the --pfx path; the file must exist".to_string()]
            }
            AppError::Signer(E::Validation(V::NoArtifacts)) => vec![
                "Pass files to sign as arguments or scan a folder with --folder <DIR>".to_string(),
            ],
            AppError::Signer(E::ToolNotFound { .. }) | AppError::Signer(E::RecoveryAborted) => vec![
                "Install the Windows SDK: signtool-batch install".to_string(),
                "Or point at signtool directly: --signtool <PATH>".to_string(),
            ],
            AppError::Signer(E::InvalidToolPath(_)) => {
                vec!["The --signtool path must point to an existing signtool.exe".to_string()]
            }
            AppError::Signer(E::ProvisionFailed { .. }) => vec![
                "Re-run from an elevated (Administrator) shell".to_string(),
                "Or install manually: signtool-batch download-page".to_string(),
            ],
            AppError::Signer(E::ManualInstallRequired { url }) => vec![
                format!("Download the Windows SDK from {url}"),
                "Select the 'Signing Tools for Windows' component, then re-run".to_string(),
            ],
            AppError::Signer(E::ProvisionInFlight) | AppError::Signer(E::BatchInFlight) => {
                vec!["Wait for the running operation to finish".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
