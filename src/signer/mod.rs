//! Batch Authenticode signing with signtool.
//!
//! This module locates `signtool.exe`, installs the Windows SDK when it is
//! missing, and signs lists of artifacts one at a time, reporting a result per
//! file without letting one failure stop the rest.
//!
//! # Example
//!
//! ```no_run
//! use signtool_batch::signer::{
//!     BatchEvent, Credential, RecoveryChoice, SignerSettings, SigningSession,
//! };
//!
//! # async fn example() -> signtool_batch::signer::Result<()> {
//! let mut session = SigningSession::new(SignerSettings::default());
//! session.artifacts_mut().add("target/release/app.exe");
//!
//! let credential = Credential::new("cert.pfx", "secret");
//! let abort = || RecoveryChoice::Abort;
//! let batch = session.sign(credential, &abort, |line| println!("{line}")).await?;
//!
//! let summary = batch
//!     .wait_with_events(|event| {
//!         if let BatchEvent::Log(line) = event {
//!             println!("{line}");
//!         }
//!     })
//!     .await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod job;
pub mod settings;
pub mod tool;
pub mod utils;

pub use batch::{
    BatchEvent, BatchHandle, BatchSigner, BatchSummary, BatchVerdict, RecoveryChoice,
    RecoveryPrompt, SigningSession, ToolRecovery,
};
pub use error::{Error, Result, ValidationError};
pub use job::{JobOutcome, JobResult, SigningJob};
pub use settings::{
    ArtifactList, Credential, PackageBackend, SignerSettings, SignerSettingsBuilder,
};
pub use tool::{
    ProvisionHandle, ProvisionOutcome, ToolLocator, ToolPath, ToolPathCache, ToolProvisioner,
    ToolStatus,
};
