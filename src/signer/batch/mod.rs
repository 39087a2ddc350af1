//! Batch signing orchestration.
//!
//! - [`BatchSigner`] runs jobs sequentially with per-file isolation
//! - [`ToolRecovery`] obtains signtool when none is cached
//! - [`SigningSession`] ties the worklist, tool cache and background tasks together

mod orchestrator;
mod recovery;
mod session;
mod summary;

pub use orchestrator::{BatchGuard, BatchSigner, validate_batch};
pub use recovery::{RecoveryChoice, RecoveryPrompt, ToolRecovery};
pub use session::{BatchHandle, SigningSession};
pub use summary::{BatchEvent, BatchSummary, BatchVerdict};
