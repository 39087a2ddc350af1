//! Command execution functions for signing operations.

mod sign;
mod tool;

pub use sign::sign;
pub use tool::{download_page, install, status};

/// Exit code: every file signed
pub const EXIT_OK: i32 = 0;
/// Exit code: batch finished with failures
pub const EXIT_BATCH_FAILURES: i32 = 2;
/// Exit code: operator must install the SDK by hand
pub const EXIT_MANUAL_INSTALL: i32 = 3;
/// Exit code: signtool not found or installer failed
pub const EXIT_TOOL_MISSING: i32 = 1;
