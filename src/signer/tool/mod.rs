//! signtool discovery, caching and installation.
//!
//! - [`ToolLocator`] finds signtool through PATH and well-known SDK folders
//! - [`ToolPathCache`] is the process-wide record of the path in use
//! - [`ToolProvisioner`] installs the Windows SDK through a package manager

mod cache;
mod locator;
mod provisioner;

pub use cache::{ToolPath, ToolPathCache, ToolStatus};
pub use locator::ToolLocator;
pub use provisioner::{ProvisionHandle, ProvisionOutcome, ToolProvisioner};
