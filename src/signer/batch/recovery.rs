//! Recovering a usable signtool path when none is cached at batch start.
//!
//! The protocol:
//!
//! 1. Use the cached path if it still exists.
//! 2. Run discovery once more.
//! 3. Ask the operator: install the SDK, point at signtool manually, or cancel.
//!    - Install: run the provisioner, then discovery again.
//!    - Manual: accept the path once it exists on disk.
//!    - Cancel: abort the batch.
//!
//! When provisioning finds no package manager the operator gets one more
//! chance to supply a path before the batch is abandoned.

use crate::signer::{
    Error, Result,
    tool::{ProvisionOutcome, ToolLocator, ToolPath, ToolPathCache, ToolProvisioner},
};
use std::path::PathBuf;

/// Operator decision when signtool is missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Install the Windows SDK through a package manager
    Provision,
    /// Use this signtool path
    ManualPath(PathBuf),
    /// Abandon the batch
    Abort,
}

/// Asks the operator how to recover a missing signtool.
///
/// Called synchronously from the foreground; implementations may block on
/// user input.
pub trait RecoveryPrompt {
    /// Three-way choice shown when discovery fails.
    fn ask_recovery_choice(&self) -> RecoveryChoice;

    /// Called when no package manager is available. Returning a path uses it
    /// as a manual override; `None` abandons the batch.
    fn manual_install_required(&self, _url: &str) -> Option<PathBuf> {
        None
    }
}

impl<F> RecoveryPrompt for F
where
    F: Fn() -> RecoveryChoice,
{
    fn ask_recovery_choice(&self) -> RecoveryChoice {
        self()
    }
}

/// Runs the recovery protocol against shared discovery state.
pub struct ToolRecovery<'a> {
    cache: &'a ToolPathCache,
    locator: &'a ToolLocator,
    provisioner: &'a ToolProvisioner,
}

impl<'a> ToolRecovery<'a> {
    pub fn new(
        cache: &'a ToolPathCache,
        locator: &'a ToolLocator,
        provisioner: &'a ToolProvisioner,
    ) -> Self {
        Self {
            cache,
            locator,
            provisioner,
        }
    }

    /// Returns a usable signtool path or the reason none could be obtained.
    ///
    /// Provisioning progress is forwarded to `on_line`.
    pub async fn recover(
        &self,
        prompt: &dyn RecoveryPrompt,
        mut on_line: impl FnMut(&str),
    ) -> Result<ToolPath> {
        if let Some(path) = self.cache.current() {
            return Ok(path);
        }

        if let Some(path) = self.locator.locate_into(self.cache).await {
            return Ok(path);
        }

        on_line("signtool.exe not found. signtool.exe is required to sign files.");

        match prompt.ask_recovery_choice() {
            RecoveryChoice::Abort => {
                log::info!("Tool recovery cancelled by operator");
                Err(Error::RecoveryAborted)
            }
            RecoveryChoice::ManualPath(path) => self.cache.set_manual_override(path),
            RecoveryChoice::Provision => {
                let outcome = self
                    .provisioner
                    .provision()?
                    .wait_with_progress(&mut on_line)
                    .await?;

                match outcome {
                    ProvisionOutcome::ManualRequired { url } => {
                        match prompt.manual_install_required(&url) {
                            Some(path) => self.cache.set_manual_override(path),
                            None => Err(Error::ManualInstallRequired { url }),
                        }
                    }
                    outcome => {
                        outcome.into_result()?;
                        self.locator
                            .locate_into(self.cache)
                            .await
                            .ok_or_else(|| Error::ToolNotFound {
                                tool: self.locator.tool_name().to_string(),
                            })
                    }
                }
            }
        }
    }
}
