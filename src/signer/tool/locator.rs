//! signtool discovery.
//!
//! Strategies run in a fixed order and the first hit wins:
//!
//! 1. PATH resolution of the tool name (via [`which`])
//! 2. Each well-known Windows SDK install location, in order
//!
//! Every probe is bounded by the configured probe timeout. A probe that
//! errors or times out counts as a miss for that step only.

use super::{ToolPath, ToolPathCache};
use crate::signer::settings::SignerSettings;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

/// Finds the signtool executable.
///
/// `locate` always probes afresh and never consults a cache; use
/// [`locate_into`](Self::locate_into) to record a hit in a [`ToolPathCache`].
#[derive(Clone, Debug)]
pub struct ToolLocator {
    tool_name: String,
    known_install_paths: Vec<PathBuf>,
    probe_timeout: Duration,
}

impl ToolLocator {
    /// Creates a locator from the discovery section of the settings.
    pub fn new(settings: &SignerSettings) -> Self {
        Self {
            tool_name: settings.tool_name().to_string(),
            known_install_paths: settings.known_install_paths().to_vec(),
            probe_timeout: settings.probe_timeout(),
        }
    }

    /// Executable name resolved through PATH.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Runs discovery and returns the first existing signtool path.
    pub async fn locate(&self) -> Option<ToolPath> {
        match self.probe_search_path().await {
            Ok(Some(path)) => {
                log::info!("✓ Found {} in PATH at: {}", self.tool_name, path.display());
                return Some(ToolPath::new(path));
            }
            Ok(None) => {
                log::debug!("{} not found in PATH", self.tool_name);
            }
            Err(reason) => {
                log::debug!("PATH lookup for {} failed: {}", self.tool_name, reason);
            }
        }

        for candidate in &self.known_install_paths {
            match self.probe_install_path(candidate).await {
                Ok(true) => {
                    log::info!("✓ Found {} at: {}", self.tool_name, candidate.display());
                    return Some(ToolPath::new(candidate.clone()));
                }
                Ok(false) => {}
                Err(reason) => {
                    log::debug!("Probe of {} failed: {}", candidate.display(), reason);
                }
            }
        }

        log::warn!(
            "{} not found in PATH or {} known install location(s)",
            self.tool_name,
            self.known_install_paths.len()
        );
        None
    }

    /// Runs discovery and records a hit in `cache`.
    ///
    /// A miss leaves the cache untouched.
    pub async fn locate_into(&self, cache: &ToolPathCache) -> Option<ToolPath> {
        let found = self.locate().await?;
        cache.store_discovered(found.clone());
        Some(found)
    }

    /// Resolves the tool name through PATH.
    async fn probe_search_path(&self) -> Result<Option<PathBuf>, String> {
        let name = self.tool_name.clone();
        let lookup = tokio::task::spawn_blocking(move || which::which(name));

        match timeout(self.probe_timeout, lookup).await {
            Err(_elapsed) => Err(format!(
                "timed out after {} ms",
                self.probe_timeout.as_millis()
            )),
            Ok(Err(join_error)) => Err(join_error.to_string()),
            Ok(Ok(Err(which::Error::CannotFindBinaryPath))) => Ok(None),
            Ok(Ok(Err(e))) => Err(e.to_string()),
            Ok(Ok(Ok(path))) => {
                // which may resolve a dangling symlink
                if self.probe_install_path(&path).await? {
                    Ok(Some(path))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Checks whether a candidate path exists.
    async fn probe_install_path(&self, path: &Path) -> Result<bool, String> {
        match timeout(self.probe_timeout, tokio::fs::try_exists(path)).await {
            Err(_elapsed) => Err(format!(
                "timed out after {} ms",
                self.probe_timeout.as_millis()
            )),
            Ok(Err(e)) => Err(e.to_string()),
            Ok(Ok(exists)) => Ok(exists),
        }
    }
}
