//! Builder for constructing SignerSettings.

use super::{PackageBackend, SignerSettings};
use crate::bail;
use std::path::PathBuf;
use std::time::Duration;

/// Builder for constructing [`SignerSettings`].
///
/// Every field starts from the stock Windows SDK configuration, so only
/// overrides need to be supplied.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use signtool_batch::signer::SignerSettingsBuilder;
///
/// # fn example() -> signtool_batch::signer::Result<()> {
/// let settings = SignerSettingsBuilder::new()
///     .job_timeout(Duration::from_secs(120))
///     .timestamp_url("http://timestamp.sectigo.com")
///     .build()?;
/// assert_eq!(settings.timestamp_url(), "http://timestamp.sectigo.com");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SignerSettingsBuilder {
    settings: SignerSettings,
}

impl SignerSettingsBuilder {
    /// Creates a builder seeded with the defaults.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the executable name resolved through PATH.
    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.settings.tool_name = name.into();
        self
    }

    /// Replaces the list of well-known install locations.
    pub fn known_install_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.settings.known_install_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the bound for each discovery probe.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.settings.probe_timeout = timeout;
        self
    }

    /// Sets the bound for each signtool run.
    pub fn job_timeout(mut self, timeout: Duration) -> Self {
        self.settings.job_timeout = timeout;
        self
    }

    /// Sets the RFC 3161 timestamp server.
    pub fn timestamp_url(mut self, url: impl Into<String>) -> Self {
        self.settings.timestamp_url = url.into();
        self
    }

    /// Replaces the package manager backends, tried in the given order.
    pub fn backends(mut self, backends: Vec<PackageBackend>) -> Self {
        self.settings.backends = backends;
        self
    }

    /// Sets the manual download page.
    pub fn download_url(mut self, url: impl Into<String>) -> Self {
        self.settings.download_url = url.into();
        self
    }

    /// Replaces the extensions collected by folder scans.
    ///
    /// Leading dots are stripped and case is ignored.
    pub fn artifact_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.settings.artifact_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool name or timestamp URL is empty, or a
    /// timeout is zero.
    pub fn build(self) -> crate::signer::Result<SignerSettings> {
        let settings = self.settings;

        if settings.tool_name.trim().is_empty() {
            bail!("tool_name must not be empty");
        }
        if settings.timestamp_url.trim().is_empty() {
            bail!("timestamp_url must not be empty");
        }
        if settings.job_timeout.is_zero() || settings.probe_timeout.is_zero() {
            bail!("timeouts must be greater than zero");
        }

        Ok(settings)
    }
}
