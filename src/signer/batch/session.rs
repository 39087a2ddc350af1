//! Foreground owner of signing state.

use super::{
    orchestrator::{BatchSigner, validate_batch},
    recovery::{RecoveryPrompt, ToolRecovery},
    summary::{BatchEvent, BatchSummary},
};
use crate::signer::{
    Result,
    settings::{ArtifactList, Credential, SignerSettings},
    tool::{ProvisionHandle, ToolLocator, ToolPath, ToolPathCache, ToolProvisioner, ToolStatus},
};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A batch running on a background task.
pub struct BatchHandle {
    events: mpsc::UnboundedReceiver<BatchEvent>,
    task: JoinHandle<Result<BatchSummary>>,
}

impl BatchHandle {
    /// Next progress event, or `None` once the batch task has ended.
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Waits for the summary, discarding unread events.
    pub async fn finish(self) -> Result<BatchSummary> {
        self.task.await?
    }

    /// Forwards every event to `on_event`, then returns the summary.
    pub async fn wait_with_events(
        mut self,
        mut on_event: impl FnMut(BatchEvent),
    ) -> Result<BatchSummary> {
        while let Some(event) = self.events.recv().await {
            on_event(event);
        }
        self.finish().await
    }
}

/// Signing session: the artifact worklist, the shared signtool path, and the
/// components that act on them.
///
/// Discovery, provisioning and batches run on background tasks; the session
/// itself only hands out handles.
pub struct SigningSession {
    settings: SignerSettings,
    artifacts: ArtifactList,
    cache: ToolPathCache,
    locator: ToolLocator,
    provisioner: ToolProvisioner,
    signer: BatchSigner,
}

impl SigningSession {
    /// Creates a session with an empty worklist and an unset signtool path.
    pub fn new(settings: SignerSettings) -> Self {
        Self::with_cache(settings, ToolPathCache::new())
    }

    /// Creates a session sharing an existing signtool path cache.
    pub fn with_cache(settings: SignerSettings, cache: ToolPathCache) -> Self {
        Self {
            locator: ToolLocator::new(&settings),
            provisioner: ToolProvisioner::new(&settings),
            signer: BatchSigner::new(settings.clone()),
            artifacts: ArtifactList::new(),
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &SignerSettings {
        &self.settings
    }

    pub fn artifacts(&self) -> &ArtifactList {
        &self.artifacts
    }

    pub fn artifacts_mut(&mut self) -> &mut ArtifactList {
        &mut self.artifacts
    }

    /// Recursively adds matching files under `dir` to the worklist.
    pub async fn add_folder(&mut self, dir: &Path) -> Result<usize> {
        let extensions = self.settings.artifact_extensions().to_vec();
        self.artifacts.add_folder(dir, &extensions).await
    }

    pub fn tool_cache(&self) -> &ToolPathCache {
        &self.cache
    }

    pub fn status(&self) -> ToolStatus {
        self.cache.status()
    }

    /// Re-runs discovery, caching any hit, and reports the result.
    pub async fn refresh(&self) -> ToolStatus {
        log::info!("Refreshing SDK detection...");
        match self.locator.locate_into(&self.cache).await {
            Some(path) => ToolStatus::Found(path),
            // a cached manual override stays valid after a discovery miss
            None => self.cache.status(),
        }
    }

    /// Uses an operator-supplied signtool after an existence check.
    pub fn set_manual_tool(&self, path: impl Into<PathBuf>) -> Result<ToolPath> {
        self.cache.set_manual_override(path)
    }

    /// Starts a Windows SDK installation in the background.
    pub fn provision(&self) -> Result<ProvisionHandle> {
        self.provisioner.provision()
    }

    /// Opens the manual SDK download page.
    pub async fn open_download_page(&self) -> Result<()> {
        self.provisioner.open_download_page().await
    }

    /// Whether a batch is running.
    pub fn is_signing(&self) -> bool {
        self.signer.is_running()
    }

    /// Returns a usable signtool, running the recovery protocol if needed.
    pub async fn ensure_tool(
        &self,
        prompt: &dyn RecoveryPrompt,
        on_line: impl FnMut(&str),
    ) -> Result<ToolPath> {
        ToolRecovery::new(&self.cache, &self.locator, &self.provisioner)
            .recover(prompt, on_line)
            .await
    }

    /// Starts a batch over the current worklist with a known tool.
    ///
    /// Fails immediately if preconditions are not met or a batch is already
    /// running. The worklist is snapshotted; later edits do not affect the
    /// running batch.
    pub fn start_batch(&self, tool: ToolPath, credential: Credential) -> Result<BatchHandle> {
        validate_batch(&credential, &self.artifacts)?;
        let guard = self.signer.begin()?;

        let (tx, events) = mpsc::unbounded_channel();
        let signer = self.signer.clone();
        let artifacts = self.artifacts.clone();

        let task = tokio::spawn(async move {
            signer
                .run_with(guard, &tool, &artifacts, &credential, &tx)
                .await
        });

        Ok(BatchHandle { events, task })
    }

    /// Validates, recovers signtool if needed, then starts the batch.
    ///
    /// Validation errors are reported before the operator is prompted.
    /// If recovery yields no tool, no job runs.
    pub async fn sign(
        &self,
        credential: Credential,
        prompt: &dyn RecoveryPrompt,
        on_line: impl FnMut(&str),
    ) -> Result<BatchHandle> {
        if self.signer.is_running() {
            return Err(crate::signer::Error::BatchInFlight);
        }
        validate_batch(&credential, &self.artifacts)?;
        let tool = self.ensure_tool(prompt, on_line).await?;
        self.start_batch(tool, credential)
    }
}
