//! Sequential batch signing.

use super::summary::{BatchEvent, BatchSummary};
use crate::signer::{
    Error, Result, ValidationError,
    job::SigningJob,
    settings::{ArtifactList, Credential, SignerSettings},
    tool::ToolPath,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;

/// Checks batch preconditions.
///
/// Returns non-blocking warnings (an empty password) on success.
pub fn validate_batch(credential: &Credential, artifacts: &ArtifactList) -> Result<Vec<String>> {
    let certificate = credential.certificate_path();
    if certificate.as_os_str().is_empty() {
        return Err(ValidationError::MissingCertificate.into());
    }
    if !certificate.exists() {
        return Err(ValidationError::CertificateNotFound(certificate.to_path_buf()).into());
    }

    let mut warnings = Vec::new();
    if credential.has_empty_password() {
        warnings.push("No password provided. Continuing anyway...".to_string());
    }

    if artifacts.is_empty() {
        return Err(ValidationError::NoArtifacts.into());
    }

    Ok(warnings)
}

/// Marks a batch as running until dropped.
#[derive(Debug)]
pub struct BatchGuard {
    running: Arc<AtomicBool>,
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Signs every artifact in a worklist, one at a time.
///
/// Each artifact is isolated: any failure is recorded in its
/// [`JobResult`](crate::signer::JobResult) and the next artifact still runs.
/// Results are emitted in worklist order. Only one batch may run per signer
/// (clones share the flag); an overlapping [`run`](Self::run) is rejected
/// with [`Error::BatchInFlight`].
#[derive(Clone, Debug)]
pub struct BatchSigner {
    settings: SignerSettings,
    running: Arc<AtomicBool>,
}

impl BatchSigner {
    pub fn new(settings: SignerSettings) -> Self {
        Self {
            settings,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claims the single batch slot.
    pub fn begin(&self) -> Result<BatchGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::BatchInFlight)?;
        Ok(BatchGuard {
            running: Arc::clone(&self.running),
        })
    }

    /// Validates, then signs every artifact and returns the counts.
    ///
    /// Validation failures abort before any job runs. Events go to `events`;
    /// a closed receiver does not stop the batch.
    pub async fn run(
        &self,
        tool: &ToolPath,
        artifacts: &ArtifactList,
        credential: &Credential,
        events: &UnboundedSender<BatchEvent>,
    ) -> Result<BatchSummary> {
        let guard = self.begin()?;
        self.run_with(guard, tool, artifacts, credential, events).await
    }

    /// Same as [`run`](Self::run) with a slot already claimed via [`begin`](Self::begin).
    pub async fn run_with(
        &self,
        _guard: BatchGuard,
        tool: &ToolPath,
        artifacts: &ArtifactList,
        credential: &Credential,
        events: &UnboundedSender<BatchEvent>,
    ) -> Result<BatchSummary> {
        let emit = |event: BatchEvent| {
            let _ = events.send(event);
        };

        for warning in validate_batch(credential, artifacts)? {
            log::warn!("{}", warning);
            emit(BatchEvent::Warning(warning));
        }

        log::info!(
            "Signing {} file(s) with {} using {}",
            artifacts.len(),
            tool,
            credential.certificate_path().display()
        );
        emit(BatchEvent::Log(format!("Signing {} file(s)...", artifacts.len())));

        let job = SigningJob::new(tool.clone(), &self.settings);
        let mut summary = BatchSummary::default();

        for artifact in artifacts.iter() {
            emit(BatchEvent::Log(format!("Signing: {}", artifact.display())));

            let result = job.execute(artifact, credential).await;
            if result.is_success() {
                log::info!("{}", result);
            } else {
                log::warn!("{}", result);
            }

            summary.record(&result);
            emit(BatchEvent::Log(result.to_string()));
            emit(BatchEvent::Job(result));
        }

        let closing = if summary.failure_count == 0 {
            "✓ All files signed successfully!".to_string()
        } else {
            format!("⚠ Signing complete with {} error(s)", summary.failure_count)
        };
        log::info!("{} ({})", closing, summary);
        emit(BatchEvent::Log(closing));
        emit(BatchEvent::Finished(summary));

        Ok(summary)
    }
}
