//! Signing a single artifact with signtool.
//!
//! The invocation is fixed:
//!
//! ```text
//! <signtool> sign /f <pfx> /p <password> /fd SHA256 /tr <timestamp-url> /td SHA256 /v <artifact>
//! ```
//!
//! A job never retries; retrying is left to the operator.

use crate::signer::settings::{Credential, SignerSettings};
use crate::signer::tool::ToolPath;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Classification of one signing attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum JobOutcome {
    /// signtool exited 0
    Signed,
    /// Artifact missing at execution time; signtool was not started
    NotFound,
    /// signtool exited non-zero; carries its diagnostics
    ToolFailure(String),
    /// signtool exceeded the job timeout and was killed
    Timeout,
    /// signtool could not be started or awaited
    Exception(String),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Signed)
    }
}

/// Result for one artifact. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JobResult {
    artifact: PathBuf,
    #[serde(flatten)]
    outcome: JobOutcome,
}

impl JobResult {
    pub fn new(artifact: impl Into<PathBuf>, outcome: JobOutcome) -> Self {
        Self {
            artifact: artifact.into(),
            outcome,
        }
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn outcome(&self) -> &JobOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    fn file_name(&self) -> String {
        self.artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.artifact.display().to_string())
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            JobOutcome::Signed => write!(f, "✓ Successfully signed: {}", self.file_name()),
            JobOutcome::NotFound => {
                write!(f, "ERROR: File not found: {}", self.artifact.display())
            }
            JobOutcome::ToolFailure(message) => write!(
                f,
                "✗ Failed to sign: {}\n  Error: {}",
                self.file_name(),
                message.trim_end()
            ),
            JobOutcome::Timeout => write!(f, "✗ Timeout signing: {}", self.file_name()),
            JobOutcome::Exception(message) => {
                write!(f, "✗ Exception signing {}: {}", self.file_name(), message)
            }
        }
    }
}

/// Signs artifacts with one signtool executable.
#[derive(Clone, Debug)]
pub struct SigningJob {
    tool: ToolPath,
    timestamp_url: String,
    digest: String,
    timeout: Duration,
}

impl SigningJob {
    pub fn new(tool: ToolPath, settings: &SignerSettings) -> Self {
        Self {
            tool,
            timestamp_url: settings.timestamp_url().to_string(),
            digest: settings.digest().to_string(),
            timeout: settings.job_timeout(),
        }
    }

    pub fn tool(&self) -> &ToolPath {
        &self.tool
    }

    /// Signs `artifact` and classifies the outcome.
    ///
    /// Never fails: every failure mode is captured in the returned [`JobResult`].
    pub async fn execute(&self, artifact: &Path, credential: &Credential) -> JobResult {
        if !tokio::fs::try_exists(artifact).await.unwrap_or(false) {
            return JobResult::new(artifact, JobOutcome::NotFound);
        }

        let outcome = self.run_signtool(artifact, credential).await;
        JobResult::new(artifact, outcome)
    }

    async fn run_signtool(&self, artifact: &Path, credential: &Credential) -> JobOutcome {
        log::debug!(
            "Running {} sign /f {} /p <redacted> /fd {} /tr {} /td {} /v {}",
            self.tool,
            credential.certificate_path().display(),
            self.digest,
            self.timestamp_url,
            self.digest,
            artifact.display()
        );

        let child = Command::new(self.tool.as_path())
            .args(self.arguments(artifact, credential))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => return JobOutcome::Exception(e.to_string()),
        };

        // dropping the timed-out future drops the child, which kills it
        match timeout(self.timeout, child.wait_with_output()).await {
            Err(_elapsed) => {
                log::warn!(
                    "signtool timed out after {} s on {}, terminated",
                    self.timeout.as_secs(),
                    artifact.display()
                );
                JobOutcome::Timeout
            }
            Ok(Err(e)) => JobOutcome::Exception(e.to_string()),
            Ok(Ok(output)) if output.status.success() => JobOutcome::Signed,
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = if stderr.trim().is_empty() {
                    String::from_utf8_lossy(&output.stdout).into_owned()
                } else {
                    stderr.into_owned()
                };
                JobOutcome::ToolFailure(message)
            }
        }
    }

    /// Argument list after the executable.
    fn arguments(&self, artifact: &Path, credential: &Credential) -> Vec<OsString> {
        vec![
            "sign".into(),
            "/f".into(),
            credential.certificate_path().into(),
            "/p".into(),
            credential.password().into(),
            "/fd".into(),
            self.digest.clone().into(),
            "/tr".into(),
            self.timestamp_url.clone().into(),
            "/td".into(),
            self.digest.clone().into(),
            "/v".into(),
            artifact.into(),
        ]
    }
}
