//! Windows SDK installation through a package manager.
//!
//! Backends are probed in order (winget, then Chocolatey by default). The
//! first available one runs its silent install while its output is streamed
//! line by line. With no backend available the outcome is
//! [`ProvisionOutcome::ManualRequired`], which is an expected terminal state
//! rather than an error.
//!
//! Provisioning never touches the [`ToolPathCache`](super::ToolPathCache):
//! after a successful install the caller must run discovery again.

use crate::signer::{
    error::{Error, Result},
    settings::{PackageBackend, SignerSettings},
    utils::browser,
};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{Mutex, OwnedMutexGuard, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Terminal result of one provisioning run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Installer exited 0; run discovery again to pick up signtool.
    Installed { backend: String },
    /// Installer ran and failed, or could not be started.
    Failed {
        backend: String,
        exit_code: Option<i32>,
        output: Vec<String>,
    },
    /// No backend available; the operator must install from `url`.
    ManualRequired { url: String },
}

impl ProvisionOutcome {
    /// Converts non-success outcomes into the matching engine error.
    pub fn into_result(self) -> Result<String> {
        match self {
            ProvisionOutcome::Installed { backend } => Ok(backend),
            ProvisionOutcome::Failed {
                backend,
                exit_code,
                output,
            } => Err(Error::ProvisionFailed {
                backend,
                exit_code,
                output,
            }),
            ProvisionOutcome::ManualRequired { url } => Err(Error::ManualInstallRequired { url }),
        }
    }
}

/// A provisioning run in progress.
///
/// Progress lines arrive on [`next_line`](Self::next_line) as they are
/// produced; [`finish`](Self::finish) waits for the terminal outcome.
pub struct ProvisionHandle {
    progress: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<ProvisionOutcome>,
}

impl ProvisionHandle {
    /// Next progress line, or `None` once the run has finished.
    pub async fn next_line(&mut self) -> Option<String> {
        self.progress.recv().await
    }

    /// Waits for the outcome, discarding progress not yet read.
    pub async fn finish(self) -> Result<ProvisionOutcome> {
        Ok(self.task.await?)
    }

    /// Forwards every progress line to `on_line`, then returns the outcome.
    pub async fn wait_with_progress(
        mut self,
        mut on_line: impl FnMut(&str),
    ) -> Result<ProvisionOutcome> {
        while let Some(line) = self.progress.recv().await {
            on_line(&line);
        }
        self.finish().await
    }
}

/// Installs the signing tools through the first available package manager.
///
/// Only one run may be in flight per provisioner (clones share the guard);
/// a second [`provision`](Self::provision) call while one runs is rejected
/// with [`Error::ProvisionInFlight`].
#[derive(Clone, Debug)]
pub struct ToolProvisioner {
    backends: Vec<PackageBackend>,
    probe_timeout: Duration,
    download_url: String,
    in_flight: Arc<Mutex<()>>,
}

impl ToolProvisioner {
    pub fn new(settings: &SignerSettings) -> Self {
        Self {
            backends: settings.backends().to_vec(),
            probe_timeout: settings.probe_timeout(),
            download_url: settings.download_url().to_string(),
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Manual download page.
    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Whether a provisioning run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Starts provisioning on a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn provision(&self) -> Result<ProvisionHandle> {
        let guard = self
            .in_flight
            .clone()
            .try_lock_owned()
            .map_err(|_| Error::ProvisionInFlight)?;

        let (tx, progress) = mpsc::unbounded_channel();
        let this = self.clone();
        let task = tokio::spawn(async move { this.run(guard, tx).await });

        Ok(ProvisionHandle { progress, task })
    }

    /// Opens the manual download page in the default browser.
    pub async fn open_download_page(&self) -> Result<()> {
        log::info!("Opening download page: {}", self.download_url);
        browser::open_url(&self.download_url).await
    }

    async fn run(
        &self,
        _guard: OwnedMutexGuard<()>,
        progress: mpsc::UnboundedSender<String>,
    ) -> ProvisionOutcome {
        let emit = |line: String| {
            log::info!("{}", line);
            // receiver may be gone; the install still runs to completion
            let _ = progress.send(line);
        };

        emit("=== Attempting to install Windows SDK ===".to_string());

        for backend in &self.backends {
            if !self.backend_available(backend).await {
                log::debug!("Package manager {} not available", backend.name);
                continue;
            }

            emit(format!(
                "Found {}. Attempting to install Windows SDK...",
                backend.name
            ));
            emit("Note: Administrator privileges may be required.".to_string());
            emit(format!("Running: {}", backend.display_command()));
            emit("This may take several minutes...".to_string());

            let outcome = install_with(backend, &progress).await;
            match &outcome {
                ProvisionOutcome::Installed { .. } => {
                    emit("✓ Windows SDK installation completed!".to_string());
                    emit("Refresh detection to pick up signtool.exe".to_string());
                }
                ProvisionOutcome::Failed { exit_code, .. } => {
                    emit(format!(
                        "✗ Installation may have failed (exit code: {:?}). Check output above.",
                        exit_code
                    ));
                }
                ProvisionOutcome::ManualRequired { .. } => {}
            }
            return outcome;
        }

        emit("✗ No package manager (winget/choco) found.".to_string());
        emit(format!(
            "Download and install the Windows SDK manually (select 'Signing Tools for Windows'): {}",
            self.download_url
        ));
        ProvisionOutcome::ManualRequired {
            url: self.download_url.clone(),
        }
    }

    /// Runs the backend's version probe, bounded by the probe timeout.
    async fn backend_available(&self, backend: &PackageBackend) -> bool {
        let status = timeout(
            self.probe_timeout,
            Command::new(&backend.program)
                .args(&backend.probe_args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status(),
        )
        .await;

        match status {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                log::debug!("{} probe failed: {}", backend.name, e);
                false
            }
            Err(_elapsed) => {
                log::debug!(
                    "{} probe timed out after {} ms",
                    backend.name,
                    self.probe_timeout.as_millis()
                );
                false
            }
        }
    }
}

/// Runs the silent install, streaming stdout and stderr lines as they arrive.
async fn install_with(
    backend: &PackageBackend,
    progress: &mpsc::UnboundedSender<String>,
) -> ProvisionOutcome {
    let failed = |exit_code: Option<i32>, output: Vec<String>| ProvisionOutcome::Failed {
        backend: backend.name.clone(),
        exit_code,
        output,
    };

    let mut child = match Command::new(&backend.program)
        .args(&backend.install_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let line = format!("✗ Error during installation: {}", e);
            let _ = progress.send(line.clone());
            return failed(None, vec![line]);
        }
    };

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_lines(stdout, line_tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_lines(stderr, line_tx.clone()));
    }
    drop(line_tx);

    let mut output = Vec::new();
    while let Some(line) = line_rx.recv().await {
        let _ = progress.send(line.clone());
        output.push(line);
    }

    match child.wait().await {
        Ok(status) if status.success() => ProvisionOutcome::Installed {
            backend: backend.name.clone(),
        },
        Ok(status) => failed(status.code(), output),
        Err(e) => {
            let line = format!("✗ Error during installation: {}", e);
            let _ = progress.send(line.clone());
            output.push(line);
            failed(None, output)
        }
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                // installers may print in a legacy code page
                let line = String::from_utf8_lossy(&buf).trim().to_string();
                if !line.is_empty() && tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::debug!("Stopped reading installer output: {}", e);
                break;
            }
        }
    }
}
