//! The `status`, `install` and `download-page` commands.

use super::{EXIT_MANUAL_INSTALL, EXIT_OK, EXIT_TOOL_MISSING};
use crate::cli::{RuntimeConfig, ToolArgs};
use crate::error::Result;
use crate::signer::{ProvisionOutcome, SignerSettings, SigningSession, ToolStatus};

/// Re-runs signtool discovery and reports the result.
pub async fn status(args: &ToolArgs, config: &RuntimeConfig) -> Result<i32> {
    let session = SigningSession::new(args.settings()?);

    match session.refresh().await {
        status @ ToolStatus::Found(_) => {
            let _ = config.success(&status.to_string());
            Ok(EXIT_OK)
        }
        status @ ToolStatus::Missing => {
            let _ = config.error(&status.to_string());
            let _ = config.indent("Run `signtool-batch install` to install the Windows SDK");
            Ok(EXIT_TOOL_MISSING)
        }
    }
}

/// Installs the Windows SDK and re-runs discovery.
pub async fn install(args: &ToolArgs, config: &RuntimeConfig) -> Result<i32> {
    let session = SigningSession::new(args.settings()?);

    let outcome = session
        .provision()?
        .wait_with_progress(|line| {
            let _ = config.indent(line);
        })
        .await?;

    match outcome {
        ProvisionOutcome::Installed { backend } => {
            let _ = config.success(&format!("Windows SDK installed via {backend}"));
            match session.refresh().await {
                status @ ToolStatus::Found(_) => {
                    let _ = config.success(&status.to_string());
                    Ok(EXIT_OK)
                }
                ToolStatus::Missing => {
                    let _ = config.warn(
                        "signtool.exe still not found; open a new shell so PATH changes apply",
                    );
                    Ok(EXIT_TOOL_MISSING)
                }
            }
        }
        ProvisionOutcome::Failed {
            backend, exit_code, ..
        } => {
            let _ = config.error(&format!(
                "Installation via {backend} failed (exit code: {exit_code:?}). Check the output above."
            ));
            Ok(EXIT_TOOL_MISSING)
        }
        ProvisionOutcome::ManualRequired { url } => {
            let _ = config.warn(&format!("Manual installation required: {url}"));
            if let Err(e) = session.open_download_page().await {
                log::warn!("Could not open browser: {}", e);
            }
            Ok(EXIT_MANUAL_INSTALL)
        }
    }
}

/// Opens the SDK download page.
pub async fn download_page(config: &RuntimeConfig) -> Result<i32> {
    let session = SigningSession::new(SignerSettings::default());
    let url = session.settings().download_url().to_string();

    let _ = config.progress(&format!("Opening download page: {url}"));
    let _ = config.indent("Download and install the Windows 10 SDK (or Windows 11 SDK)");
    let _ = config.indent("Make sure to select the 'Signing Tools for Windows' component");

    if let Err(e) = session.open_download_page().await {
        let _ = config.warn(&format!("Could not open browser ({e}); visit {url} manually"));
    }
    Ok(EXIT_OK)
}
