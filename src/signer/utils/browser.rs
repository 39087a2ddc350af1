//! Opening URLs in the default browser.

use crate::signer::error::{Error, Result};
use tokio::process::Command;

/// Opens `url` with the platform's default handler.
///
/// Uses `cmd /C start` on Windows, `open` on macOS and `xdg-open` elsewhere.
/// Only the launch is awaited, not the browser itself.
pub async fn open_url(url: &str) -> Result<()> {
    let mut command = opener_command(url);
    log::debug!("Opening {} with {:?}", url, command.as_std().get_program());

    let status = command.status().await?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::GenericError(format!(
            "Failed to open {} (exit code: {:?})",
            url,
            status.code()
        )))
    }
}

#[cfg(windows)]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    // empty title argument so start does not treat the URL as one
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(not(any(windows, target_os = "macos")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
