//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation and
//! conversion into [`SignerSettings`].

use crate::signer::{Result as SignerResult, SignerSettings, SignerSettingsBuilder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Batch code signing for Windows artifacts
#[derive(Parser, Debug)]
#[command(
    name = "signtool-batch",
    version,
    about = "Sign Windows executables, libraries and installers with a PFX certificate",
    long_about = "Signs Windows artifacts (.exe, .dll, .msi, .cab, .ocx, .sys) with signtool.exe using a PFX certificate.

Every file is signed with SHA256 and an RFC 3161 timestamp. One failing file never stops the rest of the batch.

Usage:
  signtool-batch sign --pfx cert.pfx --password secret app.exe lib.dll
  signtool-batch sign --pfx cert.pfx --folder target/release
  signtool-batch status
  signtool-batch install

Exit codes: 0 = all files signed, 1 = error, 2 = some files failed, 3 = manual SDK installation required."
)]
pub struct Args {
    /// Only print errors and the final summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print signtool discovery details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign files with a PFX certificate
    Sign(SignArgs),

    /// Detect signtool.exe and report where it was found
    Status(ToolArgs),

    /// Install the Windows SDK through winget or Chocolatey
    Install(ToolArgs),

    /// Open the Windows SDK download page in the default browser
    DownloadPage,
}

/// Options shared by commands that discover signtool
#[derive(clap::Args, Debug, Default)]
pub struct ToolArgs {
    /// Per-probe discovery timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub probe_timeout_secs: u64,
}

/// Options for the sign command
#[derive(clap::Args, Debug)]
pub struct SignArgs {
    /// PFX certificate file
    #[arg(long, env = "SIGNTOOL_PFX", value_name = "PATH")]
    pub pfx: Option<PathBuf>,

    /// PFX password (may be empty)
    #[arg(
        short,
        long,
        env = "SIGNTOOL_PFX_PASSWORD",
        hide_env_values = true,
        value_name = "PASSWORD"
    )]
    pub password: Option<String>,

    /// Files to sign
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Folders scanned recursively for .exe, .dll, .msi, .cab, .ocx and .sys files
    #[arg(long = "folder", value_name = "DIR")]
    pub folders: Vec<PathBuf>,

    /// Use this signtool.exe instead of searching for one
    #[arg(long, env = "SIGNTOOL_PATH", value_name = "PATH")]
    pub signtool: Option<PathBuf>,

    /// RFC 3161 timestamp server
    #[arg(long, env = "SIGNTOOL_TIMESTAMP_URL", value_name = "URL")]
    pub timestamp_url: Option<String>,

    /// Per-file signing timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub timeout_secs: u64,

    /// Never prompt; cancel if signtool cannot be found
    #[arg(long)]
    pub non_interactive: bool,

    /// Print per-file results and the summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub tool: ToolArgs,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.quiet && self.verbose {
            return Err("--quiet and --verbose cannot be combined".to_string());
        }

        match &self.command {
            Command::Sign(sign) => sign.validate(),
            Command::Status(tool) | Command::Install(tool) => tool.validate(),
            Command::DownloadPage => Ok(()),
        }
    }
}

impl ToolArgs {
    fn validate(&self) -> Result<(), String> {
        if self.probe_timeout_secs == 0 {
            return Err("--probe-timeout-secs must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Settings for discovery-only commands.
    pub fn settings(&self) -> SignerResult<SignerSettings> {
        SignerSettingsBuilder::new()
            .probe_timeout(Duration::from_secs(self.probe_timeout_secs))
            .build()
    }
}

impl SignArgs {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("--timeout-secs must be greater than zero".to_string());
        }
        if let Some(url) = &self.timestamp_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("Invalid timestamp URL: {url}"));
            }
        }
        self.tool.validate()
    }

    /// Settings for the sign command.
    pub fn settings(&self) -> SignerResult<SignerSettings> {
        let mut builder = SignerSettingsBuilder::new()
            .probe_timeout(Duration::from_secs(self.tool.probe_timeout_secs))
            .job_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(url) = &self.timestamp_url {
            builder = builder.timestamp_url(url.clone());
        }
        builder.build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let mut output = super::OutputManager::new(args.verbose, args.quiet);
        if let Command::Sign(sign) = &args.command {
            if sign.json {
                output = output.reserve_stdout();
            }
        }
        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
