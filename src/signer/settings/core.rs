//! Core SignerSettings struct and defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Executable name looked up in PATH
pub const DEFAULT_TOOL_NAME: &str = "signtool.exe";

/// RFC 3161 timestamp authority
pub const DEFAULT_TIMESTAMP_URL: &str = "http://timestamp.digicert.com";

/// Digest used for both the file signature and the timestamp request
pub const DEFAULT_DIGEST: &str = "SHA256";

/// Hard wall-clock bound for a single signtool run (5 minutes)
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(300);

/// Bound for each discovery probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Windows SDK download page for manual installation
pub const SDK_DOWNLOAD_URL: &str = "https://developer.microsoft.com/en-us/windows/downloads/windows-sdk/";

/// File extensions picked up when adding a folder
pub const DEFAULT_ARTIFACT_EXTENSIONS: [&str; 6] = ["exe", "dll", "msi", "cab", "ocx", "sys"];

/// Well-known signtool locations, probed in order.
pub const KNOWN_INSTALL_PATHS: [&str; 10] = [
    // Windows 10/11 SDK - x64
    r"C:\Program Files (x86)\Windows Kits\10\bin\10.0.22621.0\x64\signtool.exe",
    r"C:\Program Files (x86)\Windows Kits\10\bin\10.0.22000.0\x64\signtool.exe",
    r"C:\Program Files (x86)\Windows Kits\10\bin\10.0.19041.0\x64\signtool.exe",
    r"C:\Program Files (x86)\Windows Kits\10\bin\x64\signtool.exe",
    // Windows 10/11 SDK - x86
    r"C:\Program Files (x86)\Windows Kits\10\bin\10.0.22621.0\x86\signtool.exe",
    r"C:\Program Files (x86)\Windows Kits\10\bin\10.0.22000.0\x86\signtool.exe",
    r"C:\Program Files (x86)\Windows Kits\10\bin\10.0.19041.0\x86\signtool.exe",
    r"C:\Program Files (x86)\Windows Kits\10\bin\x86\signtool.exe",
    // 64-bit Program Files tree
    r"C:\Program Files\Windows Kits\10\bin\x64\signtool.exe",
    r"C:\Program Files\Windows Kits\10\bin\x86\signtool.exe",
];

/// A package manager able to install the Windows SDK non-interactively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageBackend {
    /// Display name, e.g. "winget"
    pub name: String,
    /// Program to execute
    pub program: PathBuf,
    /// Arguments for the availability probe (expects exit code 0)
    pub probe_args: Vec<String>,
    /// Arguments for the silent install
    pub install_args: Vec<String>,
}

impl PackageBackend {
    /// Windows Package Manager, built into Windows 10/11.
    pub fn winget() -> Self {
        Self {
            name: "winget".into(),
            program: PathBuf::from("winget"),
            probe_args: vec!["--version".into()],
            install_args: [
                "install",
                "--id",
                "Microsoft.WindowsSDK.10",
                "--accept-package-agreements",
                "--accept-source-agreements",
                "--silent",
            ]
            .map(String::from)
            .to_vec(),
        }
    }

    /// Chocolatey.
    pub fn chocolatey() -> Self {
        Self {
            name: "choco".into(),
            program: PathBuf::from("choco"),
            probe_args: vec!["--version".into()],
            install_args: ["install", "windows-sdk-10.1", "-y", "--no-progress"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Command line shown to the operator before the install starts.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.install_args.iter().cloned());
        parts.join(" ")
    }
}

/// Settings for discovery, provisioning and signing.
///
/// Constructed via [`SignerSettingsBuilder`](super::SignerSettingsBuilder);
/// [`Default`] gives the stock Windows SDK configuration.
#[derive(Clone, Debug)]
pub struct SignerSettings {
    /// Executable name resolved through PATH.
    pub(super) tool_name: String,

    /// Install locations probed after PATH, in order.
    pub(super) known_install_paths: Vec<PathBuf>,

    /// Bound for each discovery probe.
    pub(super) probe_timeout: Duration,

    /// Bound for each signtool run.
    pub(super) job_timeout: Duration,

    /// RFC 3161 timestamp server.
    pub(super) timestamp_url: String,

    /// Digest for `/fd` and `/td`.
    pub(super) digest: String,

    /// Package managers tried in order when provisioning.
    pub(super) backends: Vec<PackageBackend>,

    /// Page opened when no backend is available.
    pub(super) download_url: String,

    /// Extensions (without dot, lowercase) collected by folder scans.
    pub(super) artifact_extensions: Vec<String>,
}

impl Default for SignerSettings {
    fn default() -> Self {
        Self {
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            known_install_paths: KNOWN_INSTALL_PATHS.iter().map(PathBuf::from).collect(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            job_timeout: DEFAULT_JOB_TIMEOUT,
            timestamp_url: DEFAULT_TIMESTAMP_URL.to_string(),
            digest: DEFAULT_DIGEST.to_string(),
            backends: vec![PackageBackend::winget(), PackageBackend::chocolatey()],
            download_url: SDK_DOWNLOAD_URL.to_string(),
            artifact_extensions: DEFAULT_ARTIFACT_EXTENSIONS.map(String::from).to_vec(),
        }
    }
}

impl SignerSettings {
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn known_install_paths(&self) -> &[PathBuf] {
        &self.known_install_paths
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn job_timeout(&self) -> Duration {
        self.job_timeout
    }

    pub fn timestamp_url(&self) -> &str {
        &self.timestamp_url
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn backends(&self) -> &[PackageBackend] {
        &self.backends
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn artifact_extensions(&self) -> &[String] {
        &self.artifact_extensions
    }
}
