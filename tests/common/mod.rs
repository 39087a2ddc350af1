//! Shared helpers for integration tests: scratch trees and fake signtool scripts.

#![allow(dead_code)]

use signtool_batch::signer::{PackageBackend, SignerSettings, SignerSettingsBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Tool name that never resolves through PATH
pub const MISSING_TOOL_NAME: &str = "signtool-batch-test-no-such-tool";

/// Scratch directory with a certificate file in it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("cert.pfx"), b"not really a pfx").expect("write cert");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cert(&self) -> PathBuf {
        self.path().join("cert.pfx")
    }

    /// Creates an (empty) artifact file, including parent directories.
    pub fn artifact(&self, rel: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create artifact dir");
        }
        std::fs::write(&path, b"MZ").expect("write artifact");
        path
    }

    /// Path inside the workspace that is never created.
    pub fn absent(&self, rel: &str) -> PathBuf {
        self.path().join(rel)
    }
}

/// Settings with no discovery hits, no package managers and a short job timeout.
pub fn isolated_settings(job_timeout: Duration) -> SignerSettings {
    settings_builder(job_timeout).build().expect("valid settings")
}

pub fn settings_builder(job_timeout: Duration) -> SignerSettingsBuilder {
    SignerSettingsBuilder::new()
        .tool_name(MISSING_TOOL_NAME)
        .known_install_paths(Vec::<PathBuf>::new())
        .backends(Vec::new())
        .probe_timeout(Duration::from_secs(2))
        .job_timeout(job_timeout)
}

/// Backend that is never available.
pub fn unavailable_backend(name: &str) -> PackageBackend {
    PackageBackend {
        name: name.to_string(),
        program: PathBuf::from(format!("/nonexistent/{name}")),
        probe_args: vec!["--version".into()],
        install_args: vec!["install".into()],
    }
}

/// Backend that runs `script` through `sh -c` as its install step.
#[cfg(unix)]
pub fn shell_backend(name: &str, script: &str) -> PackageBackend {
    PackageBackend {
        name: name.to_string(),
        program: PathBuf::from("sh"),
        probe_args: vec!["-c".into(), "exit 0".into()],
        install_args: vec!["-c".into(), script.to_string()],
    }
}

/// Writes an executable `/bin/sh` script standing in for signtool.
///
/// The artifact path is the last argument; `$last` holds it in `body`.
#[cfg(unix)]
pub fn fake_signtool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!("#!/bin/sh\nfor last; do :; done\n{body}\n");
    std::fs::write(&path, script).expect("write fake signtool");
    let mut perms = std::fs::metadata(&path).expect("stat fake signtool").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake signtool");
    path
}
