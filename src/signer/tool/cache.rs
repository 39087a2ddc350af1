//! Process-scoped signtool path state.

use crate::signer::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Longest path shown unabridged in status lines
const STATUS_PATH_WIDTH: usize = 60;

/// Location of the signtool executable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolPath(PathBuf);

impl ToolPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Whether the executable is still present.
    pub fn exists(&self) -> bool {
        self.0.exists()
    }

    /// Path abbreviated to the last 57 characters behind `...` when longer than 60.
    pub fn display_short(&self) -> String {
        let full = self.0.display().to_string();
        let count = full.chars().count();
        if count <= STATUS_PATH_WIDTH {
            return full;
        }
        let tail: String = full.chars().skip(count - (STATUS_PATH_WIDTH - 3)).collect();
        format!("...{tail}")
    }
}

impl fmt::Display for ToolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for ToolPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Discovery state reported to the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolStatus {
    Found(ToolPath),
    Missing,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Found(path) => write!(f, "✓ Windows SDK Found: {}", path.display_short()),
            ToolStatus::Missing => {
                write!(f, "✗ Windows SDK Not Found - signtool.exe is required")
            }
        }
    }
}

/// Shared record of the signtool path in use.
///
/// Starts unset. Only successful discovery (through
/// [`ToolLocator::locate_into`](super::ToolLocator::locate_into)) and an
/// explicit manual override write it; everything else reads. Reads re-check
/// that the file still exists, so a deleted executable reads as unset.
///
/// Cloning shares the same state.
#[derive(Clone, Debug, Default)]
pub struct ToolPathCache {
    inner: Arc<RwLock<Option<ToolPath>>>,
}

impl ToolPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached path if it is set and still exists on disk.
    pub fn current(&self) -> Option<ToolPath> {
        let guard = match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().filter(|path| path.exists()).cloned()
    }

    /// Current discovery state.
    pub fn status(&self) -> ToolStatus {
        match self.current() {
            Some(path) => ToolStatus::Found(path),
            None => ToolStatus::Missing,
        }
    }

    /// Accepts an operator-supplied signtool path after an existence check.
    ///
    /// The override is trusted once the file exists; it is not matched
    /// against known install locations.
    pub fn set_manual_override(&self, path: impl Into<PathBuf>) -> Result<ToolPath> {
        let path = ToolPath::new(path);
        if !path.as_path().is_file() {
            return Err(Error::InvalidToolPath(path.0));
        }
        log::info!("Using manually located signtool at {}", path);
        self.store(path.clone());
        Ok(path)
    }

    /// Records a path found by discovery.
    pub(crate) fn store_discovered(&self, path: ToolPath) {
        log::debug!("Caching discovered signtool at {}", path);
        self.store(path);
    }

    fn store(&self, path: ToolPath) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(path);
    }
}
