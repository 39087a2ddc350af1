//! Ordered, duplicate-free list of files to sign.

use crate::signer::{Result, utils::fs::find_artifacts};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Worklist of artifacts for a batch.
///
/// Insertion order is preserved and no path appears twice. Paths are
/// compared as given; no canonicalization is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactList {
    paths: IndexSet<PathBuf>,
}

impl ArtifactList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one path. Returns `false` if it was already present.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Adds several paths, skipping ones already present.
    ///
    /// Returns how many were newly added.
    pub fn add_all<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if self.paths.insert(path.into()) {
                added += 1;
            }
        }
        added
    }

    /// Recursively adds every file under `dir` whose extension is in `extensions`.
    ///
    /// Returns how many were newly added.
    pub async fn add_folder(&mut self, dir: &Path, extensions: &[String]) -> Result<usize> {
        let found = find_artifacts(dir, extensions).await?;
        let added = self.add_all(found);
        log::info!("Added {} file(s) from folder {}", added, dir.display());
        Ok(added)
    }

    /// Removes the entries at the given positions.
    ///
    /// Indices are processed from highest to lowest so earlier removals do not
    /// shift later ones. Out-of-range and repeated indices are ignored.
    /// Returns how many entries were removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> usize {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = 0;
        for index in sorted.into_iter().rev() {
            if self.paths.shift_remove_index(index).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Removes a specific path. Returns `true` if it was present.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.paths.shift_remove(path)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ArtifactList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add_all(iter);
        list
    }
}
