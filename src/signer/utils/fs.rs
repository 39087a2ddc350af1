//! File system utilities for collecting artifacts.

use crate::signer::error::{Error, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Recursively collects files under `dir` whose extension matches `extensions`.
///
/// Matching is case-insensitive on the extension without its dot. Results are
/// grouped by extension in the order given, then sorted by path within each
/// group, so repeated scans of an unchanged tree return the same list.
/// Unreadable entries are skipped with a debug log.
pub async fn find_artifacts(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let metadata = tokio::fs::metadata(dir)
        .await
        .fs_context("reading folder metadata", dir)?;
    if !metadata.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let dir = dir.to_path_buf();
    let extensions = extensions.to_vec();

    // walkdir is blocking
    tokio::task::spawn_blocking(move || {
        let mut matches: Vec<(usize, PathBuf)> = Vec::new();

        for entry in walkdir::WalkDir::new(&dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(rank) = extension_rank(entry.path(), &extensions) {
                matches.push((rank, entry.into_path()));
            }
        }

        matches.sort();
        Ok(matches.into_iter().map(|(_, path)| path).collect())
    })
    .await?
}

/// Position of the extension of `path` in `extensions`, ignoring case.
pub fn extension_rank(path: &Path, extensions: &[String]) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    extensions.iter().position(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["exe".to_string(), "dll".to_string()]
    }

    #[test]
    fn extension_rank_ignores_case() {
        assert_eq!(extension_rank(Path::new("setup.Exe"), &exts()), Some(0));
        assert_eq!(extension_rank(Path::new("lib/core.DLL"), &exts()), Some(1));
    }

    #[test]
    fn extension_rank_rejects_other_files() {
        assert_eq!(extension_rank(Path::new("readme.txt"), &exts()), None);
        assert_eq!(extension_rank(Path::new("Makefile"), &exts()), None);
        assert_eq!(extension_rank(Path::new(".exe"), &exts()), None);
    }
}
