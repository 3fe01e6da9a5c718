// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem collaborator: existence checks, directory creation, and
// all-or-nothing file writes.

use std::io::Write;
use std::path::Path;

use optimage_core::error::{ImageProcessingError, Result};
use tracing::{debug, warn};

/// Filesystem operations the processor depends on.
pub trait Filesystem {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write `data` to `path` so that readers see either the old file or the
    /// complete new one, never a prefix.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()>;
}

/// `std::fs`-backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|err| {
            ImageProcessingError::Io(format!(
                "cannot create output directory {}: {}",
                path.display(),
                err
            ))
        })
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!(".{name}.");
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Randomised hidden sibling, removed when the handle drops.
        let mut staging = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(dir)
            .map_err(|err| write_error(path, &err))?;
        staging
            .write_all(data)
            .map_err(|err| write_error(path, &err))?;
        if let Err(failed) = staging.persist(path) {
            let staged = failed.file.path().to_path_buf();
            if let Err(cleanup) = failed.file.close() {
                warn!(
                    path = %staged.display(),
                    error = %cleanup,
                    "Failed to remove staging file"
                );
            }
            return Err(write_error(path, &failed.error));
        }

        debug!(path = %path.display(), bytes = data.len(), "File written");
        Ok(())
    }
}

const STAGING_SUFFIX: &str = ".partial";

fn write_error(path: &Path, err: &std::io::Error) -> ImageProcessingError {
    ImageProcessingError::Io(format!("failed to write {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    /// Staging files left behind in `dir`.
    fn leftovers(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .expect("read dir")
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.to_string_lossy().ends_with(STAGING_SUFFIX))
            .collect()
    }

    #[test]
    fn write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("out.bin");
        let fs = StdFilesystem;

        fs.write_atomic(&target, b"first").expect("write");
        fs.write_atomic(&target, b"second").expect("rewrite");

        assert_eq!(std::fs::read(&target).expect("read"), b"second");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn failed_rename_leaves_no_staging_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        // Renaming a file over a non-empty directory always fails.
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).expect("mkdir");
        std::fs::write(target.join("keep"), b"x").expect("write");

        let err = StdFilesystem.write_atomic(&target, b"data").unwrap_err();
        assert!(matches!(err, ImageProcessingError::Io(_)));
        assert!(leftovers(dir.path()).is_empty());
        assert!(target.is_dir());
    }

    #[test]
    fn concurrent_writers_never_share_a_staging_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("shared.png");
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 64 * 1024]).collect();

        let results: Vec<Result<()>> = std::thread::scope(|scope| {
            let writers: Vec<_> = payloads
                .iter()
                .map(|payload| {
                    let target = &target;
                    scope.spawn(move || StdFilesystem.write_atomic(target, payload))
                })
                .collect();
            writers
                .into_iter()
                .map(|writer| writer.join().expect("writer thread"))
                .collect()
        });
        assert!(results.iter().all(Result::is_ok), "{results:?}");

        // Whichever writer renamed last, the file holds one whole payload.
        let written = std::fs::read(&target).expect("read");
        assert!(payloads.contains(&written));
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn create_dir_all_under_a_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").expect("write");

        let err = StdFilesystem
            .create_dir_all(&blocker.join("nested"))
            .unwrap_err();
        assert!(matches!(err, ImageProcessingError::Io(_)));
    }
}
