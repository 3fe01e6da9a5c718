// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Path validation and lexical normalisation.
//
// Normalisation only tidies `.` and `name/..` segments. It does not confine
// paths to any directory: `../secret.png` stays `../secret.png`. Callers that
// need traversal protection must enforce it themselves.

use std::path::{Component, Path, PathBuf};

use optimage_core::error::{ImageProcessingError, Result};

/// Reject empty or whitespace-only paths and return the normalised form.
pub fn validate_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    if raw.trim().is_empty() {
        return Err(ImageProcessingError::InvalidPath(raw.into_owned()));
    }
    Ok(normalize_path(path))
}

/// Resolve `.` and `..` segments without touching the filesystem.
///
/// Leading `..` segments of a relative path are kept; `..` directly under
/// the root is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_paths_are_invalid() {
        for raw in ["", "   ", "\t\n"] {
            let err = validate_path(Path::new(raw)).unwrap_err();
            assert!(matches!(err, ImageProcessingError::InvalidPath(_)), "{raw:?}");
        }
    }

    #[test]
    fn collapses_dot_segments() {
        assert_eq!(
            normalize_path(Path::new("./input/../input/./shark.jpg")),
            PathBuf::from("input/shark.jpg")
        );
        assert_eq!(normalize_path(Path::new("a/b/..")), PathBuf::from("a"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn traversal_is_preserved_not_blocked() {
        assert_eq!(
            validate_path(Path::new("../../etc/passwd")).expect("valid"),
            PathBuf::from("../../etc/passwd")
        );
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(normalize_path(Path::new("/../tmp/x.png")), PathBuf::from("/tmp/x.png"));
    }
}
