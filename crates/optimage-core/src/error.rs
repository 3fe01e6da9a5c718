// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error type for optimage.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all image processing operations.
///
/// Every variant is raised before the processor mutates any state, so a
/// failed call leaves the working and original buffers exactly as they were.
#[derive(Debug, Error)]
pub enum ImageProcessingError {
    // -- Input validation --
    #[error("invalid image path: {0:?}")]
    InvalidPath(String),

    #[error("image file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no valid image loaded: {0}")]
    InvalidState(String),

    // -- Codec --
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    // -- Storage / persistence --
    /// Directory creation, encoding and writing failures. The message names
    /// the path or format involved, which a bare `std::io::Error` lacks, and
    /// encoder failures arrive as `image::ImageError` rather than io errors.
    #[error("I/O error: {0}")]
    Io(String),

    // -- Configuration / serialization --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ImageProcessingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert_with_question_mark() {
        fn parse(json: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(json)?)
        }
        let err = parse("{").unwrap_err();
        assert!(matches!(err, ImageProcessingError::Serialization(_)));
        assert!(err.to_string().starts_with("serialization error: "));
    }

    #[test]
    fn not_found_message_includes_path() {
        let err = ImageProcessingError::NotFound(PathBuf::from("input/shark.jpg"));
        assert_eq!(err.to_string(), "image file does not exist: input/shark.jpg");
    }
}
