// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by the optimage crates.

use serde::{Deserialize, Serialize};

/// Sample layout of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channels {
    /// Single luma channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl Channels {
    /// Number of interleaved samples per pixel.
    pub fn count(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether the last sample of each pixel is an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Number of colour (non-alpha) samples per pixel.
    pub fn color_count(self) -> usize {
        if self.has_alpha() {
            self.count() - 1
        } else {
            self.count()
        }
    }
}

impl std::fmt::Display for Channels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Gray => "gray",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
        };
        f.write_str(name)
    }
}

/// Sample datatype tag reported by [`ImageInfo`]. Buffers are always 8-bit.
pub const SAMPLE_DTYPE: &str = "uint8";

/// Message carried by [`ImageInfo::Error`] when nothing is loaded.
pub const NO_IMAGE: &str = "no image";

/// Non-destructive description of the current working image.
///
/// Serializes either as `{"shape": [h, w, c], "dtype": "uint8", "size": n,
/// "channels": c}` or as `{"error": "no image"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageInfo {
    Loaded {
        /// `[height, width, channels]`; channels is 1 for gray buffers.
        shape: [usize; 3],
        dtype: String,
        /// Total sample count (`height * width * channels`).
        size: usize,
        channels: usize,
    },
    Error { error: String },
}

impl ImageInfo {
    /// Describe a buffer of the given dimensions.
    pub fn describe(height: usize, width: usize, channels: Channels) -> Self {
        let count = channels.count();
        Self::Loaded {
            shape: [height, width, count],
            dtype: SAMPLE_DTYPE.to_string(),
            size: height * width * count,
            channels: count,
        }
    }

    /// Sentinel descriptor for a processor with no valid image.
    pub fn no_image() -> Self {
        Self::Error {
            error: NO_IMAGE.to_string(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Render as a compact JSON object.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_reports_shape_and_size() {
        let info = ImageInfo::describe(480, 640, Channels::Rgb);
        assert_eq!(
            info,
            ImageInfo::Loaded {
                shape: [480, 640, 3],
                dtype: "uint8".into(),
                size: 480 * 640 * 3,
                channels: 3,
            }
        );
    }

    #[test]
    fn no_image_serializes_as_error_object() {
        let json = ImageInfo::no_image().to_json().expect("serialize");
        assert_eq!(json, r#"{"error":"no image"}"#);
    }

    #[test]
    fn loaded_info_round_trips_through_json() {
        let info = ImageInfo::describe(2, 3, Channels::Gray);
        let json = info.to_json().expect("serialize");
        let back: ImageInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, info);
        assert!(back.is_loaded());
    }

    #[test]
    fn channel_counts() {
        assert_eq!(Channels::Rgba.count(), 4);
        assert!(Channels::Rgba.has_alpha() && !Channels::Rgb.has_alpha());
        assert_eq!(Channels::Rgba.color_count(), 3);
        assert_eq!(Channels::Gray.color_count(), 1);
    }
}
