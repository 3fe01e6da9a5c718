// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImageProcessingError, Result};

/// Resampling filter used when a blend partner must be resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest neighbour. Fast but blocky.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Triangle,
    /// Catmull-Rom bicubic interpolation.
    CatmullRom,
    Gaussian,
    /// Lanczos with window size 3.
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Compression effort for lossless PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PngCompression {
    Default,
    Fast,
    /// Highest compression, slowest encode.
    #[default]
    Best,
}

impl PngCompression {
    pub fn to_compression_type(self) -> image::codecs::png::CompressionType {
        match self {
            Self::Default => image::codecs::png::CompressionType::Default,
            Self::Fast => image::codecs::png::CompressionType::Fast,
            Self::Best => image::codecs::png::CompressionType::Best,
        }
    }
}

/// Tunables for an `ImageProcessor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// JPEG quality used by `save_default` (1-100).
    pub default_quality: u8,
    /// Compression level for `.png` output.
    pub png_compression: PngCompression,
    /// Filter used to resample blend partners to the working size.
    pub resize_filter: ResizeFilter,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            default_quality: 95,
            png_compression: PngCompression::Best,
            resize_filter: ResizeFilter::Triangle,
        }
    }
}

impl ProcessorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            ImageProcessingError::Io(format!("cannot read {}: {}", path.display(), err))
        })?;
        Self::from_json_str(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the processor would refuse at call time anyway.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.default_quality) {
            return Err(ImageProcessingError::Config(format!(
                "default_quality must be between 1 and 100, got {}",
                self.default_quality
            )));
        }
        Ok(())
    }
}
