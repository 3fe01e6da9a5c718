// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owned 8-bit pixel buffer (height x width x channels, row-major, interleaved).

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use optimage_core::config::ResizeFilter;
use optimage_core::error::{ImageProcessingError, Result};
use optimage_core::types::{Channels, ImageInfo};

/// An exclusively owned raster image.
///
/// Cloning copies the sample storage, so two buffers never observe each
/// other's mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Vec<u8>,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw interleaved samples. Fails if either dimension is zero or the
    /// sample count does not equal `width * height * channels`.
    pub fn new(width: u32, height: u32, channels: Channels, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ImageProcessingError::DecodeError(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * channels.count();
        if samples.len() != expected {
            return Err(ImageProcessingError::DecodeError(format!(
                "expected {expected} samples for {width}x{height} {channels}, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Build a buffer where every pixel has the same value.
    pub fn from_pixel(width: u32, height: u32, channels: Channels, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != channels.count() {
            return Err(ImageProcessingError::InvalidArgument(format!(
                "pixel has {} samples, {channels} needs {}",
                pixel.len(),
                channels.count()
            )));
        }
        let count = width as usize * height as usize;
        Self::new(width, height, channels, pixel.repeat(count))
    }

    /// Copy a decoded image into an owned buffer.
    ///
    /// 8-bit gray, RGB and RGBA are taken as-is. Other colour types are
    /// converted: anything with alpha becomes RGBA, remaining single-channel
    /// types become gray, everything else becomes RGB.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (Channels::Gray, buf.as_raw().clone()),
            DynamicImage::ImageRgb8(buf) => (Channels::Rgb, buf.as_raw().clone()),
            DynamicImage::ImageRgba8(buf) => (Channels::Rgba, buf.as_raw().clone()),
            other if other.color().has_alpha() => (Channels::Rgba, other.to_rgba8().into_raw()),
            other if other.color().channel_count() == 1 => {
                (Channels::Gray, other.to_luma8().into_raw())
            }
            other => (Channels::Rgb, other.to_rgb8().into_raw()),
        };
        Self::new(image.width(), image.height(), channels, samples)
    }

    /// Copy the samples into a `DynamicImage` for encoding or resampling.
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let data = self.samples.clone();
        let image = match self.channels {
            Channels::Gray => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
            Channels::Rgb => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
            Channels::Rgba => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        };
        image.ok_or_else(|| {
            ImageProcessingError::InvalidState(format!(
                "sample storage does not match {w}x{h} {}",
                self.channels
            ))
        })
    }

    /// Same dimensions and layout, new samples. Callers guarantee the length.
    pub(crate) fn with_samples(&self, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            samples,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Interleaved samples in row-major order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Samples of the pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels.count();
        let start = (y as usize * self.width as usize + x as usize) * c;
        self.samples.get(start..start + c)
    }

    /// True when both buffers have the same width, height and layout.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo::describe(self.height as usize, self.width as usize, self.channels)
    }

    // -- Conversions ----------------------------------------------------------

    /// Convert to another channel layout using the `image` crate's colour
    /// conversions (luma weighting for colour to gray, opaque alpha when one
    /// is added).
    pub fn to_channels(&self, channels: Channels) -> Result<Self> {
        if channels == self.channels {
            return Ok(self.clone());
        }
        let image = self.to_dynamic()?;
        let converted = match channels {
            Channels::Gray => DynamicImage::ImageLuma8(image.to_luma8()),
            Channels::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
            Channels::Rgba => DynamicImage::ImageRgba8(image.to_rgba8()),
        };
        Self::from_dynamic(&converted)
    }

    /// Resample to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(&self, width: u32, height: u32, filter: ResizeFilter) -> Result<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let resized = self
            .to_dynamic()?
            .resize_exact(width, height, filter.to_image_filter());
        Self::from_dynamic(&resized)
    }
}
