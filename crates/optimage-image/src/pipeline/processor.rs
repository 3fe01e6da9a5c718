// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — load, brightness, blend, Gaussian blur, contrast,
// inversion, grayscale, reset, and save. Holds a working buffer plus the
// buffer captured at load time.

use std::borrow::Cow;
use std::path::Path;

use image::DynamicImage;
use optimage_core::config::ProcessorConfig;
use optimage_core::error::{ImageProcessingError, Result};
use optimage_core::types::ImageInfo;
use tracing::{debug, info, instrument};

use super::buffer::PixelBuffer;
use super::filters;
use crate::io::codec::{Codec, EncodeParams, ImageCodec};
use crate::io::fs::{Filesystem, StdFilesystem};
use crate::io::path::validate_path;

/// Inclusive brightness factor range.
pub const BRIGHTNESS_RANGE: (f64, f64) = (0.0, 2.0);
/// Inclusive blend weight range.
pub const ALPHA_RANGE: (f64, f64) = (0.0, 1.0);
/// Inclusive contrast factor range.
pub const CONTRAST_RANGE: (f64, f64) = (0.0, 3.0);
/// Inclusive encoder quality range.
pub const QUALITY_RANGE: (u8, u8) = (1, 100);

/// Stateful image processing pipeline.
///
/// Transformations take `&mut self` and return `Result<&mut Self>`, so calls
/// chain with `?`. A failing call changes nothing: every argument and the
/// loaded state are checked before the working buffer is replaced.
///
/// ```ignore
/// let mut processor = ImageProcessor::open("input/shark.jpg")?;
/// processor
///     .adjust_brightness(0.8)?
///     .gaussian_blur(5, 1.0)?;
/// processor.save("output/dark_blurred_shark.jpg", 95)?;
/// processor.reset().blend_with("input/wave.jpg", 0.5)?;
/// ```
#[derive(Debug)]
pub struct ImageProcessor<C = ImageCodec, F = StdFilesystem> {
    /// Buffer every transformation reads from and replaces.
    working: Option<PixelBuffer>,
    /// Independent copy of the last loaded image.
    original: Option<PixelBuffer>,
    codec: C,
    filesystem: F,
    config: ProcessorConfig,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Empty processor using the `image` crate codec and `std::fs`.
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self::with_collaborators(ImageCodec, StdFilesystem, config)
    }

    /// Create a processor and load `path` into it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut processor = Self::new();
        processor.load(path)?;
        Ok(processor)
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec, F: Filesystem> ImageProcessor<C, F> {
    /// Empty processor with explicit collaborators.
    pub fn with_collaborators(codec: C, filesystem: F, config: ProcessorConfig) -> Self {
        Self {
            working: None,
            original: None,
            codec,
            filesystem,
            config,
        }
    }

    // -- Loading --------------------------------------------------------------

    /// Decode the image at `path` and make it both the working and the
    /// original buffer.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let buffer = self.read_image(path.as_ref())?;
        Ok(self.install(buffer))
    }

    /// Decode encoded bytes (JPEG, PNG, etc.) and install them as with `load`.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn load_from_bytes(&mut self, data: &[u8]) -> Result<&mut Self> {
        let buffer = self.codec.decode_bytes(data)?;
        Ok(self.install(buffer))
    }

    /// Copy an already-decoded image into the processor.
    pub fn load_from_dynamic(&mut self, image: &DynamicImage) -> Result<&mut Self> {
        let buffer = PixelBuffer::from_dynamic(image)?;
        Ok(self.install(buffer))
    }

    /// Take ownership of a buffer and install it as with `load`.
    pub fn load_buffer(&mut self, buffer: PixelBuffer) -> &mut Self {
        self.install(buffer)
    }

    // -- Accessors ------------------------------------------------------------

    /// Whether a working image is present.
    pub fn is_loaded(&self) -> bool {
        self.working.is_some()
    }

    pub fn working(&self) -> Option<&PixelBuffer> {
        self.working.as_ref()
    }

    /// The buffer captured by the most recent load.
    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Describe the working image, or report `{"error": "no image"}`.
    pub fn info(&self) -> ImageInfo {
        self.working
            .as_ref()
            .map_or_else(ImageInfo::no_image, PixelBuffer::info)
    }

    // -- Transformations ------------------------------------------------------

    /// Scale every sample by `factor` (0.0..=2.0), saturating at 255.
    #[instrument(skip(self))]
    pub fn adjust_brightness(&mut self, factor: f64) -> Result<&mut Self> {
        let working = self.require_loaded("adjust_brightness")?;
        check_range("brightness factor", factor, BRIGHTNESS_RANGE)?;

        let adjusted = filters::scale_brightness(working, factor);
        info!(factor, "Brightness adjusted");
        Ok(self.replace_working(adjusted))
    }

    /// Blend with the image at `other_path`: `working * alpha + other * (1 - alpha)`.
    ///
    /// The other image is converted to the working channel layout and
    /// resampled to the working size when they differ. `original` is untouched.
    #[instrument(skip(self, other_path), fields(other = %other_path.as_ref().display()))]
    pub fn blend_with(&mut self, other_path: impl AsRef<Path>, alpha: f64) -> Result<&mut Self> {
        self.require_loaded("blend_with")?;
        check_range("blend alpha", alpha, ALPHA_RANGE)?;

        let other = self.read_image(other_path.as_ref())?;
        self.blend_with_buffer(&other, alpha)
    }

    /// Blend with an in-memory buffer using the same rules as `blend_with`.
    pub fn blend_with_buffer(&mut self, other: &PixelBuffer, alpha: f64) -> Result<&mut Self> {
        let working = self.require_loaded("blend_with")?;
        check_range("blend alpha", alpha, ALPHA_RANGE)?;

        let partner = self.conform(working, other)?;
        let blended = filters::blend(working, &partner, alpha)?;
        info!(alpha, "Images blended");
        Ok(self.replace_working(blended))
    }

    /// Gaussian blur with a square `kernel_size` window (positive, odd) and
    /// standard deviation `sigma` (> 0). Borders replicate the edge pixels,
    /// so any kernel wider than the image behaves like one spanning it.
    #[instrument(skip(self))]
    pub fn gaussian_blur(&mut self, kernel_size: u32, sigma: f64) -> Result<&mut Self> {
        let working = self.require_loaded("gaussian_blur")?;
        if kernel_size == 0 || kernel_size % 2 == 0 {
            return Err(ImageProcessingError::InvalidArgument(format!(
                "kernel size must be a positive odd integer, got {kernel_size}"
            )));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ImageProcessingError::InvalidArgument(format!(
                "sigma must be a positive number, got {sigma}"
            )));
        }

        let blurred = filters::gaussian_blur(working, kernel_size, sigma);
        info!(kernel_size, sigma, "Gaussian blur applied");
        Ok(self.replace_working(blurred))
    }

    /// Scale colour distance from mid-gray by `factor` (0.0..=3.0). A factor
    /// of 1.0 is a no-op; alpha is preserved.
    #[instrument(skip(self))]
    pub fn adjust_contrast(&mut self, factor: f64) -> Result<&mut Self> {
        let working = self.require_loaded("adjust_contrast")?;
        check_range("contrast factor", factor, CONTRAST_RANGE)?;

        let adjusted = filters::stretch_contrast(working, factor);
        info!(factor, "Contrast adjusted");
        Ok(self.replace_working(adjusted))
    }

    /// Invert the colour channels (alpha preserved).
    #[instrument(skip(self))]
    pub fn invert_colors(&mut self) -> Result<&mut Self> {
        let working = self.require_loaded("invert_colors")?;
        let inverted = filters::invert(working);
        info!("Colours inverted");
        Ok(self.replace_working(inverted))
    }

    /// Convert to a single-channel luma image. Alpha is discarded.
    #[instrument(skip(self))]
    pub fn grayscale(&mut self) -> Result<&mut Self> {
        let working = self.require_loaded("grayscale")?;
        let gray = filters::to_luma(working)?;
        info!("Converted to grayscale");
        Ok(self.replace_working(gray))
    }

    /// Restore the working buffer to a fresh copy of the original. Does
    /// nothing when no image was ever loaded.
    pub fn reset(&mut self) -> &mut Self {
        if let Some(original) = &self.original {
            self.working = Some(original.clone());
            debug!("Reset to original image");
        }
        self
    }

    // -- Output ---------------------------------------------------------------

    /// Write the working image to `path`, creating missing parent directories.
    ///
    /// The encoder follows the extension: JPEG uses `quality` (1-100), PNG uses
    /// the configured compression and ignores `quality`, other extensions use
    /// the format's default encoder.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>, quality: u8) -> Result<()> {
        let working = self.require_loaded("save")?;
        let target = validate_path(path.as_ref())?;
        check_quality(quality)?;

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }

        let params = EncodeParams::for_path(&target, quality, &self.config)?;
        debug!(?params, "Encoder selected");
        let bytes = self.codec.encode(working, &params)?;
        self.filesystem.write_atomic(&target, &bytes)?;

        info!(bytes = bytes.len(), "Image saved");
        Ok(())
    }

    /// `save` with the configured default quality.
    pub fn save_default(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(path, self.config.default_quality)
    }

    /// Encode the working image to bytes with explicit parameters.
    pub fn encode(&self, params: &EncodeParams) -> Result<Vec<u8>> {
        let working = self.require_loaded("encode")?;
        if let EncodeParams::Jpeg { quality } = *params {
            check_quality(quality)?;
        }
        self.codec.encode(working, params)
    }

    /// Encode the working image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        self.encode(&EncodeParams::Png {
            compression: self.config.png_compression,
        })
    }

    /// Encode the working image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        self.encode(&EncodeParams::Jpeg { quality })
    }

    // -- Internals ------------------------------------------------------------

    fn require_loaded(&self, operation: &str) -> Result<&PixelBuffer> {
        self.working.as_ref().ok_or_else(|| {
            ImageProcessingError::InvalidState(format!("{operation} requires a loaded image"))
        })
    }

    /// Apply the path rules shared by `load` and `blend_with`, then decode.
    fn read_image(&self, path: &Path) -> Result<PixelBuffer> {
        let resolved = validate_path(path)?;
        if !self.filesystem.exists(&resolved) {
            return Err(ImageProcessingError::NotFound(resolved));
        }
        self.codec.decode(&resolved)
    }

    fn install(&mut self, buffer: PixelBuffer) -> &mut Self {
        info!(
            width = buffer.width(),
            height = buffer.height(),
            channels = %buffer.channels(),
            "Image loaded"
        );
        self.original = Some(buffer.clone());
        self.working = Some(buffer);
        self
    }

    fn replace_working(&mut self, buffer: PixelBuffer) -> &mut Self {
        self.working = Some(buffer);
        self
    }

    /// Bring `other` to the working buffer's layout and size.
    fn conform<'a>(
        &self,
        working: &PixelBuffer,
        other: &'a PixelBuffer,
    ) -> Result<Cow<'a, PixelBuffer>> {
        if working.same_shape(other) {
            return Ok(Cow::Borrowed(other));
        }
        let converted = other.to_channels(working.channels())?;
        debug!(
            from_w = other.width(),
            from_h = other.height(),
            to_w = working.width(),
            to_h = working.height(),
            "Resizing blend partner"
        );
        let resized = converted.resize_exact(
            working.width(),
            working.height(),
            self.config.resize_filter,
        )?;
        Ok(Cow::Owned(resized))
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ImageProcessingError::InvalidArgument(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_quality(quality: u8) -> Result<()> {
    let (min, max) = QUALITY_RANGE;
    if !(min..=max).contains(&quality) {
        return Err(ImageProcessingError::InvalidArgument(format!(
            "quality must be between {min} and {max}, got {quality}"
        )));
    }
    Ok(())
}

// -- Tests --------------------------------------------------------------------
