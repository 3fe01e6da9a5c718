// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec collaborator: decode files or bytes into pixel buffers and encode
// buffers with format-specific parameters. The default implementation is
// backed by the `image` crate.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use optimage_core::config::{PngCompression, ProcessorConfig};
use optimage_core::error::{ImageProcessingError, Result};

use crate::pipeline::buffer::PixelBuffer;

/// Encoder selection and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParams {
    /// Lossy JPEG at the given quality (1-100). Alpha is dropped.
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png { compression: PngCompression },
    /// The `image` crate's default encoder for this format.
    Format(ImageFormat),
}

impl EncodeParams {
    /// Pick an encoder from the file extension (case-insensitive).
    ///
    /// `quality` only applies to JPEG. Unknown or missing extensions fail
    /// with `Io`, since nothing could be written.
    pub fn for_path(path: &Path, quality: u8, config: &ProcessorConfig) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg { quality }),
            Some("png") => Ok(Self::Png {
                compression: config.png_compression,
            }),
            _ => ImageFormat::from_path(path).map(Self::Format).map_err(|err| {
                ImageProcessingError::Io(format!(
                    "no encoder for {}: {}",
                    path.display(),
                    err
                ))
            }),
        }
    }
}

/// Raster codec the processor delegates all pixel-format work to.
pub trait Codec {
    /// Decode the file at `path`.
    fn decode(&self, path: &Path) -> Result<PixelBuffer>;

    /// Decode an in-memory encoded image (JPEG, PNG, etc.).
    fn decode_bytes(&self, data: &[u8]) -> Result<PixelBuffer>;

    /// Encode `buffer` to bytes.
    fn encode(&self, buffer: &PixelBuffer, params: &EncodeParams) -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> Result<PixelBuffer> {
        let image = image::open(path).map_err(|err| {
            ImageProcessingError::DecodeError(format!(
                "failed to open {}: {}",
                path.display(),
                err
            ))
        })?;
        PixelBuffer::from_dynamic(&image)
    }

    fn decode_bytes(&self, data: &[u8]) -> Result<PixelBuffer> {
        let image = image::load_from_memory(data).map_err(|err| {
            ImageProcessingError::DecodeError(format!("failed to decode image: {}", err))
        })?;
        PixelBuffer::from_dynamic(&image)
    }

    fn encode(&self, buffer: &PixelBuffer, params: &EncodeParams) -> Result<Vec<u8>> {
        let image = buffer.to_dynamic()?;
        let mut bytes = Vec::new();
        match *params {
            EncodeParams::Jpeg { quality } => {
                let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
                let written = match &image {
                    DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
                    other => other.to_rgb8().write_with_encoder(encoder),
                };
                written.map_err(|err| encode_error("JPEG", err))?;
            }
            EncodeParams::Png { compression } => {
                let encoder = PngEncoder::new_with_quality(
                    &mut bytes,
                    compression.to_compression_type(),
                    PngFilterType::Adaptive,
                );
                image
                    .write_with_encoder(encoder)
                    .map_err(|err| encode_error("PNG", err))?;
            }
            EncodeParams::Format(format) => {
                let mut cursor = std::io::Cursor::new(&mut bytes);
                image
                    .write_to(&mut cursor, format)
                    .map_err(|err| encode_error(&format!("{format:?}"), err))?;
            }
        }
        Ok(bytes)
    }
}

fn encode_error(format: &str, err: image::ImageError) -> ImageProcessingError {
    ImageProcessingError::Io(format!("{format} encoding failed: {err}"))
}
