// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// optimage-image — Stateful in-memory image transformation pipeline.
//
// Loads a raster image, applies validated chainable transformations
// (brightness, blending, Gaussian blur, contrast, inversion, grayscale),
// resets to the loaded pixels, and saves the result. Pixel-format work is
// delegated to a `Codec`, file access to a `Filesystem`.

pub mod io;
pub mod pipeline;

// Re-export the primary types so callers can use `optimage_image::ImageProcessor` etc.
pub use io::{Codec, EncodeParams, Filesystem, ImageCodec, StdFilesystem};
pub use optimage_core::{ImageInfo, ImageProcessingError, ProcessorConfig, Result};
pub use pipeline::{ImageProcessor, PixelBuffer};
