// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-sample filters and the separable Gaussian convolution. Every function
// takes a borrowed buffer and returns a new one; argument validation is the
// caller's job.

use image::{ImageBuffer, Luma};
use imageproc::definitions::Image;
use imageproc::filter::separable_filter_equal;
use optimage_core::error::{ImageProcessingError, Result};
use optimage_core::types::Channels;

use super::buffer::PixelBuffer;

/// Round half away from zero and saturate into `0..=255`.
fn saturate(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Apply `f` to colour samples only, copying alpha through unchanged.
fn map_color_samples(buffer: &PixelBuffer, f: impl Fn(u8) -> u8) -> PixelBuffer {
    let channels = buffer.channels();
    let stride = channels.count();
    let color = channels.color_count();
    let samples = buffer
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &s)| if i % stride < color { f(s) } else { s })
        .collect();
    buffer.with_samples(samples)
}

/// Linear brightness scale: `clamp(round(s * factor), 0, 255)` for every
/// sample, alpha included.
pub fn scale_brightness(buffer: &PixelBuffer, factor: f64) -> PixelBuffer {
    let samples = buffer
        .samples()
        .iter()
        .map(|&s| saturate(f64::from(s) * factor))
        .collect();
    buffer.with_samples(samples)
}

/// Contrast around mid-gray: `clamp(round((s - 128) * factor + 128), 0, 255)`.
pub fn stretch_contrast(buffer: &PixelBuffer, factor: f64) -> PixelBuffer {
    map_color_samples(buffer, |s| saturate((f64::from(s) - 128.0) * factor + 128.0))
}

/// Photographic negative of the colour channels.
pub fn invert(buffer: &PixelBuffer) -> PixelBuffer {
    map_color_samples(buffer, |s| 255 - s)
}

/// Single-channel luma using BT.601 weights. Alpha is discarded.
pub fn to_luma(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    let stride = buffer.channels().count();
    let samples: Vec<u8> = match buffer.channels() {
        Channels::Gray => buffer.samples().to_vec(),
        Channels::Rgb | Channels::Rgba => buffer
            .samples()
            .chunks_exact(stride)
            .map(|p| {
                saturate(0.299 * f64::from(p[0]) + 0.587 * f64::from(p[1]) + 0.114 * f64::from(p[2]))
            })
            .collect(),
    };
    PixelBuffer::new(buffer.width(), buffer.height(), Channels::Gray, samples)
}

/// Weighted sum `round(a * alpha + b * (1 - alpha))`, saturated. Both buffers
/// must already share a shape.
pub fn blend(a: &PixelBuffer, b: &PixelBuffer, alpha: f64) -> Result<PixelBuffer> {
    if !a.same_shape(b) {
        return Err(ImageProcessingError::InvalidArgument(format!(
            "cannot blend {}x{} {} with {}x{} {}",
            a.width(),
            a.height(),
            a.channels(),
            b.width(),
            b.height(),
            b.channels()
        )));
    }
    let beta = 1.0 - alpha;
    let samples = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(&x, &y)| saturate(f64::from(x) * alpha + f64::from(y) * beta))
        .collect();
    Ok(a.with_samples(samples))
}

/// Normalised 1-D Gaussian weights of length `size` centred on the middle tap.
pub fn gaussian_kernel(size: u32, sigma: f64) -> Vec<f64> {
    folded_gaussian_kernel(size, sigma, size / 2)
}

/// Gaussian weights for a `size`-tap kernel, truncated to at most
/// `max_radius` taps either side of the centre.
///
/// The weight of every tap past `max_radius` is added to the outermost kept
/// tap on the same side. Under edge replication those taps all read the same
/// edge sample once `max_radius` reaches the image extent, so the folded
/// kernel filters exactly like the full one without allocating it.
pub fn folded_gaussian_kernel(size: u32, sigma: f64, max_radius: u32) -> Vec<f64> {
    let radius = size / 2;
    let kept = radius.min(max_radius);
    let denom = 2.0 * sigma * sigma;
    let weight = |d: u32| {
        // Keeps the centre tap finite when sigma underflows.
        if d == 0 {
            1.0
        } else {
            let d = f64::from(d);
            (-(d * d) / denom).exp()
        }
    };

    let mut half: Vec<f64> = (0..=kept).map(weight).collect();
    let mut tail = 0.0;
    for d in kept + 1..=radius {
        let w = weight(d);
        // Weights only shrink with distance.
        if w == 0.0 {
            break;
        }
        tail += w;
    }
    if kept == 0 {
        half[0] += 2.0 * tail;
    } else {
        half[kept as usize] += tail;
    }

    let mut kernel: Vec<f64> = half.iter().rev().chain(&half[1..]).copied().collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Separable Gaussian blur with a `kernel_size` x `kernel_size` window.
///
/// Borders replicate the nearest edge sample. Each channel, alpha included,
/// is filtered as its own `f64` plane, so rounding happens once after both
/// passes. Kernels wider than the image are folded down to its extent.
pub fn gaussian_blur(buffer: &PixelBuffer, kernel_size: u32, sigma: f64) -> PixelBuffer {
    let width = buffer.width();
    let height = buffer.height();
    let kernel = folded_gaussian_kernel(kernel_size, sigma, width.max(height) - 1);
    let c = buffer.channels().count();
    let src = buffer.samples();

    let mut out = vec![0u8; src.len()];
    for ch in 0..c {
        let plane: Image<Luma<f64>> = ImageBuffer::from_fn(width, height, |x, y| {
            let index = (y as usize * width as usize + x as usize) * c + ch;
            Luma([f64::from(src[index])])
        });
        let blurred = separable_filter_equal(&plane, &kernel);
        for (i, pixel) in blurred.pixels().enumerate() {
            out[i * c + ch] = saturate(pixel.0[0]);
        }
    }

    buffer.with_samples(out)
}
