// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline module — pixel buffers, filters, and the stateful processor.

pub mod buffer;
pub mod filters;
pub mod processor;

pub use buffer::PixelBuffer;
pub use processor::ImageProcessor;
