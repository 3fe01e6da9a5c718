// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// optimage — Core types, configuration, and error definitions shared by the
// image pipeline crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::ProcessorConfig;
pub use error::{ImageProcessingError, Result};
pub use types::*;
