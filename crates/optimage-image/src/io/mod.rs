// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// I/O collaborators — codec, filesystem, and path rules.

pub mod codec;
pub mod fs;
pub mod path;

pub use codec::{Codec, EncodeParams, ImageCodec};
pub use fs::{Filesystem, StdFilesystem};
