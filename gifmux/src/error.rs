// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors produced while walking the block structure of a single GIF buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid signature {0:02x?}, expected GIF87a or GIF89a")]
    InvalidSignature([u8; 6]),
    #[error("Source is already an animation")]
    UnsupportedAnimatedSource,
    #[error("File truncated")]
    FileTruncated,
    #[error("No image descriptor found")]
    MissingImage,
    #[error("Malformed extension block with label {0:02x}")]
    InvalidExtension(u8),
}

/// Errors produced while assembling an animation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Animation has no frames")]
    EmptyAnimation,
    #[error("Frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: ParseError,
    },
    // Only reachable through a parsing bug: callers compare tables of equal declared size.
    #[error("Color table size mismatch: {expected} entries, tables of {left} and {right} bytes")]
    TableSizeMismatch {
        expected: usize,
        left: usize,
        right: usize,
    },
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

impl Error {
    pub(crate) fn in_frame(index: usize) -> impl FnOnce(ParseError) -> Error {
        move |source| Error::Frame { index, source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
