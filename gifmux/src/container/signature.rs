// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::ParseError;

pub const GIF87A_SIGNATURE: [u8; 6] = *b"GIF87a";
pub const GIF89A_SIGNATURE: [u8; 6] = *b"GIF89a";
pub const SIGNATURE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifVersion {
    Gif87a,
    Gif89a,
}

impl GifVersion {
    pub fn signature(&self) -> &'static [u8; SIGNATURE_LEN] {
        match self {
            GifVersion::Gif87a => &GIF87A_SIGNATURE,
            GifVersion::Gif89a => &GIF89A_SIGNATURE,
        }
    }
}

/// Checks that `data` starts with a GIF87a or GIF89a signature.
pub fn check_signature(data: &[u8]) -> Result<GifVersion, ParseError> {
    let mut found = [0; SIGNATURE_LEN];
    let prefix_len = data.len().min(SIGNATURE_LEN);
    found[..prefix_len].copy_from_slice(&data[..prefix_len]);
    match found {
        GIF87A_SIGNATURE => Ok(GifVersion::Gif87a),
        GIF89A_SIGNATURE => Ok(GifVersion::Gif89a),
        _ => Err(ParseError::InvalidSignature(found)),
    }
}
