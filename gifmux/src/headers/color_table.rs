// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, ParseError, Result};

const CHANNELS: usize = 3;

/// An RGB triplet as stored in GIF color tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// A global or local color table, borrowed from the buffer it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTable<'a> {
    exponent: u8,
    bytes: &'a [u8],
}

impl<'a> ColorTable<'a> {
    /// Number of entries declared by a 3-bit size exponent.
    pub fn entries_for(exponent: u8) -> usize {
        2 << (exponent & 0x07)
    }

    /// Byte length of a table declared by a 3-bit size exponent.
    pub fn byte_len_for(exponent: u8) -> usize {
        CHANNELS * Self::entries_for(exponent)
    }

    /// Reads the table declared by `exponent` from the start of `data`.
    pub fn read(data: &'a [u8], exponent: u8) -> Result<Self, ParseError> {
        let bytes = data
            .get(..Self::byte_len_for(exponent))
            .ok_or(ParseError::FileTruncated)?;
        Ok(Self {
            exponent: exponent & 0x07,
            bytes,
        })
    }

    pub fn exponent(&self) -> u8 {
        self.exponent
    }

    pub fn entries(&self) -> usize {
        Self::entries_for(self.exponent)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        let start = index.checked_mul(CHANNELS)?;
        let rgb = self.bytes.get(start..start + CHANNELS)?;
        Some(Rgb::new(rgb[0], rgb[1], rgb[2]))
    }

    /// Index of the first entry equal to `color`.
    pub fn find(&self, color: Rgb) -> Option<u8> {
        self.bytes
            .chunks_exact(CHANNELS)
            .position(|rgb| *rgb == [color.r, color.g, color.b])
            // Tables hold at most 256 entries.
            .map(|index| index as u8)
    }

    /// Whether both tables declare the same size and hold identical entries.
    pub fn same_as(&self, other: &ColorTable) -> Result<bool> {
        if self.exponent != other.exponent {
            return Ok(false);
        }
        Self::equal_entries(self.bytes, other.bytes, self.entries())
    }

    /// Compares the first `entries` RGB triplets of two tables.
    ///
    /// Both slices must hold at least `3 * entries` bytes; anything shorter means the caller
    /// paired tables whose declared sizes disagree with their contents.
    pub fn equal_entries(a: &[u8], b: &[u8], entries: usize) -> Result<bool> {
        let len = entries * CHANNELS;
        let (Some(a), Some(b)) = (a.get(..len), b.get(..len)) else {
            return Err(Error::TableSizeMismatch {
                expected: entries,
                left: a.len(),
                right: b.len(),
            });
        };
        let mut pairs = a.chunks_exact(CHANNELS).zip(b.chunks_exact(CHANNELS));
        Ok(pairs.all(|(a, b)| a == b))
    }
}
