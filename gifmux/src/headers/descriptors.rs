// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{ByteOrder, LittleEndian};

use super::{COLOR_TABLE_FLAG, COLOR_TABLE_SIZE_MASK, IMAGE_SEPARATOR};
use crate::error::ParseError;

/// Logical screen descriptor, the 7 bytes following the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub width: u16,
    pub height: u16,
    pub packed: u8,
    pub background_index: u8,
    pub aspect_ratio: u8,
}

impl ScreenDescriptor {
    pub const SIZE: usize = 7;

    pub fn read(bytes: &[u8]) -> Result<Self, ParseError> {
        let bytes = bytes
            .get(..Self::SIZE)
            .ok_or(ParseError::FileTruncated)?;
        Ok(Self {
            width: LittleEndian::read_u16(&bytes[0..2]),
            height: LittleEndian::read_u16(&bytes[2..4]),
            packed: bytes[4],
            background_index: bytes[5],
            aspect_ratio: bytes[6],
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0; Self::SIZE];
        LittleEndian::write_u16(&mut out[0..2], self.width);
        LittleEndian::write_u16(&mut out[2..4], self.height);
        out[4] = self.packed;
        out[5] = self.background_index;
        out[6] = self.aspect_ratio;
        out
    }

    pub fn has_color_table(&self) -> bool {
        self.packed & COLOR_TABLE_FLAG != 0
    }

    pub fn color_table_exponent(&self) -> u8 {
        self.packed & COLOR_TABLE_SIZE_MASK
    }
}

/// Image descriptor: the separator byte plus 9 bytes of geometry and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub packed: u8,
}

impl ImageDescriptor {
    /// Size including the leading `,` separator.
    pub const SIZE: usize = 10;

    /// Reads a descriptor starting at its separator byte.
    pub fn read(bytes: &[u8]) -> Result<Self, ParseError> {
        let bytes = bytes
            .get(..Self::SIZE)
            .ok_or(ParseError::FileTruncated)?;
        debug_assert_eq!(bytes[0], IMAGE_SEPARATOR);
        Ok(Self {
            left: LittleEndian::read_u16(&bytes[1..3]),
            top: LittleEndian::read_u16(&bytes[3..5]),
            width: LittleEndian::read_u16(&bytes[5..7]),
            height: LittleEndian::read_u16(&bytes[7..9]),
            packed: bytes[9],
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0; Self::SIZE];
        out[0] = IMAGE_SEPARATOR;
        LittleEndian::write_u16(&mut out[1..3], self.left);
        LittleEndian::write_u16(&mut out[3..5], self.top);
        LittleEndian::write_u16(&mut out[5..7], self.width);
        LittleEndian::write_u16(&mut out[7..9], self.height);
        out[9] = self.packed;
        out
    }

    pub fn has_local_table(&self) -> bool {
        self.packed & COLOR_TABLE_FLAG != 0
    }

    pub fn local_table_exponent(&self) -> u8 {
        self.packed & COLOR_TABLE_SIZE_MASK
    }

    /// Returns a copy flagged as carrying a local table of the given size exponent. Interlace and
    /// sort bits are preserved.
    pub fn with_local_table(mut self, exponent: u8) -> Self {
        self.packed = (self.packed | COLOR_TABLE_FLAG) & !COLOR_TABLE_SIZE_MASK;
        self.packed |= exponent & COLOR_TABLE_SIZE_MASK;
        self
    }

    /// Returns a copy with the local table flag and size bits cleared.
    pub fn without_local_table(mut self) -> Self {
        self.packed &= !(COLOR_TABLE_FLAG | COLOR_TABLE_SIZE_MASK);
        self
    }
}
