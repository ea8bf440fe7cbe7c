// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{ByteOrder, LittleEndian};

use super::EXTENSION_INTRODUCER;
use crate::error::ParseError;

pub const GRAPHIC_CONTROL_LABEL: u8 = 0xf9;
pub const APPLICATION_LABEL: u8 = 0xff;

/// Identifier plus authentication code of the looping extension.
pub const NETSCAPE_IDENTIFIER: &[u8; 11] = b"NETSCAPE2.0";

const TRANSPARENCY_FLAG: u8 = 0x01;
const DISPOSAL_SHIFT: u8 = 2;
const DISPOSAL_MASK: u8 = 0x07;

/// How a decoder treats a frame's area before rendering the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisposalMethod {
    NoAction = 0,
    DoNotDispose = 1,
    #[default]
    RestoreBackground = 2,
    RestorePrevious = 3,
}

impl From<u8> for DisposalMethod {
    /// Values above 3 are reserved by GIF89a and clamp to `RestorePrevious`.
    fn from(value: u8) -> Self {
        match value {
            0 => DisposalMethod::NoAction,
            1 => DisposalMethod::DoNotDispose,
            2 => DisposalMethod::RestoreBackground,
            _ => DisposalMethod::RestorePrevious,
        }
    }
}

/// Graphic Control Extension, 8 bytes on the wire:
/// `21 F9 04 <packed> <delay LE u16> <transparent index> 00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicControl {
    pub disposal: DisposalMethod,
    /// Delay in centiseconds.
    pub delay: u16,
    pub transparent_index: Option<u8>,
}

impl GraphicControl {
    pub const SIZE: usize = 8;

    pub fn packed(&self) -> u8 {
        let transparent = if self.transparent_index.is_some() {
            TRANSPARENCY_FLAG
        } else {
            0
        };
        ((self.disposal as u8) << DISPOSAL_SHIFT) | transparent
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [
            EXTENSION_INTRODUCER,
            GRAPHIC_CONTROL_LABEL,
            4,
            self.packed(),
            0,
            0,
            self.transparent_index.unwrap_or(0),
            0,
        ];
        LittleEndian::write_u16(&mut out[4..6], self.delay);
        out
    }

    /// Parses a complete extension block, introducer included.
    pub fn read(block: &[u8]) -> Result<Self, ParseError> {
        let block = block
            .get(..Self::SIZE)
            .ok_or(ParseError::FileTruncated)?;
        if block[..3] != [EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL, 4] {
            return Err(ParseError::InvalidExtension(GRAPHIC_CONTROL_LABEL));
        }
        let packed = block[3];
        Ok(Self {
            disposal: DisposalMethod::from((packed >> DISPOSAL_SHIFT) & DISPOSAL_MASK),
            delay: LittleEndian::read_u16(&block[4..6]),
            transparent_index: (packed & TRANSPARENCY_FLAG != 0).then_some(block[6]),
        })
    }
}

/// The `NETSCAPE2.0` application extension carrying the loop count, 19 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationExtension {
    /// Number of repetitions; 0 loops forever.
    pub loop_count: u16,
}

impl ApplicationExtension {
    pub const SIZE: usize = 19;

    pub fn netscape_loop(loop_count: u16) -> Self {
        Self { loop_count }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0; Self::SIZE];
        out[..3].copy_from_slice(&[EXTENSION_INTRODUCER, APPLICATION_LABEL, 11]);
        out[3..14].copy_from_slice(NETSCAPE_IDENTIFIER);
        // One sub-block of 3 bytes: sub-block id 1, then the loop count.
        out[14] = 3;
        out[15] = 1;
        LittleEndian::write_u16(&mut out[16..18], self.loop_count);
        out[18] = 0;
        out
    }

    /// Parses a complete `NETSCAPE2.0` block, introducer included. Returns `None` for any other
    /// application extension.
    pub fn read(block: &[u8]) -> Result<Option<Self>, ParseError> {
        let header = block.get(..14).ok_or(ParseError::FileTruncated)?;
        if header[..3] != [EXTENSION_INTRODUCER, APPLICATION_LABEL, 11] {
            return Err(ParseError::InvalidExtension(APPLICATION_LABEL));
        }
        if &header[3..14] != NETSCAPE_IDENTIFIER {
            return Ok(None);
        }
        let data = block.get(14..18).ok_or(ParseError::FileTruncated)?;
        if data[0] < 3 || data[1] != 1 {
            return Err(ParseError::InvalidExtension(APPLICATION_LABEL));
        }
        Ok(Some(Self {
            loop_count: LittleEndian::read_u16(&data[2..4]),
        }))
    }
}
