// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    error::ParseError,
    headers::{
        ColorTable, EXTENSION_INTRODUCER, IMAGE_SEPARATOR, ImageDescriptor, ScreenDescriptor,
        TRAILER,
    },
    util::tracing_wrappers::{trace, warn},
};

use super::signature::{GifVersion, SIGNATURE_LEN, check_signature};

/// Signature, logical screen descriptor and optional global color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifHeader<'a> {
    pub version: GifVersion,
    pub screen: ScreenDescriptor,
    pub global_table: Option<ColorTable<'a>>,
}

impl<'a> GifHeader<'a> {
    /// Reads the header, returning it along with the offset of the first block.
    pub fn read(data: &'a [u8]) -> Result<(Self, usize), ParseError> {
        let version = check_signature(data)?;
        let mut pos = SIGNATURE_LEN;
        let screen = ScreenDescriptor::read(&data[pos..])?;
        pos += ScreenDescriptor::SIZE;
        let global_table = if screen.has_color_table() {
            let table = ColorTable::read(&data[pos..], screen.color_table_exponent())?;
            pos += table.as_bytes().len();
            Some(table)
        } else {
            None
        };
        Ok((
            Self {
                version,
                screen,
                global_table,
            },
            pos,
        ))
    }
}

/// One block between the header and the trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    /// Any extension; `raw` spans introducer, label and all sub-blocks including the terminator.
    Extension { label: u8, raw: &'a [u8] },
    /// An image descriptor with its optional local table. `data` spans the LZW minimum code size
    /// byte and all sub-blocks including the terminator.
    Image {
        descriptor: ImageDescriptor,
        local_table: Option<ColorTable<'a>>,
        data: &'a [u8],
    },
}

impl Block<'_> {
    pub fn encoded_len(&self) -> usize {
        match self {
            Block::Extension { raw, .. } => raw.len(),
            Block::Image {
                local_table, data, ..
            } => {
                ImageDescriptor::SIZE
                    + local_table.map_or(0, |table| table.as_bytes().len())
                    + data.len()
            }
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Block::Extension { raw, .. } => out.extend_from_slice(raw),
            Block::Image {
                descriptor,
                local_table,
                data,
            } => {
                out.extend_from_slice(&descriptor.to_bytes());
                if let Some(table) = local_table {
                    out.extend_from_slice(table.as_bytes());
                }
                out.extend_from_slice(data);
            }
        }
    }
}

/// Returns the offset just past the zero-length terminator of the sub-block chain at `pos`.
fn skip_sub_blocks(data: &[u8], mut pos: usize) -> Result<usize, ParseError> {
    loop {
        let len = *data.get(pos).ok_or(ParseError::FileTruncated)? as usize;
        pos += 1;
        if len == 0 {
            return Ok(pos);
        }
        pos += len;
        if pos > data.len() {
            return Err(ParseError::FileTruncated);
        }
    }
}

/// Iterator over the blocks of a GIF stream, stopping at the trailer.
///
/// Every read is bounds-checked; the iterator yields `FileTruncated` and then stops when a block
/// runs past the end of the buffer.
pub struct Blocks<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Blocks<'a> {
    /// Walks blocks of `data` starting at `pos`, which must be the end of the header.
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            done: false,
        }
    }

    /// Offset of the next byte to be examined.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_extension(&self, start: usize) -> Result<(Block<'a>, usize), ParseError> {
        let label = *self.data.get(start + 1).ok_or(ParseError::FileTruncated)?;
        let end = skip_sub_blocks(self.data, start + 2)?;
        let raw = &self.data[start..end];
        Ok((Block::Extension { label, raw }, end))
    }

    fn read_image(&self, start: usize) -> Result<(Block<'a>, usize), ParseError> {
        let descriptor = ImageDescriptor::read(&self.data[start..])?;
        let mut pos = start + ImageDescriptor::SIZE;
        let local_table = if descriptor.has_local_table() {
            let table = ColorTable::read(&self.data[pos..], descriptor.local_table_exponent())?;
            pos += table.as_bytes().len();
            Some(table)
        } else {
            None
        };
        // LZW minimum code size, then the compressed sub-blocks.
        if pos >= self.data.len() {
            return Err(ParseError::FileTruncated);
        }
        let end = skip_sub_blocks(self.data, pos + 1)?;
        let block = Block::Image {
            descriptor,
            local_table,
            data: &self.data[pos..end],
        };
        Ok((block, end))
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<(usize, Block<'a>), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let start = self.pos;
            let Some(&introducer) = self.data.get(start) else {
                warn!("GIF stream ends at offset {} without a trailer", start);
                self.done = true;
                return None;
            };
            let block = match introducer {
                EXTENSION_INTRODUCER => self.read_extension(start),
                IMAGE_SEPARATOR => self.read_image(start),
                TRAILER => {
                    trace!("trailer at offset {}", start);
                    self.done = true;
                    return None;
                }
                other => {
                    // Stray byte between blocks, usually encoder padding.
                    trace!("skipping byte {:02x} at offset {}", other, start);
                    self.pos += 1;
                    continue;
                }
            };
            return Some(match block {
                Ok((block, end)) => {
                    trace!("block {:?} at offset {}", block, start);
                    self.pos = end;
                    Ok((start, block))
                }
                Err(err) => {
                    self.done = true;
                    Err(err)
                }
            });
        }
        None
    }
}
