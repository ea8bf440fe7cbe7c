// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    error::ParseError,
    headers::{
        ColorTable, ImageDescriptor, ScreenDescriptor,
        extensions::{APPLICATION_LABEL, GRAPHIC_CONTROL_LABEL},
    },
    util::tracing_wrappers::trace,
};

use super::{
    blocks::{Block, Blocks, GifHeader},
    signature::GifVersion,
};

/// Application identifier announcing a multi-frame source.
const NETSCAPE_PREFIX: &[u8; 8] = b"NETSCAPE";
/// Offset of the application identifier inside an application extension block.
const APPLICATION_ID_OFFSET: usize = 3;

/// A single-frame GIF broken into its header and typed blocks.
///
/// Graphic control extensions of the source are not kept; the assembler writes its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame<'a> {
    pub version: GifVersion,
    pub screen: ScreenDescriptor,
    pub color_table: Option<ColorTable<'a>>,
    /// Extensions preceding the image.
    pub leading: Vec<Block<'a>>,
    pub image: FrameImage<'a>,
    /// Extensions following the image.
    pub trailing: Vec<Block<'a>>,
}

/// The image block of a [`ParsedFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameImage<'a> {
    pub descriptor: ImageDescriptor,
    pub local_table: Option<ColorTable<'a>>,
    pub data: &'a [u8],
}

fn is_netscape(raw: &[u8]) -> bool {
    raw.get(APPLICATION_ID_OFFSET..APPLICATION_ID_OFFSET + NETSCAPE_PREFIX.len())
        == Some(NETSCAPE_PREFIX.as_slice())
}

/// Parses a single-frame GIF.
///
/// Fails with `UnsupportedAnimatedSource` if the source carries a `NETSCAPE` application
/// extension or more than one image.
pub fn parse_frame(data: &[u8]) -> Result<ParsedFrame<'_>, ParseError> {
    let (header, pos) = GifHeader::read(data)?;
    let mut leading = Vec::new();
    let mut trailing = Vec::new();
    let mut image = None;
    for block in Blocks::new(data, pos) {
        let (offset, block) = block?;
        match block {
            Block::Extension {
                label: APPLICATION_LABEL,
                raw,
            } if is_netscape(raw) => {
                return Err(ParseError::UnsupportedAnimatedSource);
            }
            Block::Extension {
                label: GRAPHIC_CONTROL_LABEL,
                ..
            } => {
                trace!(
                    "dropping source graphic control extension at offset {}",
                    offset
                );
            }
            Block::Extension { .. } if image.is_none() => leading.push(block),
            Block::Extension { .. } => trailing.push(block),
            Block::Image {
                descriptor,
                local_table,
                data,
            } => {
                if image.is_some() {
                    return Err(ParseError::UnsupportedAnimatedSource);
                }
                image = Some(FrameImage {
                    descriptor,
                    local_table,
                    data,
                });
            }
        }
    }
    Ok(ParsedFrame {
        version: header.version,
        screen: header.screen,
        color_table: header.global_table,
        leading,
        image: image.ok_or(ParseError::MissingImage)?,
        trailing,
    })
}

impl<'a> FrameImage<'a> {
    pub fn as_block(&self) -> Block<'a> {
        Block::Image {
            descriptor: self.descriptor,
            local_table: self.local_table,
            data: self.data,
        }
    }
}

impl<'a> ParsedFrame<'a> {
    pub fn has_color_table(&self) -> bool {
        self.color_table.is_some()
    }

    /// All kept blocks in source order.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'a>> + '_ {
        self.leading
            .iter()
            .copied()
            .chain(std::iter::once(self.image.as_block()))
            .chain(self.trailing.iter().copied())
    }

    /// The table the image is rendered with: its own local table, else the frame's global one.
    pub fn active_color_table(&self) -> Option<ColorTable<'a>> {
        self.image.local_table.or(self.color_table)
    }

    /// Serialized blocks between the global color table and the trailer.
    pub fn trailing_blocks(&self) -> Vec<u8> {
        let len = self.blocks().map(|block| block.encoded_len()).sum();
        let mut out = Vec::with_capacity(len);
        for block in self.blocks() {
            block.write_to(&mut out);
        }
        out
    }
}
