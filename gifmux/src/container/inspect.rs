// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Structural summary of a complete GIF stream, without decoding pixel data.

use crate::{
    error::ParseError,
    headers::{
        ApplicationExtension, DisposalMethod, GraphicControl, ImageDescriptor, ScreenDescriptor,
        extensions::{APPLICATION_LABEL, GRAPHIC_CONTROL_LABEL},
    },
};

use super::{
    blocks::{Block, Blocks, GifHeader},
    signature::GifVersion,
};

/// One image of an animation together with the graphic control that precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    pub descriptor: ImageDescriptor,
    /// Byte offset of the image separator.
    pub offset: usize,
    /// Delay in centiseconds, 0 when the image has no graphic control extension.
    pub delay: u16,
    pub disposal: Option<DisposalMethod>,
    pub transparent_index: Option<u8>,
    /// Entries in the local color table, if the image has one.
    pub local_table_entries: Option<usize>,
    /// Raw bytes of the local color table.
    pub local_table: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSummary {
    pub version: GifVersion,
    pub screen: ScreenDescriptor,
    pub global_table_entries: Option<usize>,
    /// Loop count from a `NETSCAPE2.0` extension.
    pub loop_count: Option<u16>,
    pub graphic_controls: usize,
    pub frames: Vec<FrameSummary>,
}

/// Walks every block of `data` and summarizes its animation structure.
pub fn inspect(data: &[u8]) -> Result<AnimationSummary, ParseError> {
    let (header, pos) = GifHeader::read(data)?;
    let mut summary = AnimationSummary {
        version: header.version,
        screen: header.screen,
        global_table_entries: header.global_table.map(|table| table.entries()),
        loop_count: None,
        graphic_controls: 0,
        frames: Vec::new(),
    };
    let mut pending: Option<GraphicControl> = None;
    for block in Blocks::new(data, pos) {
        let (offset, block) = block?;
        match block {
            Block::Extension {
                label: GRAPHIC_CONTROL_LABEL,
                raw,
            } => {
                pending = Some(GraphicControl::read(raw)?);
                summary.graphic_controls += 1;
            }
            Block::Extension {
                label: APPLICATION_LABEL,
                raw,
            } => {
                if let Some(app) = ApplicationExtension::read(raw)? {
                    summary.loop_count = Some(app.loop_count);
                }
            }
            Block::Extension { .. } => {}
            Block::Image {
                descriptor,
                local_table,
                ..
            } => {
                let control = pending.take();
                summary.frames.push(FrameSummary {
                    descriptor,
                    offset,
                    delay: control.map_or(0, |c| c.delay),
                    disposal: control.map(|c| c.disposal),
                    transparent_index: control.and_then(|c| c.transparent_index),
                    local_table_entries: local_table.map(|table| table.entries()),
                    local_table: local_table.map(|table| table.as_bytes().to_vec()),
                });
            }
        }
    }
    Ok(summary)
}

impl AnimationSummary {
    pub fn delays(&self) -> Vec<u16> {
        self.frames.iter().map(|frame| frame.delay).collect()
    }
}
