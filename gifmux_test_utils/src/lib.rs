// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Builders for small, valid single-frame GIFs used throughout the gifmux tests.

use byteorder::{LittleEndian, WriteBytesExt};

const MAX_SUB_BLOCK: usize = 255;

/// A single-frame GIF with a uniformly colored image.
#[derive(Debug, Clone)]
pub struct SyntheticGif {
    width: u16,
    height: u16,
    palette: Vec<[u8; 3]>,
    fill_index: u8,
    version_87a: bool,
    table: TablePlacement,
    interlaced: bool,
    netscape_loop: Option<u16>,
    graphic_control: Option<(u16, Option<u8>)>,
    comments_before: Vec<Vec<u8>>,
    comments_after: Vec<Vec<u8>>,
    images: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TablePlacement {
    Global,
    Local,
    None,
}

impl SyntheticGif {
    /// A `width`x`height` image filled with `color`, using the 4-entry global table
    /// `[color, white, gray, black]`.
    pub fn solid(width: u16, height: u16, color: [u8; 3]) -> Self {
        let palette = vec![color, [255, 255, 255], [128, 128, 128], [0, 0, 0]];
        Self::with_palette(width, height, palette, 0)
    }

    /// An image filled with entry `fill_index` of `palette`. The palette is padded with black to
    /// the next power of two of at least 2 entries.
    pub fn with_palette(
        width: u16,
        height: u16,
        mut palette: Vec<[u8; 3]>,
        fill_index: u8,
    ) -> Self {
        assert!(!palette.is_empty() && palette.len() <= 256);
        assert!((fill_index as usize) < palette.len());
        let len = palette.len().next_power_of_two().max(2);
        palette.resize(len, [0, 0, 0]);
        Self {
            width,
            height,
            palette,
            fill_index,
            version_87a: false,
            table: TablePlacement::Global,
            interlaced: false,
            netscape_loop: None,
            graphic_control: None,
            comments_before: Vec::new(),
            comments_after: Vec::new(),
            images: 1,
        }
    }

    pub fn version_87a(mut self) -> Self {
        self.version_87a = true;
        self
    }

    /// Moves the palette from the global table into a local table on the image.
    pub fn local_table_only(mut self) -> Self {
        self.table = TablePlacement::Local;
        self
    }

    /// Writes no color table at all.
    pub fn without_color_table(mut self) -> Self {
        self.table = TablePlacement::None;
        self
    }

    pub fn interlaced(mut self) -> Self {
        self.interlaced = true;
        self
    }

    /// Adds a `NETSCAPE2.0` loop extension right after the header.
    pub fn netscape_loop(mut self, loop_count: u16) -> Self {
        self.netscape_loop = Some(loop_count);
        self
    }

    pub fn graphic_control(mut self, delay: u16, transparent_index: Option<u8>) -> Self {
        self.graphic_control = Some((delay, transparent_index));
        self
    }

    /// Adds a comment extension before the image.
    pub fn comment(mut self, text: &[u8]) -> Self {
        self.comments_before.push(text.to_vec());
        self
    }

    /// Adds a comment extension after the image.
    pub fn comment_after(mut self, text: &[u8]) -> Self {
        self.comments_after.push(text.to_vec());
        self
    }

    /// Writes the image twice, producing a two-image stream without a loop extension.
    pub fn repeat_image(mut self) -> Self {
        self.images = 2;
        self
    }

    fn table_exponent(&self) -> u8 {
        self.palette.len().trailing_zeros() as u8 - 1
    }

    fn min_code_size(&self) -> u8 {
        (self.table_exponent() + 1).max(2)
    }

    fn write_table(&self, out: &mut Vec<u8>) {
        for rgb in &self.palette {
            out.extend_from_slice(rgb);
        }
    }

    fn write_image(&self, out: &mut Vec<u8>) {
        out.push(0x2c);
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.width).unwrap();
        out.write_u16::<LittleEndian>(self.height).unwrap();
        let mut packed = if self.interlaced { 0x40 } else { 0 };
        if self.table == TablePlacement::Local {
            packed |= 0x80 | self.table_exponent();
        }
        out.push(packed);
        if self.table == TablePlacement::Local {
            self.write_table(out);
        }
        let min_code_size = self.min_code_size();
        let pixels = vec![self.fill_index; self.width as usize * self.height as usize];
        out.push(min_code_size);
        write_sub_blocks(out, &lzw_literal_codes(&pixels, min_code_size));
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let signature = if self.version_87a {
            b"GIF87a"
        } else {
            b"GIF89a"
        };
        out.extend_from_slice(signature);
        out.write_u16::<LittleEndian>(self.width).unwrap();
        out.write_u16::<LittleEndian>(self.height).unwrap();
        let exponent = self.table_exponent();
        // Color resolution mirrors the table size.
        let mut packed = exponent << 4;
        if self.table == TablePlacement::Global {
            packed |= 0x80 | exponent;
        }
        out.extend_from_slice(&[packed, 0, 0]);
        if self.table == TablePlacement::Global {
            self.write_table(&mut out);
        }
        if let Some(loop_count) = self.netscape_loop {
            out.extend_from_slice(&[0x21, 0xff, 0x0b]);
            out.extend_from_slice(b"NETSCAPE2.0");
            out.extend_from_slice(&[0x03, 0x01]);
            out.write_u16::<LittleEndian>(loop_count).unwrap();
            out.push(0x00);
        }
        for comment in &self.comments_before {
            out.extend_from_slice(&[0x21, 0xfe]);
            write_sub_blocks(&mut out, comment);
        }
        for _ in 0..self.images {
            if let Some((delay, transparent_index)) = self.graphic_control {
                out.extend_from_slice(&[0x21, 0xf9, 0x04]);
                out.push(u8::from(transparent_index.is_some()));
                out.write_u16::<LittleEndian>(delay).unwrap();
                out.extend_from_slice(&[transparent_index.unwrap_or(0), 0x00]);
            }
            self.write_image(&mut out);
        }
        for comment in &self.comments_after {
            out.extend_from_slice(&[0x21, 0xfe]);
            write_sub_blocks(&mut out, comment);
        }
        out.push(0x3b);
        out
    }
}

/// Splits `data` into sub-blocks of at most 255 bytes followed by the zero-length terminator.
pub fn write_sub_blocks(out: &mut Vec<u8>, data: &[u8]) {
    for chunk in data.chunks(MAX_SUB_BLOCK) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
}

/// LZW-encodes `indices` using only literal codes.
///
/// A clear code is emitted often enough that the code table never outgrows `min_code_size + 1`
/// bits, so every code has the same width and no string matching is needed.
pub fn lzw_literal_codes(indices: &[u8], min_code_size: u8) -> Vec<u8> {
    assert!((2..=8).contains(&min_code_size));
    let clear = 1u32 << min_code_size;
    let end = clear + 1;
    let width = min_code_size as u32 + 1;
    // After a clear, the first literal adds no entry and each further one adds one. The table
    // must stay below 1 << width entries.
    let run = (1usize << min_code_size) - 2;

    let mut writer = LsbWriter::default();
    for chunk in indices.chunks(run) {
        writer.write(clear, width);
        for &index in chunk {
            writer.write(index as u32, width);
        }
    }
    writer.write(end, width);
    writer.finish()
}

#[derive(Default)]
struct LsbWriter {
    out: Vec<u8>,
    acc: u32,
    bits: u32,
}

impl LsbWriter {
    fn write(&mut self, code: u32, width: u32) {
        self.acc |= code << self.bits;
        self.bits += width;
        while self.bits >= 8 {
            self.out.push(self.acc as u8);
            self.acc >>= 8;
            self.bits -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.out.push(self.acc as u8);
        }
        self.out
    }
}

/// Byte length of a GIF89a animation assembled from `frames` single-frame sources, each with the
/// given image-data size in bytes and local table size in bytes (0 for none).
pub fn expected_animation_len(
    global_table: usize,
    loop_extension: bool,
    frames: &[(usize, usize)],
) -> usize {
    let header = 6 + 7 + global_table + if loop_extension { 19 } else { 0 };
    let body: usize = frames
        .iter()
        .map(|(data, local_table)| 8 + 10 + local_table + data)
        .sum();
    header + body + 1
}
