// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fixed-layout GIF structures: descriptors, color tables and the extensions the assembler
//! synthesizes.

pub mod color_table;
pub mod descriptors;
pub mod extensions;

pub use color_table::{ColorTable, Rgb};
pub use descriptors::{ImageDescriptor, ScreenDescriptor};
pub use extensions::{ApplicationExtension, DisposalMethod, GraphicControl};

/// Block introducer for extensions.
pub const EXTENSION_INTRODUCER: u8 = 0x21;
/// Block introducer for image descriptors.
pub const IMAGE_SEPARATOR: u8 = 0x2c;
/// Terminating byte of every GIF bitstream.
pub const TRAILER: u8 = 0x3b;

/// Bit 7 of a descriptor packed field: a color table follows.
pub(crate) const COLOR_TABLE_FLAG: u8 = 0x80;
/// Bits 0-2 of a descriptor packed field: color table size exponent.
pub(crate) const COLOR_TABLE_SIZE_MASK: u8 = 0x07;
