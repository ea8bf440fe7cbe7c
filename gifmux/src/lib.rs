// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Merges independently rendered single-frame GIF images into one animated GIF89a stream.
//!
//! Image data is never decoded: each frame's compressed sub-blocks are copied through as they
//! are, while the assembler writes the graphic control extension, the `NETSCAPE2.0` loop
//! extension and whatever local color tables are needed to keep every frame's palette intact.

#![deny(unsafe_code)]
pub mod api;
pub mod container;
pub mod error;
pub mod headers;
mod util;

pub use api::{AnimationSpec, GifAnimation, assemble};
pub use error::{Error, ParseError, Result};
