// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

mod assembler;
mod options;

pub use assembler::{Assembler, GifAnimation, assemble, resolve_transparency};
pub use options::{AnimationOptions, AnimationSpec, FrameSource, LoopExtension};

pub use crate::headers::{DisposalMethod, Rgb};
