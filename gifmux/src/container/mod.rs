// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! GIF block structure: signature detection, the block walker, single-frame parsing and
//! animation inspection.

pub mod blocks;
pub mod frame;
pub mod inspect;
pub mod signature;

pub use blocks::{Block, Blocks, GifHeader};
pub use frame::{FrameImage, ParsedFrame, parse_frame};
pub use inspect::{AnimationSummary, FrameSummary, inspect};
pub use signature::{GifVersion, check_signature};
