// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::headers::{DisposalMethod, Rgb};

/// When the `NETSCAPE2.0` looping extension is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopExtension {
    /// Only when the first frame carries a global color table. This is what long-standing GIF
    /// merge tools do, so it is the default.
    #[default]
    WhenGlobalColorTable,
    Always,
    Never,
}

/// A single-frame GIF and how long it stays on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSource {
    pub data: Vec<u8>,
    /// Delay in centiseconds.
    pub delay: u16,
}

/// Settings shared by every frame of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationOptions {
    /// Number of repetitions written to the looping extension; 0 loops forever.
    pub loop_count: u16,
    pub disposal: DisposalMethod,
    /// Color to mark transparent in every frame whose palette contains it.
    pub transparent_color: Option<Rgb>,
    pub loop_extension: LoopExtension,
}

/// Everything needed to assemble one animation.
///
/// ```
/// use gifmux::api::{AnimationSpec, DisposalMethod, Rgb};
///
/// let spec = AnimationSpec::new()
///     .with_loop_count(0)
///     .with_disposal(DisposalMethod::RestoreBackground)
///     .with_transparent_color(Rgb::new(0, 0, 0));
/// assert!(spec.frames.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimationSpec {
    pub frames: Vec<FrameSource>,
    pub loop_count: u16,
    pub disposal: DisposalMethod,
    pub transparent_color: Option<Rgb>,
    pub loop_extension: LoopExtension,
}

impl AnimationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, data: impl Into<Vec<u8>>, delay: u16) {
        self.frames.push(FrameSource {
            data: data.into(),
            delay,
        });
    }

    pub fn with_frame(mut self, data: impl Into<Vec<u8>>, delay: u16) -> Self {
        self.push_frame(data, delay);
        self
    }

    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }

    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = disposal;
        self
    }

    pub fn with_transparent_color(mut self, color: impl Into<Rgb>) -> Self {
        self.transparent_color = Some(color.into());
        self
    }

    pub fn with_loop_extension(mut self, loop_extension: LoopExtension) -> Self {
        self.loop_extension = loop_extension;
        self
    }

    /// The settings of this spec, without its frames.
    pub fn options(&self) -> AnimationOptions {
        AnimationOptions {
            loop_count: self.loop_count,
            disposal: self.disposal,
            transparent_color: self.transparent_color,
            loop_extension: self.loop_extension,
        }
    }
}
