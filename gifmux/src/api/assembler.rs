// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    container::{ParsedFrame, parse_frame, signature::GIF89A_SIGNATURE},
    error::{Error, Result},
    headers::{
        ApplicationExtension, ColorTable, GraphicControl, ImageDescriptor, Rgb, ScreenDescriptor,
        TRAILER,
    },
    util::tracing_wrappers::{debug, warn},
};

use super::options::{AnimationOptions, AnimationSpec, LoopExtension};

const TRAILER_SIZE: usize = 1;

/// A complete GIF89a animation.
///
/// ```
/// use gifmux::{AnimationSpec, GifAnimation, assemble};
///
/// fn respond(frames: Vec<Vec<u8>>) -> gifmux::Result<(&'static str, Vec<u8>)> {
///     let mut spec = AnimationSpec::new();
///     for frame in frames {
///         spec.push_frame(frame, 50);
///     }
///     let animation = assemble(&spec)?;
///     Ok((GifAnimation::CONTENT_TYPE, animation.into_bytes()))
/// }
///
/// assert!(matches!(respond(Vec::new()), Err(gifmux::Error::EmptyAnimation)));
/// assert_eq!(GifAnimation::CONTENT_TYPE, "image/gif");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifAnimation {
    data: Vec<u8>,
}

impl GifAnimation {
    pub const CONTENT_TYPE: &'static str = "image/gif";

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for GifAnimation {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Global color table of the first frame, kept for comparison with later frames.
#[derive(Debug)]
struct GlobalTable {
    exponent: u8,
    bytes: Vec<u8>,
}

impl GlobalTable {
    fn matches(&self, table: &ColorTable) -> Result<bool> {
        if self.exponent != table.exponent() {
            return Ok(false);
        }
        ColorTable::equal_entries(&self.bytes, table.as_bytes(), table.entries())
    }
}

/// Builds an animation one frame at a time.
///
/// The first frame fixes the logical screen and global color table. Every frame is fully
/// validated before anything is written for it, so a failed [`Assembler::push_frame`] leaves the
/// output as it was.
#[derive(Debug)]
pub struct Assembler {
    options: AnimationOptions,
    out: Vec<u8>,
    screen: ScreenDescriptor,
    global_table: Option<GlobalTable>,
    frames: usize,
}

/// Index of the first entry of `table` equal to `color`.
pub fn resolve_transparency(table: Option<ColorTable>, color: Option<Rgb>) -> Option<u8> {
    table?.find(color?)
}

impl Assembler {
    /// Writes the header derived from `first` and then `first` itself as frame 0.
    pub fn new(options: AnimationOptions, first: &[u8], delay: u16) -> Result<Self> {
        let frame = parse_frame(first).map_err(Error::in_frame(0))?;
        let mut out = Vec::new();
        out.try_reserve(
            first.len() + ApplicationExtension::SIZE + GraphicControl::SIZE + TRAILER_SIZE,
        )?;

        out.extend_from_slice(&GIF89A_SIGNATURE);
        out.extend_from_slice(&frame.screen.to_bytes());
        if let Some(table) = frame.color_table {
            out.extend_from_slice(table.as_bytes());
        }

        let write_loop = match options.loop_extension {
            LoopExtension::WhenGlobalColorTable => frame.has_color_table(),
            LoopExtension::Always => true,
            LoopExtension::Never => false,
        };
        if write_loop {
            debug!("writing loop extension, loop count {}", options.loop_count);
            let extension = ApplicationExtension::netscape_loop(options.loop_count);
            out.extend_from_slice(&extension.to_bytes());
        }

        let mut assembler = Self {
            options,
            out,
            screen: frame.screen,
            global_table: frame.color_table.map(|table| GlobalTable {
                exponent: table.exponent(),
                bytes: table.as_bytes().to_vec(),
            }),
            frames: 0,
        };
        assembler.write_frame(&frame, delay)?;
        Ok(assembler)
    }

    /// Number of frames written so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Reserves output capacity for `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.out.try_reserve(additional)?;
        Ok(())
    }

    pub fn push_frame(&mut self, data: &[u8], delay: u16) -> Result<()> {
        let frame = parse_frame(data).map_err(Error::in_frame(self.frames))?;
        self.write_frame(&frame, delay)
    }

    /// Appends the trailer.
    pub fn finish(mut self) -> GifAnimation {
        self.out.push(TRAILER);
        GifAnimation { data: self.out }
    }

    /// Descriptor and local table to write for the image of `frame`.
    fn image_table<'a>(
        &self,
        frame: &ParsedFrame<'a>,
    ) -> Result<(ImageDescriptor, Option<&'a [u8]>)> {
        let image = frame.image;
        if let Some(local) = image.local_table {
            // The source image brings its own table; the source's global table does not apply.
            return Ok((image.descriptor, Some(local.as_bytes())));
        }
        let Some(table) = frame.color_table else {
            return Ok((image.descriptor, None));
        };
        if self.frames == 0 {
            return Ok((image.descriptor, None));
        }
        let same = match &self.global_table {
            Some(global) => global.matches(&table)?,
            None => false,
        };
        if same {
            debug!(
                "frame {}: color table matches the global table",
                self.frames
            );
            Ok((image.descriptor.without_local_table(), None))
        } else {
            debug!(
                "frame {}: writing local color table with {} entries",
                self.frames,
                table.entries()
            );
            Ok((
                image.descriptor.with_local_table(table.exponent()),
                Some(table.as_bytes()),
            ))
        }
    }

    fn write_frame(&mut self, frame: &ParsedFrame, delay: u16) -> Result<()> {
        let index = self.frames;
        if (frame.screen.width, frame.screen.height) != (self.screen.width, self.screen.height) {
            warn!(
                "frame {}: logical screen {}x{} differs from canvas {}x{}",
                index,
                frame.screen.width,
                frame.screen.height,
                self.screen.width,
                self.screen.height
            );
        }

        let transparent_index =
            resolve_transparency(frame.active_color_table(), self.options.transparent_color);
        if self.options.transparent_color.is_some() {
            debug!("frame {}: transparent index {:?}", index, transparent_index);
        }
        let control = GraphicControl {
            disposal: self.options.disposal,
            delay,
            transparent_index,
        };
        let (descriptor, local_table) = self.image_table(frame)?;

        let blocks_len: usize = frame.blocks().map(|block| block.encoded_len()).sum();
        let len = GraphicControl::SIZE + blocks_len + local_table.map_or(0, <[u8]>::len);
        self.out.try_reserve(len)?;

        for block in &frame.leading {
            block.write_to(&mut self.out);
        }
        self.out.extend_from_slice(&control.to_bytes());
        self.out.extend_from_slice(&descriptor.to_bytes());
        if let Some(table) = local_table {
            self.out.extend_from_slice(table);
        }
        self.out.extend_from_slice(frame.image.data);
        for block in &frame.trailing {
            block.write_to(&mut self.out);
        }

        self.frames += 1;
        Ok(())
    }
}

/// Merges the frames of `spec` into one animated GIF.
///
/// Fails on the first frame that is not a single-frame GIF; no output is produced in that case.
pub fn assemble(spec: &AnimationSpec) -> Result<GifAnimation> {
    let (first, rest) = spec.frames.split_first().ok_or(Error::EmptyAnimation)?;
    let mut assembler = Assembler::new(spec.options(), &first.data, first.delay)?;
    assembler.reserve(
        rest.iter()
            .map(|frame| frame.data.len() + GraphicControl::SIZE)
            .sum(),
    )?;
    for frame in rest {
        assembler.push_frame(&frame.data, frame.delay)?;
    }
    Ok(assembler.finish())
}

#[cfg(test)]
mod test {
    use gifmux_test_utils::SyntheticGif;
    use test_log::test;

    use super::*;
    use crate::{
        container::inspect,
        error::ParseError,
        headers::{DisposalMethod, extensions::NETSCAPE_IDENTIFIER},
    };

    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    fn spec(frames: &[(Vec<u8>, u16)]) -> AnimationSpec {
        frames
            .iter()
            .fold(AnimationSpec::new(), |spec, (data, delay)| {
                spec.with_frame(data.clone(), *delay)
            })
    }

    #[test]
    fn empty_animation() {
        assert!(matches!(
            assemble(&AnimationSpec::new()),
            Err(Error::EmptyAnimation)
        ));
    }

    #[test]
    fn single_frame_layout() {
        let source = SyntheticGif::solid(2, 2, RED).encode();
        let gif = assemble(&spec(&[(source.clone(), 10)])).unwrap();
        let bytes = gif.as_bytes();

        assert_eq!(&bytes[..6], b"GIF89a");
        // Screen descriptor and global table copied from the source.
        assert_eq!(&bytes[6..25], &source[6..25]);
        assert_eq!(&bytes[25..28], &[0x21, 0xff, 0x0b]);
        assert_eq!(&bytes[28..39], NETSCAPE_IDENTIFIER);
        assert_eq!(&bytes[44..52], &[0x21, 0xf9, 0x04, 0x08, 10, 0, 0, 0]);
        // Descriptor and image data copied verbatim.
        assert_eq!(&bytes[52..bytes.len() - 1], &source[25..source.len() - 1]);
        assert_eq!(bytes.last(), Some(&0x3b));
        assert_eq!(gif.len(), source.len() + 19 + 8);
    }

    #[test]
    fn identical_tables_share_global() {
        let palette = vec![RED, GREEN, BLUE, [0, 0, 0]];
        let frames: Vec<_> = (0..4)
            .map(|i| {
                let gif = SyntheticGif::with_palette(2, 2, palette.clone(), i).encode();
                (gif, 5)
            })
            .collect();
        let gif = assemble(&spec(&frames)).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.graphic_controls, 4);
        assert_eq!(summary.frames.len(), 4);
        assert!(
            summary
                .frames
                .iter()
                .all(|frame| frame.local_table_entries.is_none())
        );
    }

    #[test]
    fn differing_table_becomes_local() {
        let first = SyntheticGif::solid(2, 2, RED).encode();
        let second = SyntheticGif::solid(2, 2, GREEN).encode();
        let gif = assemble(&spec(&[(first, 5), (second.clone(), 5)])).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.frames[0].local_table_entries, None);
        let frame = &summary.frames[1];
        assert!(frame.descriptor.has_local_table());
        assert_eq!(frame.descriptor.local_table_exponent(), 1);
        assert_eq!(frame.local_table.as_deref(), Some(&second[13..25]));
    }

    #[test]
    fn differing_table_size_becomes_local() {
        let first = SyntheticGif::solid(2, 2, RED).encode();
        let palette: Vec<[u8; 3]> = (0..16).map(|i| [i, i, i]).collect();
        let second = SyntheticGif::with_palette(2, 2, palette, 3).encode();
        let gif = assemble(&spec(&[(first, 5), (second, 5)])).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.global_table_entries, Some(4));
        assert_eq!(summary.frames[1].local_table_entries, Some(16));
    }

    #[test]
    fn frame_without_table_uses_global() {
        let first = SyntheticGif::solid(2, 2, RED).encode();
        let second = SyntheticGif::solid(2, 2, RED)
            .without_color_table()
            .encode();
        let gif = assemble(&spec(&[(first, 5), (second, 5)])).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.frames[1].local_table_entries, None);
    }

    #[test]
    fn source_local_table_passes_through() {
        let first = SyntheticGif::solid(2, 2, RED).encode();
        let second = SyntheticGif::solid(2, 2, [0, 0, 0])
            .local_table_only()
            .interlaced()
            .encode();
        let animation = spec(&[(first, 5), (second, 5)])
            .with_transparent_color(Rgb::new(0, 0, 0));
        let gif = assemble(&animation).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        let frame = &summary.frames[1];
        assert_eq!(frame.local_table_entries, Some(4));
        assert_eq!(frame.descriptor.packed, 0xc1);
        // Black sits at index 0 of the source's local table.
        assert_eq!(frame.transparent_index, Some(0));
    }

    #[test]
    fn first_frame_without_global_table() {
        let first = SyntheticGif::solid(2, 2, RED)
            .without_color_table()
            .encode();
        let second = SyntheticGif::solid(2, 2, GREEN).encode();
        let gif = assemble(&spec(&[(first, 5), (second, 5)])).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.global_table_entries, None);
        assert_eq!(summary.loop_count, None);
        assert_eq!(summary.frames[1].local_table_entries, Some(4));
    }

    #[test]
    fn loop_extension_policy() {
        let first = SyntheticGif::solid(2, 2, RED)
            .without_color_table()
            .encode();
        let always = spec(&[(first.clone(), 5)])
            .with_loop_count(2)
            .with_loop_extension(LoopExtension::Always);
        let summary = inspect(assemble(&always).unwrap().as_bytes()).unwrap();
        assert_eq!(summary.loop_count, Some(2));

        let with_table = SyntheticGif::solid(2, 2, RED).encode();
        let never = spec(&[(with_table, 5)]).with_loop_extension(LoopExtension::Never);
        let summary = inspect(assemble(&never).unwrap().as_bytes()).unwrap();
        assert_eq!(summary.loop_count, None);
    }

    #[test]
    fn transparency_found_and_missing() {
        let palette = vec![RED, GREEN, BLUE, [0, 0, 0]];
        let with_black = SyntheticGif::with_palette(2, 2, palette, 0).encode();
        let without_black =
            SyntheticGif::with_palette(2, 2, vec![RED, GREEN, BLUE, [9, 9, 9]], 0).encode();
        let gif = assemble(
            &spec(&[(with_black, 5), (without_black, 5)])
                .with_transparent_color(Rgb::new(0, 0, 0))
                .with_disposal(DisposalMethod::NoAction),
        )
        .unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.frames[0].transparent_index, Some(3));
        assert_eq!(summary.frames[1].transparent_index, None);

        // Raw graphic control bytes of both frames.
        let gce = |frame: usize| {
            let offset = summary.frames[frame].offset - GraphicControl::SIZE;
            gif.as_bytes()[offset..offset + GraphicControl::SIZE].to_vec()
        };
        assert_eq!(gce(0), [0x21, 0xf9, 0x04, 0x01, 5, 0, 3, 0]);
        assert_eq!(gce(1), [0x21, 0xf9, 0x04, 0x00, 5, 0, 0, 0]);
    }

    #[test]
    fn error_names_frame() {
        let good = SyntheticGif::solid(2, 2, RED).encode();
        let animated = SyntheticGif::solid(2, 2, RED).netscape_loop(0).encode();
        let err = assemble(&spec(&[(good.clone(), 5), (good, 5), (animated, 5)])).unwrap_err();
        assert!(matches!(
            err,
            Error::Frame {
                index: 2,
                source: ParseError::UnsupportedAnimatedSource
            }
        ));
        assert_eq!(err.to_string(), "Frame 2: Source is already an animation");
    }

    #[test]
    fn first_frame_error() {
        let err = assemble(&spec(&[(b"not a gif".to_vec(), 5)])).unwrap_err();
        assert!(matches!(
            err,
            Error::Frame {
                index: 0,
                source: ParseError::InvalidSignature(_)
            }
        ));
    }

    #[test]
    fn failed_push_keeps_output() {
        let good = SyntheticGif::solid(2, 2, RED).encode();
        let mut assembler = Assembler::new(AnimationOptions::default(), &good, 5).unwrap();
        assert!(assembler.push_frame(b"GIF89a", 5).is_err());
        assembler.push_frame(&good, 7).unwrap();
        assert_eq!(assembler.frame_count(), 2);
        let summary = inspect(assembler.finish().as_bytes()).unwrap();
        assert_eq!(summary.delays(), [5, 7]);
    }

    #[test]
    fn keeps_comments() {
        let source = SyntheticGif::solid(2, 2, RED)
            .comment(b"radar")
            .graphic_control(3, None)
            .encode();
        let gif = assemble(&spec(&[(source, 5)])).unwrap();
        let summary = inspect(gif.as_bytes()).unwrap();
        assert_eq!(summary.graphic_controls, 1);
        assert_eq!(summary.delays(), [5]);
        assert!(gif.as_bytes().windows(5).any(|w| w == b"radar"));
    }

    #[test]
    fn resolve_without_table_or_color() {
        let bytes = [0u8; 6];
        let table = ColorTable::read(&bytes, 0).unwrap();
        assert_eq!(resolve_transparency(None, Some(Rgb::new(0, 0, 0))), None);
        assert_eq!(resolve_transparency(Some(table), None), None);
        assert_eq!(
            resolve_transparency(Some(table), Some(Rgb::new(0, 0, 0))),
            Some(0)
        );
    }

    #[test]
    fn assembly_is_deterministic() {
        arbtest::arbtest(|u| {
            let count = u.int_in_range(1..=4)?;
            let mut spec = AnimationSpec::new()
                .with_loop_count(u.arbitrary()?)
                .with_disposal(DisposalMethod::from(u.int_in_range(0..=3)?));
            if u.arbitrary()? {
                spec = spec.with_transparent_color(Rgb::new(u.arbitrary()?, 0, 0));
            }
            for _ in 0..count {
                let color = [u.arbitrary()?, u.arbitrary()?, u.arbitrary()?];
                spec.push_frame(SyntheticGif::solid(2, 2, color).encode(), u.arbitrary()?);
            }
            let first = assemble(&spec).unwrap();
            let second = assemble(&spec).unwrap();
            assert_eq!(first, second);
            assert_eq!(inspect(first.as_bytes()).unwrap().frames.len(), count);
            Ok(())
        });
    }
}
