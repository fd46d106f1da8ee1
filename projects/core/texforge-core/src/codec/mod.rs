//! # Block codecs
//!
//! The transcoder talks to block-compressed formats through the
//! [`BlockCodec`] trait: decode a whole level into f32 RGBA, or encode an
//! f32 RGBA level into compressed blocks. A [`CodecSet`] maps pixel
//! formats to codec implementations; [`CodecSet::builtin`] carries the
//! codecs shipped with this crate, and callers can register their own
//! (hardware encoders, external libraries) for additional formats.

mod bc1;

pub use bc1::Bc1Codec;

use crate::error::TranscodeResult;
use crate::pixel_format::PixelFormat;
use crate::transcode::Quality;

/// En/decoder for one block-compressed pixel format.
///
/// Levels are exchanged as interleaved f32 RGBA in `[0, 1]`, one value
/// per channel per texel, row-major within each depth slice.
pub trait BlockCodec: Send + Sync {
    /// The compressed format this codec handles.
    fn format(&self) -> PixelFormat;

    /// Decodes one level (`w * h * d` texels) into f32 RGBA.
    fn decode_level(&self, data: &[u8], w: u32, h: u32, d: u32) -> TranscodeResult<Vec<f32>>;

    /// Encodes one level of f32 RGBA (`w * h * d * 4` values) into
    /// compressed blocks.
    fn encode_level(
        &self,
        rgba: &[f32],
        w: u32,
        h: u32,
        d: u32,
        quality: Quality,
    ) -> TranscodeResult<Vec<u8>>;
}

/// A registry of block codecs, keyed by pixel format.
pub struct CodecSet {
    codecs: Vec<Box<dyn BlockCodec>>,
}

impl CodecSet {
    /// An empty set; transcoding to or from any compressed format fails
    /// with [`crate::error::TranscodeError::NoCodec`].
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// The codecs shipped with this crate (currently BC1).
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.register(Box::new(Bc1Codec));
        set
    }

    /// Adds a codec, replacing any previous codec for the same format.
    pub fn register(&mut self, codec: Box<dyn BlockCodec>) {
        let format = codec.format();
        self.codecs.retain(|c| c.format() != format);
        self.codecs.push(codec);
    }

    /// Looks up the codec for a format.
    pub fn get(&self, format: PixelFormat) -> Option<&dyn BlockCodec> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|c| c.as_ref())
    }
}

impl Default for CodecSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_knows_bc1() {
        let set = CodecSet::builtin();
        assert!(set.get(PixelFormat::BC1).is_some());
        assert!(set.get(PixelFormat::BC3).is_none());
    }

    #[test]
    fn register_replaces_by_format() {
        let mut set = CodecSet::empty();
        set.register(Box::new(Bc1Codec));
        set.register(Box::new(Bc1Codec));
        assert_eq!(set.codecs.len(), 1);
    }
}
