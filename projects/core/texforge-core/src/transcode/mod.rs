//! # Pixel-format transcoder
//!
//! [`transcode`] rebuilds a texture in a different pixel format, channel
//! type or colour space. Every surface goes through a common f32 RGBA
//! pipeline: decode (directly for uncompressed sources, through a
//! [`BlockCodec`] for compressed ones), convert colour space if the
//! target differs, then encode into the target format. The mip chain,
//! faces, dimensions and orientation all carry over unchanged.
//!
//! Quality only affects compressed targets (it buys the encoder more
//! refinement work); dithering only affects normalized integer targets.
//! Both are accepted and ignored elsewhere, so callers can set policy
//! once and reuse it across formats.

use log::debug;

use crate::codec::{BlockCodec, CodecSet};
use crate::convert::{self, ConvertError, SurfaceF32};
use crate::error::{TranscodeError, TranscodeResult};
use crate::pixel_format::{ChannelType, ColourSpace, PixelFormat};
use crate::texture::Texture;

/// Effort level for compressed-format encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Quality {
    /// No refinement; a single fitting pass.
    Fastest,
    /// Minimal refinement.
    Fast,
    /// Balanced effort, the default.
    #[default]
    Normal,
    /// More refinement passes.
    High,
    /// Maximum refinement effort.
    Best,
}

/// Target description for a transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Target pixel format.
    pub format: PixelFormat,
    /// Target channel type; `None` keeps the source's when compatible
    /// with the target format, otherwise picks the format's natural type
    /// (8-bit unsigned normalized, 16-bit normalized, or float for 32-bit
    /// channels).
    pub channel_type: Option<ChannelType>,
    /// Target colour space; `None` keeps the source's. A differing target
    /// converts the colour values, unlike
    /// [`Texture::set_colour_space`] which only relabels.
    pub colour_space: Option<ColourSpace>,
    /// Encoder effort for compressed targets.
    pub quality: Quality,
    /// Dither quantization to normalized integer channels.
    pub dither: bool,
}

impl TranscodeOptions {
    /// Options targeting `format` with everything else defaulted.
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            channel_type: None,
            colour_space: None,
            quality: Quality::default(),
            dither: false,
        }
    }

    /// Requests a specific target channel type.
    pub fn with_channel_type(mut self, channel_type: ChannelType) -> Self {
        self.channel_type = Some(channel_type);
        self
    }

    /// Requests a colour space conversion.
    pub fn with_colour_space(mut self, colour_space: ColourSpace) -> Self {
        self.colour_space = Some(colour_space);
        self
    }

    /// Sets the encoder effort for compressed targets.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Enables dithered quantization for normalized integer targets.
    pub fn with_dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }
}

/// Transcodes with the built-in codec set.
pub fn transcode(tex: &Texture, options: &TranscodeOptions) -> TranscodeResult<Texture> {
    transcode_with(tex, options, &CodecSet::builtin())
}

/// Transcodes a texture into the format described by `options`, using
/// `codecs` for any compressed source or target format.
pub fn transcode_with(
    tex: &Texture,
    options: &TranscodeOptions,
    codecs: &CodecSet,
) -> TranscodeResult<Texture> {
    let src_space = tex.colour_space();
    let dst_space = options.colour_space.unwrap_or(src_space);
    let dst_type = target_channel_type(tex.channel_type(), options)?;

    let src_codec = tex
        .pixel_format()
        .is_compressed()
        .then(|| {
            codecs
                .get(tex.pixel_format())
                .ok_or(TranscodeError::NoCodec(tex.pixel_format()))
        })
        .transpose()?;
    let dst_codec = options
        .format
        .is_compressed()
        .then(|| {
            codecs
                .get(options.format)
                .ok_or(TranscodeError::NoCodec(options.format))
        })
        .transpose()?;

    debug!(
        "transcode {} -> {} ({:?} -> {:?}, {:?})",
        tex.pixel_format(),
        options.format,
        src_space,
        dst_space,
        options.quality
    );

    let mut header = *tex.header();
    header.pixel_format = options.format;
    header.channel_type = dst_type;
    header.colour_space = dst_space;

    let mut data = Vec::with_capacity(header.data_size());
    for level in 0..tex.num_mip_levels() {
        let (w, h, d) = tex.header().mip_dimensions(level);
        for face in 0..tex.num_faces() {
            let mut surface = decode_surface(tex, src_codec, level, face, w, h, d)?;
            match (src_space, dst_space) {
                (ColourSpace::Srgb, ColourSpace::Linear) => {
                    apply_to_colour(&mut surface, convert::srgb_to_linear)
                }
                (ColourSpace::Linear, ColourSpace::Srgb) => {
                    apply_to_colour(&mut surface, convert::linear_to_srgb)
                }
                _ => {}
            }
            encode_surface(&mut data, &surface, &header, dst_codec, options, w, h, d)?;
        }
    }
    Ok(Texture::new(header, data)?)
}

fn target_channel_type(
    src: ChannelType,
    options: &TranscodeOptions,
) -> TranscodeResult<ChannelType> {
    let fallback = if options.format.matches_channel_type(src) {
        src
    } else {
        natural_channel_type(options.format)
    };
    let chosen = options.channel_type.unwrap_or(fallback);
    if !options.format.matches_channel_type(chosen) {
        return Err(TranscodeError::IncompatibleChannelType {
            channel_type: chosen,
            format: options.format,
        });
    }
    Ok(chosen)
}

fn natural_channel_type(format: PixelFormat) -> ChannelType {
    if format.is_compressed() {
        return ChannelType::UnsignedByteNorm;
    }
    let width = format
        .channel_widths()
        .into_iter()
        .find(|&w| w != 0)
        .unwrap_or(8);
    match width {
        16 => ChannelType::UnsignedShortNorm,
        32 => ChannelType::Float,
        _ => ChannelType::UnsignedByteNorm,
    }
}

fn decode_surface(
    tex: &Texture,
    codec: Option<&dyn BlockCodec>,
    level: u32,
    face: u32,
    w: u32,
    h: u32,
    d: u32,
) -> TranscodeResult<SurfaceF32> {
    let bytes = tex.view(level, face)?;
    if let Some(codec) = codec {
        let px = codec.decode_level(bytes, w, h, d)?;
        return Ok(SurfaceF32 {
            w: w as usize,
            h: h as usize,
            d: d as usize,
            px,
        });
    }
    convert::unpack_surface(
        bytes,
        tex.pixel_format(),
        tex.channel_type(),
        w as usize,
        h as usize,
        d as usize,
    )
    .map_err(|err| match err {
        ConvertError::ChannelTypeMismatch => TranscodeError::SourceChannelTypeMismatch {
            channel_type: tex.channel_type(),
            format: tex.pixel_format(),
        },
        ConvertError::Compressed | ConvertError::UnsupportedLayout => {
            TranscodeError::NoCodec(tex.pixel_format())
        }
    })
}

#[allow(clippy::too_many_arguments)]
fn encode_surface(
    data: &mut Vec<u8>,
    surface: &SurfaceF32,
    header: &crate::texture::TextureHeader,
    codec: Option<&dyn BlockCodec>,
    options: &TranscodeOptions,
    w: u32,
    h: u32,
    d: u32,
) -> TranscodeResult<()> {
    if let Some(codec) = codec {
        data.extend_from_slice(&codec.encode_level(&surface.px, w, h, d, options.quality)?);
        return Ok(());
    }
    let bytes = convert::pack_surface(
        surface,
        header.pixel_format,
        header.channel_type,
        options.dither,
    )
    .map_err(|err| match err {
        ConvertError::ChannelTypeMismatch => TranscodeError::IncompatibleChannelType {
            channel_type: header.channel_type,
            format: header.pixel_format,
        },
        ConvertError::Compressed | ConvertError::UnsupportedLayout => {
            TranscodeError::NoCodec(header.pixel_format)
        }
    })?;
    data.extend_from_slice(&bytes);
    Ok(())
}

fn apply_to_colour(surface: &mut SurfaceF32, f: impl Fn(f32) -> f32) {
    for texel in surface.px.chunks_exact_mut(4) {
        texel[0] = f(texel[0]);
        texel[1] = f(texel[1]);
        texel[2] = f(texel[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn widening_channels_preserves_values() {
        let tex = rgba8_texture(2, 1, vec![0, 128, 255, 255, 51, 102, 153, 204]);
        let out = transcode(
            &tex,
            &TranscodeOptions::new(PixelFormat::RGBA32323232),
        )
        .unwrap();
        assert_eq!(out.pixel_format(), PixelFormat::RGBA32323232);
        assert_eq!(out.channel_type(), ChannelType::Float);
        let first = f32::from_le_bytes(out.data()[..4].try_into().unwrap());
        assert_eq!(first, 0.0);
        let third = f32::from_le_bytes(out.data()[8..12].try_into().unwrap());
        assert_eq!(third, 1.0);
    }

    #[test]
    fn swizzle_to_bgra_reorders_bytes() {
        let tex = rgba8_texture(1, 1, vec![10, 20, 30, 40]);
        let out = transcode(&tex, &TranscodeOptions::new(PixelFormat::BGRA8888)).unwrap();
        assert_eq!(out.data(), &[30, 20, 10, 40]);
    }

    #[test]
    fn drop_alpha_to_rgb() {
        let tex = rgba8_texture(1, 1, vec![10, 20, 30, 40]);
        let out = transcode(&tex, &TranscodeOptions::new(PixelFormat::RGB888)).unwrap();
        assert_eq!(out.data(), &[10, 20, 30]);
    }

    #[test]
    fn bc1_round_trip_of_exact_colours() {
        let tex = solid_rgba8(8, 8, [255, 0, 0, 255]);
        let compressed = transcode(&tex, &TranscodeOptions::new(PixelFormat::BC1)).unwrap();
        assert_eq!(compressed.pixel_format(), PixelFormat::BC1);
        assert_eq!(compressed.data().len(), 2 * 2 * 8);
        let back = transcode(
            &compressed,
            &TranscodeOptions::new(PixelFormat::RGBA8888),
        )
        .unwrap();
        assert_eq!(back, tex);
    }

    #[test]
    fn compressed_target_without_codec_fails() {
        let tex = solid_rgba8(4, 4, [0, 0, 0, 255]);
        let err = transcode_with(
            &tex,
            &TranscodeOptions::new(PixelFormat::BC1),
            &CodecSet::empty(),
        )
        .unwrap_err();
        assert_eq!(err, TranscodeError::NoCodec(PixelFormat::BC1));
    }

    #[test]
    fn bc2_and_bc3_have_no_builtin_codec() {
        let tex = solid_rgba8(4, 4, [0, 0, 0, 255]);
        for format in [PixelFormat::BC2, PixelFormat::BC3] {
            assert_eq!(
                transcode(&tex, &TranscodeOptions::new(format)),
                Err(TranscodeError::NoCodec(format))
            );
        }
    }

    #[test]
    fn float_channel_type_in_byte_format_is_rejected() {
        let tex = solid_rgba8(2, 2, [0, 0, 0, 0]);
        let options =
            TranscodeOptions::new(PixelFormat::RGBA8888).with_channel_type(ChannelType::Float);
        assert!(matches!(
            transcode(&tex, &options),
            Err(TranscodeError::IncompatibleChannelType { .. })
        ));
    }

    #[test]
    fn colour_space_conversion_changes_values_and_label() {
        // sRGB mid grey 128 maps to linear ~55.
        let mut tex = rgba8_texture(1, 1, vec![128, 128, 128, 255]);
        tex.set_colour_space(ColourSpace::Srgb);
        let options =
            TranscodeOptions::new(PixelFormat::RGBA8888).with_colour_space(ColourSpace::Linear);
        let out = transcode(&tex, &options).unwrap();
        assert_eq!(out.colour_space(), ColourSpace::Linear);
        assert_eq!(&out.data()[..3], &[55, 55, 55]);
        // Alpha is not colour managed.
        assert_eq!(out.data()[3], 255);
    }

    #[test]
    fn same_colour_space_does_not_touch_values() {
        let tex = rgba8_texture(1, 1, vec![128, 64, 32, 255]);
        let out = transcode(&tex, &TranscodeOptions::new(PixelFormat::RGBA8888)).unwrap();
        assert_eq!(out.data(), tex.data());
    }

    #[test]
    fn mip_chain_and_faces_carry_over() {
        let tex = generate_mipmaps(&rgba8_cubemap(4, [[80, 90, 100, 255]; 6]), None).unwrap();
        let out = transcode(&tex, &TranscodeOptions::new(PixelFormat::BGRA8888)).unwrap();
        assert_eq!(out.num_mip_levels(), tex.num_mip_levels());
        assert_eq!(out.num_faces(), 6);
        assert_eq!(&out.view(2, 5).unwrap()[..4], &[100, 90, 80, 255]);
    }

    #[test]
    fn dither_changes_quantization_of_a_ramp() {
        // A 16-bit ramp has values between 8-bit levels, so dithered and
        // plain-rounded outputs must diverge.
        let mut data = Vec::new();
        for i in 0..256u32 {
            let v = ((i * 65535) / 255 / 2 + 100) as u16;
            data.extend_from_slice(&v.to_le_bytes());
            data.extend_from_slice(&v.to_le_bytes());
            data.extend_from_slice(&v.to_le_bytes());
            data.extend_from_slice(&65535u16.to_le_bytes());
        }
        let header = crate::texture::TextureHeader::new_2d(
            16,
            16,
            PixelFormat::RGBA16161616,
            ChannelType::UnsignedShortNorm,
        );
        let tex = Texture::new(header, data).unwrap();
        let options = TranscodeOptions::new(PixelFormat::RGBA8888).with_dither(true);
        let dithered = transcode(&tex, &options).unwrap();
        let plain = transcode(&tex, &TranscodeOptions::new(PixelFormat::RGBA8888)).unwrap();
        assert_eq!(dithered.pixel_format(), PixelFormat::RGBA8888);
        // Same dimensions, both valid; dithered output must differ from
        // plain rounding for a non-representable ramp.
        assert_ne!(dithered.data(), plain.data());
    }
}
