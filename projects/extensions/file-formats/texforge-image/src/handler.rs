//! The delegated photographic format [`ContainerHandler`].

use image::ImageFormat;
use log::debug;
use texforge_core::{
    ChannelType, ColourSpace, PixelFormat, Texture, TextureHeader,
};
use texforge_file_formats_api::{
    ContainerHandler, DecodeError, DecodeResult, EncodeError, EncodeResult,
};

/// Decode-only handler for JPEG, PNG and Radiance HDR, delegated to the
/// `image` crate.
///
/// JPEG and PNG decode to 8-bit sRGB RGBA; HDR decodes to 32-bit float
/// linear RGBA. Missing alpha fills with opaque. These formats carry no
/// mip chains, faces or orientation metadata, so the result is always a
/// single flat 2D surface.
pub struct ImageHandler;

impl ContainerHandler for ImageHandler {
    fn name(&self) -> &'static str {
        "image"
    }

    fn can_handle(&self, input: &[u8]) -> bool {
        matches!(
            image::guess_format(input),
            Ok(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Hdr)
        )
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["jpg", "jpeg", "png", "hdr"]
    }

    fn decode(&self, input: &[u8]) -> DecodeResult<Texture> {
        let format =
            image::guess_format(input).map_err(|e| DecodeError::External(e.to_string()))?;
        let img = image::load_from_memory_with_format(input, format)
            .map_err(|e| DecodeError::External(e.to_string()))?;
        debug!(
            "decoded {format:?} image, {}x{} pixels",
            img.width(),
            img.height()
        );

        match format {
            ImageFormat::Hdr => {
                let px = img.to_rgba32f();
                let (width, height) = (px.width(), px.height());
                let data = px
                    .into_raw()
                    .iter()
                    .flat_map(|v| v.to_le_bytes())
                    .collect();
                let header = TextureHeader::new_2d(
                    width,
                    height,
                    PixelFormat::RGBA32323232,
                    ChannelType::Float,
                );
                Ok(Texture::new(header, data)?)
            }
            ImageFormat::Jpeg | ImageFormat::Png => {
                let px = img.to_rgba8();
                let (width, height) = (px.width(), px.height());
                let mut header = TextureHeader::new_2d(
                    width,
                    height,
                    PixelFormat::RGBA8888,
                    ChannelType::UnsignedByteNorm,
                );
                header.colour_space = ColourSpace::Srgb;
                Ok(Texture::new(header, px.into_raw())?)
            }
            _ => Err(DecodeError::UnknownContainer),
        }
    }

    fn encode(&self, _texture: &Texture) -> EncodeResult<Vec<u8>> {
        Err(EncodeError::ReadOnlyContainer("image"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
        let img = image::RgbaImage::from_raw(width, height, pixels.to_vec()).unwrap();
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    /// A 1x1 Radiance HDR file whose single texel is exactly (1.0, 1.0, 1.0):
    /// mantissa 128/256 at exponent 2^1.
    fn hdr_bytes() -> Vec<u8> {
        let mut out = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 1\n".to_vec();
        out.extend_from_slice(&[128, 128, 128, 129]);
        out
    }

    #[test]
    fn sniffs_png_jpeg_and_hdr_magic() {
        assert!(ImageHandler.can_handle(&png_bytes(1, 1, &[0, 0, 0, 255])));
        assert!(ImageHandler.can_handle(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(ImageHandler.can_handle(&hdr_bytes()));
        assert!(!ImageHandler.can_handle(b"DDS |???"));
    }

    #[test]
    fn png_decodes_to_srgb_rgba8() {
        let pixels = [10, 20, 30, 255, 200, 150, 100, 128];
        let tex = ImageHandler.decode(&png_bytes(2, 1, &pixels)).unwrap();
        assert_eq!(tex.width(), 2);
        assert_eq!(tex.height(), 1);
        assert_eq!(tex.pixel_format(), PixelFormat::RGBA8888);
        assert_eq!(tex.channel_type(), ChannelType::UnsignedByteNorm);
        assert_eq!(tex.colour_space(), ColourSpace::Srgb);
        assert_eq!(tex.num_mip_levels(), 1);
        assert_eq!(tex.data(), &pixels);
    }

    #[test]
    fn hdr_decodes_to_linear_float_rgba() {
        let tex = ImageHandler.decode(&hdr_bytes()).unwrap();
        assert_eq!(tex.pixel_format(), PixelFormat::RGBA32323232);
        assert_eq!(tex.channel_type(), ChannelType::Float);
        assert_eq!(tex.colour_space(), ColourSpace::Linear);
        let texel: Vec<f32> = tex
            .data()
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(texel, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn garbage_input_reports_the_decoder_error() {
        assert!(matches!(
            ImageHandler.decode(&[0u8; 16]),
            Err(DecodeError::External(_))
        ));
    }

    #[test]
    fn encode_is_rejected() {
        let header = TextureHeader::new_2d(
            1,
            1,
            PixelFormat::RGBA8888,
            ChannelType::UnsignedByteNorm,
        );
        let tex = Texture::new(header, vec![0; 4]).unwrap();
        assert_eq!(
            ImageHandler.encode(&tex),
            Err(EncodeError::ReadOnlyContainer("image"))
        );
    }
}
