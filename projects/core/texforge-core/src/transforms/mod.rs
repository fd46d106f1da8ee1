//! # Transform engine
//!
//! Pure operations over [`Texture`]: every function borrows its input and
//! returns a fresh texture, failing without side effects when a
//! precondition does not hold.
//!
//! Ordering contract: [`resize`] and [`generate_mipmaps`] require a
//! single-level input, so callers resize first, apply the other
//! transforms, and generate mipmaps last. [`flip`], [`rotate90`],
//! [`resize_canvas`] and the alpha utilities operate on whole mip chains.
//!
//! All transforms here operate on uncompressed pixel data; transcode
//! block-compressed textures to an uncompressed format first.

mod alpha;
mod canvas;
mod cubemap;
mod flip;
mod mipmap;
mod resize;
mod rotate;
mod tint;

pub use alpha::{bleed, premultiply_alpha};
pub use canvas::resize_canvas;
pub use cubemap::cubemap_from_equirectangular;
pub use flip::flip;
pub use mipmap::generate_mipmaps;
pub use resize::{resize, ResizeMode};
pub use rotate::rotate90;
pub use tint::colour_mipmaps;

use crate::convert::{self, ConvertError, SurfaceF32};
use crate::error::{TransformError, TransformResult};
use crate::texture::{Texture, TextureHeader};

/// Maps a conversion failure onto the transform error for one operation.
pub(crate) fn convert_error(
    op: &'static str,
    header: &TextureHeader,
    err: ConvertError,
) -> TransformError {
    match err {
        ConvertError::Compressed | ConvertError::UnsupportedLayout => {
            TransformError::UnsupportedFormat {
                op,
                format: header.pixel_format,
            }
        }
        ConvertError::ChannelTypeMismatch => TransformError::ChannelTypeMismatch {
            channel_type: header.channel_type,
            format: header.pixel_format,
        },
    }
}

/// Rejects block-compressed input up front with the operation's name.
pub(crate) fn require_uncompressed(op: &'static str, header: &TextureHeader) -> TransformResult<()> {
    if header.pixel_format.is_compressed() {
        return Err(TransformError::UnsupportedFormat {
            op,
            format: header.pixel_format,
        });
    }
    Ok(())
}

/// Rejects input that already carries a mip chain.
pub(crate) fn require_single_level(header: &TextureHeader) -> TransformResult<()> {
    if header.num_mip_levels != 1 {
        return Err(TransformError::MipChainPresent(header.num_mip_levels));
    }
    Ok(())
}

/// Unpacks one surface of a texture into an f32 RGBA plane.
pub(crate) fn unpack_level(
    op: &'static str,
    tex: &Texture,
    level: u32,
    face: u32,
) -> TransformResult<SurfaceF32> {
    let (w, h, d) = tex.header().mip_dimensions(level);
    let data = tex.view(level, face)?;
    convert::unpack_surface(
        data,
        tex.pixel_format(),
        tex.channel_type(),
        w as usize,
        h as usize,
        d as usize,
    )
    .map_err(|e| convert_error(op, tex.header(), e))
}

/// Packs an f32 RGBA plane back into the texture's stored format.
pub(crate) fn pack_level(
    op: &'static str,
    header: &TextureHeader,
    surface: &SurfaceF32,
) -> TransformResult<Vec<u8>> {
    convert::pack_surface(surface, header.pixel_format, header.channel_type, false)
        .map_err(|e| convert_error(op, header, e))
}
