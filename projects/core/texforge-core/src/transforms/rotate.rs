//! Quarter-turn rotation.

use crate::error::TransformResult;
use crate::texture::{Axis, Texture};

use super::require_uncompressed;

/// Rotates a texture 90 degrees around `axis`; `forward` rotates
/// clockwise when looking down the positive axis, `!forward` rotates the
/// other way.
///
/// The two extents of the rotated plane swap ([`Axis::Z`] swaps width and
/// height, [`Axis::X`] height and depth, [`Axis::Y`] width and depth);
/// every mip level and face rotates the same way, which keeps the mip
/// chain consistent because level extents are computed by halving.
/// Orientation flags are left untouched: rotation changes which axis is
/// which, not whether an axis is mirrored.
///
/// Cubemaps only rotate around [`Axis::Z`]; the other axes would swap a
/// face extent with depth, and cubemap faces have none.
pub fn rotate90(tex: &Texture, axis: Axis, forward: bool) -> TransformResult<Texture> {
    require_uncompressed("rotate90", tex.header())?;
    if tex.num_faces() == 6 && axis != Axis::Z {
        return Err(crate::error::TransformError::CubemapRotationAxis);
    }
    let bpp = match tex.pixel_format().bytes_per_pixel() {
        Some(bpp) => bpp,
        None => {
            return Err(crate::error::TransformError::UnsupportedFormat {
                op: "rotate90",
                format: tex.pixel_format(),
            })
        }
    };

    let mut header = *tex.header();
    match axis {
        Axis::Z => {
            header.width = tex.height();
            header.height = tex.width();
        }
        Axis::X => {
            header.height = tex.depth();
            header.depth = tex.height();
        }
        Axis::Y => {
            header.width = tex.depth();
            header.depth = tex.width();
        }
    }

    let mut data = vec![0u8; header.data_size()];
    let mut cursor = 0usize;
    for level in 0..header.num_mip_levels {
        let (sw, sh, sd) = tex.header().mip_dimensions(level);
        let (dw, dh, dd) = header.mip_dimensions(level);
        let surface_len = header.surface_size(level);
        for face in 0..header.num_faces {
            let src = tex.view(level, face)?;
            let dst = &mut data[cursor..cursor + surface_len];
            rotate_surface(
                src,
                dst,
                (sw as usize, sh as usize, sd as usize),
                (dw as usize, dh as usize, dd as usize),
                bpp,
                axis,
                forward,
            );
            cursor += surface_len;
        }
    }

    Ok(Texture::new(header, data)?)
}

/// Walks destination texels and pulls from the source position that lands
/// there after a quarter turn of the rotated plane.
fn rotate_surface(
    src: &[u8],
    dst: &mut [u8],
    (sw, sh, sd): (usize, usize, usize),
    (dw, dh, dd): (usize, usize, usize),
    bpp: usize,
    axis: Axis,
    forward: bool,
) {
    for z in 0..dd {
        for y in 0..dh {
            for x in 0..dw {
                // In the rotated plane (a, b), clockwise pulls from
                // (b_dst, B_src - 1 - a_dst); counter-clockwise is the
                // inverse, (A_src - 1 - b_dst, a_dst).
                let (sx, sy, sz) = match (axis, forward) {
                    (Axis::Z, true) => (y, sh - 1 - x, z),
                    (Axis::Z, false) => (sw - 1 - y, x, z),
                    (Axis::X, true) => (x, z, sd - 1 - y),
                    (Axis::X, false) => (x, sh - 1 - z, y),
                    (Axis::Y, true) => (z, y, sd - 1 - x),
                    (Axis::Y, false) => (sw - 1 - z, y, x),
                };
                let s = ((sz * sh + sy) * sw + sx) * bpp;
                let d = ((z * dh + y) * dw + x) * bpp;
                dst[d..d + bpp].copy_from_slice(&src[s..s + bpp]);
            }
        }
    }
}
