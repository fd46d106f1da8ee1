//! Canvas resizing: pad or crop without resampling.

use crate::error::{TextureError, TransformResult};
use crate::texture::Texture;

use super::require_uncompressed;

/// Changes the canvas size of a texture without resampling.
///
/// The source's origin lands at `(x_offset, y_offset, z_offset)` in the
/// new canvas; negative offsets crop from the source's low side, and
/// anything falling outside the new extents is cropped away. Uncovered
/// texels are zero filled (transparent black). Mip chains are kept: level
/// `k` uses the offsets arithmetically shifted right by `k`, mirroring
/// how level extents halve.
pub fn resize_canvas(
    tex: &Texture,
    new_width: u32,
    new_height: u32,
    new_depth: u32,
    x_offset: i32,
    y_offset: i32,
    z_offset: i32,
) -> TransformResult<Texture> {
    require_uncompressed("resize_canvas", tex.header())?;
    if new_width == 0 || new_height == 0 || new_depth == 0 {
        return Err(TextureError::InvalidDimensions {
            width: new_width,
            height: new_height,
            depth: new_depth,
        }
        .into());
    }
    let bpp = match tex.pixel_format().bytes_per_pixel() {
        Some(bpp) => bpp,
        None => {
            return Err(crate::error::TransformError::UnsupportedFormat {
                op: "resize_canvas",
                format: tex.pixel_format(),
            })
        }
    };

    let mut header = *tex.header();
    header.width = new_width;
    header.height = new_height;
    header.depth = new_depth;
    // Shrinking the canvas can shorten the longest representable chain.
    header.num_mip_levels = header.num_mip_levels.min(header.max_mip_levels());

    let mut data = vec![0u8; header.data_size()];
    let mut cursor = 0usize;
    for level in 0..header.num_mip_levels {
        let (sw, sh, sd) = tex.header().mip_dimensions(level);
        let (dw, dh, dd) = header.mip_dimensions(level);
        let (ox, oy, oz) = (x_offset >> level, y_offset >> level, z_offset >> level);
        let surface_len = header.surface_size(level);
        for face in 0..header.num_faces {
            let src = tex.view(level, face)?;
            blit(
                src,
                &mut data[cursor..cursor + surface_len],
                (sw as usize, sh as usize, sd as usize),
                (dw as usize, dh as usize, dd as usize),
                (ox, oy, oz),
                bpp,
            );
            cursor += surface_len;
        }
    }
    Ok(Texture::new(header, data)?)
}

/// Copies the overlapping region row by row; everything else stays zero.
fn blit(
    src: &[u8],
    dst: &mut [u8],
    (sw, sh, sd): (usize, usize, usize),
    (dw, dh, dd): (usize, usize, usize),
    (ox, oy, oz): (i32, i32, i32),
    bpp: usize,
) {
    // Overlap of the shifted source with the destination, in dst coords.
    let x_lo = ox.max(0) as usize;
    let y_lo = oy.max(0) as usize;
    let z_lo = oz.max(0) as usize;
    let x_hi = (ox as i64 + sw as i64).clamp(0, dw as i64) as usize;
    let y_hi = (oy as i64 + sh as i64).clamp(0, dh as i64) as usize;
    let z_hi = (oz as i64 + sd as i64).clamp(0, dd as i64) as usize;
    if x_lo >= x_hi || y_lo >= y_hi || z_lo >= z_hi {
        return;
    }
    let run = (x_hi - x_lo) * bpp;

    for z in z_lo..z_hi {
        let sz = (z as i64 - oz as i64) as usize;
        for y in y_lo..y_hi {
            let sy = (y as i64 - oy as i64) as usize;
            let sx = (x_lo as i64 - ox as i64) as usize;
            let s = ((sz * sh + sy) * sw + sx) * bpp;
            let d = ((z * dh + y) * dw + x_lo) * bpp;
            dst[d..d + run].copy_from_slice(&src[s..s + run]);
        }
    }
}
