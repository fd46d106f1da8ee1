//! Mip chain generation.

use crate::convert::SurfaceF32;
use crate::error::TransformResult;
use crate::texture::Texture;

use super::{pack_level, require_single_level, require_uncompressed, unpack_level};

/// Builds a mip chain by repeated box-filter downsampling.
///
/// Requires a single-level input; each level halves every extent (floor,
/// clamped to 1) until `levels` are present, or the full chain down to
/// 1x1x1 when `levels` is `None`. Requested counts longer than the
/// dimensions allow are clamped. Each face of a cubemap gets its own
/// chain.
pub fn generate_mipmaps(tex: &Texture, levels: Option<u32>) -> TransformResult<Texture> {
    require_uncompressed("generate_mipmaps", tex.header())?;
    require_single_level(tex.header())?;

    let mut header = *tex.header();
    let max = header.max_mip_levels();
    header.num_mip_levels = levels.unwrap_or(max).min(max).max(1);

    // Downsample per face, then assemble mip-major.
    let mut chains: Vec<Vec<Vec<u8>>> = Vec::with_capacity(tex.num_faces() as usize);
    for face in 0..tex.num_faces() {
        let mut chain = Vec::with_capacity(header.num_mip_levels as usize);
        let mut current = unpack_level("generate_mipmaps", tex, 0, face)?;
        chain.push(pack_level("generate_mipmaps", &header, &current)?);
        for level in 1..header.num_mip_levels {
            let (w, h, d) = header.mip_dimensions(level);
            current = downsample(&current, w as usize, h as usize, d as usize);
            chain.push(pack_level("generate_mipmaps", &header, &current)?);
        }
        chains.push(chain);
    }

    let mut data = Vec::with_capacity(header.data_size());
    for level in 0..header.num_mip_levels as usize {
        for chain in &chains {
            data.extend_from_slice(&chain[level]);
        }
    }
    Ok(Texture::new(header, data)?)
}

/// Box filter: each destination texel averages the source block that maps
/// onto it (2 per halved axis, 1 where an extent has already hit 1, and
/// uneven blocks for odd extents).
fn downsample(src: &SurfaceF32, w: usize, h: usize, d: usize) -> SurfaceF32 {
    let mut dst = SurfaceF32::new_zeroed(w, h, d);
    let span = |i: usize, dst_e: usize, src_e: usize| -> (usize, usize) {
        let lo = i * src_e / dst_e;
        let hi = (((i + 1) * src_e) / dst_e).max(lo + 1).min(src_e);
        (lo, hi)
    };

    for z in 0..d {
        let (z0, z1) = span(z, d, src.d);
        for y in 0..h {
            let (y0, y1) = span(y, h, src.h);
            for x in 0..w {
                let (x0, x1) = span(x, w, src.w);
                let mut sum = [0.0f32; 4];
                let mut count = 0usize;
                for sz in z0..z1 {
                    for sy in y0..y1 {
                        for sx in x0..x1 {
                            let texel = src.fetch(sx as isize, sy as isize, sz as isize);
                            for c in 0..4 {
                                sum[c] += texel[c];
                            }
                            count += 1;
                        }
                    }
                }
                let inv = 1.0 / count as f32;
                dst.put(x, y, z, [sum[0] * inv, sum[1] * inv, sum[2] * inv, sum[3] * inv]);
            }
        }
    }
    dst
}
