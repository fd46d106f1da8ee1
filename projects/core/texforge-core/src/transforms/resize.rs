//! Resampling to new dimensions.

use crate::convert::SurfaceF32;
use crate::error::{TextureError, TransformResult};
use crate::texture::Texture;

use super::{pack_level, require_single_level, require_uncompressed, unpack_level};

/// Resampling filter for [`resize`] and mipmap generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    /// Point sampling. Fast, exact for integer upscales.
    Nearest,
    /// Linear interpolation (trilinear for volumes).
    #[default]
    Linear,
    /// Catmull-Rom bicubic per slice; depth is point sampled.
    Cubic,
}

/// Resamples a texture to new dimensions.
///
/// Requires a single-level input; generate mipmaps after resizing.
/// Cubemaps resize face by face, which keeps all six faces square as long
/// as the new width and height are equal.
pub fn resize(
    tex: &Texture,
    new_width: u32,
    new_height: u32,
    new_depth: u32,
    mode: ResizeMode,
) -> TransformResult<Texture> {
    require_uncompressed("resize", tex.header())?;
    require_single_level(tex.header())?;
    if new_width == 0 || new_height == 0 || new_depth == 0 {
        return Err(TextureError::InvalidDimensions {
            width: new_width,
            height: new_height,
            depth: new_depth,
        }
        .into());
    }

    let mut header = *tex.header();
    header.width = new_width;
    header.height = new_height;
    header.depth = new_depth;

    let mut data = Vec::with_capacity(header.data_size());
    for face in 0..tex.num_faces() {
        let src = unpack_level("resize", tex, 0, face)?;
        let dst = resample(
            &src,
            new_width as usize,
            new_height as usize,
            new_depth as usize,
            mode,
        );
        data.extend_from_slice(&pack_level("resize", &header, &dst)?);
    }
    Ok(Texture::new(header, data)?)
}

pub(crate) fn resample(
    src: &SurfaceF32,
    w: usize,
    h: usize,
    d: usize,
    mode: ResizeMode,
) -> SurfaceF32 {
    let mut dst = SurfaceF32::new_zeroed(w, h, d);
    let sx_scale = src.w as f32 / w as f32;
    let sy_scale = src.h as f32 / h as f32;
    let sz_scale = src.d as f32 / d as f32;

    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                // Texel centres map to texel centres.
                let sx = (x as f32 + 0.5) * sx_scale - 0.5;
                let sy = (y as f32 + 0.5) * sy_scale - 0.5;
                let sz = (z as f32 + 0.5) * sz_scale - 0.5;
                let texel = match mode {
                    ResizeMode::Nearest => src.fetch(
                        sx.round() as isize,
                        sy.round() as isize,
                        sz.round() as isize,
                    ),
                    ResizeMode::Linear => sample_trilinear(src, sx, sy, sz),
                    ResizeMode::Cubic => sample_bicubic(src, sx, sy, sz.round() as isize),
                };
                dst.put(x, y, z, texel);
            }
        }
    }
    dst
}

fn sample_trilinear(src: &SurfaceF32, sx: f32, sy: f32, sz: f32) -> [f32; 4] {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let z0 = sz.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let fz = sz - z0;
    let (x0, y0, z0) = (x0 as isize, y0 as isize, z0 as isize);

    let mut out = [0.0f32; 4];
    for (dz, wz) in [(0, 1.0 - fz), (1, fz)] {
        if wz == 0.0 {
            continue;
        }
        for (dy, wy) in [(0, 1.0 - fy), (1, fy)] {
            if wy == 0.0 {
                continue;
            }
            for (dx, wx) in [(0, 1.0 - fx), (1, fx)] {
                if wx == 0.0 {
                    continue;
                }
                let texel = src.fetch(x0 + dx, y0 + dy, z0 + dz);
                let weight = wx * wy * wz;
                for c in 0..4 {
                    out[c] += texel[c] * weight;
                }
            }
        }
    }
    out
}

/// Catmull-Rom weights for fractional position `t`.
fn catmull_rom(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

fn sample_bicubic(src: &SurfaceF32, sx: f32, sy: f32, z: isize) -> [f32; 4] {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let wx = catmull_rom(sx - x0);
    let wy = catmull_rom(sy - y0);
    let (x0, y0) = (x0 as isize, y0 as isize);

    let mut out = [0.0f32; 4];
    for j in 0..4isize {
        for i in 0..4isize {
            let texel = src.fetch(x0 + i - 1, y0 + j - 1, z);
            let weight = wx[i as usize] * wy[j as usize];
            for c in 0..4 {
                out[c] += texel[c] * weight;
            }
        }
    }
    out
}
