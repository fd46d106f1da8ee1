//! Axis flips.
//!
//! Flipping reverses texel order along one axis for every surface, toggles
//! the matching orientation flag, and swaps the cubemap face pair that
//! looks along that axis so the cube stays consistent after the flip.

use crate::error::TransformResult;
use crate::texture::{Axis, Texture};

use super::require_uncompressed;

/// Cubemap faces are ordered +X, -X, +Y, -Y, +Z, -Z; the pair looking
/// along the flipped axis trades places.
fn face_pair(axis: Axis) -> (u32, u32) {
    match axis {
        Axis::X => (0, 1),
        Axis::Y => (2, 3),
        Axis::Z => (4, 5),
    }
}

/// Mirrors a texture along one axis.
///
/// Works on whole mip chains and all faces. The stored orientation flag
/// for `axis` is toggled; two flips along the same axis restore the
/// original texture exactly.
pub fn flip(tex: &Texture, axis: Axis) -> TransformResult<Texture> {
    require_uncompressed("flip", tex.header())?;
    // Checked by require_uncompressed: uncompressed formats always have a
    // whole byte count per texel.
    let bpp = match tex.pixel_format().bytes_per_pixel() {
        Some(bpp) => bpp,
        None => {
            return Err(crate::error::TransformError::UnsupportedFormat {
                op: "flip",
                format: tex.pixel_format(),
            })
        }
    };

    let mut out = tex.clone();
    for level in 0..out.num_mip_levels() {
        let (w, h, d) = out.header().mip_dimensions(level);
        for face in 0..out.num_faces() {
            let surface = out.view_mut(level, face)?;
            flip_surface(surface, w as usize, h as usize, d as usize, bpp, axis);
        }
    }

    if out.num_faces() == 6 {
        let (a, b) = face_pair(axis);
        for level in 0..out.num_mip_levels() {
            out.swap_surfaces(level, a, b)?;
        }
    }

    out.header_mut().orientation.toggle(axis);
    Ok(out)
}

fn flip_surface(data: &mut [u8], w: usize, h: usize, d: usize, bpp: usize, axis: Axis) {
    let row = w * bpp;
    let slice = row * h;
    match axis {
        Axis::X => {
            for r in data.chunks_exact_mut(row) {
                for i in 0..w / 2 {
                    let j = w - 1 - i;
                    for b in 0..bpp {
                        r.swap(i * bpp + b, j * bpp + b);
                    }
                }
            }
        }
        Axis::Y => {
            for s in data.chunks_exact_mut(slice) {
                for i in 0..h / 2 {
                    let j = h - 1 - i;
                    for b in 0..row {
                        s.swap(i * row + b, j * row + b);
                    }
                }
            }
        }
        Axis::Z => {
            for i in 0..d / 2 {
                let j = d - 1 - i;
                for b in 0..slice {
                    data.swap(i * slice + b, j * slice + b);
                }
            }
        }
    }
}
