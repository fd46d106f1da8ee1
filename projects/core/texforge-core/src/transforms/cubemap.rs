//! Cubemap projection from an equirectangular panorama.

use core::f32::consts::PI;

use crate::convert::SurfaceF32;
use crate::error::{TransformError, TransformResult};
use crate::texture::Texture;

use super::{pack_level, require_uncompressed, unpack_level};

/// Projects a 2:1 equirectangular panorama onto the six faces of a
/// cubemap.
///
/// Faces come out in +X, -X, +Y, -Y, +Z, -Z order, each `height` texels
/// square, sampled bilinearly from the panorama with longitude wrapping
/// across the seam and latitude clamped at the poles. The source must be
/// a flat, single-face, single-level 2D texture twice as wide as it is
/// tall.
pub fn cubemap_from_equirectangular(tex: &Texture) -> TransformResult<Texture> {
    require_uncompressed("cubemap_from_equirectangular", tex.header())?;
    if tex.num_faces() != 1 || tex.depth() != 1 || tex.num_mip_levels() != 1 {
        return Err(TransformError::InvalidProjectionSource);
    }
    if tex.width() != tex.height() * 2 {
        return Err(TransformError::NotEquirectangular {
            width: tex.width(),
            height: tex.height(),
        });
    }

    let src = unpack_level("cubemap_from_equirectangular", tex, 0, 0)?;
    let n = tex.height();

    let mut header = *tex.header();
    header.width = n;
    header.height = n;
    header.num_faces = 6;

    let mut data = Vec::with_capacity(header.data_size());
    for face in 0..6 {
        let mut out = SurfaceF32::new_zeroed(n as usize, n as usize, 1);
        for v in 0..n as usize {
            for u in 0..n as usize {
                // Face coordinates in [-1, 1], texel centres.
                let a = 2.0 * (u as f32 + 0.5) / n as f32 - 1.0;
                let b = 2.0 * (v as f32 + 0.5) / n as f32 - 1.0;
                let (x, y, z) = face_direction(face, a, b);

                let longitude = x.atan2(z);
                let latitude = (y / (x * x + y * y + z * z).sqrt()).asin();
                let su = (0.5 + longitude / (2.0 * PI)) * src.w as f32 - 0.5;
                let sv = (0.5 - latitude / PI) * src.h as f32 - 0.5;
                out.put(u, v, 0, sample_panorama(&src, su, sv));
            }
        }
        data.extend_from_slice(&pack_level(
            "cubemap_from_equirectangular",
            &header,
            &out,
        )?);
    }
    Ok(Texture::new(header, data)?)
}

/// Direction through the centre of face texel `(a, b)`, faces ordered
/// +X, -X, +Y, -Y, +Z, -Z.
fn face_direction(face: u32, a: f32, b: f32) -> (f32, f32, f32) {
    match face {
        0 => (1.0, -b, -a),
        1 => (-1.0, -b, a),
        2 => (a, 1.0, b),
        3 => (a, -1.0, -b),
        4 => (a, -b, 1.0),
        _ => (-a, -b, -1.0),
    }
}

/// Bilinear fetch with longitude wrap and latitude clamp.
fn sample_panorama(src: &SurfaceF32, su: f32, sv: f32) -> [f32; 4] {
    let u0 = su.floor();
    let v0 = sv.floor();
    let fu = su - u0;
    let fv = sv - v0;
    let w = src.w as i64;

    let wrap = |u: i64| -> isize { u.rem_euclid(w) as isize };
    let (u0, v0) = (u0 as i64, v0 as isize);

    let mut out = [0.0f32; 4];
    for (dv, wv) in [(0, 1.0 - fv), (1, fv)] {
        for (du, wu) in [(0, 1.0 - fu), (1, fu)] {
            let weight = wu * wv;
            if weight == 0.0 {
                continue;
            }
            // fetch clamps v at the poles.
            let texel = src.fetch(wrap(u0 + du), v0 + dv, 0);
            for c in 0..4 {
                out[c] += texel[c] * weight;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn assert_face_solid(tex: &Texture, face: u32, colour: [u8; 4]) {
        for texel in tex.view(0, face).unwrap().chunks_exact(4) {
            assert_eq!(texel, &colour, "face {face}");
        }
    }

    #[test]
    fn solid_panorama_gives_solid_faces() {
        let tex = solid_rgba8(8, 4, [40, 80, 120, 255]);
        let cube = cubemap_from_equirectangular(&tex).unwrap();
        assert_eq!(cube.num_faces(), 6);
        assert_eq!((cube.width(), cube.height()), (4, 4));
        for face in 0..6 {
            assert_face_solid(&cube, face, [40, 80, 120, 255]);
        }
    }

    #[test]
    fn hemispheres_map_to_the_vertical_faces() {
        // Top half white, bottom half black: +Y is all white, -Y all black.
        let mut data = Vec::new();
        for v in 0..4 {
            let shade = if v < 2 { 255u8 } else { 0 };
            for _ in 0..8 {
                data.extend_from_slice(&[shade, shade, shade, 255]);
            }
        }
        let tex = rgba8_texture(8, 4, data);
        let cube = cubemap_from_equirectangular(&tex).unwrap();
        assert_face_solid(&cube, 2, [255, 255, 255, 255]);
        assert_face_solid(&cube, 3, [0, 0, 0, 255]);
    }

    #[test]
    fn longitude_halves_map_to_the_horizontal_faces() {
        // Columns 0-3 green, 4-7 red: -X is all green, +X all red.
        let mut data = Vec::new();
        for _ in 0..4 {
            for u in 0..8 {
                let colour: [u8; 4] = if u < 4 {
                    [0, 255, 0, 255]
                } else {
                    [255, 0, 0, 255]
                };
                data.extend_from_slice(&colour);
            }
        }
        let tex = rgba8_texture(8, 4, data);
        let cube = cubemap_from_equirectangular(&tex).unwrap();
        assert_face_solid(&cube, 0, [255, 0, 0, 255]);
        assert_face_solid(&cube, 1, [0, 255, 0, 255]);
    }

    #[test]
    fn sampling_wraps_across_the_longitude_seam() {
        // Blue along the seam (columns 0, 1, 6, 7): -Z comes out solid
        // blue only if sampling wraps instead of clamping.
        let mut data = Vec::new();
        for _ in 0..4 {
            for u in 0..8u32 {
                let colour: [u8; 4] = if u < 2 || u >= 6 {
                    [0, 0, 255, 255]
                } else {
                    [200, 200, 200, 255]
                };
                data.extend_from_slice(&colour);
            }
        }
        let tex = rgba8_texture(8, 4, data);
        let cube = cubemap_from_equirectangular(&tex).unwrap();
        assert_face_solid(&cube, 5, [0, 0, 255, 255]);
    }

    #[test]
    fn rejects_non_equirectangular_aspect() {
        let tex = solid_rgba8(4, 4, [0, 0, 0, 0]);
        assert!(matches!(
            cubemap_from_equirectangular(&tex),
            Err(TransformError::NotEquirectangular {
                width: 4,
                height: 4
            })
        ));
    }

    #[test]
    fn rejects_cubemap_input() {
        let tex = rgba8_cubemap(2, [[0, 0, 0, 0]; 6]);
        assert!(matches!(
            cubemap_from_equirectangular(&tex),
            Err(TransformError::InvalidProjectionSource)
        ));
    }

    #[test]
    fn rejects_mipped_input() {
        let tex = mipped_rgba8(8, 4, 2);
        assert!(matches!(
            cubemap_from_equirectangular(&tex),
            Err(TransformError::InvalidProjectionSource)
        ));
    }
}
