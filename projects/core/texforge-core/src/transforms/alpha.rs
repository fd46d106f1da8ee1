//! Alpha utilities: premultiplication and edge bleeding.

use crate::error::TransformResult;
use crate::texture::Texture;

use super::{pack_level, require_uncompressed, unpack_level};

/// Multiplies every colour channel by the texel's alpha.
///
/// Formats without an alpha channel pass through unchanged. Works on
/// whole mip chains and all faces.
pub fn premultiply_alpha(tex: &Texture) -> TransformResult<Texture> {
    require_uncompressed("premultiply_alpha", tex.header())?;
    if !tex.pixel_format().has_alpha() {
        return Ok(tex.clone());
    }

    let header = *tex.header();
    let mut data = Vec::with_capacity(header.data_size());
    for level in 0..tex.num_mip_levels() {
        for face in 0..tex.num_faces() {
            let mut surface = unpack_level("premultiply_alpha", tex, level, face)?;
            for texel in surface.px.chunks_exact_mut(4) {
                let a = texel[3];
                texel[0] *= a;
                texel[1] *= a;
                texel[2] *= a;
            }
            data.extend_from_slice(&pack_level("premultiply_alpha", &header, &surface)?);
        }
    }
    Ok(Texture::new(header, data)?)
}

/// Bleeds colour from opaque texels into fully transparent ones.
///
/// Transparent texels (alpha exactly zero) take the average colour of
/// their already-coloured 6-neighbours, spreading outward one texel per
/// pass until every reachable texel is coloured. Alpha values are left
/// untouched, so the result renders identically but filters and
/// compresses without dark fringes at alpha edges. Formats without alpha
/// pass through unchanged.
pub fn bleed(tex: &Texture) -> TransformResult<Texture> {
    require_uncompressed("bleed", tex.header())?;
    if !tex.pixel_format().has_alpha() {
        return Ok(tex.clone());
    }

    let header = *tex.header();
    let mut data = Vec::with_capacity(header.data_size());
    for level in 0..tex.num_mip_levels() {
        let (w, h, d) = header.mip_dimensions(level);
        for face in 0..tex.num_faces() {
            let mut surface = unpack_level("bleed", tex, level, face)?;
            bleed_surface(
                &mut surface.px,
                w as usize,
                h as usize,
                d as usize,
            );
            data.extend_from_slice(&pack_level("bleed", &header, &surface)?);
        }
    }
    Ok(Texture::new(header, data)?)
}

fn bleed_surface(px: &mut [f32], w: usize, h: usize, d: usize) {
    let count = w * h * d;
    let mut filled: Vec<bool> = (0..count).map(|i| px[i * 4 + 3] > 0.0).collect();
    if filled.iter().all(|&f| f) || filled.iter().all(|&f| !f) {
        return;
    }

    let neighbours = |i: usize| {
        let x = i % w;
        let y = (i / w) % h;
        let z = i / (w * h);
        let mut out = [usize::MAX; 6];
        let mut n = 0;
        let mut push = |j: usize| {
            out[n] = j;
            n += 1;
        };
        if x > 0 {
            push(i - 1);
        }
        if x + 1 < w {
            push(i + 1);
        }
        if y > 0 {
            push(i - w);
        }
        if y + 1 < h {
            push(i + w);
        }
        if z > 0 {
            push(i - w * h);
        }
        if z + 1 < d {
            push(i + w * h);
        }
        (out, n)
    };

    // Jacobi-style passes: each pass fills from the previous pass's
    // frontier only, so results are order independent.
    loop {
        let mut updates: Vec<(usize, [f32; 3])> = Vec::new();
        for i in 0..count {
            if filled[i] {
                continue;
            }
            let (candidates, n) = neighbours(i);
            let mut sum = [0.0f32; 3];
            let mut hits = 0usize;
            for &j in &candidates[..n] {
                if filled[j] {
                    for c in 0..3 {
                        sum[c] += px[j * 4 + c];
                    }
                    hits += 1;
                }
            }
            if hits > 0 {
                let inv = 1.0 / hits as f32;
                updates.push((i, [sum[0] * inv, sum[1] * inv, sum[2] * inv]));
            }
        }
        if updates.is_empty() {
            return;
        }
        for (i, rgb) in updates {
            px[i * 4] = rgb[0];
            px[i * 4 + 1] = rgb[1];
            px[i * 4 + 2] = rgb[2];
            filled[i] = true;
        }
    }
}
