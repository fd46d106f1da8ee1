//! Built-in BC1 (DXT1) codec.
//!
//! BC1 stores 4x4 texel blocks as two RGB565 endpoints and sixteen 2-bit
//! palette indices. When the first endpoint compares greater than the
//! second the palette holds four opaque colours (the endpoints plus two
//! interpolants at 1/3 and 2/3); otherwise it holds the endpoints, their
//! midpoint, and transparent black, which is how BC1 carries punch-through
//! alpha.

use crate::error::{TextureError, TranscodeResult};
use crate::pixel_format::PixelFormat;
use crate::transcode::Quality;

use super::BlockCodec;

const BLOCK_BYTES: usize = 8;
const BLOCK_DIM: usize = 4;
const BLOCK_TEXELS: usize = 16;

/// An RGB565 endpoint colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Color565(u16);

impl Color565 {
    fn quantize(rgb: [f32; 3]) -> Self {
        let r = (rgb[0].clamp(0.0, 1.0) * 31.0).round() as u16;
        let g = (rgb[1].clamp(0.0, 1.0) * 63.0).round() as u16;
        let b = (rgb[2].clamp(0.0, 1.0) * 31.0).round() as u16;
        Self(r << 11 | g << 5 | b)
    }

    /// Expands to 8-bit-per-channel with the usual top-bit replication, so
    /// pure black and white survive exactly.
    fn expand(self) -> [f32; 3] {
        let r = (self.0 >> 11) & 0x1F;
        let g = (self.0 >> 5) & 0x3F;
        let b = self.0 & 0x1F;
        [
            (r << 3 | r >> 2) as f32 / 255.0,
            (g << 2 | g >> 4) as f32 / 255.0,
            (b << 3 | b >> 2) as f32 / 255.0,
        ]
    }
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Palette for a decoded block: RGB plus alpha per entry.
fn palette(c0: Color565, c1: Color565) -> [[f32; 4]; 4] {
    let e0 = c0.expand();
    let e1 = c1.expand();
    let opaque = |rgb: [f32; 3]| [rgb[0], rgb[1], rgb[2], 1.0];
    if c0.0 > c1.0 {
        [
            opaque(e0),
            opaque(e1),
            opaque(lerp3(e0, e1, 1.0 / 3.0)),
            opaque(lerp3(e0, e1, 2.0 / 3.0)),
        ]
    } else {
        [
            opaque(e0),
            opaque(e1),
            opaque(lerp3(e0, e1, 0.5)),
            [0.0, 0.0, 0.0, 0.0],
        ]
    }
}

/// Least-squares refinement passes per quality step.
fn refine_passes(quality: Quality) -> u32 {
    match quality {
        Quality::Fastest => 0,
        Quality::Fast => 1,
        Quality::Normal => 2,
        Quality::High => 4,
        Quality::Best => 8,
    }
}

/// Palette mixing weights `(w0, w1)` for each index in each mode.
fn index_weights(opaque_mode: bool, index: usize) -> (f32, f32) {
    if opaque_mode {
        match index {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (2.0 / 3.0, 1.0 / 3.0),
            _ => (1.0 / 3.0, 2.0 / 3.0),
        }
    } else {
        match index {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            _ => (0.5, 0.5),
        }
    }
}

/// BC1 codec with bounding-box endpoint selection and optional
/// least-squares endpoint refinement at higher quality settings.
pub struct Bc1Codec;

impl BlockCodec for Bc1Codec {
    fn format(&self) -> PixelFormat {
        PixelFormat::BC1
    }

    fn decode_level(&self, data: &[u8], w: u32, h: u32, d: u32) -> TranscodeResult<Vec<f32>> {
        let expected = PixelFormat::BC1.surface_size(w, h, d);
        if data.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: data.len(),
            }
            .into());
        }
        let (w, h, d) = (w as usize, h as usize, d as usize);
        let blocks_wide = w.div_ceil(BLOCK_DIM);
        let blocks_high = h.div_ceil(BLOCK_DIM);

        let mut out = vec![0.0f32; w * h * d * 4];
        let mut offset = 0usize;
        for z in 0..d {
            for by in 0..blocks_high {
                for bx in 0..blocks_wide {
                    let block = &data[offset..offset + BLOCK_BYTES];
                    offset += BLOCK_BYTES;
                    let c0 = Color565(u16::from_le_bytes([block[0], block[1]]));
                    let c1 = Color565(u16::from_le_bytes([block[2], block[3]]));
                    let indices =
                        u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
                    let entries = palette(c0, c1);

                    for t in 0..BLOCK_TEXELS {
                        let x = bx * BLOCK_DIM + t % BLOCK_DIM;
                        let y = by * BLOCK_DIM + t / BLOCK_DIM;
                        if x >= w || y >= h {
                            continue;
                        }
                        let entry = entries[(indices >> (2 * t) & 0b11) as usize];
                        let i = ((z * h + y) * w + x) * 4;
                        out[i..i + 4].copy_from_slice(&entry);
                    }
                }
            }
        }
        Ok(out)
    }

    fn encode_level(
        &self,
        rgba: &[f32],
        w: u32,
        h: u32,
        d: u32,
        quality: Quality,
    ) -> TranscodeResult<Vec<u8>> {
        let (w, h, d) = (w as usize, h as usize, d as usize);
        let expected = w * h * d * 4;
        if rgba.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: rgba.len(),
            }
            .into());
        }
        let blocks_wide = w.div_ceil(BLOCK_DIM);
        let blocks_high = h.div_ceil(BLOCK_DIM);
        let passes = refine_passes(quality);

        let mut out = Vec::with_capacity(blocks_wide * blocks_high * d * BLOCK_BYTES);
        let mut texels = [[0.0f32; 4]; BLOCK_TEXELS];
        for z in 0..d {
            for by in 0..blocks_high {
                for bx in 0..blocks_wide {
                    // Edge texels replicate into partial blocks.
                    for t in 0..BLOCK_TEXELS {
                        let x = (bx * BLOCK_DIM + t % BLOCK_DIM).min(w - 1);
                        let y = (by * BLOCK_DIM + t / BLOCK_DIM).min(h - 1);
                        let i = ((z * h + y) * w + x) * 4;
                        texels[t].copy_from_slice(&rgba[i..i + 4]);
                    }
                    out.extend_from_slice(&encode_block(&texels, passes));
                }
            }
        }
        Ok(out)
    }
}

fn encode_block(texels: &[[f32; 4]; BLOCK_TEXELS], passes: u32) -> [u8; BLOCK_BYTES] {
    let opaque_mode = texels.iter().all(|t| t[3] >= 0.5);
    let visible: Vec<[f32; 3]> = texels
        .iter()
        .filter(|t| t[3] >= 0.5)
        .map(|t| [t[0], t[1], t[2]])
        .collect();

    // Fully transparent block: equal endpoints select three-colour mode,
    // every index points at transparent black.
    if visible.is_empty() {
        return [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
    }

    // Bounding-box endpoints.
    let mut lo = visible[0];
    let mut hi = visible[0];
    for rgb in &visible {
        for c in 0..3 {
            lo[c] = lo[c].min(rgb[c]);
            hi[c] = hi[c].max(rgb[c]);
        }
    }
    let mut c0 = Color565::quantize(hi);
    let mut c1 = Color565::quantize(lo);
    (c0, c1) = order_endpoints(c0, c1, opaque_mode);
    let mut indices = fit_indices(texels, c0, c1, opaque_mode);

    for _ in 0..passes {
        let Some((r0, r1)) = refine_endpoints(texels, &indices, opaque_mode) else {
            break;
        };
        let (n0, n1) = order_endpoints(
            Color565::quantize(r0),
            Color565::quantize(r1),
            opaque_mode,
        );
        if (n0, n1) == (c0, c1) {
            break;
        }
        (c0, c1) = (n0, n1);
        indices = fit_indices(texels, c0, c1, opaque_mode);
    }

    let mut bits = 0u32;
    for (t, &index) in indices.iter().enumerate() {
        bits |= (index as u32) << (2 * t);
    }
    let mut block = [0u8; BLOCK_BYTES];
    block[0..2].copy_from_slice(&c0.0.to_le_bytes());
    block[2..4].copy_from_slice(&c1.0.to_le_bytes());
    block[4..8].copy_from_slice(&bits.to_le_bytes());
    block
}

/// Orders quantized endpoints so the decoder picks the intended mode:
/// four-colour needs `c0 > c1`, three-colour needs `c0 <= c1`. Equal
/// endpoints decode as three-colour, which is still correct for opaque
/// blocks because index 3 is never emitted then.
fn order_endpoints(c0: Color565, c1: Color565, opaque_mode: bool) -> (Color565, Color565) {
    if (opaque_mode && c0.0 < c1.0) || (!opaque_mode && c0.0 > c1.0) {
        (c1, c0)
    } else {
        (c0, c1)
    }
}

fn fit_indices(
    texels: &[[f32; 4]; BLOCK_TEXELS],
    c0: Color565,
    c1: Color565,
    opaque_mode: bool,
) -> [u8; BLOCK_TEXELS] {
    let entries = palette(c0, c1);
    let candidates: &[usize] = if opaque_mode && c0.0 > c1.0 {
        &[0, 1, 2, 3]
    } else {
        // Three-colour palette (or degenerate equal endpoints).
        &[0, 1, 2]
    };

    let mut indices = [0u8; BLOCK_TEXELS];
    for (t, texel) in texels.iter().enumerate() {
        if !opaque_mode && texel[3] < 0.5 {
            indices[t] = 3;
            continue;
        }
        let mut best = 0usize;
        let mut best_err = f32::INFINITY;
        for &candidate in candidates {
            let entry = &entries[candidate];
            let err = (0..3)
                .map(|c| (texel[c] - entry[c]) * (texel[c] - entry[c]))
                .sum::<f32>();
            if err < best_err {
                best_err = err;
                best = candidate;
            }
        }
        indices[t] = best as u8;
    }
    indices
}

/// Solves the weighted least-squares system for new endpoints given fixed
/// palette indices. Returns `None` when the system is degenerate (all
/// texels on one endpoint, or no visible texels).
fn refine_endpoints(
    texels: &[[f32; 4]; BLOCK_TEXELS],
    indices: &[u8; BLOCK_TEXELS],
    opaque_mode: bool,
) -> Option<([f32; 3], [f32; 3])> {
    let mut a00 = 0.0f32;
    let mut a01 = 0.0f32;
    let mut a11 = 0.0f32;
    let mut b0 = [0.0f32; 3];
    let mut b1 = [0.0f32; 3];

    for (t, texel) in texels.iter().enumerate() {
        if indices[t] == 3 && !opaque_mode {
            continue;
        }
        let (w0, w1) = index_weights(opaque_mode, indices[t] as usize);
        a00 += w0 * w0;
        a01 += w0 * w1;
        a11 += w1 * w1;
        for c in 0..3 {
            b0[c] += w0 * texel[c];
            b1[c] += w1 * texel[c];
        }
    }

    let det = a00 * a11 - a01 * a01;
    if det.abs() < 1e-6 {
        return None;
    }
    let mut e0 = [0.0f32; 3];
    let mut e1 = [0.0f32; 3];
    for c in 0..3 {
        e0[c] = (a11 * b0[c] - a01 * b1[c]) / det;
        e1[c] = (a00 * b1[c] - a01 * b0[c]) / det;
    }
    Some((e0, e1))
}
