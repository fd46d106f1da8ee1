//! Crate-internal conversion between stored texel bytes and f32 RGBA
//! planes.
//!
//! Every resampling transform and the transcoder run through the same
//! pipeline: unpack a surface into interleaved `[r, g, b, a]` f32 values,
//! operate, pack back. Packing optionally applies deterministic
//! Floyd-Steinberg dithering (serpentine traversal, no randomness) when
//! quantizing to normalized integer channels.

use crate::pixel_format::{ChannelType, PixelFormat};

/// A single surface as interleaved f32 RGBA, one value per channel per
/// texel, missing channels defaulted (`a = 1.0`).
#[derive(Debug)]
pub(crate) struct SurfaceF32 {
    pub w: usize,
    pub h: usize,
    pub d: usize,
    pub px: Vec<f32>,
}

impl SurfaceF32 {
    pub(crate) fn new_zeroed(w: usize, h: usize, d: usize) -> Self {
        let mut px = vec![0.0f32; w * h * d * 4];
        // Default alpha is opaque.
        for texel in px.chunks_exact_mut(4) {
            texel[3] = 1.0;
        }
        Self { w, h, d, px }
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize, z: usize) -> usize {
        ((z * self.h + y) * self.w + x) * 4
    }

    /// Fetches a texel with clamped coordinates.
    #[inline]
    pub(crate) fn fetch(&self, x: isize, y: isize, z: isize) -> [f32; 4] {
        let x = x.clamp(0, self.w as isize - 1) as usize;
        let y = y.clamp(0, self.h as isize - 1) as usize;
        let z = z.clamp(0, self.d as isize - 1) as usize;
        let i = self.index(x, y, z);
        [self.px[i], self.px[i + 1], self.px[i + 2], self.px[i + 3]]
    }

    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, z: usize, texel: [f32; 4]) {
        let i = self.index(x, y, z);
        self.px[i..i + 4].copy_from_slice(&texel);
    }
}

/// Why a surface could not be converted to or from f32 planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConvertError {
    /// Block-compressed format: goes through a codec, not this path.
    Compressed,
    /// Channel widths that are not 8/16/32-bit byte-aligned lanes.
    UnsupportedLayout,
    /// Stored channel type does not match the format's channel widths.
    ChannelTypeMismatch,
}

/// Position of each stored channel in the RGBA plane; `None` is luminance
/// (reads as grey, writes Rec.601 luma).
fn channel_plane(name: u8) -> Option<usize> {
    match name {
        b'r' => Some(0),
        b'g' => Some(1),
        b'b' => Some(2),
        b'a' => Some(3),
        _ => None, // 'l'
    }
}

fn layout(
    format: PixelFormat,
    channel_type: ChannelType,
) -> Result<(usize, Vec<u8>, usize), ConvertError> {
    if format.is_compressed() {
        return Err(ConvertError::Compressed);
    }
    let bpp = format.bytes_per_pixel().ok_or(ConvertError::UnsupportedLayout)?;
    if !format.matches_channel_type(channel_type) {
        return Err(ConvertError::ChannelTypeMismatch);
    }
    let names: Vec<u8> = format
        .channel_names()
        .into_iter()
        .filter(|&n| n != 0)
        .collect();
    let channel_bytes = (channel_type.bits() / 8) as usize;
    Ok((bpp, names, channel_bytes))
}

/// Unpacks one stored surface into an f32 RGBA plane.
pub(crate) fn unpack_surface(
    data: &[u8],
    format: PixelFormat,
    channel_type: ChannelType,
    w: usize,
    h: usize,
    d: usize,
) -> Result<SurfaceF32, ConvertError> {
    let (bpp, names, channel_bytes) = layout(format, channel_type)?;
    let mut surface = SurfaceF32::new_zeroed(w, h, d);

    for texel in 0..w * h * d {
        let base = texel * bpp;
        let out = texel * 4;
        for (slot, &name) in names.iter().enumerate() {
            let off = base + slot * channel_bytes;
            let value = match channel_type {
                ChannelType::UnsignedByteNorm => data[off] as f32 / 255.0,
                ChannelType::SignedByteNorm => (data[off] as i8).max(-127) as f32 / 127.0,
                ChannelType::UnsignedShortNorm => {
                    u16::from_le_bytes([data[off], data[off + 1]]) as f32 / 65535.0
                }
                ChannelType::Float => f32::from_le_bytes([
                    data[off],
                    data[off + 1],
                    data[off + 2],
                    data[off + 3],
                ]),
            };
            match channel_plane(name) {
                Some(plane) => surface.px[out + plane] = value,
                None => {
                    // Luminance replicates into all colour channels.
                    surface.px[out] = value;
                    surface.px[out + 1] = value;
                    surface.px[out + 2] = value;
                }
            }
        }
    }
    Ok(surface)
}

/// Value a stored channel takes from the RGBA plane.
#[inline]
fn plane_value(texel: &[f32], name: u8) -> f32 {
    match channel_plane(name) {
        Some(plane) => texel[plane],
        // Rec.601 luma for luminance targets.
        None => 0.299 * texel[0] + 0.587 * texel[1] + 0.114 * texel[2],
    }
}

/// Packs an f32 RGBA plane back into stored bytes, optionally dithering
/// the quantization to normalized integer channels.
pub(crate) fn pack_surface(
    surface: &SurfaceF32,
    format: PixelFormat,
    channel_type: ChannelType,
    dither: bool,
) -> Result<Vec<u8>, ConvertError> {
    let (bpp, names, channel_bytes) = layout(format, channel_type)?;
    let (w, h, d) = (surface.w, surface.h, surface.d);
    let mut out = vec![0u8; w * h * d * bpp];

    for (slot, &name) in names.iter().enumerate() {
        // Per-channel value plane, so error diffusion stays independent
        // per channel and per depth slice.
        let mut values: Vec<f32> = (0..w * h * d)
            .map(|texel| plane_value(&surface.px[texel * 4..texel * 4 + 4], name))
            .collect();

        if dither && channel_type != ChannelType::Float {
            for slice in values.chunks_exact_mut(w * h) {
                diffuse_quantization_error(slice, w, h, channel_type);
            }
        }

        for (texel, &value) in values.iter().enumerate() {
            let off = texel * bpp + slot * channel_bytes;
            match channel_type {
                ChannelType::UnsignedByteNorm => {
                    out[off] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
                ChannelType::SignedByteNorm => {
                    out[off] = ((value.clamp(-1.0, 1.0) * 127.0).round() as i8) as u8;
                }
                ChannelType::UnsignedShortNorm => {
                    let q = (value.clamp(0.0, 1.0) * 65535.0).round() as u16;
                    out[off..off + 2].copy_from_slice(&q.to_le_bytes());
                }
                ChannelType::Float => {
                    out[off..off + 4].copy_from_slice(&value.to_le_bytes());
                }
            }
        }
    }
    Ok(out)
}

/// Serpentine Floyd-Steinberg error diffusion over one 2D slice.
///
/// Rewrites each value to the representable level nearest to
/// value-plus-accumulated-error and pushes the residual to the unvisited
/// neighbours (7/16 ahead, 3/16, 5/16, 1/16 on the next row; mirrored on
/// right-to-left rows). Traversal order is fixed, so output is fully
/// deterministic for a given input.
fn diffuse_quantization_error(values: &mut [f32], w: usize, h: usize, channel_type: ChannelType) {
    let (scale, lo, hi) = match channel_type {
        ChannelType::UnsignedByteNorm => (255.0f32, 0.0f32, 1.0f32),
        ChannelType::UnsignedShortNorm => (65535.0, 0.0, 1.0),
        ChannelType::SignedByteNorm => (127.0, -1.0, 1.0),
        ChannelType::Float => return,
    };

    for y in 0..h {
        let reverse = y % 2 == 1;
        for step in 0..w {
            let x = if reverse { w - 1 - step } else { step };
            let i = y * w + x;
            let want = values[i].clamp(lo, hi);
            let quantized = (want * scale).round() / scale;
            values[i] = quantized;
            let err = want - quantized;
            if err == 0.0 {
                continue;
            }

            let ahead: isize = if reverse { -1 } else { 1 };
            let mut spill = |dx: isize, dy: usize, weight: f32| {
                let nx = x as isize + dx;
                if nx < 0 || nx >= w as isize || y + dy >= h {
                    return;
                }
                values[(y + dy) * w + nx as usize] += err * weight;
            };
            spill(ahead, 0, 7.0 / 16.0);
            spill(-ahead, 1, 3.0 / 16.0);
            spill(0, 1, 5.0 / 16.0);
            spill(ahead, 1, 1.0 / 16.0);
        }
    }
}

/// sRGB transfer function, per colour channel.
#[inline]
pub(crate) fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse sRGB transfer function, per colour channel.
#[inline]
pub(crate) fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}
