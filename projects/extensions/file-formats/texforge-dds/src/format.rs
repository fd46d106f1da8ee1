//! Mapping between [`PixelFormat`] and the DDS pixel format block.

use texforge_core::PixelFormat;

use crate::constants::*;

/// The ddspf block of a DDS header, minus its fixed size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DdsPixelFormat {
    pub flags: u32,
    pub fourcc: u32,
    pub bit_count: u32,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
}

impl DdsPixelFormat {
    const fn fourcc(fourcc: u32) -> Self {
        Self {
            flags: DDPF_FOURCC,
            fourcc,
            bit_count: 0,
            r_mask: 0,
            g_mask: 0,
            b_mask: 0,
            a_mask: 0,
        }
    }

    const fn masks(flags: u32, bit_count: u32, masks: [u32; 4]) -> Self {
        Self {
            flags,
            fourcc: 0,
            bit_count,
            r_mask: masks[0],
            g_mask: masks[1],
            b_mask: masks[2],
            a_mask: masks[3],
        }
    }
}

/// Every pixel format the DDS container can represent, paired with its
/// ddspf encoding. Masks describe our in-memory byte order read as a
/// little-endian word, which is exactly the DDS convention.
const REPRESENTABLE: [(PixelFormat, DdsPixelFormat); 8] = [
    (PixelFormat::BC1, DdsPixelFormat::fourcc(FOURCC_DXT1)),
    (PixelFormat::BC2, DdsPixelFormat::fourcc(FOURCC_DXT3)),
    (PixelFormat::BC3, DdsPixelFormat::fourcc(FOURCC_DXT5)),
    (
        PixelFormat::R8,
        DdsPixelFormat::masks(DDPF_LUMINANCE, 8, [0xFF, 0, 0, 0]),
    ),
    (
        PixelFormat::LA88,
        DdsPixelFormat::masks(
            DDPF_LUMINANCE | DDPF_ALPHAPIXELS,
            16,
            [0xFF, 0, 0, 0xFF00],
        ),
    ),
    (
        PixelFormat::RGB888,
        DdsPixelFormat::masks(DDPF_RGB, 24, [0xFF, 0xFF00, 0xFF_0000, 0]),
    ),
    (
        PixelFormat::RGBA8888,
        DdsPixelFormat::masks(
            DDPF_RGB | DDPF_ALPHAPIXELS,
            32,
            [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000],
        ),
    ),
    (
        PixelFormat::BGRA8888,
        DdsPixelFormat::masks(
            DDPF_RGB | DDPF_ALPHAPIXELS,
            32,
            [0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000],
        ),
    ),
];

/// The ddspf encoding for a pixel format, `None` when DDS cannot
/// represent it.
pub(crate) fn pixel_format_to_dds(format: PixelFormat) -> Option<DdsPixelFormat> {
    REPRESENTABLE
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, dds)| *dds)
}

/// The pixel format a ddspf block describes, `None` for layouts outside
/// the supported table.
pub(crate) fn dds_to_pixel_format(dds: &DdsPixelFormat) -> Option<PixelFormat> {
    if dds.flags & DDPF_FOURCC != 0 {
        return REPRESENTABLE
            .iter()
            .find(|(_, d)| d.flags & DDPF_FOURCC != 0 && d.fourcc == dds.fourcc)
            .map(|(f, _)| *f);
    }
    REPRESENTABLE.iter().find_map(|(f, d)| {
        let masks_match = d.flags & DDPF_FOURCC == 0
            && d.bit_count == dds.bit_count
            && d.r_mask == dds.r_mask
            && d.g_mask == dds.g_mask
            && d.b_mask == dds.b_mask
            && d.a_mask == dds.a_mask;
        masks_match.then_some(*f)
    })
}
