//! DDS format constants and definitions
#![allow(dead_code)]

/// Magic header for DDS files ('DDS ' in little-endian byte order).
pub(crate) const DDS_MAGIC: u32 = 0x2053_4444;

/// Size of the magic plus the 124-byte header.
pub(crate) const DDS_HEADER_SIZE: usize = 0x80;

// Header field offsets
pub(crate) const DDS_SIZE_OFFSET: usize = 0x04;
pub(crate) const DDS_FLAGS_OFFSET: usize = 0x08;
pub(crate) const DDS_HEIGHT_OFFSET: usize = 0x0C;
pub(crate) const DDS_WIDTH_OFFSET: usize = 0x10;
pub(crate) const DDS_PITCH_OR_LINEAR_SIZE_OFFSET: usize = 0x14;
pub(crate) const DDS_DEPTH_OFFSET: usize = 0x18;
pub(crate) const DDS_MIPMAP_COUNT_OFFSET: usize = 0x1C;

// Reserved words repurposed for fields DDS never standardized.
pub(crate) const DDS_CHANNEL_TYPE_OFFSET: usize = 0x20;
pub(crate) const DDS_COLOUR_SPACE_OFFSET: usize = 0x24;
pub(crate) const DDS_ORIENTATION_OFFSET: usize = 0x28;

// Pixel format block
pub(crate) const DDS_PIXELFORMAT_SIZE_OFFSET: usize = 0x4C;
pub(crate) const DDS_PIXELFORMAT_FLAGS_OFFSET: usize = 0x50;
pub(crate) const DDS_PIXELFORMAT_FOURCC_OFFSET: usize = 0x54;
pub(crate) const DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET: usize = 0x58;
pub(crate) const DDS_PIXELFORMAT_RBITMASK_OFFSET: usize = 0x5C;
pub(crate) const DDS_PIXELFORMAT_GBITMASK_OFFSET: usize = 0x60;
pub(crate) const DDS_PIXELFORMAT_BBITMASK_OFFSET: usize = 0x64;
pub(crate) const DDS_PIXELFORMAT_ABITMASK_OFFSET: usize = 0x68;

pub(crate) const DDS_CAPS_OFFSET: usize = 0x6C;
pub(crate) const DDS_CAPS2_OFFSET: usize = 0x70;

// Header size values
pub(crate) const DDS_HEADER_STRUCT_SIZE: u32 = 124;
pub(crate) const DDS_PIXELFORMAT_STRUCT_SIZE: u32 = 32;

// dwFlags bits
pub(crate) const DDSD_CAPS: u32 = 0x1;
pub(crate) const DDSD_HEIGHT: u32 = 0x2;
pub(crate) const DDSD_WIDTH: u32 = 0x4;
pub(crate) const DDSD_PIXELFORMAT: u32 = 0x1000;
pub(crate) const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;
pub(crate) const DDSD_DEPTH: u32 = 0x80_0000;

// ddspf.dwFlags bits
pub(crate) const DDPF_ALPHAPIXELS: u32 = 0x1;
pub(crate) const DDPF_FOURCC: u32 = 0x4;
pub(crate) const DDPF_RGB: u32 = 0x40;
pub(crate) const DDPF_LUMINANCE: u32 = 0x2_0000;

pub(crate) const FOURCC_DXT1: u32 = 0x3154_5844; // 'DXT1'
pub(crate) const FOURCC_DXT3: u32 = 0x3354_5844; // 'DXT3'
pub(crate) const FOURCC_DXT5: u32 = 0x3554_5844; // 'DXT5'

// dwCaps / dwCaps2 bits
pub(crate) const DDSCAPS_COMPLEX: u32 = 0x8;
pub(crate) const DDSCAPS_TEXTURE: u32 = 0x1000;
pub(crate) const DDSCAPS_MIPMAP: u32 = 0x40_0000;
pub(crate) const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub(crate) const DDSCAPS2_CUBEMAP_ALL_FACES: u32 = 0xFC00;
pub(crate) const DDSCAPS2_VOLUME: u32 = 0x20_0000;
