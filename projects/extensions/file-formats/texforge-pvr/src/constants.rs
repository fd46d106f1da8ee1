//! PVR-style container constants
#![allow(dead_code)]

/// Magic header: 'PVR' followed by the container version.
pub(crate) const PVR_MAGIC: u32 = 0x0352_5650;

/// Size of the fixed header preceding metadata and surface data.
pub(crate) const PVR_HEADER_SIZE: usize = 52;

// Fixed header field offsets
pub(crate) const FLAGS_OFFSET: usize = 0x04;
pub(crate) const PIXEL_FORMAT_LO_OFFSET: usize = 0x08;
pub(crate) const PIXEL_FORMAT_HI_OFFSET: usize = 0x0C;
pub(crate) const COLOUR_SPACE_OFFSET: usize = 0x10;
pub(crate) const CHANNEL_TYPE_OFFSET: usize = 0x14;
pub(crate) const HEIGHT_OFFSET: usize = 0x18;
pub(crate) const WIDTH_OFFSET: usize = 0x1C;
pub(crate) const DEPTH_OFFSET: usize = 0x20;
pub(crate) const NUM_SURFACES_OFFSET: usize = 0x24;
pub(crate) const NUM_FACES_OFFSET: usize = 0x28;
pub(crate) const MIP_COUNT_OFFSET: usize = 0x2C;
pub(crate) const METADATA_SIZE_OFFSET: usize = 0x30;

// Metadata entries: fourcc, key, payload size, then the payload.
pub(crate) const METADATA_ENTRY_HEADER_SIZE: usize = 12;

/// First-party metadata entries use the container magic as their fourcc.
pub(crate) const METADATA_FOURCC: u32 = PVR_MAGIC;

/// Orientation entry: three bytes, one per axis, nonzero means flipped.
pub(crate) const METADATA_KEY_ORIENTATION: u32 = 3;
pub(crate) const ORIENTATION_PAYLOAD_SIZE: usize = 3;
