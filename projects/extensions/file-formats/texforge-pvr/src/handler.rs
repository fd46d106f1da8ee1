//! The PVR-style [`ContainerHandler`].

use endian_writer::{EndianReader, EndianWriter, LittleEndianReader, LittleEndianWriter};
use log::trace;
use texforge_core::{
    ChannelType, ColourSpace, Orientation, PixelFormat, Texture, TextureHeader,
};
use texforge_file_formats_api::{
    ContainerHandler, DecodeError, DecodeResult, EncodeResult,
};

use crate::constants::*;

/// Handler for the PVR-style container.
///
/// The container's pixel format, channel type and colour space codes map
/// one to one onto [`PixelFormat`], [`ChannelType`] and [`ColourSpace`],
/// and surface data is stored mip-major, face-major, so decoding and
/// encoding move bytes without reordering. Orientation flags ride in a
/// metadata entry; unknown metadata entries are skipped on read and none
/// are written back.
pub struct PvrHandler;

impl PvrHandler {
    fn parse_header(&self, input: &[u8]) -> DecodeResult<(TextureHeader, usize)> {
        if input.len() < PVR_HEADER_SIZE {
            return Err(DecodeError::Truncated {
                required: PVR_HEADER_SIZE,
                actual: input.len(),
            });
        }

        // SAFETY: input.len() >= PVR_HEADER_SIZE (52), and every fixed
        // header offset read below is at most 0x30 + 4.
        let mut reader = unsafe { LittleEndianReader::new(input.as_ptr()) };
        let magic = unsafe { reader.read_u32_at(0) };
        if magic != PVR_MAGIC {
            return Err(DecodeError::InvalidHeader {
                container: "pvr",
                reason: "magic mismatch",
            });
        }

        let (format_raw, colour_space_raw, channel_type_raw) = unsafe {
            let lo = reader.read_u32_at(PIXEL_FORMAT_LO_OFFSET as isize) as u64;
            let hi = reader.read_u32_at(PIXEL_FORMAT_HI_OFFSET as isize) as u64;
            (
                lo | hi << 32,
                reader.read_u32_at(COLOUR_SPACE_OFFSET as isize),
                reader.read_u32_at(CHANNEL_TYPE_OFFSET as isize),
            )
        };
        let (height, width, depth, num_surfaces, num_faces, mip_count, metadata_size) = unsafe {
            (
                reader.read_u32_at(HEIGHT_OFFSET as isize),
                reader.read_u32_at(WIDTH_OFFSET as isize),
                reader.read_u32_at(DEPTH_OFFSET as isize),
                reader.read_u32_at(NUM_SURFACES_OFFSET as isize),
                reader.read_u32_at(NUM_FACES_OFFSET as isize),
                reader.read_u32_at(MIP_COUNT_OFFSET as isize),
                reader.read_u32_at(METADATA_SIZE_OFFSET as isize),
            )
        };

        let pixel_format = PixelFormat::from_raw(format_raw)
            .ok_or(DecodeError::UnknownPixelFormat(format_raw))?;
        let channel_type = ChannelType::from_raw(channel_type_raw)
            .ok_or(DecodeError::UnknownChannelType(channel_type_raw))?;
        let colour_space = ColourSpace::from_raw(colour_space_raw)
            .ok_or(DecodeError::UnknownColourSpace(colour_space_raw))?;
        if num_surfaces != 1 {
            return Err(DecodeError::InvalidHeader {
                container: "pvr",
                reason: "surface arrays are not supported",
            });
        }

        let metadata_size = metadata_size as usize;
        let data_offset = PVR_HEADER_SIZE + metadata_size;
        if input.len() < data_offset {
            return Err(DecodeError::Truncated {
                required: data_offset,
                actual: input.len(),
            });
        }
        let orientation =
            parse_metadata(&input[PVR_HEADER_SIZE..data_offset])?;

        let header = TextureHeader {
            width,
            height,
            depth,
            num_faces,
            num_mip_levels: mip_count,
            pixel_format,
            channel_type,
            colour_space,
            orientation,
        };
        Ok((header, data_offset))
    }
}

/// Walks the metadata block, returning the orientation entry's flags (or
/// the default when absent).
fn parse_metadata(block: &[u8]) -> DecodeResult<Orientation> {
    let mut orientation = Orientation::default();
    let mut offset = 0usize;
    while offset < block.len() {
        if block.len() - offset < METADATA_ENTRY_HEADER_SIZE {
            return Err(DecodeError::InvalidHeader {
                container: "pvr",
                reason: "metadata entry overruns the metadata block",
            });
        }
        // SAFETY: at least METADATA_ENTRY_HEADER_SIZE (12) bytes remain
        // past `offset`, covering the three u32 reads.
        let mut reader = unsafe { LittleEndianReader::new(block[offset..].as_ptr()) };
        let (fourcc, key, size) = unsafe {
            (
                reader.read_u32_at(0),
                reader.read_u32_at(4),
                reader.read_u32_at(8) as usize,
            )
        };
        let payload_start = offset + METADATA_ENTRY_HEADER_SIZE;
        if block.len() - payload_start < size {
            return Err(DecodeError::InvalidHeader {
                container: "pvr",
                reason: "metadata entry overruns the metadata block",
            });
        }
        let payload = &block[payload_start..payload_start + size];

        if fourcc == METADATA_FOURCC
            && key == METADATA_KEY_ORIENTATION
            && size >= ORIENTATION_PAYLOAD_SIZE
        {
            orientation = Orientation {
                x: payload[0] != 0,
                y: payload[1] != 0,
                z: payload[2] != 0,
            };
        } else {
            trace!("skipping pvr metadata entry {fourcc:#010x}/{key}");
        }
        offset = payload_start + size;
    }
    Ok(orientation)
}

impl ContainerHandler for PvrHandler {
    fn name(&self) -> &'static str {
        "pvr"
    }

    fn can_handle(&self, input: &[u8]) -> bool {
        if input.len() < 4 {
            return false;
        }
        // SAFETY: length checked directly above.
        let mut reader = unsafe { LittleEndianReader::new(input.as_ptr()) };
        unsafe { reader.read_u32_at(0) == PVR_MAGIC }
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["pvr"]
    }

    fn decode(&self, input: &[u8]) -> DecodeResult<Texture> {
        let (header, data_offset) = self.parse_header(input)?;
        // Surface data is already in the internal order; Texture::new
        // validates the header and the exact payload length.
        Ok(Texture::new(header, input[data_offset..].to_vec())?)
    }

    fn encode(&self, texture: &Texture) -> EncodeResult<Vec<u8>> {
        let header = texture.header();
        let metadata_size = METADATA_ENTRY_HEADER_SIZE + ORIENTATION_PAYLOAD_SIZE;
        let data_offset = PVR_HEADER_SIZE + metadata_size;
        let mut out = vec![0u8; data_offset + texture.data().len()];

        // SAFETY: out.len() >= PVR_HEADER_SIZE + metadata_size; all writes
        // below stay inside the fixed header and the metadata entry.
        let mut writer = unsafe { LittleEndianWriter::new(out.as_mut_ptr()) };
        let raw = header.pixel_format.raw_value();
        unsafe {
            writer.write_u32_at(PVR_MAGIC, 0);
            writer.write_u32_at(0, FLAGS_OFFSET as isize);
            writer.write_u32_at(raw as u32, PIXEL_FORMAT_LO_OFFSET as isize);
            writer.write_u32_at((raw >> 32) as u32, PIXEL_FORMAT_HI_OFFSET as isize);
            writer.write_u32_at(header.colour_space.to_raw(), COLOUR_SPACE_OFFSET as isize);
            writer.write_u32_at(header.channel_type.to_raw(), CHANNEL_TYPE_OFFSET as isize);
            writer.write_u32_at(header.height, HEIGHT_OFFSET as isize);
            writer.write_u32_at(header.width, WIDTH_OFFSET as isize);
            writer.write_u32_at(header.depth, DEPTH_OFFSET as isize);
            writer.write_u32_at(1, NUM_SURFACES_OFFSET as isize);
            writer.write_u32_at(header.num_faces, NUM_FACES_OFFSET as isize);
            writer.write_u32_at(header.num_mip_levels, MIP_COUNT_OFFSET as isize);
            writer.write_u32_at(metadata_size as u32, METADATA_SIZE_OFFSET as isize);

            writer.write_u32_at(METADATA_FOURCC, PVR_HEADER_SIZE as isize);
            writer.write_u32_at(
                METADATA_KEY_ORIENTATION,
                (PVR_HEADER_SIZE + 4) as isize,
            );
            writer.write_u32_at(
                ORIENTATION_PAYLOAD_SIZE as u32,
                (PVR_HEADER_SIZE + 8) as isize,
            );
        }
        let payload = PVR_HEADER_SIZE + METADATA_ENTRY_HEADER_SIZE;
        out[payload] = header.orientation.x as u8;
        out[payload + 1] = header.orientation.y as u8;
        out[payload + 2] = header.orientation.z as u8;

        out[data_offset..].copy_from_slice(texture.data());
        Ok(out)
    }
}
