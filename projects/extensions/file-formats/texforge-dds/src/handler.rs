//! The DDS-style [`ContainerHandler`].

use endian_writer::{EndianReader, EndianWriter, LittleEndianReader, LittleEndianWriter};
use log::trace;
use texforge_core::{
    ChannelType, ColourSpace, Orientation, Texture, TextureError, TextureHeader,
};
use texforge_file_formats_api::{
    ContainerHandler, DecodeError, DecodeResult, EncodeError, EncodeResult,
};

use crate::constants::*;
use crate::format::{dds_to_pixel_format, pixel_format_to_dds, DdsPixelFormat};

/// Handler for the DDS-style container.
///
/// DDS stores surfaces face-major: each face's complete mip chain in
/// turn. The handler reorders between that and the library's mip-major
/// layout on every decode and encode. Channel type, colour space and
/// orientation have no standard DDS home, so they live in the header's
/// reserved words; files from other writers leave those zeroed, which
/// reads back as 8-bit unsigned normalized, linear, unflipped.
pub struct DdsHandler;

impl ContainerHandler for DdsHandler {
    fn name(&self) -> &'static str {
        "dds"
    }

    fn can_handle(&self, input: &[u8]) -> bool {
        if input.len() < 8 {
            return false;
        }
        // SAFETY: length checked directly above.
        let mut reader = unsafe { LittleEndianReader::new(input.as_ptr()) };
        unsafe {
            reader.read_u32_at(0) == DDS_MAGIC
                && reader.read_u32_at(DDS_SIZE_OFFSET as isize) == DDS_HEADER_STRUCT_SIZE
        }
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["dds"]
    }

    fn decode(&self, input: &[u8]) -> DecodeResult<Texture> {
        let header = parse_header(input)?;

        let expected = header.data_size();
        let payload = &input[DDS_HEADER_SIZE..];
        if payload.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: payload.len(),
            }
            .into());
        }

        // Reorder disk face-major into internal mip-major.
        let mut data = vec![0u8; expected];
        for_each_surface(&header, |internal_offset, disk_offset, size| {
            data[internal_offset..internal_offset + size]
                .copy_from_slice(&payload[disk_offset..disk_offset + size]);
        });
        Ok(Texture::new(header, data)?)
    }

    fn encode(&self, texture: &Texture) -> EncodeResult<Vec<u8>> {
        let header = texture.header();
        let dds_format =
            pixel_format_to_dds(header.pixel_format).ok_or(EncodeError::Unrepresentable {
                container: "dds",
                format: header.pixel_format,
            })?;

        let mut out = vec![0u8; DDS_HEADER_SIZE + texture.data().len()];
        write_header(&mut out, header, &dds_format);

        let data = texture.data();
        for_each_surface(header, |internal_offset, disk_offset, size| {
            out[DDS_HEADER_SIZE + disk_offset..DDS_HEADER_SIZE + disk_offset + size]
                .copy_from_slice(&data[internal_offset..internal_offset + size]);
        });
        Ok(out)
    }
}

/// Visits every surface with its offset in the internal mip-major layout
/// and in the on-disk face-major layout.
fn for_each_surface(header: &TextureHeader, mut visit: impl FnMut(usize, usize, usize)) {
    // Size of one face's whole mip chain (the on-disk unit).
    let chain_size: usize = (0..header.num_mip_levels)
        .map(|l| header.surface_size(l))
        .sum();

    let mut internal_offset = 0usize;
    let mut level_start_in_chain = 0usize;
    for level in 0..header.num_mip_levels {
        let size = header.surface_size(level);
        for face in 0..header.num_faces {
            let disk_offset = face as usize * chain_size + level_start_in_chain;
            visit(internal_offset, disk_offset, size);
            internal_offset += size;
        }
        level_start_in_chain += size;
    }
}

fn parse_header(input: &[u8]) -> DecodeResult<TextureHeader> {
    if input.len() < DDS_HEADER_SIZE {
        return Err(DecodeError::Truncated {
            required: DDS_HEADER_SIZE,
            actual: input.len(),
        });
    }

    // SAFETY: input.len() >= DDS_HEADER_SIZE (128); every offset read
    // below is within the fixed header.
    let mut reader = unsafe { LittleEndianReader::new(input.as_ptr()) };
    let magic = unsafe { reader.read_u32_at(0) };
    let struct_size = unsafe { reader.read_u32_at(DDS_SIZE_OFFSET as isize) };
    if magic != DDS_MAGIC || struct_size != DDS_HEADER_STRUCT_SIZE {
        return Err(DecodeError::InvalidHeader {
            container: "dds",
            reason: "magic or header size mismatch",
        });
    }

    let (flags, height, width, depth_raw, mip_raw) = unsafe {
        (
            reader.read_u32_at(DDS_FLAGS_OFFSET as isize),
            reader.read_u32_at(DDS_HEIGHT_OFFSET as isize),
            reader.read_u32_at(DDS_WIDTH_OFFSET as isize),
            reader.read_u32_at(DDS_DEPTH_OFFSET as isize),
            reader.read_u32_at(DDS_MIPMAP_COUNT_OFFSET as isize),
        )
    };
    let (channel_type_raw, colour_space_raw, orientation_raw, caps2) = unsafe {
        (
            reader.read_u32_at(DDS_CHANNEL_TYPE_OFFSET as isize),
            reader.read_u32_at(DDS_COLOUR_SPACE_OFFSET as isize),
            reader.read_u32_at(DDS_ORIENTATION_OFFSET as isize),
            reader.read_u32_at(DDS_CAPS2_OFFSET as isize),
        )
    };
    let dds_format = unsafe {
        DdsPixelFormat {
            flags: reader.read_u32_at(DDS_PIXELFORMAT_FLAGS_OFFSET as isize),
            fourcc: reader.read_u32_at(DDS_PIXELFORMAT_FOURCC_OFFSET as isize),
            bit_count: reader.read_u32_at(DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET as isize),
            r_mask: reader.read_u32_at(DDS_PIXELFORMAT_RBITMASK_OFFSET as isize),
            g_mask: reader.read_u32_at(DDS_PIXELFORMAT_GBITMASK_OFFSET as isize),
            b_mask: reader.read_u32_at(DDS_PIXELFORMAT_BBITMASK_OFFSET as isize),
            a_mask: reader.read_u32_at(DDS_PIXELFORMAT_ABITMASK_OFFSET as isize),
        }
    };

    let pixel_format = dds_to_pixel_format(&dds_format).ok_or(DecodeError::InvalidHeader {
        container: "dds",
        reason: "unsupported pixel format block",
    })?;
    let channel_type = ChannelType::from_raw(channel_type_raw)
        .ok_or(DecodeError::UnknownChannelType(channel_type_raw))?;
    let colour_space = ColourSpace::from_raw(colour_space_raw)
        .ok_or(DecodeError::UnknownColourSpace(colour_space_raw))?;

    let num_faces = if caps2 & DDSCAPS2_CUBEMAP != 0 { 6 } else { 1 };
    if caps2 & DDSCAPS2_CUBEMAP != 0 && caps2 & DDSCAPS2_CUBEMAP_ALL_FACES != DDSCAPS2_CUBEMAP_ALL_FACES {
        // Partial cubemaps exist in old writers; there is no sensible
        // texture for them here.
        return Err(DecodeError::InvalidHeader {
            container: "dds",
            reason: "partial cubemaps are not supported",
        });
    }
    let depth = if flags & DDSD_DEPTH != 0 {
        depth_raw.max(1)
    } else {
        1
    };
    let num_mip_levels = if flags & DDSD_MIPMAPCOUNT != 0 {
        mip_raw.max(1)
    } else {
        1
    };
    trace!("dds header {width}x{height}x{depth}, {num_faces} face(s), {num_mip_levels} level(s)");

    let header = TextureHeader {
        width,
        height,
        depth,
        num_faces,
        num_mip_levels,
        pixel_format,
        channel_type,
        colour_space,
        orientation: Orientation::from_bits(orientation_raw),
    };
    // Hostile mip counts and dimensions must fail here, before any size
    // computation runs off the header.
    header.validate()?;
    Ok(header)
}

fn write_header(out: &mut [u8], header: &TextureHeader, dds_format: &DdsPixelFormat) {
    let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
    if header.num_mip_levels > 1 {
        flags |= DDSD_MIPMAPCOUNT;
    }
    if header.depth > 1 {
        flags |= DDSD_DEPTH;
    }

    let mut caps = DDSCAPS_TEXTURE;
    if header.num_mip_levels > 1 {
        caps |= DDSCAPS_COMPLEX | DDSCAPS_MIPMAP;
    }
    let mut caps2 = 0u32;
    if header.num_faces == 6 {
        caps |= DDSCAPS_COMPLEX;
        caps2 |= DDSCAPS2_CUBEMAP | DDSCAPS2_CUBEMAP_ALL_FACES;
    }
    if header.depth > 1 {
        caps2 |= DDSCAPS2_VOLUME;
    }

    // SAFETY: the caller allocated at least DDS_HEADER_SIZE (128) bytes;
    // every write below is within the fixed header.
    let mut writer = unsafe { LittleEndianWriter::new(out.as_mut_ptr()) };
    unsafe {
        writer.write_u32_at(DDS_MAGIC, 0);
        writer.write_u32_at(DDS_HEADER_STRUCT_SIZE, DDS_SIZE_OFFSET as isize);
        writer.write_u32_at(flags, DDS_FLAGS_OFFSET as isize);
        writer.write_u32_at(header.height, DDS_HEIGHT_OFFSET as isize);
        writer.write_u32_at(header.width, DDS_WIDTH_OFFSET as isize);
        writer.write_u32_at(0, DDS_PITCH_OR_LINEAR_SIZE_OFFSET as isize);
        writer.write_u32_at(header.depth, DDS_DEPTH_OFFSET as isize);
        writer.write_u32_at(header.num_mip_levels, DDS_MIPMAP_COUNT_OFFSET as isize);

        writer.write_u32_at(header.channel_type.to_raw(), DDS_CHANNEL_TYPE_OFFSET as isize);
        writer.write_u32_at(header.colour_space.to_raw(), DDS_COLOUR_SPACE_OFFSET as isize);
        writer.write_u32_at(header.orientation.to_bits(), DDS_ORIENTATION_OFFSET as isize);

        writer.write_u32_at(
            DDS_PIXELFORMAT_STRUCT_SIZE,
            DDS_PIXELFORMAT_SIZE_OFFSET as isize,
        );
        writer.write_u32_at(dds_format.flags, DDS_PIXELFORMAT_FLAGS_OFFSET as isize);
        writer.write_u32_at(dds_format.fourcc, DDS_PIXELFORMAT_FOURCC_OFFSET as isize);
        writer.write_u32_at(
            dds_format.bit_count,
            DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET as isize,
        );
        writer.write_u32_at(dds_format.r_mask, DDS_PIXELFORMAT_RBITMASK_OFFSET as isize);
        writer.write_u32_at(dds_format.g_mask, DDS_PIXELFORMAT_GBITMASK_OFFSET as isize);
        writer.write_u32_at(dds_format.b_mask, DDS_PIXELFORMAT_BBITMASK_OFFSET as isize);
        writer.write_u32_at(dds_format.a_mask, DDS_PIXELFORMAT_ABITMASK_OFFSET as isize);

        writer.write_u32_at(caps, DDS_CAPS_OFFSET as isize);
        writer.write_u32_at(caps2, DDS_CAPS2_OFFSET as isize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use rstest::rstest;

    #[test]
    fn encode_decode_round_trips_flat_texture() {
        let tex = sample_texture();
        let bytes = DdsHandler.encode(&tex).unwrap();
        assert!(DdsHandler.can_handle(&bytes));
        assert_eq!(DdsHandler.decode(&bytes).unwrap(), tex);
    }

    #[rstest]
    #[case(PixelFormat::R8)]
    #[case(PixelFormat::LA88)]
    #[case(PixelFormat::RGB888)]
    #[case(PixelFormat::BGRA8888)]
    #[case(PixelFormat::BC2)]
    #[case(PixelFormat::BC3)]
    fn round_trips_across_the_representable_formats(#[case] format: PixelFormat) {
        let header = TextureHeader::new_2d(8, 4, format, ChannelType::UnsignedByteNorm);
        let data: Vec<u8> = (0..header.data_size()).map(|i| (i * 5) as u8).collect();
        let tex = Texture::new(header, data).unwrap();
        let back = DdsHandler.decode(&DdsHandler.encode(&tex).unwrap()).unwrap();
        assert_eq!(back, tex);
    }

    #[test]
    fn cubemap_round_trips_through_face_major_reorder() {
        let tex = sample_bc1_cubemap();
        let bytes = DdsHandler.encode(&tex).unwrap();
        let back = DdsHandler.decode(&bytes).unwrap();
        assert_eq!(back, tex);
    }

    #[test]
    fn disk_layout_is_face_major() {
        // Two faces' level-0 surfaces are 4 apart internally, but a whole
        // chain apart on disk.
        let tex = sample_rgba8_cubemap_with_mips();
        let bytes = DdsHandler.encode(&tex).unwrap();
        let chain: usize = (0..tex.num_mip_levels())
            .map(|l| tex.header().surface_size(l))
            .sum();
        let payload = &bytes[DDS_HEADER_SIZE..];
        assert_eq!(&payload[..4], &tex.view(0, 0).unwrap()[..4]);
        assert_eq!(&payload[chain..chain + 4], &tex.view(0, 1).unwrap()[..4]);
        // Face 0's level 1 follows its level 0 on disk.
        let level0 = tex.header().surface_size(0);
        assert_eq!(&payload[level0..level0 + 4], &tex.view(1, 0).unwrap()[..4]);
    }

    #[test]
    fn reserved_words_carry_channel_type_space_and_orientation() {
        let tex = sample_texture();
        let bytes = DdsHandler.encode(&tex).unwrap();
        let back = DdsHandler.decode(&bytes).unwrap();
        assert_eq!(back.channel_type(), tex.channel_type());
        assert_eq!(back.colour_space(), tex.colour_space());
        assert_eq!(back.orientation(), tex.orientation());
    }

    #[test]
    fn zeroed_reserved_words_read_as_defaults() {
        let tex = sample_texture();
        let mut bytes = DdsHandler.encode(&tex).unwrap();
        for offset in [
            DDS_CHANNEL_TYPE_OFFSET,
            DDS_COLOUR_SPACE_OFFSET,
            DDS_ORIENTATION_OFFSET,
        ] {
            bytes[offset..offset + 4].copy_from_slice(&[0; 4]);
        }
        let back = DdsHandler.decode(&bytes).unwrap();
        assert_eq!(back.channel_type(), ChannelType::UnsignedByteNorm);
        assert_eq!(back.colour_space(), ColourSpace::Linear);
        assert_eq!(back.orientation(), Orientation::default());
    }

    #[test]
    fn wide_channel_formats_do_not_encode() {
        let header = TextureHeader::new_2d(
            2,
            2,
            PixelFormat::RGBA32323232,
            ChannelType::Float,
        );
        let tex = Texture::new(header, vec![0u8; header.data_size()]).unwrap();
        assert_eq!(
            DdsHandler.encode(&tex),
            Err(EncodeError::Unrepresentable {
                container: "dds",
                format: PixelFormat::RGBA32323232,
            })
        );
    }

    #[test]
    fn sniff_rejects_wrong_magic_and_header_size() {
        let tex = sample_texture();
        let mut bytes = DdsHandler.encode(&tex).unwrap();
        bytes[0] = b'X';
        assert!(!DdsHandler.can_handle(&bytes));

        let mut bytes = DdsHandler.encode(&tex).unwrap();
        bytes[DDS_SIZE_OFFSET] = 99;
        assert!(!DdsHandler.can_handle(&bytes));
    }

    #[test]
    fn truncated_input_is_reported() {
        let bytes = DdsHandler.encode(&sample_texture()).unwrap();
        assert_eq!(
            DdsHandler.decode(&bytes[..64]),
            Err(DecodeError::Truncated {
                required: DDS_HEADER_SIZE,
                actual: 64
            })
        );
    }

    #[test]
    fn unknown_pixel_format_block_is_rejected() {
        let mut bytes = DdsHandler.encode(&sample_texture()).unwrap();
        // RGB 16-bit 565 masks, which the table does not carry.
        bytes[DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET..DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET + 4]
            .copy_from_slice(&16u32.to_le_bytes());
        assert!(matches!(
            DdsHandler.decode(&bytes),
            Err(DecodeError::InvalidHeader { container: "dds", .. })
        ));
    }

    #[test]
    fn hostile_mip_count_fails_cleanly() {
        let mut bytes = DdsHandler.encode(&sample_texture()).unwrap();
        bytes[DDS_MIPMAP_COUNT_OFFSET..DDS_MIPMAP_COUNT_OFFSET + 4]
            .copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            DdsHandler.decode(&bytes),
            Err(DecodeError::Texture(
                texforge_core::TextureError::InvalidMipCount { .. }
            ))
        ));
    }

    #[test]
    fn hostile_dimensions_fail_cleanly() {
        let mut bytes = DdsHandler.encode(&sample_texture()).unwrap();
        for offset in [DDS_WIDTH_OFFSET, DDS_HEIGHT_OFFSET] {
            bytes[offset..offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        }
        assert!(matches!(
            DdsHandler.decode(&bytes),
            Err(DecodeError::Texture(
                texforge_core::TextureError::DataSizeMismatch { .. }
            ))
        ));
    }

    #[test]
    fn partial_cubemap_is_rejected() {
        let tex = sample_bc1_cubemap();
        let mut bytes = DdsHandler.encode(&tex).unwrap();
        let caps2 = DDSCAPS2_CUBEMAP | 0x400; // one face only
        bytes[DDS_CAPS2_OFFSET..DDS_CAPS2_OFFSET + 4].copy_from_slice(&caps2.to_le_bytes());
        assert!(matches!(
            DdsHandler.decode(&bytes),
            Err(DecodeError::InvalidHeader { container: "dds", .. })
        ));
    }
}
