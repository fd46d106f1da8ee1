//! Dispatch across the real container handlers.

use texforge_core::{ChannelType, ColourSpace, PixelFormat, Texture, TextureHeader};
use texforge_dds::DdsHandler;
use texforge_file_formats_api::{
    decode_with_handlers, handler_for_extension, ContainerHandler, DecodeError, EncodeError,
};
use texforge_image::ImageHandler;
use texforge_pvr::PvrHandler;

fn all_handlers() -> [&'static dyn ContainerHandler; 3] {
    [&PvrHandler, &DdsHandler, &ImageHandler]
}

fn sample_texture() -> Texture {
    let mut header = TextureHeader::new_2d(
        8,
        4,
        PixelFormat::RGBA8888,
        ChannelType::UnsignedByteNorm,
    );
    header.num_mip_levels = 3;
    header.colour_space = ColourSpace::Srgb;
    header.orientation.x = true;
    let data: Vec<u8> = (0..header.data_size()).map(|i| (i * 13) as u8).collect();
    Texture::new(header, data).unwrap()
}

#[test]
fn dispatch_selects_handlers_by_magic() {
    let tex = sample_texture();

    let pvr = PvrHandler.encode(&tex).unwrap();
    assert_eq!(decode_with_handlers(&pvr, &all_handlers()).unwrap(), tex);

    let dds = DdsHandler.encode(&tex).unwrap();
    assert_eq!(decode_with_handlers(&dds, &all_handlers()).unwrap(), tex);
}

#[test]
fn unrecognized_bytes_report_unknown_container() {
    assert_eq!(
        decode_with_handlers(b"not a texture", &all_handlers()),
        Err(DecodeError::UnknownContainer)
    );
}

#[test]
fn texture_survives_a_container_conversion() {
    // pvr -> dds -> pvr, all fields intact.
    let tex = sample_texture();
    let from_pvr = decode_with_handlers(&PvrHandler.encode(&tex).unwrap(), &all_handlers()).unwrap();
    let from_dds =
        decode_with_handlers(&DdsHandler.encode(&from_pvr).unwrap(), &all_handlers()).unwrap();
    assert_eq!(from_dds, tex);
}

#[test]
fn wide_formats_route_to_the_pvr_container() {
    // DDS has no representation for 32-bit float channels; PVR does.
    let header = TextureHeader::new_2d(2, 2, PixelFormat::RGBA32323232, ChannelType::Float);
    let tex = Texture::new(header, vec![0u8; header.data_size()]).unwrap();

    assert!(matches!(
        DdsHandler.encode(&tex),
        Err(EncodeError::Unrepresentable { .. })
    ));
    let bytes = PvrHandler.encode(&tex).unwrap();
    assert_eq!(decode_with_handlers(&bytes, &all_handlers()).unwrap(), tex);
}

#[test]
fn extension_lookup_covers_every_handler() {
    let handlers = all_handlers();
    for (ext, name) in [
        ("pvr", "pvr"),
        (".DDS", "dds"),
        ("jpeg", "image"),
        ("png", "image"),
        ("hdr", "image"),
    ] {
        let handler = handler_for_extension(ext, &handlers).unwrap();
        assert_eq!(handler.name(), name);
    }
    assert!(handler_for_extension("tga", &handlers).is_none());
}
