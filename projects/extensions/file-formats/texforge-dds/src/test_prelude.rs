//! Shared fixtures and re-exports for this crate's tests.

pub use texforge_core::{
    ChannelType, ColourSpace, Orientation, PixelFormat, Texture, TextureHeader,
};
pub use texforge_file_formats_api::{ContainerHandler, DecodeError, EncodeError};

/// A small RGBA8 texture with a full mip chain and flipped Y orientation,
/// exercising most header fields at once.
pub fn sample_texture() -> Texture {
    let mut header = TextureHeader::new_2d(
        4,
        2,
        PixelFormat::RGBA8888,
        ChannelType::UnsignedByteNorm,
    );
    header.num_mip_levels = 3;
    header.colour_space = ColourSpace::Srgb;
    header.orientation.y = true;
    let data: Vec<u8> = (0..header.data_size()).map(|i| i as u8).collect();
    Texture::new(header, data).unwrap()
}

/// A BC1 cubemap with two mip levels.
pub fn sample_bc1_cubemap() -> Texture {
    let mut header = TextureHeader::new_2d(
        8,
        8,
        PixelFormat::BC1,
        ChannelType::UnsignedByteNorm,
    );
    header.num_faces = 6;
    header.num_mip_levels = 2;
    let data: Vec<u8> = (0..header.data_size()).map(|i| (i * 7) as u8).collect();
    Texture::new(header, data).unwrap()
}

/// An RGBA8 cubemap with mips, for checking the on-disk surface order.
pub fn sample_rgba8_cubemap_with_mips() -> Texture {
    let mut header = TextureHeader::new_2d(
        4,
        4,
        PixelFormat::RGBA8888,
        ChannelType::UnsignedByteNorm,
    );
    header.num_faces = 6;
    header.num_mip_levels = 2;
    let data: Vec<u8> = (0..header.data_size()).map(|i| (i * 3) as u8).collect();
    Texture::new(header, data).unwrap()
}
