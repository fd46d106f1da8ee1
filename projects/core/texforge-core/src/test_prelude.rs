//! Shared fixtures and re-exports for this crate's tests.

pub use rstest::rstest;

pub use crate::pixel_format::{ChannelType, ColourSpace, PixelFormat};
pub use crate::texture::{Axis, Orientation, Texture, TextureHeader};
pub use crate::transforms::*;

/// A flat RGBA8 texture from explicit bytes.
pub fn rgba8_texture(width: u32, height: u32, data: Vec<u8>) -> Texture {
    let header = TextureHeader::new_2d(
        width,
        height,
        PixelFormat::RGBA8888,
        ChannelType::UnsignedByteNorm,
    );
    Texture::new(header, data).unwrap()
}

/// A flat RGB8 texture from explicit bytes.
pub fn rgb8_texture(width: u32, height: u32, data: Vec<u8>) -> Texture {
    let header = TextureHeader::new_2d(
        width,
        height,
        PixelFormat::RGB888,
        ChannelType::UnsignedByteNorm,
    );
    Texture::new(header, data).unwrap()
}

/// A flat RGBA8 texture filled with one colour.
pub fn solid_rgba8(width: u32, height: u32, rgba: [u8; 4]) -> Texture {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgba);
    }
    rgba8_texture(width, height, data)
}

/// An RGBA8 cubemap with each face filled by its own colour, faces in
/// +X, -X, +Y, -Y, +Z, -Z order.
pub fn rgba8_cubemap(size: u32, face_colours: [[u8; 4]; 6]) -> Texture {
    let mut header = TextureHeader::new_2d(
        size,
        size,
        PixelFormat::RGBA8888,
        ChannelType::UnsignedByteNorm,
    );
    header.num_faces = 6;
    let mut data = Vec::with_capacity(header.data_size());
    for colour in face_colours {
        for _ in 0..size * size {
            data.extend_from_slice(&colour);
        }
    }
    Texture::new(header, data).unwrap()
}

/// An RGBA8 texture with a mip chain, filled with sequential byte values
/// so surface boundaries are easy to assert on.
pub fn mipped_rgba8(width: u32, height: u32, levels: u32) -> Texture {
    let mut header = TextureHeader::new_2d(
        width,
        height,
        PixelFormat::RGBA8888,
        ChannelType::UnsignedByteNorm,
    );
    header.num_mip_levels = levels;
    let data: Vec<u8> = (0..header.data_size()).map(|i| i as u8).collect();
    Texture::new(header, data).unwrap()
}

/// A zero-filled BC1 texture, for exercising compressed-format rejects.
pub fn bc1_texture(width: u32, height: u32) -> Texture {
    let header = TextureHeader::new_2d(
        width,
        height,
        PixelFormat::BC1,
        ChannelType::UnsignedByteNorm,
    );
    let data = vec![0u8; header.data_size()];
    Texture::new(header, data).unwrap()
}
