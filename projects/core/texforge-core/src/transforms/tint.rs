//! Mip level colouring, for eyeballing which level the sampler picks.

use crate::error::TransformResult;
use crate::texture::Texture;

use super::{pack_level, require_uncompressed, unpack_level};

/// Debug palette, cycled per mip level.
const PALETTE: [[f32; 3]; 8] = [
    [1.0, 0.0, 0.0], // red
    [0.0, 1.0, 0.0], // green
    [0.0, 0.0, 1.0], // blue
    [1.0, 1.0, 0.0], // yellow
    [1.0, 0.0, 1.0], // magenta
    [0.0, 1.0, 1.0], // cyan
    [1.0, 1.0, 1.0], // white
    [0.5, 0.5, 0.5], // grey
];

/// Replaces each mip level's colour with a solid debug colour, cycling
/// through an 8-colour palette; alpha is preserved so coverage still
/// reads correctly.
pub fn colour_mipmaps(tex: &Texture) -> TransformResult<Texture> {
    require_uncompressed("colour_mipmaps", tex.header())?;

    let header = *tex.header();
    let mut data = Vec::with_capacity(header.data_size());
    for level in 0..tex.num_mip_levels() {
        let colour = PALETTE[level as usize % PALETTE.len()];
        for face in 0..tex.num_faces() {
            let mut surface = unpack_level("colour_mipmaps", tex, level, face)?;
            for texel in surface.px.chunks_exact_mut(4) {
                texel[..3].copy_from_slice(&colour);
            }
            data.extend_from_slice(&pack_level("colour_mipmaps", &header, &surface)?);
        }
    }
    Ok(Texture::new(header, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn each_level_gets_its_palette_colour() {
        let tex = generate_mipmaps(&solid_rgba8(4, 4, [9, 9, 9, 255]), None).unwrap();
        let out = colour_mipmaps(&tex).unwrap();
        for texel in out.view(0, 0).unwrap().chunks_exact(4) {
            assert_eq!(texel, &[255, 0, 0, 255]);
        }
        for texel in out.view(1, 0).unwrap().chunks_exact(4) {
            assert_eq!(texel, &[0, 255, 0, 255]);
        }
        assert_eq!(out.view(2, 0).unwrap(), &[0, 0, 255, 255]);
    }

    #[test]
    fn alpha_survives_the_tint() {
        let tex = rgba8_texture(1, 1, vec![10, 20, 30, 77]);
        let out = colour_mipmaps(&tex).unwrap();
        assert_eq!(out.data(), &[255, 0, 0, 77]);
    }
}
