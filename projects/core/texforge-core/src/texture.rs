//! # Texture data model
//!
//! A [`Texture`] is a header plus an exclusively owned pixel buffer. The
//! header fully determines the buffer size: mip level `k` of an extent `e`
//! has size `max(1, e >> k)`, each level stores `num_faces` surfaces, and
//! surfaces are laid out **mip-major, then face-major** (all faces of mip 0,
//! then all faces of mip 1, ...). Container crates that store a different
//! order on disk reorder on the way in/out.
//!
//! Textures are never mutated by transforms: every operation in
//! [`crate::transforms`] and [`crate::transcode`] borrows its input and
//! returns a fresh texture, so instances can be shared freely across
//! threads while transforms run.

use crate::error::{TextureError, TextureResult};
use crate::pixel_format::{ChannelType, ColourSpace, PixelFormat};
use core::fmt;

/// A spatial axis of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal (width).
    X,
    /// Vertical (height).
    Y,
    /// Depth (volume slices).
    Z,
}

/// Per-axis orientation flags.
///
/// A flag records that the texture has been flipped along that axis
/// relative to the convention it was authored in; consumers use it to
/// decide how to interpret "up". [`crate::transforms::flip`] toggles the
/// flag for the flipped axis. The default (all `false`) is the unflipped
/// authoring orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    /// Flipped along the X axis.
    pub x: bool,
    /// Flipped along the Y axis.
    pub y: bool,
    /// Flipped along the Z axis.
    pub z: bool,
}

impl Orientation {
    /// Returns the flag for one axis.
    pub fn flag(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Toggles the flag for one axis.
    pub fn toggle(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.x = !self.x,
            Axis::Y => self.y = !self.y,
            Axis::Z => self.z = !self.z,
        }
    }

    /// Packs the flags into the low three bits (container headers).
    pub fn to_bits(self) -> u32 {
        self.x as u32 | (self.y as u32) << 1 | (self.z as u32) << 2
    }

    /// Unpacks flags from the low three bits.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            x: bits & 1 != 0,
            y: bits & 2 != 0,
            z: bits & 4 != 0,
        }
    }
}

/// Texture metadata: dimensions, surface counts and pixel interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHeader {
    /// Width in texels at mip level 0.
    pub width: u32,
    /// Height in texels at mip level 0.
    pub height: u32,
    /// Depth in texels at mip level 0; 1 for flat textures.
    pub depth: u32,
    /// 1, or 6 for cubemaps.
    pub num_faces: u32,
    /// Length of the stored mip chain; at least 1.
    pub num_mip_levels: u32,
    /// Layout of each texel's channels.
    pub pixel_format: PixelFormat,
    /// Numeric interpretation of each channel.
    pub channel_type: ChannelType,
    /// Colour space the values are encoded in.
    pub colour_space: ColourSpace,
    /// Per-axis flip flags.
    pub orientation: Orientation,
}

impl TextureHeader {
    /// Header for a flat 2D texture: depth 1, one face, one mip level,
    /// linear colour space, default orientation.
    pub fn new_2d(width: u32, height: u32, format: PixelFormat, channel_type: ChannelType) -> Self {
        Self {
            width,
            height,
            depth: 1,
            num_faces: 1,
            num_mip_levels: 1,
            pixel_format: format,
            channel_type,
            colour_space: ColourSpace::Linear,
            orientation: Orientation::default(),
        }
    }

    /// Extent of one dimension at a mip level: `max(1, extent >> level)`.
    /// Total in `level`; anything past bit 31 has long since halved to 1.
    #[inline]
    pub fn mip_extent(extent: u32, level: u32) -> u32 {
        extent.checked_shr(level).unwrap_or(0).max(1)
    }

    /// Dimensions of a mip level.
    pub fn mip_dimensions(&self, level: u32) -> (u32, u32, u32) {
        (
            Self::mip_extent(self.width, level),
            Self::mip_extent(self.height, level),
            Self::mip_extent(self.depth, level),
        )
    }

    /// Longest possible mip chain for these dimensions
    /// (`log2(max extent) + 1`).
    pub fn max_mip_levels(&self) -> u32 {
        let largest = self.width.max(self.height).max(self.depth).max(1);
        32 - largest.leading_zeros()
    }

    /// Byte size of a single surface (one face) at a mip level.
    pub fn surface_size(&self, level: u32) -> usize {
        let (w, h, d) = self.mip_dimensions(level);
        self.pixel_format.surface_size(w, h, d)
    }

    /// Byte size of one whole mip level (all faces).
    pub fn level_size(&self, level: u32) -> usize {
        self.surface_size(level)
            .saturating_mul(self.num_faces as usize)
    }

    /// Total byte size of the pixel buffer implied by this header.
    ///
    /// Like [`PixelFormat::surface_size`], saturates on overflow; callers
    /// always compare the result against a real buffer length, so absurd
    /// headers fail that comparison instead of panicking. Only call with a
    /// [`validate`](Self::validate)d header: the mip count bounds the loop.
    pub fn data_size(&self) -> usize {
        (0..self.num_mip_levels)
            .fold(0usize, |total, l| total.saturating_add(self.level_size(l)))
    }

    /// Byte offset of a surface in the mip-major, face-major layout.
    fn surface_offset(&self, level: u32, face: u32) -> usize {
        let preceding_levels: usize = (0..level).map(|l| self.level_size(l)).sum();
        preceding_levels + self.surface_size(level) * face as usize
    }

    /// Checks the header's internal consistency: non-zero dimensions, a
    /// legal face count, and a mip chain no longer than the dimensions
    /// allow.
    ///
    /// [`Texture::new`] validates implicitly; container handlers call this
    /// on freshly parsed headers before computing sizes from them, so a
    /// hostile mip count never drives a size loop.
    pub fn validate(&self) -> TextureResult<()> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(TextureError::InvalidDimensions {
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        if self.num_faces != 1 && self.num_faces != 6 {
            return Err(TextureError::InvalidFaceCount(self.num_faces));
        }
        if self.num_faces == 6 && self.depth != 1 {
            return Err(TextureError::CubemapWithDepth(self.depth));
        }
        let max = self.max_mip_levels();
        if self.num_mip_levels == 0 || self.num_mip_levels > max {
            return Err(TextureError::InvalidMipCount {
                count: self.num_mip_levels,
                max,
            });
        }
        Ok(())
    }
}

/// An in-memory texture: header plus exclusively owned pixel storage.
#[derive(Clone, PartialEq)]
pub struct Texture {
    header: TextureHeader,
    data: Vec<u8>,
}

impl Texture {
    /// Builds a texture from a header and a pixel buffer.
    ///
    /// # Return
    ///
    /// Fails if the header is inconsistent (zero dimension, bad face or mip
    /// count) or if `data` does not match the size formula exactly.
    pub fn new(header: TextureHeader, data: Vec<u8>) -> TextureResult<Self> {
        header.validate()?;
        let expected = header.data_size();
        if data.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { header, data })
    }

    /// The texture's metadata.
    #[inline]
    pub fn header(&self) -> &TextureHeader {
        &self.header
    }

    /// Width at mip level 0.
    #[inline]
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Height at mip level 0.
    #[inline]
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Depth at mip level 0.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.header.depth
    }

    /// Number of faces (1, or 6 for cubemaps).
    #[inline]
    pub fn num_faces(&self) -> u32 {
        self.header.num_faces
    }

    /// Length of the stored mip chain.
    #[inline]
    pub fn num_mip_levels(&self) -> u32 {
        self.header.num_mip_levels
    }

    /// Channel layout of each texel.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.header.pixel_format
    }

    /// Numeric interpretation of each channel.
    #[inline]
    pub fn channel_type(&self) -> ChannelType {
        self.header.channel_type
    }

    /// Colour space the values are encoded in.
    #[inline]
    pub fn colour_space(&self) -> ColourSpace {
        self.header.colour_space
    }

    /// Per-axis flip flags.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.header.orientation
    }

    /// The whole pixel buffer in mip-major, face-major order.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the texture, returning the pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Relabels the colour space without touching pixel data.
    ///
    /// This is a metadata-only operation; use
    /// [`crate::transcode::transcode`] to convert values between colour
    /// spaces.
    pub fn set_colour_space(&mut self, colour_space: ColourSpace) {
        self.header.colour_space = colour_space;
    }

    /// Borrows one surface (a single face of a single mip level).
    pub fn view(&self, level: u32, face: u32) -> TextureResult<&[u8]> {
        self.check_surface(level, face)?;
        let offset = self.header.surface_offset(level, face);
        let size = self.header.surface_size(level);
        Ok(&self.data[offset..offset + size])
    }

    /// Mutably borrows one surface. Crate-internal: public mutation goes
    /// through the transform functions.
    pub(crate) fn view_mut(&mut self, level: u32, face: u32) -> TextureResult<&mut [u8]> {
        self.check_surface(level, face)?;
        let offset = self.header.surface_offset(level, face);
        let size = self.header.surface_size(level);
        Ok(&mut self.data[offset..offset + size])
    }

    /// Swaps the full contents of two surfaces at the same mip level.
    /// Both surfaces have equal sizes, so this cannot fail partway.
    pub(crate) fn swap_surfaces(&mut self, level: u32, face_a: u32, face_b: u32) -> TextureResult<()> {
        self.check_surface(level, face_a)?;
        self.check_surface(level, face_b)?;
        if face_a == face_b {
            return Ok(());
        }
        let size = self.header.surface_size(level);
        let off_a = self.header.surface_offset(level, face_a);
        let off_b = self.header.surface_offset(level, face_b);
        let (lo, hi) = if off_a < off_b {
            (off_a, off_b)
        } else {
            (off_b, off_a)
        };
        let (left, right) = self.data.split_at_mut(hi);
        left[lo..lo + size].swap_with_slice(&mut right[..size]);
        Ok(())
    }

    pub(crate) fn header_mut(&mut self) -> &mut TextureHeader {
        &mut self.header
    }

    fn check_surface(&self, level: u32, face: u32) -> TextureResult<()> {
        if level >= self.header.num_mip_levels {
            return Err(TextureError::MipLevelOutOfRange {
                level,
                count: self.header.num_mip_levels,
            });
        }
        if face >= self.header.num_faces {
            return Err(TextureError::FaceOutOfRange {
                face,
                count: self.header.num_faces,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("header", &self.header)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rgba8_header(width: u32, height: u32) -> TextureHeader {
        TextureHeader::new_2d(
            width,
            height,
            PixelFormat::RGBA8888,
            ChannelType::UnsignedByteNorm,
        )
    }

    #[test]
    fn new_rejects_wrong_buffer_size() {
        let header = rgba8_header(4, 4);
        let err = Texture::new(header, vec![0u8; 63]).unwrap_err();
        assert_eq!(
            err,
            TextureError::DataSizeMismatch {
                expected: 64,
                actual: 63
            }
        );
    }

    #[rstest]
    #[case(0, 4, 1)]
    #[case(4, 0, 1)]
    #[case(4, 4, 0)]
    fn new_rejects_zero_dimensions(#[case] w: u32, #[case] h: u32, #[case] d: u32) {
        let mut header = rgba8_header(1, 1);
        header.width = w;
        header.height = h;
        header.depth = d;
        assert!(matches!(
            Texture::new(header, Vec::new()),
            Err(TextureError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn new_rejects_bad_face_count() {
        let mut header = rgba8_header(2, 2);
        header.num_faces = 4;
        assert!(matches!(
            Texture::new(header, vec![0u8; 64]),
            Err(TextureError::InvalidFaceCount(4))
        ));
    }

    #[test]
    fn new_rejects_overlong_mip_chain() {
        let mut header = rgba8_header(8, 8);
        header.num_mip_levels = 5; // max is log2(8)+1 = 4
        assert!(matches!(
            Texture::new(header, vec![0u8; 1024]),
            Err(TextureError::InvalidMipCount { count: 5, max: 4 })
        ));
    }

    #[test]
    fn mip_extent_saturates_past_the_chain() {
        assert_eq!(TextureHeader::mip_extent(256, 40), 1);
        assert_eq!(TextureHeader::mip_extent(u32::MAX, 31), 1);
    }

    #[test]
    fn absurd_dimensions_fail_the_size_check_without_overflow() {
        let mut header = rgba8_header(u32::MAX, u32::MAX);
        header.depth = 4096;
        assert!(matches!(
            Texture::new(header, vec![0u8; 16]),
            Err(TextureError::DataSizeMismatch { .. })
        ));
    }

    #[test]
    fn data_size_sums_mip_chain_and_faces() {
        let mut header = rgba8_header(4, 4);
        header.num_mip_levels = 3;
        // 4x4 (64) + 2x2 (16) + 1x1 (4)
        assert_eq!(header.data_size(), 84);

        header.num_faces = 6;
        assert_eq!(header.data_size(), 84 * 6);
    }

    #[test]
    fn mip_dimensions_floor_halve_to_one() {
        let mut header = rgba8_header(256, 256);
        header.num_mip_levels = 9;
        assert_eq!(header.mip_dimensions(0), (256, 256, 1));
        assert_eq!(header.mip_dimensions(4), (16, 16, 1));
        assert_eq!(header.mip_dimensions(8), (1, 1, 1));
        assert_eq!(header.max_mip_levels(), 9);
    }

    #[test]
    fn views_address_mip_major_face_major_layout() {
        let mut header = rgba8_header(2, 2);
        header.num_faces = 6;
        header.num_mip_levels = 2;
        let total = header.data_size();
        let data: Vec<u8> = (0..total).map(|i| i as u8).collect();
        let tex = Texture::new(header, data).unwrap();

        // mip 0: 6 faces of 16 bytes; mip 1: 6 faces of 4 bytes
        assert_eq!(tex.view(0, 0).unwrap()[0], 0);
        assert_eq!(tex.view(0, 3).unwrap()[0], 48);
        assert_eq!(tex.view(1, 0).unwrap()[0], 96);
        assert_eq!(tex.view(1, 5).unwrap().len(), 4);
        assert!(tex.view(2, 0).is_err());
        assert!(tex.view(0, 6).is_err());
    }

    #[test]
    fn swap_surfaces_exchanges_whole_faces() {
        let mut header = rgba8_header(1, 1);
        header.num_faces = 6;
        let data: Vec<u8> = (0..24).collect();
        let mut tex = Texture::new(header, data).unwrap();
        tex.swap_surfaces(0, 2, 3).unwrap();
        assert_eq!(tex.view(0, 2).unwrap(), &[12, 13, 14, 15]);
        assert_eq!(tex.view(0, 3).unwrap(), &[8, 9, 10, 11]);
        // Other faces untouched
        assert_eq!(tex.view(0, 0).unwrap(), &[0, 1, 2, 3]);
    }
}
