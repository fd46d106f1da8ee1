//! Error types for texture construction, transforms and transcoding.

use crate::pixel_format::{ChannelType, PixelFormat};
use thiserror::Error;

/// Result type for texture construction and accessor operations
pub type TextureResult<T> = Result<T, TextureError>;

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for transcode operations
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Errors raised while constructing a texture or addressing its surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// The pixel buffer does not match the size implied by the header
    #[error("texture data size mismatch: expected {expected} bytes, got {actual} bytes")]
    DataSizeMismatch { expected: usize, actual: usize },

    /// One or more dimensions are zero
    #[error("invalid texture dimensions {width}x{height}x{depth}")]
    InvalidDimensions { width: u32, height: u32, depth: u32 },

    /// Face count must be 1, or 6 for cubemaps
    #[error("face count must be 1 or 6, got {0}")]
    InvalidFaceCount(u32),

    /// Cubemap faces are two-dimensional
    #[error("cubemaps must have depth 1, got depth {0}")]
    CubemapWithDepth(u32),

    /// Mip level count outside the valid chain length for the dimensions
    #[error("mip level count {count} out of range (1..={max} for these dimensions)")]
    InvalidMipCount { count: u32, max: u32 },

    /// Surface accessor addressed a mip level past the end of the chain
    #[error("mip level {level} out of range ({count} levels)")]
    MipLevelOutOfRange { level: u32, count: u32 },

    /// Surface accessor addressed a face past the face count
    #[error("face {face} out of range ({count} faces)")]
    FaceOutOfRange { face: u32, count: u32 },
}

/// Errors raised by the transform engine.
///
/// Transforms never partially mutate caller-visible state: on error the
/// input texture is untouched and no result is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Operation precondition violated: the texture already carries a mip
    /// chain. Resize and mipmap generation only accept single-level input;
    /// apply transforms first and generate mipmaps last.
    #[error(
        "operation requires a texture with a single mip level, found {0}; \
         apply transforms before generating mipmaps"
    )]
    MipChainPresent(u32),

    /// The pixel format cannot be processed by this operation
    /// (block-compressed data must be transcoded to an uncompressed
    /// format first).
    #[error("{op} does not support pixel format {format}")]
    UnsupportedFormat {
        op: &'static str,
        format: PixelFormat,
    },

    /// The stored channel type does not match the channel widths of the
    /// pixel format, so the pixel data cannot be interpreted.
    #[error("channel type {channel_type:?} does not match the channel widths of format {format}")]
    ChannelTypeMismatch {
        channel_type: ChannelType,
        format: PixelFormat,
    },

    /// Rotating a cubemap around X or Y would turn face extents into
    /// depth, which cubemaps cannot carry.
    #[error("cubemaps can only be rotated around the Z axis")]
    CubemapRotationAxis,

    /// Equirectangular projection needs a 2:1 panorama
    #[error("equirectangular source must have 2:1 aspect ratio, got {width}x{height}")]
    NotEquirectangular { width: u32, height: u32 },

    /// Cubemap projection needs a flat, single-face, single-mip source
    #[error("cubemap projection requires a single-face, single-mip source with depth 1")]
    InvalidProjectionSource,

    /// Underlying texture error while assembling the result
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Errors raised by the pixel-format transcoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscodeError {
    /// No codec is available for the requested (or source) compressed format
    #[error("no codec available for pixel format {0}")]
    NoCodec(PixelFormat),

    /// The requested channel type cannot be stored in the requested format,
    /// e.g. float channel data in 8-bit normalized channels.
    #[error("channel type {channel_type:?} is not representable in pixel format {format}")]
    IncompatibleChannelType {
        channel_type: ChannelType,
        format: PixelFormat,
    },

    /// Source texture cannot be interpreted with its stored channel type
    #[error("source channel type {channel_type:?} does not match the channel widths of format {format}")]
    SourceChannelTypeMismatch {
        channel_type: ChannelType,
        format: PixelFormat,
    },

    /// Underlying texture error while assembling the result
    #[error(transparent)]
    Texture(#[from] TextureError),
}
