//! Error types shared by all container handlers.

use texforge_core::{ChannelType, PixelFormat, TextureError};
use thiserror::Error;

/// Result type for container decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for container encode operations
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors raised while decoding a container into a texture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No handler recognized the input bytes
    #[error("input does not match any known container format")]
    UnknownContainer,

    /// The input ended before the structure it promised
    #[error("container truncated: need {required} bytes, have {actual}")]
    Truncated { required: usize, actual: usize },

    /// A header field holds a value the handler cannot accept
    #[error("invalid {container} header: {reason}")]
    InvalidHeader {
        container: &'static str,
        reason: &'static str,
    },

    /// The stored pixel format code does not name a known format
    #[error("unknown pixel format code {0:#018x}")]
    UnknownPixelFormat(u64),

    /// The stored channel type code is out of range
    #[error("unknown channel type code {0}")]
    UnknownChannelType(u32),

    /// The stored colour space code is out of range
    #[error("unknown colour space code {0}")]
    UnknownColourSpace(u32),

    /// A delegated decoder failed; the message is the library's own
    #[error("delegated decoder failed: {0}")]
    External(String),

    /// Decoded fields produced an inconsistent texture
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Errors raised while encoding a texture into a container.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The container has no representation for this pixel format
    #[error("{container} cannot represent pixel format {format}")]
    Unrepresentable {
        container: &'static str,
        format: PixelFormat,
    },

    /// The container has no representation for this channel type
    #[error("{container} cannot represent channel type {channel_type:?}")]
    UnrepresentableChannelType {
        container: &'static str,
        channel_type: ChannelType,
    },

    /// The handler only decodes (delegated photographic formats)
    #[error("{0} is decode-only")]
    ReadOnlyContainer(&'static str),

    /// The texture to encode is internally inconsistent
    #[error(transparent)]
    Texture(#[from] TextureError),
}
