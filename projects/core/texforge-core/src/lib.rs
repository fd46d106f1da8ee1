#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod pixel_format;
pub mod texture;
pub mod transcode;
pub mod transforms;

pub(crate) mod convert;

// Re-export the working set so most callers only need `texforge_core::*`.
pub use error::{TextureError, TranscodeError, TransformError};
pub use pixel_format::{ChannelType, ColourSpace, PixelFormat};
pub use texture::{Axis, Orientation, Texture, TextureHeader};
pub use transcode::{transcode, transcode_with, Quality, TranscodeOptions};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
