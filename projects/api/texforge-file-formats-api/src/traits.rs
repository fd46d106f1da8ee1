//! Core trait for container handlers.

use texforge_core::Texture;

use crate::error::{DecodeResult, EncodeResult};

/// A codec for one on-disk container format.
///
/// Handlers are stateless and shareable: dispatch helpers take slices of
/// `&dyn ContainerHandler`, and applications typically keep one instance
/// of each handler for the lifetime of the process.
///
/// Decoding always produces a [`Texture`] in the library's canonical
/// surface order (mip-major, then face-major); handlers whose on-disk
/// layout differs reorder internally. Decode-only handlers (delegated
/// photographic formats) return
/// [`EncodeError::ReadOnlyContainer`](crate::error::EncodeError::ReadOnlyContainer)
/// from [`encode`](Self::encode).
pub trait ContainerHandler: Send + Sync {
    /// Short lower-case name for log and error messages, e.g. `"pvr"`.
    fn name(&self) -> &'static str;

    /// Cheap content sniff: does the input look like this container?
    ///
    /// Must not allocate or parse beyond what identification requires;
    /// dispatch calls this for every registered handler.
    fn can_handle(&self, input: &[u8]) -> bool;

    /// File extensions (lower-case, no dot) this handler serves.
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Parses the full input into a texture.
    fn decode(&self, input: &[u8]) -> DecodeResult<Texture>;

    /// Serializes a texture into this container's byte format.
    fn encode(&self, texture: &Texture) -> EncodeResult<Vec<u8>>;
}
