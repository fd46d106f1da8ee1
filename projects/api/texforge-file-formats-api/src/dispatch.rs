//! Handler selection by content or file extension.

use log::debug;
use texforge_core::Texture;

use crate::error::{DecodeError, DecodeResult};
use crate::traits::ContainerHandler;

/// Decodes `input` with the first handler whose sniff accepts it.
///
/// Handlers are tried in slice order, so put cheap, magic-number based
/// sniffs before permissive ones.
///
/// # Return
///
/// The decoded texture, [`DecodeError::UnknownContainer`] when no sniff
/// matches, or the matching handler's own decode error.
pub fn decode_with_handlers(
    input: &[u8],
    handlers: &[&dyn ContainerHandler],
) -> DecodeResult<Texture> {
    for handler in handlers {
        if handler.can_handle(input) {
            debug!("decoding {} byte input as {}", input.len(), handler.name());
            return handler.decode(input);
        }
    }
    Err(DecodeError::UnknownContainer)
}

/// Picks the handler serving a file extension (case-insensitive, with or
/// without a leading dot).
pub fn handler_for_extension<'a>(
    extension: &str,
    handlers: &[&'a dyn ContainerHandler],
) -> Option<&'a dyn ContainerHandler> {
    let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
    handlers
        .iter()
        .find(|h| h.supported_extensions().contains(&wanted.as_str()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EncodeError, EncodeResult};
    use rstest::rstest;
    use texforge_core::{ChannelType, PixelFormat, TextureHeader};

    /// Accepts inputs starting with its magic byte and decodes them to a
    /// fixed 1x1 texture.
    struct StubHandler {
        name: &'static str,
        magic: u8,
    }

    impl ContainerHandler for StubHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn can_handle(&self, input: &[u8]) -> bool {
            input.first() == Some(&self.magic)
        }

        fn supported_extensions(&self) -> &'static [&'static str] {
            &["stub"]
        }

        fn decode(&self, _input: &[u8]) -> DecodeResult<Texture> {
            let header = TextureHeader::new_2d(
                1,
                1,
                PixelFormat::RGBA8888,
                ChannelType::UnsignedByteNorm,
            );
            Ok(Texture::new(header, vec![self.magic; 4])?)
        }

        fn encode(&self, _texture: &Texture) -> EncodeResult<Vec<u8>> {
            Err(EncodeError::ReadOnlyContainer(self.name))
        }
    }

    #[test]
    fn first_matching_sniff_wins() {
        let a = StubHandler { name: "a", magic: 1 };
        let b = StubHandler { name: "b", magic: 2 };
        let handlers: [&dyn ContainerHandler; 2] = [&a, &b];
        let tex = decode_with_handlers(&[2, 0, 0], &handlers).unwrap();
        assert_eq!(tex.data(), &[2, 2, 2, 2]);
    }

    #[test]
    fn unmatched_input_reports_unknown_container() {
        let a = StubHandler { name: "a", magic: 1 };
        let handlers: [&dyn ContainerHandler; 1] = [&a];
        assert_eq!(
            decode_with_handlers(&[9], &handlers),
            Err(DecodeError::UnknownContainer)
        );
    }

    #[rstest]
    #[case(".STUB", true)]
    #[case("stub", true)]
    #[case(".stub", true)]
    #[case("StUb", true)]
    #[case("png", false)]
    #[case("", false)]
    fn extension_lookup_normalizes_case_and_dot(#[case] extension: &str, #[case] found: bool) {
        let a = StubHandler { name: "a", magic: 1 };
        let handlers: [&dyn ContainerHandler; 1] = [&a];
        assert_eq!(handler_for_extension(extension, &handlers).is_some(), found);
    }
}
