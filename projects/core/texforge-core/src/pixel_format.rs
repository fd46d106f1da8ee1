//! # Pixel format identifiers
//!
//! A [`PixelFormat`] is a packed 64-bit identifier describing the bit layout
//! of a texel:
//!
//! - **Uncompressed layouts**: the low 32 bits hold up to four channel-name
//!   bytes (`r`, `g`, `b`, `a`, `l`), first channel in the least significant
//!   byte; the high 32 bits hold the matching per-channel bit widths.
//!   `RGBA8888` is therefore `names = b"rgba"`, `widths = [8, 8, 8, 8]`.
//! - **Block-compressed formats**: the high 32 bits are zero and the low
//!   32 bits carry a tag from a closed list (BC1–BC3). An uncompressed
//!   layout always has nonzero widths, so the two spaces cannot collide.
//!
//! Formats carry *layout* only. How the stored bits are interpreted is the
//! job of [`ChannelType`] (normalized integer vs. float) and
//! [`ColourSpace`] (linear vs. sRGB), which are stored separately on the
//! texture header.
//!
//! Besides the built-in named set there is a fallback parser for arbitrary
//! channel/width strings (`"rg1616"`, `"rgba8888"`), mirroring how custom
//! formats are usually written down.

use core::fmt;
use thiserror::Error;

/// Number of channel slots in a packed format identifier.
const MAX_CHANNELS: usize = 4;

/// Channel-name bytes accepted in packed identifiers.
const CHANNEL_NAMES: [u8; 5] = [b'r', b'g', b'b', b'a', b'l'];

/// Packed 64-bit pixel format identifier. See the module docs for the
/// encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat(u64);

/// Error returned by [`PixelFormat::parse`] for strings that are neither a
/// built-in name nor a valid channel/width description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized pixel format string {0:?}")]
pub struct PixelFormatParseError(pub String);

impl PixelFormat {
    /// BC1 block compression (a.k.a. DXT1): 8 bytes per 4x4 block.
    pub const BC1: PixelFormat = PixelFormat(0);
    /// BC2 block compression (a.k.a. DXT2/3): 16 bytes per 4x4 block.
    pub const BC2: PixelFormat = PixelFormat(1);
    /// BC3 block compression (a.k.a. DXT4/5): 16 bytes per 4x4 block.
    pub const BC3: PixelFormat = PixelFormat(2);

    /// Single 8-bit channel.
    pub const R8: PixelFormat = PixelFormat::packed([b'r', 0, 0, 0], [8, 0, 0, 0]);
    /// Luminance + alpha, 8 bits each.
    pub const LA88: PixelFormat = PixelFormat::packed([b'l', b'a', 0, 0], [8, 8, 0, 0]);
    /// 24-bit RGB.
    pub const RGB888: PixelFormat = PixelFormat::packed([b'r', b'g', b'b', 0], [8, 8, 8, 0]);
    /// 32-bit RGBA.
    pub const RGBA8888: PixelFormat = PixelFormat::packed([b'r', b'g', b'b', b'a'], [8, 8, 8, 8]);
    /// 32-bit BGRA (byte-swapped RGBA, common in DDS files).
    pub const BGRA8888: PixelFormat = PixelFormat::packed([b'b', b'g', b'r', b'a'], [8, 8, 8, 8]);
    /// 64-bit RGBA, 16 bits per channel.
    pub const RGBA16161616: PixelFormat =
        PixelFormat::packed([b'r', b'g', b'b', b'a'], [16, 16, 16, 16]);
    /// 128-bit RGBA, 32 bits per channel. Combined with
    /// [`ChannelType::Float`] this is the usual HDR working format.
    pub const RGBA32323232: PixelFormat =
        PixelFormat::packed([b'r', b'g', b'b', b'a'], [32, 32, 32, 32]);

    /// Built-in named formats, in lookup order.
    const BUILTIN: [(&'static str, PixelFormat); 10] = [
        ("R8", Self::R8),
        ("LA88", Self::LA88),
        ("RGB888", Self::RGB888),
        ("RGBA8888", Self::RGBA8888),
        ("BGRA8888", Self::BGRA8888),
        ("RGBA16161616", Self::RGBA16161616),
        ("RGBA32323232", Self::RGBA32323232),
        ("BC1", Self::BC1),
        ("BC2", Self::BC2),
        ("BC3", Self::BC3),
    ];

    /// Packs channel names and widths into an identifier.
    const fn packed(names: [u8; 4], widths: [u8; 4]) -> Self {
        let low = names[0] as u64
            | (names[1] as u64) << 8
            | (names[2] as u64) << 16
            | (names[3] as u64) << 24;
        let high = widths[0] as u64
            | (widths[1] as u64) << 8
            | (widths[2] as u64) << 16
            | (widths[3] as u64) << 24;
        Self(low | high << 32)
    }

    /// Returns the raw 64-bit identifier (as stored in container headers).
    #[inline]
    pub fn raw_value(&self) -> u64 {
        self.0
    }

    /// Reconstructs a format from a raw identifier, validating the encoding.
    ///
    /// # Return
    ///
    /// `None` if the value is neither a known compressed tag nor a
    /// well-formed packed layout (names drawn from `rgbal`, widths `1..=32`,
    /// channels contiguous from the first slot).
    pub fn from_raw(value: u64) -> Option<Self> {
        if value >> 32 == 0 {
            return (value <= Self::BC3.0).then_some(Self(value));
        }

        let format = Self(value);
        let names = format.channel_names();
        let widths = format.channel_widths();
        let mut seen_empty = false;
        let mut channels = 0;
        for slot in 0..MAX_CHANNELS {
            match (names[slot], widths[slot]) {
                (0, 0) => seen_empty = true,
                (name, width) if CHANNEL_NAMES.contains(&name) && (1..=32).contains(&width) => {
                    // Channels must be contiguous from slot 0.
                    if seen_empty {
                        return None;
                    }
                    channels += 1;
                }
                _ => return None,
            }
        }
        (channels > 0).then_some(format)
    }

    /// Looks up a format by its canonical name, e.g. `"RGBA8888"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        Self::BUILTIN
            .iter()
            .find(|(n, _)| *n == upper)
            .map(|(_, f)| *f)
    }

    /// Parses a format string: a built-in name, or a fallback
    /// channel/width description such as `"rg1616"` or `"rgba5551"`.
    ///
    /// The fallback form is 1–4 channel letters from `rgbal` followed by
    /// one width digit per channel, or two width digits per channel.
    pub fn parse(s: &str) -> Result<Self, PixelFormatParseError> {
        if let Some(format) = Self::from_name(s) {
            return Ok(format);
        }

        let err = || PixelFormatParseError(s.to_string());
        let lower = s.to_ascii_lowercase();
        let digit_start = lower
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(err)?;
        let (names_str, digits_str) = lower.split_at(digit_start);

        let names = names_str.as_bytes();
        let n = names.len();
        if n == 0 || n > MAX_CHANNELS || !names.iter().all(|c| CHANNEL_NAMES.contains(c)) {
            return Err(err());
        }
        if !digits_str.bytes().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        // One digit per channel ("rgba8888") or two ("rgba16161616").
        let digits_per_channel = match digits_str.len() {
            len if len == n => 1,
            len if len == 2 * n => 2,
            _ => return Err(err()),
        };

        let mut packed_names = [0u8; 4];
        let mut packed_widths = [0u8; 4];
        for (slot, chunk) in digits_str.as_bytes().chunks(digits_per_channel).enumerate() {
            let width: u8 = std::str::from_utf8(chunk)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(err)?;
            if width == 0 || width > 32 {
                return Err(err());
            }
            packed_names[slot] = names[slot];
            packed_widths[slot] = width;
        }
        Ok(Self::packed(packed_names, packed_widths))
    }

    /// `true` for block-compressed formats (BC1–BC3).
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.0 >> 32 == 0
    }

    /// Channel-name bytes, unused slots zero. All zero for compressed tags.
    pub fn channel_names(&self) -> [u8; 4] {
        if self.is_compressed() {
            return [0; 4];
        }
        (self.0 as u32).to_le_bytes()
    }

    /// Per-channel bit widths, unused slots zero.
    pub fn channel_widths(&self) -> [u8; 4] {
        ((self.0 >> 32) as u32).to_le_bytes()
    }

    /// Number of channels in an uncompressed layout (0 for compressed tags).
    pub fn channel_count(&self) -> usize {
        self.channel_names().iter().filter(|&&n| n != 0).count()
    }

    /// Whether texels carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        if self.is_compressed() {
            // All supported BC families encode (at least punch-through) alpha.
            return true;
        }
        self.channel_names().contains(&b'a')
    }

    /// Storage bits per texel. Block-compressed formats report their
    /// amortized rate (BC1: 4bpp, BC2/BC3: 8bpp).
    pub fn bits_per_pixel(&self) -> u32 {
        if self.is_compressed() {
            return if *self == Self::BC1 { 4 } else { 8 };
        }
        self.channel_widths().iter().map(|&w| w as u32).sum()
    }

    /// Whole bytes per texel for byte-aligned uncompressed layouts.
    ///
    /// # Return
    ///
    /// `None` for compressed formats and for layouts whose total width is
    /// not a byte multiple (those can be named and stored, not processed).
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        if self.is_compressed() {
            return None;
        }
        let bits = self.bits_per_pixel();
        (bits % 8 == 0).then_some((bits / 8) as usize)
    }

    /// Bytes per 4x4 block for compressed formats.
    pub fn block_bytes(&self) -> Option<usize> {
        self.is_compressed()
            .then(|| if *self == Self::BC1 { 8 } else { 16 })
    }

    /// Byte size of a single surface (one face of one mip level) with the
    /// given dimensions.
    ///
    /// Block-compressed sizes round each slice up to whole 4x4 blocks, the
    /// same way DDS readers size BCn payloads. Saturates on overflow, so
    /// hostile container dimensions surface as a data-size mismatch rather
    /// than a panic.
    pub fn surface_size(&self, width: u32, height: u32, depth: u32) -> usize {
        if let Some(block_bytes) = self.block_bytes() {
            let blocks_wide = width.div_ceil(4) as usize;
            let blocks_high = height.div_ceil(4) as usize;
            return blocks_wide
                .saturating_mul(blocks_high)
                .saturating_mul(block_bytes)
                .saturating_mul(depth as usize);
        }
        let texels = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(depth as usize);
        texels
            .saturating_mul(self.bits_per_pixel() as usize)
            .div_ceil(8)
    }

    /// Whether a channel type matches this layout's channel widths
    /// (e.g. [`ChannelType::Float`] needs 32-bit channels).
    pub fn matches_channel_type(&self, channel_type: ChannelType) -> bool {
        if self.is_compressed() {
            // BCn palettes decode to 8-bit normalized values.
            return channel_type == ChannelType::UnsignedByteNorm;
        }
        self.channel_widths()
            .iter()
            .filter(|&&w| w != 0)
            .all(|&w| w as u32 == channel_type.bits())
    }

    /// Canonical upper-case name: `"RGBA8888"`, `"BC1"`, ...
    pub fn name(&self) -> String {
        if let Some((name, _)) = Self::BUILTIN.iter().find(|(_, f)| f == self) {
            return (*name).to_string();
        }
        let mut out = String::new();
        let names = self.channel_names();
        let widths = self.channel_widths();
        for slot in 0..MAX_CHANNELS {
            if names[slot] == 0 {
                break;
            }
            out.push(names[slot].to_ascii_uppercase() as char);
        }
        for slot in 0..MAX_CHANNELS {
            if widths[slot] == 0 {
                break;
            }
            out.push_str(&widths[slot].to_string());
        }
        out
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelFormat({})", self.name())
    }
}

/// How the stored channel bits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ChannelType {
    /// Unsigned 8-bit, normalized to `0.0..=1.0`.
    UnsignedByteNorm = 0,
    /// Signed 8-bit, normalized to `-1.0..=1.0`.
    SignedByteNorm = 1,
    /// Unsigned 16-bit, normalized to `0.0..=1.0`.
    UnsignedShortNorm = 2,
    /// IEEE 754 single-precision float.
    Float = 3,
}

impl ChannelType {
    /// Channel width this type occupies.
    pub fn bits(&self) -> u32 {
        match self {
            ChannelType::UnsignedByteNorm | ChannelType::SignedByteNorm => 8,
            ChannelType::UnsignedShortNorm => 16,
            ChannelType::Float => 32,
        }
    }

    /// Numeric identifier as stored in container headers.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Reconstructs from a container header identifier.
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(ChannelType::UnsignedByteNorm),
            1 => Some(ChannelType::SignedByteNorm),
            2 => Some(ChannelType::UnsignedShortNorm),
            3 => Some(ChannelType::Float),
            _ => None,
        }
    }
}

/// Colour space the colour channels are encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ColourSpace {
    /// Linear light.
    #[default]
    Linear = 0,
    /// sRGB transfer function applied to the colour channels.
    Srgb = 1,
}

impl ColourSpace {
    /// Numeric identifier as stored in container headers.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Reconstructs from a container header identifier.
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(ColourSpace::Linear),
            1 => Some(ColourSpace::Srgb),
            _ => None,
        }
    }
}
