//! Texture decoders module
//!
//! Decoders turn the encoded top mip of a texture object into an RGBA bitmap.
//! [`PixelFormatDecoder`] dispatches on the pixel format to the uncompressed
//! and block-compressed decoders.

mod basic;
mod compressed;

pub use basic::BasicDecoder;
pub use compressed::CompressedDecoder;

use image::RgbaImage;
use pak_parser_core::{ParseError, PixelFormat, Result, TextureData};

/// Largest edge length accepted from a texture header
pub const MAX_TEXTURE_DIMENSION: u32 = 16384;

/// Decoding capability used by the pipeline
///
/// `Ok(None)` means the texture is not decodable by this decoder and is
/// skipped without error; `Err` is a decode failure.
pub trait TextureDecoder: Send + Sync + 'static {
    fn decode(&self, texture: &TextureData) -> Result<Option<RgbaImage>>;
}

/// Common interface of the format-family decoders
pub trait Decoder {
    /// Decode texture data to RGBA image
    fn decode(&self, texture: &TextureData) -> Result<RgbaImage>;

    /// Check if this decoder can handle the given format
    fn can_decode(&self, format: &PixelFormat) -> bool;

    /// Get list of formats supported by this decoder
    fn supported_formats(&self) -> Vec<PixelFormat>;
}

/// Main texture decoder dispatcher
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelFormatDecoder {
    basic: BasicDecoder,
    compressed: CompressedDecoder,
}

impl PixelFormatDecoder {
    /// Create a new texture decoder
    pub fn new() -> Self {
        Self {
            basic: BasicDecoder::new(),
            compressed: CompressedDecoder::new(),
        }
    }

    /// Check if a format can be decoded
    pub fn can_decode(&self, format: &PixelFormat) -> bool {
        self.basic.can_decode(format) || self.compressed.can_decode(format)
    }

    /// Get list of supported formats
    pub fn supported_formats(&self) -> Vec<PixelFormat> {
        let mut formats = self.basic.supported_formats();
        formats.extend(self.compressed.supported_formats());
        formats
    }
}

impl TextureDecoder for PixelFormatDecoder {
    fn decode(&self, texture: &TextureData) -> Result<Option<RgbaImage>> {
        let format = &texture.pixel_format;
        if self.basic.can_decode(format) {
            self.basic.decode(texture).map(Some)
        } else if self.compressed.can_decode(format) {
            self.compressed.decode(texture).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Helper function to create RGBA image from raw data
pub(crate) fn create_rgba_image(data: Vec<u8>, width: u32, height: u32) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(ParseError::decode(
            "",
            format!("Invalid data size: expected {}, got {}", expected, data.len()),
        ));
    }

    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| ParseError::decode("", "Failed to create RGBA image from raw data"))
}

/// Check dimensions and payload length before decoding
pub(crate) fn validate_texture(texture: &TextureData) -> Result<usize> {
    if !texture.has_valid_dimensions() {
        return Err(ParseError::decode("", "Invalid texture dimensions"));
    }

    if texture.width > MAX_TEXTURE_DIMENSION || texture.height > MAX_TEXTURE_DIMENSION {
        return Err(ParseError::decode(
            "",
            format!(
                "Texture dimensions too large: {}x{}",
                texture.width, texture.height
            ),
        ));
    }

    let expected = texture.expected_data_size().ok_or_else(|| {
        ParseError::decode("", format!("No size rule for {}", texture.pixel_format))
    })?;
    if texture.data.len() < expected {
        return Err(ParseError::decode(
            "",
            format!(
                "Insufficient data for {}: expected {}, got {}",
                texture.pixel_format,
                expected,
                texture.data.len()
            ),
        ));
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_is_skipped() {
        let texture = TextureData::new(
            4,
            4,
            PixelFormat::from_name("PF_ASTC_4x4"),
            vec![0u8; 16],
        );
        let decoded = PixelFormatDecoder::new().decode(&texture).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_zero_dimensions_fail() {
        let texture = TextureData::new(0, 4, PixelFormat::R8G8B8A8, Vec::new());
        let err = PixelFormatDecoder::new().decode(&texture).unwrap_err();
        assert!(matches!(err, ParseError::Decode { .. }));
    }

    #[test]
    fn test_oversized_dimensions_fail() {
        let texture = TextureData::new(
            MAX_TEXTURE_DIMENSION + 1,
            1,
            PixelFormat::G8,
            Vec::new(),
        );
        assert!(PixelFormatDecoder::new().decode(&texture).is_err());
    }

    #[test]
    fn test_supported_formats() {
        let decoder = PixelFormatDecoder::new();
        assert!(decoder.can_decode(&PixelFormat::B8G8R8A8));
        assert!(!decoder.can_decode(&PixelFormat::Unknown("PF_ETC2_RGB".into())));
        assert!(decoder.supported_formats().contains(&PixelFormat::A8));

        #[cfg(feature = "block-compression")]
        assert!(decoder.can_decode(&PixelFormat::BC7));
    }
}
