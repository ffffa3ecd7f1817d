//! Uncompressed texture format decoders

use super::{Decoder, create_rgba_image, validate_texture};
use image::RgbaImage;
use pak_parser_core::{ParseError, PixelFormat, Result, TextureData};

/// Decoder for uncompressed pixel formats
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicDecoder;

impl BasicDecoder {
    /// Create a new basic decoder
    pub fn new() -> Self {
        Self
    }

    /// R8G8B8A8 is already in output order
    fn decode_rgba8(&self, data: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
        create_rgba_image(data.to_vec(), width, height)
    }

    /// Swap R and B channels of B8G8R8A8
    fn decode_bgra8(&self, data: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
        let mut rgba_data = Vec::with_capacity(data.len());
        for chunk in data.chunks_exact(4) {
            rgba_data.extend_from_slice(&[chunk[2], chunk[1], chunk[0], chunk[3]]);
        }
        create_rgba_image(rgba_data, width, height)
    }

    /// Replicate the single G8 channel to grey, fully opaque
    fn decode_g8(&self, data: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
        let mut rgba_data = Vec::with_capacity(data.len() * 4);
        for &value in data {
            rgba_data.extend_from_slice(&[value, value, value, 255]);
        }
        create_rgba_image(rgba_data, width, height)
    }

    /// White with alpha from the A8 channel
    fn decode_a8(&self, data: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
        let mut rgba_data = Vec::with_capacity(data.len() * 4);
        for &alpha in data {
            rgba_data.extend_from_slice(&[255, 255, 255, alpha]);
        }
        create_rgba_image(rgba_data, width, height)
    }
}

impl Decoder for BasicDecoder {
    fn decode(&self, texture: &TextureData) -> Result<RgbaImage> {
        let expected = validate_texture(texture)?;
        let data = &texture.data[..expected];
        let (width, height) = (texture.width, texture.height);

        match texture.pixel_format {
            PixelFormat::R8G8B8A8 => self.decode_rgba8(data, width, height),
            PixelFormat::B8G8R8A8 => self.decode_bgra8(data, width, height),
            PixelFormat::G8 => self.decode_g8(data, width, height),
            PixelFormat::A8 => self.decode_a8(data, width, height),
            ref other => Err(ParseError::decode(
                "",
                format!("Unsupported uncompressed format: {}", other),
            )),
        }
    }

    fn can_decode(&self, format: &PixelFormat) -> bool {
        matches!(
            format,
            PixelFormat::R8G8B8A8 | PixelFormat::B8G8R8A8 | PixelFormat::G8 | PixelFormat::A8
        )
    }

    fn supported_formats(&self) -> Vec<PixelFormat> {
        vec![
            PixelFormat::B8G8R8A8,
            PixelFormat::R8G8B8A8,
            PixelFormat::G8,
            PixelFormat::A8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_swaps_channels() {
        let texture = TextureData::new(1, 1, PixelFormat::B8G8R8A8, vec![10, 20, 30, 40]);
        let image = BasicDecoder::new().decode(&texture).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [30, 20, 10, 40]);
    }

    #[test]
    fn test_rgba_passthrough_ignores_trailing_mips() {
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        data.extend_from_slice(&[0xAA; 4]);
        let texture = TextureData::new(2, 1, PixelFormat::R8G8B8A8, data);
        let image = BasicDecoder::new().decode(&texture).unwrap();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [5, 6, 7, 8]);
    }

    #[test]
    fn test_single_channel_formats() {
        let g8 = TextureData::new(2, 1, PixelFormat::G8, vec![7, 200]);
        let image = BasicDecoder::new().decode(&g8).unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [200, 200, 200, 255]);

        let a8 = TextureData::new(1, 1, PixelFormat::A8, vec![128]);
        let image = BasicDecoder::new().decode(&a8).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 128]);
    }

    #[test]
    fn test_short_payload_fails() {
        let texture = TextureData::new(2, 2, PixelFormat::R8G8B8A8, vec![0; 15]);
        let err = BasicDecoder::new().decode(&texture).unwrap_err();
        assert!(err.to_string().contains("expected 16, got 15"));
    }
}
