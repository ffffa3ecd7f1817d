//! Bitmap encoding
//!
//! Decoded textures are encoded in memory; nothing is written to disk.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use pak_parser_core::{ParseError, Result};

/// Output image format of texture artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageEncoding {
    /// Lossless, keeps alpha
    #[default]
    Png,
    /// Lossy; alpha is dropped
    Jpeg { quality: u8 },
}

impl ImageEncoding {
    /// File extension used in artifact paths
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg { .. } => "jpg",
        }
    }

    /// Encode a bitmap. The output only depends on the pixels.
    pub fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ParseError::encode("Image has zero dimensions"));
        }

        let mut buffer = Vec::new();
        match *self {
            ImageEncoding::Png => {
                PngEncoder::new(&mut buffer)
                    .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| ParseError::encode(format!("Failed to encode PNG: {}", e)))?;
            }
            ImageEncoding::Jpeg { quality } => {
                let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
                    .encode_image(&rgb_image)
                    .map_err(|e| ParseError::encode(format!("Failed to encode JPEG: {}", e)))?;
            }
        }
        Ok(buffer)
    }
}
