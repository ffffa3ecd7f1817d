//! Block-compressed texture format decoders
//!
//! DXT1/DXT5 and BC4/BC5/BC7 are decoded with `texture2ddecoder` when the
//! `block-compression` feature is enabled. Without it no format is claimed
//! and such textures are skipped.

use super::Decoder;
use image::RgbaImage;
use pak_parser_core::{PixelFormat, Result, TextureData};

#[cfg(feature = "block-compression")]
use super::{create_rgba_image, validate_texture};
#[cfg(feature = "block-compression")]
use pak_parser_core::ParseError;

/// Decoder for block-compressed texture formats
#[derive(Debug, Default, Clone, Copy)]
pub struct CompressedDecoder;

/// texture2ddecoder writes one u32 per pixel as 0xAARRGGBB
#[cfg(feature = "block-compression")]
fn unpack_bgra(pixel: u32) -> [u8; 4] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
        ((pixel >> 24) & 0xFF) as u8,
    ]
}

#[cfg(feature = "block-compression")]
type BlockDecodeFn = fn(&[u8], usize, usize, &mut [u32]) -> std::result::Result<(), &'static str>;

impl CompressedDecoder {
    /// Create a new compressed decoder
    pub fn new() -> Self {
        Self
    }

    #[cfg(feature = "block-compression")]
    fn decode_blocks(
        &self,
        texture: &TextureData,
        decode_fn: BlockDecodeFn,
        to_rgba: fn(u32) -> [u8; 4],
    ) -> Result<RgbaImage> {
        let expected = validate_texture(texture)?;
        let (width, height) = (texture.width, texture.height);

        let mut output = vec![0u32; width as usize * height as usize];
        decode_fn(
            &texture.data[..expected],
            width as usize,
            height as usize,
            &mut output,
        )
        .map_err(|e| {
            ParseError::decode(
                "",
                format!("{} decoding failed: {}", texture.pixel_format, e),
            )
        })?;

        let rgba_data: Vec<u8> = output.into_iter().flat_map(to_rgba).collect();
        create_rgba_image(rgba_data, width, height)
    }
}

#[cfg(feature = "block-compression")]
impl Decoder for CompressedDecoder {
    fn decode(&self, texture: &TextureData) -> Result<RgbaImage> {
        match texture.pixel_format {
            PixelFormat::DXT1 => {
                self.decode_blocks(texture, texture2ddecoder::decode_bc1, unpack_bgra)
            }
            PixelFormat::DXT5 => {
                self.decode_blocks(texture, texture2ddecoder::decode_bc3, unpack_bgra)
            }
            PixelFormat::BC7 => {
                self.decode_blocks(texture, texture2ddecoder::decode_bc7, unpack_bgra)
            }
            // Single channel, replicated to grey
            PixelFormat::BC4 => self.decode_blocks(texture, texture2ddecoder::decode_bc4, |p| {
                let value = ((p >> 16) & 0xFF) as u8;
                [value, value, value, 255]
            }),
            // Two channels (normal maps); blue left empty
            PixelFormat::BC5 => self.decode_blocks(texture, texture2ddecoder::decode_bc5, |p| {
                [((p >> 16) & 0xFF) as u8, ((p >> 8) & 0xFF) as u8, 0, 255]
            }),
            ref other => Err(ParseError::decode(
                "",
                format!("Unsupported compressed format: {}", other),
            )),
        }
    }

    fn can_decode(&self, format: &PixelFormat) -> bool {
        format.is_block_compressed()
    }

    fn supported_formats(&self) -> Vec<PixelFormat> {
        vec![
            PixelFormat::DXT1,
            PixelFormat::DXT5,
            PixelFormat::BC4,
            PixelFormat::BC5,
            PixelFormat::BC7,
        ]
    }
}

#[cfg(not(feature = "block-compression"))]
impl Decoder for CompressedDecoder {
    fn decode(&self, texture: &TextureData) -> Result<RgbaImage> {
        Err(pak_parser_core::ParseError::decode(
            "",
            format!(
                "{} requires the block-compression feature",
                texture.pixel_format
            ),
        ))
    }

    fn can_decode(&self, _format: &PixelFormat) -> bool {
        false
    }

    fn supported_formats(&self) -> Vec<PixelFormat> {
        Vec::new()
    }
}
