//! Texture decode step
//!
//! Turns texture objects of a loaded entry into image artifacts: decode the
//! pixel payload, encode the bitmap, and place it next to the owning entry.

pub mod decoders;
pub mod export;

pub use decoders::{
    BasicDecoder, CompressedDecoder, Decoder, MAX_TEXTURE_DIMENSION, PixelFormatDecoder,
    TextureDecoder,
};
pub use export::ImageEncoding;

use pak_parser_core::{AssetArtifact, LoadedObject, Result, texture_output_path};
use tracing::debug;

/// Renders the texture objects of one entry
pub struct TextureStep<'a, D: TextureDecoder + ?Sized> {
    decoder: &'a D,
    encoding: ImageEncoding,
}

impl<'a, D: TextureDecoder + ?Sized> TextureStep<'a, D> {
    pub fn new(decoder: &'a D, encoding: ImageEncoding) -> Self {
        Self { decoder, encoding }
    }

    /// Render one object.
    ///
    /// Returns `Ok(None)` for objects without pixel data and for textures the
    /// decoder declines.
    pub fn render(&self, entry_path: &str, object: &LoadedObject) -> Result<Option<AssetArtifact>> {
        let Some(texture) = &object.texture else {
            return Ok(None);
        };

        let Some(image) = self
            .decoder
            .decode(texture)
            .map_err(|e| e.for_texture(&object.name))?
        else {
            debug!(
                texture = %object.name,
                format = %texture.pixel_format,
                "Skipping texture with undecodable format"
            );
            return Ok(None);
        };

        let encoded = self.encoding.encode(&image)?;
        let path = texture_output_path(entry_path, &object.name, self.encoding.extension());
        Ok(Some(AssetArtifact::new(path, encoded)))
    }
}
