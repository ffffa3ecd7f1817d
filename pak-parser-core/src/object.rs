//! Loaded object handles
//!
//! Providers translate their internal object graph into these plain values so
//! the pipeline never depends on a particular parser's object model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel layout of an encoded texture payload
///
/// Names follow the engine's `EPixelFormat` spelling (`PF_DXT1`, ...).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    // Uncompressed formats
    B8G8R8A8,
    R8G8B8A8,
    G8,
    A8,

    // Block-compressed formats
    DXT1,
    DXT5,
    BC4,
    BC5,
    BC7,

    /// A format this crate has no name for
    Unknown(String),
}

impl PixelFormat {
    /// Parse an engine pixel format name, with or without the `PF_` prefix
    pub fn from_name(name: &str) -> Self {
        let bare = name.strip_prefix("PF_").unwrap_or(name);
        match bare {
            "B8G8R8A8" => PixelFormat::B8G8R8A8,
            "R8G8B8A8" => PixelFormat::R8G8B8A8,
            "G8" => PixelFormat::G8,
            "A8" => PixelFormat::A8,
            "DXT1" => PixelFormat::DXT1,
            "DXT5" => PixelFormat::DXT5,
            "BC4" => PixelFormat::BC4,
            "BC5" => PixelFormat::BC5,
            "BC7" => PixelFormat::BC7,
            _ => PixelFormat::Unknown(name.to_string()),
        }
    }

    /// Bytes per pixel for uncompressed formats
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::B8G8R8A8 | PixelFormat::R8G8B8A8 => Some(4),
            PixelFormat::G8 | PixelFormat::A8 => Some(1),
            _ => None,
        }
    }

    /// Bytes per 4x4 block for block-compressed formats
    pub fn bytes_per_block(&self) -> Option<usize> {
        match self {
            PixelFormat::DXT1 | PixelFormat::BC4 => Some(8),
            PixelFormat::DXT5 | PixelFormat::BC5 | PixelFormat::BC7 => Some(16),
            _ => None,
        }
    }

    /// Check if format is block compressed
    pub fn is_block_compressed(&self) -> bool {
        self.bytes_per_block().is_some()
    }

    /// Size of the top mip for the given dimensions, if the format is known
    pub fn mip_size(&self, width: u32, height: u32) -> Option<usize> {
        let (width, height) = (width as usize, height as usize);
        if let Some(bpp) = self.bytes_per_pixel() {
            return Some(width * height * bpp);
        }
        self.bytes_per_block()
            .map(|block| width.div_ceil(4) * height.div_ceil(4) * block)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Unknown(name) => f.write_str(name),
            other => write!(f, "PF_{:?}", other),
        }
    }
}

/// Encoded pixel data of a texture object (top mip only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub data: Vec<u8>,
}

impl TextureData {
    /// Create a new texture payload
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixel_format,
            data,
        }
    }

    /// Check if texture has valid dimensions
    pub fn has_valid_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Get expected data size based on format and dimensions
    pub fn expected_data_size(&self) -> Option<usize> {
        self.pixel_format.mip_size(self.width, self.height)
    }
}

/// One object loaded from a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedObject {
    /// Object name; used as its identifier in metadata and output paths
    pub name: String,
    /// Engine class of the object (`Texture2D`, `StaticMesh`, ...)
    pub class_name: String,
    /// Pixel data when the object is a texture
    pub texture: Option<TextureData>,
}

impl LoadedObject {
    /// Create a non-texture object
    pub fn new<N: Into<String>, C: Into<String>>(name: N, class_name: C) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            texture: None,
        }
    }

    /// Create a `Texture2D` object carrying pixel data
    pub fn texture<N: Into<String>>(name: N, texture: TextureData) -> Self {
        Self {
            name: name.into(),
            class_name: "Texture2D".to_string(),
            texture: Some(texture),
        }
    }

    /// Identifier recorded in the metadata document
    pub fn identifier(&self) -> &str {
        &self.name
    }

    /// Check if this object is a texture
    pub fn is_texture(&self) -> bool {
        self.texture.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_names() {
        assert_eq!(PixelFormat::from_name("PF_DXT1"), PixelFormat::DXT1);
        assert_eq!(PixelFormat::from_name("B8G8R8A8"), PixelFormat::B8G8R8A8);
        assert_eq!(
            PixelFormat::from_name("PF_ASTC_4x4"),
            PixelFormat::Unknown("PF_ASTC_4x4".to_string())
        );
        assert_eq!(PixelFormat::BC7.to_string(), "PF_BC7");
        assert_eq!(
            PixelFormat::Unknown("PF_ETC2_RGB".to_string()).to_string(),
            "PF_ETC2_RGB"
        );
    }

    #[test]
    fn test_mip_sizes() {
        assert_eq!(PixelFormat::B8G8R8A8.mip_size(4, 2), Some(32));
        assert_eq!(PixelFormat::G8.mip_size(3, 3), Some(9));
        // 5x5 rounds up to 2x2 blocks
        assert_eq!(PixelFormat::DXT1.mip_size(5, 5), Some(32));
        assert_eq!(PixelFormat::BC7.mip_size(4, 4), Some(16));
        assert_eq!(PixelFormat::Unknown("PF_X".into()).mip_size(4, 4), None);
    }

    #[test]
    fn test_loaded_object_constructors() {
        let mesh = LoadedObject::new("SM_Rock", "StaticMesh");
        assert!(!mesh.is_texture());
        assert_eq!(mesh.identifier(), "SM_Rock");

        let texture = LoadedObject::texture(
            "T_Rock",
            TextureData::new(1, 1, PixelFormat::R8G8B8A8, vec![0; 4]),
        );
        assert!(texture.is_texture());
        assert_eq!(texture.class_name, "Texture2D");
    }
}
