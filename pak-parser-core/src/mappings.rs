//! Type-mapping (`.usmap`) files
//!
//! Providers need a type-mapping file to read unversioned packages. The file
//! is opened once at startup and only its header is validated here; the
//! schema payload is handed to providers untouched.

use crate::error::{ParseError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Magic number at the start of every mapping file
pub const USMAP_MAGIC: u16 = 0x30C4;

/// Highest header version this reader understands
pub const USMAP_LATEST_VERSION: u8 = 3;

/// Header version from which package versioning info may follow
const VERSION_PACKAGE_VERSIONING: u8 = 1;

/// Size of one serialized custom version entry (GUID + version)
const CUSTOM_VERSION_SIZE: i64 = 20;

/// Compression applied to the schema payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingsCompression {
    None,
    Oodle,
    Brotli,
    Zstd,
}

impl MappingsCompression {
    fn from_byte(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Oodle),
            2 => Ok(Self::Brotli),
            3 => Ok(Self::Zstd),
            other => Err(ParseError::mappings(format!(
                "Unknown compression method {}",
                other
            ))),
        }
    }
}

/// A validated type-mapping file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappings {
    path: PathBuf,
    version: u8,
    compression: MappingsCompression,
    compressed_size: u32,
    decompressed_size: u32,
}

impl TypeMappings {
    /// Open a mapping file and validate its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            ParseError::mappings(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(path, &data)
    }

    /// Validate a mapping header from memory; `path` is kept for providers
    pub fn from_bytes<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(data);
        let truncated = |e: std::io::Error| ParseError::mappings(format!("Truncated header: {}", e));

        let magic = reader.read_u16::<LittleEndian>().map_err(truncated)?;
        if magic != USMAP_MAGIC {
            return Err(ParseError::mappings(format!(
                "Invalid magic 0x{:04X}, expected 0x{:04X}",
                magic, USMAP_MAGIC
            )));
        }

        let version = reader.read_u8().map_err(truncated)?;
        if version > USMAP_LATEST_VERSION {
            return Err(ParseError::mappings(format!(
                "Unsupported mappings version {}",
                version
            )));
        }

        if version >= VERSION_PACKAGE_VERSIONING {
            let has_versioning = reader.read_i32::<LittleEndian>().map_err(truncated)? > 0;
            if has_versioning {
                // Package file version (UE4 + UE5)
                reader.seek(SeekFrom::Current(8)).map_err(truncated)?;
                let custom_versions = reader.read_i32::<LittleEndian>().map_err(truncated)?;
                if custom_versions < 0 {
                    return Err(ParseError::mappings("Negative custom version count"));
                }
                reader
                    .seek(SeekFrom::Current(custom_versions as i64 * CUSTOM_VERSION_SIZE))
                    .map_err(truncated)?;
                // Net changelist
                reader.seek(SeekFrom::Current(4)).map_err(truncated)?;
            }
        }

        let compression =
            MappingsCompression::from_byte(reader.read_u8().map_err(truncated)?)?;
        let compressed_size = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let decompressed_size = reader.read_u32::<LittleEndian>().map_err(truncated)?;

        if compression == MappingsCompression::None && compressed_size != decompressed_size {
            return Err(ParseError::mappings(
                "Uncompressed payload with mismatching sizes",
            ));
        }

        let mut payload = Vec::new();
        reader.read_to_end(&mut payload).map_err(truncated)?;
        if payload.len() < compressed_size as usize {
            return Err(ParseError::mappings(format!(
                "Payload truncated: expected {} bytes, found {}",
                compressed_size,
                payload.len()
            )));
        }

        debug!(
            version,
            compression = ?compression,
            compressed_size,
            decompressed_size,
            "Validated type mappings header"
        );

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            version,
            compression,
            compressed_size,
            decompressed_size,
        })
    }

    /// Location of the mapping file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header version
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Payload compression
    pub fn compression(&self) -> MappingsCompression {
        self.compression
    }

    /// Size of the schema payload once decompressed
    pub fn decompressed_size(&self) -> u32 {
        self.decompressed_size
    }

    /// Size of the schema payload as stored
    pub fn compressed_size(&self) -> u32 {
        self.compressed_size
    }
}
