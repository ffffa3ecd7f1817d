//! Asset providers shipped with the pipeline
//!
//! [`DirectoryProviderFactory`] walks an extracted tree and hands each
//! package to a [`PackageLoader`]. [`PackageSummaryLoader`] is the loader the
//! server runs with: it checks the package header and reports the package as
//! a single object without reading its exports.

mod directory;

pub use directory::{DirectoryProvider, DirectoryProviderFactory, PackageLoader};

use pak_parser_core::{LoadedObject, ParseError, ProviderConfig, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Tag at the start of every package summary
pub const PACKAGE_FILE_TAG: u32 = 0x9E2A83C1;

/// Class reported for summarized packages
pub const PACKAGE_CLASS: &str = "Package";

/// Loader that validates package headers and reports one object per package
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageSummaryLoader;

impl PackageSummaryLoader {
    pub fn new() -> Self {
        Self
    }
}

impl PackageLoader for PackageSummaryLoader {
    fn load(&self, config: &ProviderConfig, path: &str) -> Result<Vec<LoadedObject>> {
        let mut tag = [0u8; 4];
        File::open(config.root.join(path))
            .and_then(|mut file| file.read_exact(&mut tag))
            .map_err(|e| ParseError::load(path, format!("Cannot read package header: {}", e)))?;

        let tag = u32::from_le_bytes(tag);
        if tag != PACKAGE_FILE_TAG {
            return Err(ParseError::load(
                path,
                format!("Invalid package tag 0x{:08X}", tag),
            ));
        }

        let name = Path::new(path)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(path);
        Ok(vec![LoadedObject::new(name, PACKAGE_CLASS)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pak_parser_core::{AesKey, EngineVersion, Language, TypeMappings};
    use std::sync::Arc;

    fn config(root: &Path) -> ProviderConfig {
        let mut header = Vec::new();
        header.extend_from_slice(&0x30C4u16.to_le_bytes());
        header.extend_from_slice(&[0, 0]);
        header.extend_from_slice(&[0u8; 8]);
        ProviderConfig {
            root: root.to_path_buf(),
            mappings: Arc::new(TypeMappings::from_bytes("t.usmap", &header).unwrap()),
            engine: EngineVersion::Ue4_26,
            aes_key: AesKey::zero(),
            language: Language::default(),
        }
    }

    #[test]
    fn test_summarizes_package() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Game/Maps")).unwrap();
        let mut data = PACKAGE_FILE_TAG.to_le_bytes().to_vec();
        data.extend_from_slice(&[0u8; 32]);
        std::fs::write(dir.path().join("Game/Maps/Lvl_Main.umap"), data).unwrap();

        let objects = PackageSummaryLoader::new()
            .load(&config(dir.path()), "Game/Maps/Lvl_Main.umap")
            .unwrap();

        assert_eq!(objects, vec![LoadedObject::new("Lvl_Main", PACKAGE_CLASS)]);
    }

    #[test]
    fn test_rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Fake.uasset"), b"PK\x03\x04rest").unwrap();
        std::fs::write(dir.path().join("Tiny.uasset"), b"\xC1").unwrap();

        let loader = PackageSummaryLoader::new();
        let err = loader.load(&config(dir.path()), "Fake.uasset").unwrap_err();
        assert!(err.to_string().contains("Invalid package tag"));
        assert!(loader.load(&config(dir.path()), "Tiny.uasset").is_err());
    }
}
