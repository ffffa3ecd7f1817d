//! Provider over an extracted directory tree

use pak_parser_core::{
    AssetEntry, AssetProvider, LoadedObject, ParseError, ProviderConfig, ProviderFactory, Result,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Reads the objects of one package file
pub trait PackageLoader: Send + Sync + 'static {
    /// Load every object of the package at `path` (relative to `config.root`)
    fn load(&self, config: &ProviderConfig, path: &str) -> Result<Vec<LoadedObject>>;
}

/// Creates a [`DirectoryProvider`] per request
#[derive(Debug)]
pub struct DirectoryProviderFactory<L> {
    loader: Arc<L>,
}

impl<L: PackageLoader> DirectoryProviderFactory<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }
}

impl<L: PackageLoader> ProviderFactory for DirectoryProviderFactory<L> {
    type Provider = DirectoryProvider<L>;

    fn initialize(&self, config: &ProviderConfig) -> Result<Self::Provider> {
        if !config.root.is_dir() {
            return Err(ParseError::provider_init(format!(
                "Root is not a directory: {}",
                config.root.display()
            )));
        }

        info!(
            root = %config.root.display(),
            engine = %config.engine.generation(),
            mappings = %config.mappings.path().display(),
            language = config.language.culture(),
            "Initialized directory provider"
        );

        Ok(DirectoryProvider {
            config: config.clone(),
            loader: Arc::clone(&self.loader),
        })
    }
}

/// Enumerates the files of one extracted tree and delegates loading
#[derive(Debug)]
pub struct DirectoryProvider<L> {
    config: ProviderConfig,
    loader: Arc<L>,
}

impl<L: PackageLoader> AssetProvider for DirectoryProvider<L> {
    fn entries(&self) -> Result<Vec<AssetEntry>> {
        let mut files = Vec::new();
        collect_files(&self.config.root, &mut files)?;

        let mut paths: Vec<String> = files
            .iter()
            .filter_map(|file| relative_path(&self.config.root, file))
            .collect();
        paths.sort();

        debug!(count = paths.len(), "Enumerated entries");
        Ok(paths.into_iter().map(AssetEntry::new).collect())
    }

    fn load_objects(&self, path: &str) -> Result<Vec<LoadedObject>> {
        if !self.config.root.join(path).is_file() {
            return Err(ParseError::load(path, "No such entry"));
        }

        self.loader.load(&self.config, path).map_err(|e| match e {
            ParseError::Load { .. } => e,
            other => ParseError::load(path, other.to_string()),
        })
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), files)?;
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    Ok(())
}

/// `/`-separated path of `file` below `root`
fn relative_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect();
    Some(parts?.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pak_parser_core::{AesKey, EngineVersion, Language, TypeMappings};

    #[derive(Debug)]
    struct EchoLoader;

    impl PackageLoader for EchoLoader {
        fn load(&self, _config: &ProviderConfig, path: &str) -> Result<Vec<LoadedObject>> {
            if path.contains("Broken") {
                return Err(ParseError::Io(std::io::Error::other("bad export table")));
            }
            Ok(vec![LoadedObject::new(path, "Package")])
        }
    }

    fn mappings() -> Arc<TypeMappings> {
        let mut data = Vec::new();
        data.extend_from_slice(&0x30C4u16.to_le_bytes());
        data.push(0);
        data.push(0);
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        Arc::new(TypeMappings::from_bytes("test.usmap", &data).unwrap())
    }

    fn config(root: &Path) -> ProviderConfig {
        ProviderConfig {
            root: root.to_path_buf(),
            mappings: mappings(),
            engine: EngineVersion::Ue5_2,
            aes_key: AesKey::zero(),
            language: Language::English,
        }
    }

    #[test]
    fn test_entries_are_sorted_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Game/Content/B")).unwrap();
        fs::create_dir_all(dir.path().join("Game/Content/A")).unwrap();
        fs::write(dir.path().join("Game/Content/B/T_B.uasset"), b"").unwrap();
        fs::write(dir.path().join("Game/Content/A/T_A.uexp"), b"").unwrap();
        fs::write(dir.path().join("Game/Content/A/T_A.uasset"), b"").unwrap();
        fs::write(dir.path().join("root.txt"), b"").unwrap();

        let factory = DirectoryProviderFactory::new(EchoLoader);
        let provider = factory.initialize(&config(dir.path())).unwrap();
        let paths: Vec<String> = provider
            .entries()
            .unwrap()
            .into_iter()
            .map(|entry| entry.path)
            .collect();

        assert_eq!(
            paths,
            vec![
                "Game/Content/A/T_A.uasset",
                "Game/Content/A/T_A.uexp",
                "Game/Content/B/T_B.uasset",
                "root.txt",
            ]
        );
    }

    #[test]
    fn test_missing_root_fails_initialization() {
        let factory = DirectoryProviderFactory::new(EchoLoader);
        let err = factory
            .initialize(&config(Path::new("/definitely/not/here")))
            .unwrap_err();
        assert!(matches!(err, ParseError::ProviderInit(_)));
    }

    #[test]
    fn test_load_errors_name_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Broken.uasset"), b"").unwrap();
        let provider = DirectoryProviderFactory::new(EchoLoader)
            .initialize(&config(dir.path()))
            .unwrap();

        let err = provider.load_objects("Broken.uasset").unwrap_err();
        assert!(matches!(err, ParseError::Load { ref path, .. } if path == "Broken.uasset"));

        let err = provider.load_objects("Missing.uasset").unwrap_err();
        assert!(matches!(err, ParseError::Load { .. }));
    }
}
