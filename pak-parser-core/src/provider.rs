//! Asset provider capability
//!
//! The binary package format is understood by an external provider. The
//! pipeline only needs two operations from it: enumerate the entries below a
//! root directory, and load the objects of one entry. Providers are created
//! per request by a [`ProviderFactory`] from a [`ProviderConfig`].

use crate::engine_version::EngineVersion;
use crate::entry::AssetEntry;
use crate::error::{ParseError, Result};
use crate::mappings::TypeMappings;
use crate::object::LoadedObject;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// 256-bit AES key submitted to the provider for encrypted containers
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct AesKey([u8; 32]);

impl AesKey {
    /// The all-zero key used for unencrypted content
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Create a key from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the all-zero key
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl FromStr for AesKey {
    type Err = ParseError;

    /// Parse a 64-digit hex key, with or without a `0x` prefix
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut key = [0u8; 32];
        hex::decode_to_slice(digits, &mut key)
            .map_err(|e| ParseError::provider_init(format!("Invalid AES key: {}", e)))?;
        Ok(Self(key))
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("AesKey(zero)")
        } else {
            f.write_str("AesKey(..)")
        }
    }
}

/// Localization loaded alongside the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    French,
    German,
    Spanish,
    Japanese,
    Korean,
    Chinese,
}

impl Language {
    /// Culture code used by the engine's localization folders
    pub fn culture(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh-Hans",
        }
    }
}

/// Settings shared by every provider the pipeline creates
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// Key submitted for encrypted containers
    pub aes_key: AesKey,
    /// Localization to load
    pub language: Language,
}

/// Everything a provider needs to open one extracted tree
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Root of the extracted tree
    pub root: PathBuf,
    /// Type mappings for unversioned packages
    pub mappings: Arc<TypeMappings>,
    /// Engine generation to target
    pub engine: EngineVersion,
    pub aes_key: AesKey,
    pub language: Language,
}

/// An initialized provider for one extracted tree
pub trait AssetProvider: Send {
    /// Enumerate every entry below the root, in a stable order
    fn entries(&self) -> Result<Vec<AssetEntry>>;

    /// Load all objects of one entry; companion payloads are read implicitly
    fn load_objects(&self, path: &str) -> Result<Vec<LoadedObject>>;
}

/// Creates a provider per request
pub trait ProviderFactory: Send + Sync + 'static {
    type Provider: AssetProvider;

    /// Open the tree described by `config`
    fn initialize(&self, config: &ProviderConfig) -> Result<Self::Provider>;
}
