//! Engine Version Resolution
//!
//! Maps the version strings callers send with a request onto the engine
//! generation the asset provider has to target. The mapping is a fixed table;
//! anything outside it is reported as [`Resolution::Unsupported`] so the
//! pipeline can stop before it allocates any resources.

use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Engine generation a package layout belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EngineVersion {
    /// Unreal Engine 4.26
    Ue4_26,
    /// Unreal Engine 5.1
    Ue5_1,
    /// Unreal Engine 5.2
    Ue5_2,
    /// Unreal Engine 5.3
    Ue5_3,
}

/// Outcome of resolving a caller-supplied version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The string names a known engine generation
    Resolved(EngineVersion),
    /// The string is not in the version table; carries the caller's input
    Unsupported(String),
}

impl EngineVersion {
    /// Every version the resolver accepts, oldest first
    pub const ALL: [EngineVersion; 4] = [
        EngineVersion::Ue4_26,
        EngineVersion::Ue5_1,
        EngineVersion::Ue5_2,
        EngineVersion::Ue5_3,
    ];

    /// Resolve a version string such as `"5.2"`
    pub fn resolve(version: &str) -> Resolution {
        match version {
            "4.26" => Resolution::Resolved(EngineVersion::Ue4_26),
            "5.1" => Resolution::Resolved(EngineVersion::Ue5_1),
            "5.2" => Resolution::Resolved(EngineVersion::Ue5_2),
            "5.3" => Resolution::Resolved(EngineVersion::Ue5_3),
            other => Resolution::Unsupported(other.to_string()),
        }
    }

    /// The version string callers use for this generation
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineVersion::Ue4_26 => "4.26",
            EngineVersion::Ue5_1 => "5.1",
            EngineVersion::Ue5_2 => "5.2",
            EngineVersion::Ue5_3 => "5.3",
        }
    }

    /// Generation identifier understood by asset providers
    pub fn generation(&self) -> &'static str {
        match self {
            EngineVersion::Ue4_26 => "GAME_UE4_26",
            EngineVersion::Ue5_1 => "GAME_UE5_1",
            EngineVersion::Ue5_2 => "GAME_UE5_2",
            EngineVersion::Ue5_3 => "GAME_UE5_3",
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        match Self::resolve(s) {
            Resolution::Resolved(version) => Ok(version),
            Resolution::Unsupported(version) => Err(ParseError::unsupported_version(version)),
        }
    }
}
