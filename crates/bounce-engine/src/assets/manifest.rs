use serde::{Deserialize, Serialize};

use crate::assets::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
}

/// One asset the host must fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub key: String,
    /// Path relative to the page, e.g. `assets/logo.png`.
    pub url: String,
    pub kind: AssetKind,
}

/// Everything declared in `preload`, serialized for the web host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadManifest {
    pub assets: Vec<AssetEntry>,
}

impl LoadManifest {
    pub fn to_json(&self) -> Result<String, AssetError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A decoded image as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub key: String,
    pub width: u32,
    pub height: u32,
}

/// The host's answer to a [`LoadManifest`], sent in one piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    #[serde(default)]
    pub loaded: Vec<LoadedImage>,
    #[serde(default)]
    pub failed: Vec<String>,
}

impl LoadReport {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }
}
