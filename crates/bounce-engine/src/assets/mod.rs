pub mod cache;
pub mod loader;
pub mod manifest;

use thiserror::Error;

/// Errors raised while declaring or resolving assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset key `{0}` is already declared")]
    DuplicateKey(String),
    #[error("asset key `{0}` was never declared")]
    UnknownKey(String),
    #[error("image `{key}` reported an empty size ({width}x{height})")]
    EmptyImage { key: String, width: u32, height: u32 },
    #[error("malformed asset json: {0}")]
    Json(#[from] serde_json::Error),
}
