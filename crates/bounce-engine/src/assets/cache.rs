use std::collections::HashMap;

use glam::Vec2;

use crate::assets::manifest::{AssetEntry, LoadReport};
use crate::assets::AssetError;

/// Size used for images that failed to load or were never declared.
pub const MISSING_IMAGE_SIZE: Vec2 = Vec2::new(32.0, 32.0);

#[derive(Debug, Clone, Copy, PartialEq)]
enum ImageState {
    Pending,
    Loaded(Vec2),
    Failed,
}

/// What the engine knows about declared images.
#[derive(Debug, Default)]
pub struct AssetCache {
    images: HashMap<String, ImageState>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register declared assets as pending.
    pub fn expect(&mut self, entries: &[AssetEntry]) {
        for entry in entries {
            self.images
                .entry(entry.key.clone())
                .or_insert(ImageState::Pending);
        }
    }

    pub fn mark_loaded(&mut self, key: &str, width: u32, height: u32) -> Result<(), AssetError> {
        let state = self
            .images
            .get_mut(key)
            .ok_or_else(|| AssetError::UnknownKey(key.to_string()))?;
        if width == 0 || height == 0 {
            *state = ImageState::Failed;
            return Err(AssetError::EmptyImage {
                key: key.to_string(),
                width,
                height,
            });
        }
        *state = ImageState::Loaded(Vec2::new(width as f32, height as f32));
        Ok(())
    }

    pub fn mark_failed(&mut self, key: &str) -> Result<(), AssetError> {
        let state = self
            .images
            .get_mut(key)
            .ok_or_else(|| AssetError::UnknownKey(key.to_string()))?;
        *state = ImageState::Failed;
        log::warn!("assets: `{}` failed to load; using a {}x{} placeholder", key, MISSING_IMAGE_SIZE.x, MISSING_IMAGE_SIZE.y);
        Ok(())
    }

    /// Apply a whole host report. Returns the entries that could not be applied;
    /// the rest of the report still takes effect.
    pub fn apply_report(&mut self, report: &LoadReport) -> Vec<AssetError> {
        let mut errors = Vec::new();
        for img in &report.loaded {
            if let Err(e) = self.mark_loaded(&img.key, img.width, img.height) {
                errors.push(e);
            }
        }
        for key in &report.failed {
            if let Err(e) = self.mark_failed(key) {
                errors.push(e);
            }
        }
        errors
    }

    /// True once every declared asset is either loaded or failed.
    pub fn is_settled(&self) -> bool {
        self.images.values().all(|s| *s != ImageState::Pending)
    }

    /// Keys still waiting on the host, sorted.
    pub fn pending(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .images
            .iter()
            .filter(|(_, s)| **s == ImageState::Pending)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        matches!(self.images.get(key), Some(ImageState::Loaded(_)))
    }

    /// Pixel size of an image; the placeholder size if it is not available.
    pub fn image_size(&self, key: &str) -> Vec2 {
        match self.images.get(key) {
            Some(ImageState::Loaded(size)) => *size,
            Some(_) => MISSING_IMAGE_SIZE,
            None => {
                log::warn!("assets: `{}` was never declared", key);
                MISSING_IMAGE_SIZE
            }
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}
