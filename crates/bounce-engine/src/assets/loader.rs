use crate::assets::AssetError;
use crate::assets::manifest::{AssetEntry, AssetKind, LoadManifest};

/// Assets a scene declares in `preload`. Nothing is fetched here; the web
/// host receives the resulting [`LoadManifest`] and reports back.
#[derive(Debug, Default)]
pub struct LoadQueue {
    base_path: String,
    entries: Vec<AssetEntry>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for every file declared after this call.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.base_path = path.into();
    }

    /// Declare an image. A repeated key is rejected and the first declaration kept;
    /// reporting the error is left to the caller.
    pub fn image(&mut self, key: &str, file: &str) -> Result<(), AssetError> {
        self.push(key, file, AssetKind::Image)
    }

    fn push(&mut self, key: &str, file: &str, kind: AssetKind) -> Result<(), AssetError> {
        if self.entries.iter().any(|e| e.key == key) {
            return Err(AssetError::DuplicateKey(key.to_string()));
        }
        self.entries.push(AssetEntry {
            key: key.to_string(),
            url: join_path(&self.base_path, file),
            kind,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_manifest(self) -> LoadManifest {
        LoadManifest {
            assets: self.entries,
        }
    }
}

fn join_path(base: &str, file: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", base, file.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_prefixes_later_declarations() {
        let mut q = LoadQueue::new();
        q.image("raw", "raw.png").unwrap();
        q.set_path("assets/");
        q.image("logo", "logo.png").unwrap();

        let urls: Vec<_> = q.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["raw.png", "assets/logo.png"]);
    }

    #[test]
    fn duplicate_key_keeps_first() {
        let mut q = LoadQueue::new();
        q.image("logo", "a.png").unwrap();
        let err = q.image("logo", "b.png").unwrap_err();
        assert!(matches!(err, AssetError::DuplicateKey(ref k) if k == "logo"));
        assert_eq!(q.entries().len(), 1);
        assert_eq!(q.entries()[0].url, "a.png");
    }
}
