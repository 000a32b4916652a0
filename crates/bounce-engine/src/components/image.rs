/// Image component: draws a loaded texture, looked up by its asset key.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageComponent {
    /// Key the texture was declared under in `preload`.
    pub key: String,
    /// Unscaled texture size in pixels, as reported by the asset cache.
    pub frame: glam::Vec2,
}

impl ImageComponent {
    pub fn new(key: impl Into<String>, frame: glam::Vec2) -> Self {
        Self {
            key: key.into(),
            frame,
        }
    }
}
