use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// What a [`RenderInstance`] draws. Stored as `f32` in the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InstanceKind {
    Image = 0,
    Text = 1,
    Circle = 2,
}

/// Per-instance draw data read by the TypeScript renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Centre X in world space.
    pub x: f32,
    /// Centre Y in world space.
    pub y: f32,
    /// Displayed width (scale applied).
    pub width: f32,
    /// Displayed height (scale applied).
    pub height: f32,
    pub rotation: f32,
    pub alpha: f32,
    /// [`InstanceKind`] as a float.
    pub kind: f32,
    /// Index into [`RenderBuffer::labels`], or -1.
    pub label: f32,
    /// Packed 0xRRGGBB fill (text colour, circle fill; unused for images).
    pub fill: f32,
    /// Packed 0xRRGGBB stroke colour.
    pub stroke: f32,
    pub stroke_width: f32,
    /// Font size in pixels for text; 0 otherwise.
    pub font_size: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// String data that does not fit in an instance: an image key, or text plus font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLabel {
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub font: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub align: String,
}

/// Instances for one frame, ordered back-to-front.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub labels: Vec<RenderLabel>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// A buffer that holds at most `capacity` instances per frame.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            labels: Vec::new(),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.labels.clear();
    }

    /// Append an instance. Returns false (and drops it) when the buffer is full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    /// Store a label and return its index as written into an instance.
    pub fn push_label(&mut self, label: RenderLabel) -> f32 {
        self.labels.push(label);
        (self.labels.len() - 1) as f32
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Labels as JSON, for the host to fetch once per frame.
    pub fn labels_json(&self) -> String {
        serde_json::to_string(&self.labels).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_is_12_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
    }

    #[test]
    fn push_respects_capacity() {
        let mut buf = RenderBuffer::with_capacity(1);
        assert!(buf.push(RenderInstance::default()));
        assert!(!buf.push(RenderInstance::default()));
        assert_eq!(buf.instance_count(), 1);
    }

    #[test]
    fn labels_serialize_without_empty_fields() {
        let mut buf = RenderBuffer::new();
        buf.push_label(RenderLabel { text: "logo".into(), font: String::new(), align: String::new() });
        assert_eq!(buf.labels_json(), r#"[{"text":"logo"}]"#);
    }
}
