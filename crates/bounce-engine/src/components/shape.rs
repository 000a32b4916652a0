use crate::api::types::Color;

/// Filled circle, used for on-screen touch controls and debug markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleComponent {
    pub radius: f32,
    pub fill: Color,
}

impl CircleComponent {
    pub fn new(radius: f32, fill: Color) -> Self {
        Self { radius, fill }
    }
}
