//! Text labels.
//!
//! Glyph rasterisation happens on the web host; the engine only needs a
//! size estimate so text can carry a physics body and a hit area.

use glam::Vec2;
use crate::api::types::Color;

/// Horizontal advance of a narrow (ASCII) glyph, as a fraction of font size.
pub const NARROW_ADVANCE: f32 = 0.55;
/// Horizontal advance of a wide (CJK, symbols) glyph, as a fraction of font size.
pub const WIDE_ADVANCE: f32 = 1.0;
/// Line height as a fraction of font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Horizontal alignment of multi-line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Visual style of a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    pub color: Color,
    pub stroke: Color,
    /// Outline width in pixels (0 = no outline).
    pub stroke_thickness: f32,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Courier".to_string(),
            font_size: 16.0,
            color: Color::WHITE,
            stroke: Color::BLACK,
            stroke_thickness: 0.0,
            align: TextAlign::Left,
        }
    }
}

impl TextStyle {
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke(mut self, stroke: Color, thickness: f32) -> Self {
        self.stroke = stroke;
        self.stroke_thickness = thickness;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Text component: a string plus its style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    pub content: String,
    pub style: TextStyle,
}

impl TextComponent {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    /// Estimated bounding box of the rendered text, in pixels.
    pub fn measure(&self) -> Vec2 {
        let size = self.style.font_size;
        let mut lines = 0usize;
        let mut widest = 0.0f32;

        for line in self.content.split('\n') {
            lines += 1;
            let width: f32 = line.chars().map(|c| glyph_advance(c) * size).sum();
            widest = widest.max(width);
        }

        let stroke = self.style.stroke_thickness;
        Vec2::new(
            widest + stroke,
            lines as f32 * size * LINE_HEIGHT + stroke,
        )
    }
}

fn glyph_advance(c: char) -> f32 {
    if c.is_ascii() {
        NARROW_ADVANCE
    } else {
        WIDE_ADVANCE
    }
}
