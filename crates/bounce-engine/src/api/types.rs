/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Packed 0xRRGGBB colour, the form the web host draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    /// The packed value as an `f32`. Exact, since 24 bits fit in the mantissa.
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_colour_survives_f32() {
        assert_eq!(Color::WHITE.as_f32() as u32, 0xffffff);
        assert_eq!(Color(0x11aa22).as_f32() as u32, 0x11aa22);
        assert_eq!(Color::BLACK.as_f32(), 0.0);
    }
}
