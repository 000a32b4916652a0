use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::image::ImageComponent;
use crate::components::shape::CircleComponent;
use crate::components::text::TextComponent;
use crate::core::physics::PhysicsBody;
use crate::input::pointer::HitArea;

/// What an entity draws. Entities without a visual are invisible.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Image(ImageComponent),
    Text(TextComponent),
    Circle(CircleComponent),
}

impl Visual {
    /// Natural (unscaled) size of the visual in pixels.
    pub fn natural_size(&self) -> Vec2 {
        match self {
            Visual::Image(image) => image.frame,
            Visual::Text(text) => text.measure(),
            Visual::Circle(circle) => Vec2::splat(circle.radius * 2.0),
        }
    }
}

/// Fat Entity: one struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Inactive entities are neither drawn nor hit-tested.
    pub active: bool,
    /// Position of the origin point in world space.
    pub pos: Vec2,
    /// Rotation in radians. Arcade bodies never rotate, so this stays 0 for them.
    pub rotation: f32,
    /// Scale factor applied to the visual's natural size.
    pub scale: Vec2,
    /// Normalised anchor of `pos` within the visual: (0,0) top-left, (0.5,0.5) centre.
    pub origin: Vec2,
    /// Draw order; higher depths are drawn later (on top).
    pub depth: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    pub visual: Option<Visual>,
    /// Pointer hit area; `None` means not interactive.
    pub hit_area: Option<HitArea>,
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            origin: Vec2::splat(0.5),
            depth: 0.0,
            alpha: 1.0,
            visual: None,
            hit_area: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn with_hit_area(mut self, hit_area: HitArea) -> Self {
        self.hit_area = Some(hit_area);
        self
    }

    // -- Geometry --

    /// Displayed size: natural size times scale. Zero for invisible entities.
    pub fn display_size(&self) -> Vec2 {
        self.visual
            .as_ref()
            .map(|v| v.natural_size() * self.scale)
            .unwrap_or(Vec2::ZERO)
    }

    /// Offset from `pos` to the centre of the displayed bounds.
    fn center_offset(&self) -> Vec2 {
        (Vec2::splat(0.5) - self.origin) * self.display_size()
    }

    /// World-space centre of the displayed bounds. Physics bodies sit here.
    pub fn center(&self) -> Vec2 {
        self.pos + self.center_offset()
    }

    /// Move the entity so that its displayed centre lands on `center`.
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.center_offset();
    }
}
