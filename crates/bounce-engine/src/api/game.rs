use glam::Vec2;

use crate::api::types::{Color, EntityId};
use crate::assets::cache::AssetCache;
use crate::assets::loader::LoadQueue;
use crate::components::entity::{Entity, Visual};
use crate::components::image::ImageComponent;
use crate::components::shape::CircleComponent;
use crate::components::text::{TextComponent, TextStyle};
use crate::core::physics::{ArcadeBody, CollisionPair, PhysicsWorld, WorldBounds};
use crate::core::scene::Scene;
use crate::input::pointer::HitArea;
use crate::input::Input;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in pixels. World bounds span `0..world_width`.
    pub world_width: f32,
    /// World height in pixels. World bounds span `0..world_height`.
    pub world_height: f32,
    /// Gravity in pixels/s². Positive Y is down.
    pub gravity: Vec2,
    /// Maximum number of render instances per frame (default: 256).
    pub max_instances: usize,
    /// Maximum fixed steps run for one rendered frame (default: 10).
    pub max_steps_per_frame: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1024.0,
            world_height: 768.0,
            gravity: Vec2::new(0.0, 300.0),
            max_instances: 256,
            max_steps_per_frame: 10,
        }
    }
}

/// Lifecycle every scene implements. The runner calls `preload` once, then
/// `create` once all declared assets have settled, then `update` every fixed
/// step, and `shutdown` when the scene is torn down.
pub trait Game {
    /// Engine configuration. Called once before anything else.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Declare the assets the scene needs.
    fn preload(&mut self, _load: &mut LoadQueue) {}

    /// One-time setup: spawn entities, configure bodies, bind input.
    fn create(&mut self, ctx: &mut EngineContext);

    /// The per-step tick. Physics is stepped by the runner right after.
    fn update(&mut self, ctx: &mut EngineContext, input: &Input);

    /// Release scene-held handles. Entities and bodies are cleared by the runner.
    fn shutdown(&mut self, _ctx: &mut EngineContext) {}
}

/// Mutable access to engine state, passed to `Game::create` and `Game::update`.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub assets: AssetCache,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let bounds = WorldBounds::new(0.0, 0.0, config.world_width, config.world_height);
        let mut physics = PhysicsWorld::new(config.gravity, bounds);
        physics.set_dt(config.fixed_dt);
        Self {
            scene: Scene::new(),
            physics,
            assets: AssetCache::new(),
            next_id: 1,
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // -- Factories --

    /// Add an image centred on `pos`, sized from the asset cache.
    pub fn add_image(&mut self, pos: Vec2, key: &str) -> EntityId {
        let id = self.next_id();
        let frame = self.assets.image_size(key);
        self.scene.spawn(
            Entity::new(id)
                .with_tag(key)
                .with_pos(pos)
                .with_visual(Visual::Image(ImageComponent::new(key, frame))),
        );
        id
    }

    /// Add an image with an arcade body already attached.
    pub fn add_physics_image(&mut self, pos: Vec2, key: &str, scale: f32) -> EntityId {
        let id = self.add_image(pos, key);
        self.set_scale(id, scale);
        self.enable_body(id);
        id
    }

    /// Add a text label. Like any text, its origin starts at the top-left.
    pub fn add_text(&mut self, pos: Vec2, content: &str, style: TextStyle) -> EntityId {
        let id = self.next_id();
        self.scene.spawn(
            Entity::new(id)
                .with_pos(pos)
                .with_origin(Vec2::ZERO)
                .with_visual(Visual::Text(TextComponent::new(content, style))),
        );
        id
    }

    pub fn add_circle(&mut self, pos: Vec2, radius: f32, fill: Color, alpha: f32) -> EntityId {
        let id = self.next_id();
        self.scene.spawn(
            Entity::new(id)
                .with_pos(pos)
                .with_alpha(alpha)
                .with_visual(Visual::Circle(CircleComponent::new(radius, fill))),
        );
        id
    }

    // -- Display properties --

    /// Set a uniform scale. An attached body keeps its size until `refresh_body`.
    pub fn set_scale(&mut self, id: EntityId, scale: f32) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.scale = Vec2::splat(scale);
        }
    }

    pub fn set_depth(&mut self, id: EntityId, depth: f32) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.depth = depth;
        }
    }

    /// Change the origin, keeping `pos` fixed. An attached body follows the moved centre.
    pub fn set_origin(&mut self, id: EntityId, origin: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.origin = origin;
            if let Some(body) = &entity.body {
                self.physics.set_body_position(body, entity.center());
            }
        }
    }

    /// Make an entity respond to pointers, with a hit area matching its visual.
    pub fn set_interactive(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.get_mut(id) {
            let area = match &entity.visual {
                Some(Visual::Circle(circle)) => HitArea::Circle { radius: circle.radius },
                Some(visual) => HitArea::Rect { size: visual.natural_size() },
                None => return,
            };
            entity.hit_area = Some(area);
        }
    }

    // -- Physics convenience methods --

    /// Attach an arcade body sized to the entity's displayed bounds.
    /// Returns false if the entity does not exist or already has a body.
    pub fn enable_body(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.scene.get_mut(id) else {
            return false;
        };
        if entity.body.is_some() {
            return false;
        }
        let desc = ArcadeBody::new(entity.display_size());
        entity.body = Some(self.physics.create_body(id, entity.center(), &desc));
        true
    }

    /// Rebuild a body after its entity was rescaled, keeping bounce, bounds flag and velocity.
    pub fn refresh_body(&mut self, id: EntityId) {
        let Some(entity) = self.scene.get_mut(id) else {
            return;
        };
        let Some(old) = entity.body.take() else {
            return;
        };
        let desc = ArcadeBody::new(entity.display_size())
            .with_bounce(self.physics.bounce(&old).unwrap_or(0.0))
            .with_world_bounds(self.physics.collides_world_bounds(id))
            .with_velocity(self.physics.velocity(&old));
        let partners: Vec<EntityId> = self
            .scene_ids()
            .into_iter()
            .filter(|other| self.physics.has_collider(id, *other))
            .collect();

        self.physics.remove_body(&old);
        if let Some(entity) = self.scene.get_mut(id) {
            entity.body = Some(self.physics.create_body(id, entity.center(), &desc));
        }
        for other in partners {
            self.physics.add_collider(id, other);
        }
    }

    fn scene_ids(&self) -> Vec<EntityId> {
        self.scene.iter().map(|e| e.id).collect()
    }

    pub fn has_body(&self, id: EntityId) -> bool {
        self.scene.get(id).map_or(false, |e| e.body.is_some())
    }

    pub fn set_bounce(&mut self, id: EntityId, bounce: f32) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            self.physics.set_bounce(body, bounce);
        }
    }

    pub fn set_collide_world_bounds(&mut self, id: EntityId, collide: bool) {
        if self.has_body(id) {
            self.physics.set_collide_world_bounds(id, collide);
        }
    }

    /// Register a collider: the two entities' bodies now collide with each other.
    pub fn add_collider(&mut self, a: EntityId, b: EntityId) {
        if self.has_body(a) && self.has_body(b) {
            self.physics.add_collider(a, b);
        } else {
            log::warn!("collider between {:?} and {:?} ignored: missing body", a, b);
        }
    }

    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            self.physics.set_velocity(body, vel);
        }
    }

    pub fn set_velocity_x(&mut self, id: EntityId, vx: f32) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            self.physics.set_velocity_x(body, vx);
        }
    }

    pub fn set_velocity_y(&mut self, id: EntityId, vy: f32) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            self.physics.set_velocity_y(body, vy);
        }
    }

    /// Linear velocity of an entity's body; zero when it has none.
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Despawn an entity, cleaning up its physics body if present.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    /// Step the physics simulation and sync body centres back to entities.
    /// Called by the runner after every `Game::update()`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);
        for pair in self.collision_events.iter().filter(|p| p.started) {
            log::debug!("physics: {:?} hit {:?}", pair.entity_a, pair.entity_b);
        }

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let center = self.physics.body_position(body);
                entity.set_center(center);
            }
        }
    }

    /// Tear down every entity and body. Loaded assets are kept.
    pub fn clear(&mut self) {
        self.physics.clear_bodies();
        self.scene.clear();
        self.collision_events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
