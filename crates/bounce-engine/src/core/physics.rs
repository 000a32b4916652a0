use std::collections::HashSet;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::na;
use rapier2d::prelude::*;

use crate::api::types::EntityId;

/// `user_data` marker for the world-bounds walls.
const BOUNDS_USER_DATA: u128 = u128::MAX;
/// Thickness of each world-bounds wall. Thick enough that a fast body cannot
/// tunnel through in one step.
const BOUNDS_THICKNESS: f32 = 200.0;

// ---------------------------------------------------------------------------
// Conversion helpers: glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &na::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Description of an arcade body: an axis-aligned, rotation-locked box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcadeBody {
    pub half_extents: Vec2,
    /// Restitution. 0 = dead stop, 1 = perfectly elastic.
    /// Against the world bounds a body uses its own bounce; when two bodies
    /// collide, both use the higher of their two bounces.
    pub bounce: f32,
    pub collide_world_bounds: bool,
    pub velocity: Vec2,
}

impl ArcadeBody {
    /// A body covering a box of the given full size.
    pub fn new(size: Vec2) -> Self {
        Self {
            half_extents: size / 2.0,
            bounce: 0.0,
            collide_world_bounds: false,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_world_bounds(mut self, collide: bool) -> Self {
        self.collide_world_bounds = collide;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Axis-aligned rectangle bodies are kept inside when they collide with world bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

// ---------------------------------------------------------------------------
// Contact filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColliderOwner {
    Bounds,
    Entity(EntityId),
}

fn collider_owner(colliders: &ColliderSet, handle: ColliderHandle) -> Option<ColliderOwner> {
    let collider = colliders.get(handle)?;
    if collider.user_data == BOUNDS_USER_DATA {
        Some(ColliderOwner::Bounds)
    } else {
        Some(ColliderOwner::Entity(EntityId(collider.user_data as u32)))
    }
}

fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Arcade contact rules: a body touches the bounds only when flagged, and two
/// bodies touch only when a collider has been registered for the pair.
#[derive(Default)]
struct ContactFilter {
    bounded: HashSet<EntityId>,
    pairs: HashSet<(EntityId, EntityId)>,
}

impl ContactFilter {
    fn allows(&self, a: ColliderOwner, b: ColliderOwner) -> bool {
        match (a, b) {
            (ColliderOwner::Bounds, ColliderOwner::Bounds) => false,
            (ColliderOwner::Bounds, ColliderOwner::Entity(e))
            | (ColliderOwner::Entity(e), ColliderOwner::Bounds) => self.bounded.contains(&e),
            (ColliderOwner::Entity(a), ColliderOwner::Entity(b)) => {
                self.pairs.contains(&pair_key(a, b))
            }
        }
    }

    fn forget(&mut self, id: EntityId) {
        self.bounded.remove(&id);
        self.pairs.retain(|&(a, b)| a != id && b != id);
    }
}

impl PhysicsHooks for ContactFilter {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        let a = collider_owner(context.colliders, context.collider1)?;
        let b = collider_owner(context.colliders, context.collider2)?;
        if self.allows(a, b) {
            Some(SolverFlags::COMPUTE_IMPULSES)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Arcade-style facade over a Rapier2D world.
pub struct PhysicsWorld {
    gravity: na::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    filter: ContactFilter,
    bounds: WorldBounds,
    bounds_colliders: Vec<ColliderHandle>,
}

impl PhysicsWorld {
    /// Create a world with the given gravity (positive Y is down) and bounds.
    pub fn new(gravity: Vec2, bounds: WorldBounds) -> Self {
        let mut world = Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            filter: ContactFilter::default(),
            bounds,
            bounds_colliders: Vec::with_capacity(4),
        };
        world.build_bounds();
        world
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Move the world bounds, rebuilding the wall colliders.
    pub fn set_bounds(&mut self, bounds: WorldBounds) {
        for handle in self.bounds_colliders.drain(..) {
            self.colliders
                .remove(handle, &mut self.island_manager, &mut self.bodies, true);
        }
        self.bounds = bounds;
        self.build_bounds();
    }

    fn build_bounds(&mut self) {
        let WorldBounds { min, max } = self.bounds;
        let half_t = BOUNDS_THICKNESS / 2.0;
        let center = (min + max) / 2.0;
        let half = (max - min) / 2.0;

        // (centre, half extents) for top, bottom, left, right
        let walls = [
            (Vec2::new(center.x, min.y - half_t), Vec2::new(half.x + BOUNDS_THICKNESS, half_t)),
            (Vec2::new(center.x, max.y + half_t), Vec2::new(half.x + BOUNDS_THICKNESS, half_t)),
            (Vec2::new(min.x - half_t, center.y), Vec2::new(half_t, half.y + BOUNDS_THICKNESS)),
            (Vec2::new(max.x + half_t, center.y), Vec2::new(half_t, half.y + BOUNDS_THICKNESS)),
        ];

        for (pos, half_extents) in walls {
            let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
                .translation(vec2_to_na(pos))
                .restitution(0.0)
                .friction(0.0)
                .user_data(BOUNDS_USER_DATA)
                .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
                .build();
            self.bounds_colliders.push(self.colliders.insert(collider));
        }
    }

    /// Create a body + box collider centred at `center`.
    /// The EntityId is stored in both `user_data` fields for lookups.
    pub fn create_body(&mut self, entity_id: EntityId, center: Vec2, desc: &ArcadeBody) -> PhysicsBody {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(center))
            .linvel(vec2_to_na(desc.velocity))
            .lock_rotations()
            .user_data(entity_id.0 as u128)
            .build();
        let body_handle = self.bodies.insert(rb);

        // The body's own bounce decides how it leaves a wall or a partner.
        let collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .restitution(desc.bounce)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .user_data(entity_id.0 as u128)
            .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        if desc.collide_world_bounds {
            self.filter.bounded.insert(entity_id);
        }

        log::debug!(
            "physics: body for {:?} at {:?}, half extents {:?}",
            entity_id,
            center,
            desc.half_extents
        );

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body, its collider, and every collider pair it took part in.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get(body.body_handle) {
            self.filter.forget(EntityId(rb.user_data as u32));
        }
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Remove every body, keeping the world bounds.
    pub fn clear_bodies(&mut self) {
        let handles: Vec<RigidBodyHandle> = self.bodies.iter().map(|(h, _)| h).collect();
        for handle in handles {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.filter = ContactFilter::default();
    }

    pub fn set_bounce(&mut self, body: &PhysicsBody, bounce: f32) {
        if let Some(collider) = self.colliders.get_mut(body.collider_handle) {
            collider.set_restitution(bounce);
        }
    }

    pub fn bounce(&self, body: &PhysicsBody) -> Option<f32> {
        self.colliders.get(body.collider_handle).map(|c| c.restitution())
    }

    pub fn set_collide_world_bounds(&mut self, entity_id: EntityId, collide: bool) {
        if collide {
            self.filter.bounded.insert(entity_id);
        } else {
            self.filter.bounded.remove(&entity_id);
        }
    }

    pub fn collides_world_bounds(&self, entity_id: EntityId) -> bool {
        self.filter.bounded.contains(&entity_id)
    }

    /// Let the bodies of `a` and `b` collide with each other.
    pub fn add_collider(&mut self, a: EntityId, b: EntityId) {
        if a == b {
            return;
        }
        if self.filter.pairs.insert(pair_key(a, b)) {
            log::debug!("physics: collider registered between {:?} and {:?}", a, b);
        }
    }

    pub fn remove_collider(&mut self, a: EntityId, b: EntityId) {
        self.filter.pairs.remove(&pair_key(a, b));
    }

    pub fn has_collider(&self, a: EntityId, b: EntityId) -> bool {
        self.filter.pairs.contains(&pair_key(a, b))
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.filter,
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Wall contacts are not reported.
            if let (Some(ColliderOwner::Entity(a)), Some(ColliderOwner::Entity(b))) = (
                collider_owner(&self.colliders, h1),
                collider_owner(&self.colliders, h2),
            ) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Set the horizontal velocity, keeping the vertical component.
    pub fn set_velocity_x(&mut self, body: &PhysicsBody, vx: f32) {
        let vel = self.velocity(body);
        self.set_velocity(body, Vec2::new(vx, vel.y));
    }

    /// Set the vertical velocity, keeping the horizontal component.
    pub fn set_velocity_y(&mut self, body: &PhysicsBody, vy: f32) {
        let vel = self.velocity(body);
        self.set_velocity(body, Vec2::new(vel.x, vy));
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Current centre of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Teleport a body, e.g. after game code moves its entity.
    pub fn set_body_position(&mut self, body: &PhysicsBody, center: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(center), true);
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Half extents of a body's box collider.
    pub fn half_extents(&self, body: &PhysicsBody) -> Option<Vec2> {
        let collider = self.colliders.get(body.collider_handle)?;
        let cuboid = collider.shape().as_cuboid()?;
        Some(na_to_vec2(&cuboid.half_extents))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec2::ZERO, WorldBounds::new(-1000.0, -1000.0, 2000.0, 2000.0));
        world.set_dt(1.0 / 60.0);
        world
    }

    fn step_n(world: &mut PhysicsWorld, n: usize) -> Vec<CollisionPair> {
        let mut events = Vec::new();
        for _ in 0..n {
            world.step_into(&mut events);
        }
        events
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = open_world();
        let body = world.create_body(EntityId(1), Vec2::ZERO, &ArcadeBody::new(Vec2::splat(20.0)));
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_pulls_body_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 300.0), WorldBounds::new(0.0, 0.0, 1024.0, 768.0));
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(EntityId(1), Vec2::new(100.0, 100.0), &ArcadeBody::new(Vec2::splat(20.0)));
        step_n(&mut world, 10);
        assert!(world.body_position(&body).y > 100.0);
    }

    #[test]
    fn axis_setters_keep_other_component() {
        let mut world = open_world();
        let body = world.create_body(EntityId(1), Vec2::ZERO, &ArcadeBody::new(Vec2::splat(20.0)));
        world.set_velocity(&body, Vec2::new(50.0, -30.0));
        world.set_velocity_x(&body, -200.0);
        assert_eq!(world.velocity(&body), Vec2::new(-200.0, -30.0));
        world.set_velocity_y(&body, -400.0);
        assert_eq!(world.velocity(&body), Vec2::new(-200.0, -400.0));
    }

    #[test]
    fn bounded_body_bounces_off_floor() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, WorldBounds::new(0.0, 0.0, 200.0, 200.0));
        world.set_dt(1.0 / 60.0);
        let desc = ArcadeBody::new(Vec2::splat(20.0))
            .with_bounce(1.0)
            .with_world_bounds(true)
            .with_velocity(Vec2::new(0.0, 200.0));
        let body = world.create_body(EntityId(1), Vec2::new(100.0, 100.0), &desc);

        step_n(&mut world, 60);

        let vel = world.velocity(&body);
        let pos = world.body_position(&body);
        assert!(vel.y < 0.0, "body should be moving back up: {:?}", vel);
        assert!(pos.y <= 200.0, "body should stay inside bounds: {:?}", pos);
    }

    #[test]
    fn unbounded_body_leaves_the_world() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, WorldBounds::new(0.0, 0.0, 200.0, 200.0));
        world.set_dt(1.0 / 60.0);
        let desc = ArcadeBody::new(Vec2::splat(20.0)).with_velocity(Vec2::new(0.0, 200.0));
        let body = world.create_body(EntityId(1), Vec2::new(100.0, 100.0), &desc);

        step_n(&mut world, 60);

        assert!(world.body_position(&body).y > 200.0);
    }

    fn converging_pair(world: &mut PhysicsWorld) -> (PhysicsBody, PhysicsBody) {
        let a = world.create_body(
            EntityId(1),
            Vec2::new(0.0, 0.0),
            &ArcadeBody::new(Vec2::splat(20.0)).with_velocity(Vec2::new(200.0, 0.0)),
        );
        let b = world.create_body(
            EntityId(2),
            Vec2::new(60.0, 0.0),
            &ArcadeBody::new(Vec2::splat(20.0)).with_velocity(Vec2::new(-200.0, 0.0)),
        );
        (a, b)
    }

    #[test]
    fn unregistered_bodies_pass_through_each_other() {
        let mut world = open_world();
        let (a, b) = converging_pair(&mut world);
        step_n(&mut world, 60);
        assert!(world.body_position(&a).x > world.body_position(&b).x);
    }

    #[test]
    fn registered_pair_collides_and_reports() {
        let mut world = open_world();
        let (a, b) = converging_pair(&mut world);
        world.add_collider(EntityId(2), EntityId(1));
        assert!(world.has_collider(EntityId(1), EntityId(2)));

        let events = step_n(&mut world, 60);

        assert!(world.body_position(&a).x < world.body_position(&b).x);
        let started = events.iter().find(|e| e.started).expect("collision should start");
        let ids = [started.entity_a, started.entity_b];
        assert!(ids.contains(&EntityId(1)) && ids.contains(&EntityId(2)));
    }

    #[test]
    fn colliding_pair_uses_the_higher_bounce() {
        let mut world = open_world();
        let dead = world.create_body(
            EntityId(1),
            Vec2::new(0.0, 0.0),
            &ArcadeBody::new(Vec2::splat(20.0)).with_velocity(Vec2::new(200.0, 0.0)),
        );
        let lively = world.create_body(
            EntityId(2),
            Vec2::new(60.0, 0.0),
            &ArcadeBody::new(Vec2::splat(20.0)).with_bounce(1.0),
        );
        world.add_collider(EntityId(1), EntityId(2));

        step_n(&mut world, 30);

        // Elastic exchange between equal masses: the mover stops, the target takes its speed.
        assert!(world.velocity(&dead).x.abs() < 50.0, "{:?}", world.velocity(&dead));
        assert!(world.velocity(&lively).x > 150.0, "{:?}", world.velocity(&lively));
    }

    #[test]
    fn removing_body_forgets_its_pairs_and_flags() {
        let mut world = open_world();
        let a = world.create_body(
            EntityId(1),
            Vec2::ZERO,
            &ArcadeBody::new(Vec2::splat(20.0)).with_world_bounds(true),
        );
        world.create_body(EntityId(2), Vec2::new(100.0, 0.0), &ArcadeBody::new(Vec2::splat(20.0)));
        world.add_collider(EntityId(1), EntityId(2));

        world.remove_body(&a);

        assert!(!world.has_collider(EntityId(1), EntityId(2)));
        assert!(!world.collides_world_bounds(EntityId(1)));
    }

    #[test]
    fn bounce_and_bounds_flag_can_change_after_creation() {
        let mut world = open_world();
        let body = world.create_body(EntityId(7), Vec2::ZERO, &ArcadeBody::new(Vec2::splat(10.0)));
        assert!(!world.collides_world_bounds(EntityId(7)));

        world.set_bounce(&body, 0.8);
        world.set_collide_world_bounds(EntityId(7), true);

        assert!((world.bounce(&body).unwrap() - 0.8).abs() < 0.001);
        assert!(world.collides_world_bounds(EntityId(7)));
    }

    #[test]
    fn set_bounds_keeps_bodies() {
        let mut world = open_world();
        world.create_body(EntityId(1), Vec2::ZERO, &ArcadeBody::new(Vec2::splat(10.0)));
        world.set_bounds(WorldBounds::new(0.0, 0.0, 640.0, 480.0));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.bounds().max, Vec2::new(640.0, 480.0));
    }

    #[test]
    fn half_extents_match_description() {
        let mut world = open_world();
        let body = world.create_body(EntityId(1), Vec2::ZERO, &ArcadeBody::new(Vec2::new(40.0, 20.0)));
        assert_eq!(world.half_extents(&body), Some(Vec2::new(20.0, 10.0)));
    }
}
