//! Pointer hit-testing against interactive entities.
//!
//! Raw pointer events become [`PointerSignal`]s addressed to the top-most
//! interactive entity under the pointer. Each pointer hovers at most one
//! entity at a time; leaving it (by moving away or leaving the canvas)
//! produces an `Out` signal.

use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::input::queue::InputEvent;

/// Interactive region, centred on the entity's displayed centre and scaled with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitArea {
    Circle { radius: f32 },
    Rect { size: Vec2 },
}

impl HitArea {
    pub fn contains(&self, entity: &Entity, point: Vec2) -> bool {
        let local = point - entity.center();
        match *self {
            HitArea::Circle { radius } => {
                let r = radius * entity.scale.x.abs();
                local.length_squared() <= r * r
            }
            HitArea::Rect { size } => {
                let half = (size * entity.scale).abs() / 2.0;
                local.x.abs() <= half.x && local.y.abs() <= half.y
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSignalKind {
    Over,
    Out,
    Down,
    Up,
}

/// A pointer event resolved against one interactive entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSignal {
    pub entity: EntityId,
    pub pointer: u32,
    pub kind: PointerSignalKind,
}

/// Tracks which entity each pointer is over.
#[derive(Debug, Default)]
pub struct PointerTracker {
    over: HashMap<u32, EntityId>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a frame's worth of events into signals, in event order.
    pub fn process(&mut self, events: &[InputEvent], scene: &Scene) -> Vec<PointerSignal> {
        let mut signals = Vec::new();
        for event in events {
            match *event {
                InputEvent::PointerDown { id, x, y } => {
                    let hit = top_hit(scene, Vec2::new(x, y));
                    self.hover(id, hit, scene, &mut signals);
                    if let Some(entity) = hit {
                        signals.push(PointerSignal { entity, pointer: id, kind: PointerSignalKind::Down });
                    }
                }
                InputEvent::PointerUp { id, x, y } => {
                    let hit = top_hit(scene, Vec2::new(x, y));
                    self.hover(id, hit, scene, &mut signals);
                    if let Some(entity) = hit {
                        signals.push(PointerSignal { entity, pointer: id, kind: PointerSignalKind::Up });
                    }
                    // Touches get a fresh id each time; a released pointer hovers nothing.
                    self.over.remove(&id);
                }
                InputEvent::PointerMove { id, x, y } => {
                    let hit = top_hit(scene, Vec2::new(x, y));
                    self.hover(id, hit, scene, &mut signals);
                }
                InputEvent::PointerLeave { id } => {
                    self.hover(id, None, scene, &mut signals);
                }
                _ => {}
            }
        }
        signals
    }

    /// Entity currently under `pointer`, if any.
    pub fn hovered(&self, pointer: u32) -> Option<EntityId> {
        self.over.get(&pointer).copied()
    }

    pub fn reset(&mut self) {
        self.over.clear();
    }

    fn hover(
        &mut self,
        pointer: u32,
        hit: Option<EntityId>,
        scene: &Scene,
        signals: &mut Vec<PointerSignal>,
    ) {
        let previous = self.over.get(&pointer).copied();
        if previous == hit {
            return;
        }
        // Despawned entities get no Out.
        if let Some(prev) = previous.filter(|id| scene.get(*id).is_some()) {
            signals.push(PointerSignal { entity: prev, pointer, kind: PointerSignalKind::Out });
        }
        match hit {
            Some(entity) => {
                self.over.insert(pointer, entity);
                signals.push(PointerSignal { entity, pointer, kind: PointerSignalKind::Over });
            }
            None => {
                self.over.remove(&pointer);
            }
        }
    }
}

/// Top-most (highest depth, latest spawned on ties) active entity whose hit area contains `point`.
fn top_hit(scene: &Scene, point: Vec2) -> Option<EntityId> {
    scene
        .by_depth()
        .into_iter()
        .rev()
        .filter(|e| e.active)
        .find(|e| e.hit_area.map_or(false, |area| area.contains(e, point)))
        .map(|e| e.id)
}
