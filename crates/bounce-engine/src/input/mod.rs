pub mod keyboard;
pub mod pointer;
pub mod queue;

use crate::api::types::EntityId;
use crate::core::scene::Scene;
use keyboard::Keyboard;
use pointer::{PointerSignal, PointerTracker};
use queue::InputEvent;

/// Everything a scene sees of input during one frame.
#[derive(Debug, Default)]
pub struct Input {
    events: Vec<InputEvent>,
    signals: Vec<PointerSignal>,
    keyboard: Keyboard,
    pointers: PointerTracker,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take this frame's raw events: update held keys and resolve pointer signals.
    pub fn begin_frame(&mut self, events: Vec<InputEvent>, scene: &Scene) {
        for event in &events {
            self.keyboard.apply(event);
        }
        self.signals = self.pointers.process(&events, scene);
        self.events = events;
    }

    /// Forget per-frame events and signals. Held keys and hover state persist.
    pub fn end_frame(&mut self) {
        self.events.clear();
        self.signals.clear();
    }

    /// Forget everything, including held keys and hover state.
    pub fn reset(&mut self) {
        self.end_frame();
        self.keyboard.reset();
        self.pointers.reset();
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn signals(&self) -> &[PointerSignal] {
        &self.signals
    }

    /// Signals addressed to one entity, in event order.
    pub fn signals_for(&self, entity: EntityId) -> impl Iterator<Item = &PointerSignal> {
        self.signals.iter().filter(move |s| s.entity == entity)
    }

    /// Whether any pointer was pressed this frame, anywhere on the canvas.
    pub fn any_pointer_down(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::PointerDown { .. }))
    }
}
