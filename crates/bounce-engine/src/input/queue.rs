/// Input event types the engine understands.
/// Generic, with no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer `id` (mouse = 0, touches 1..) pressed at world coordinates (x, y).
    PointerDown { id: u32, x: f32, y: f32 },
    /// Pointer `id` released at world coordinates (x, y).
    PointerUp { id: u32, x: f32, y: f32 },
    /// Pointer `id` moved to world coordinates (x, y).
    PointerMove { id: u32, x: f32, y: f32 },
    /// Pointer `id` left the canvas or was cancelled.
    PointerLeave { id: u32 },
    /// A key was pressed. `key_code` is the DOM `keyCode`.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// The canvas lost focus; held keys will never see their key-up.
    Blur,
}

/// A queue of input events.
/// JS writes events into the queue; the runner drains it once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { id: 0, x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 37 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[1], InputEvent::KeyDown { key_code: 37 });
        assert!(q.is_empty());
    }
}
