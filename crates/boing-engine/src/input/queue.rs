use std::collections::HashSet;

use glam::DVec2;

/// Keys the engine names. Anything else arrives as `Other(code)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    Space,
    Other(u32),
}

impl Key {
    /// Map a DOM-style key code.
    pub fn from_code(code: u32) -> Self {
        match code {
            37 => Key::Left,
            38 => Key::Up,
            39 => Key::Right,
            40 => Key::Down,
            65 => Key::A,
            68 => Key::D,
            32 => Key::Space,
            other => Key::Other(other),
        }
    }
}

/// Input event types the engine understands.
/// Generic, no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown { key: Key },
    /// A key was released.
    KeyUp { key: Key },
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f64, y: f64 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f64, y: f64 },
}

/// A queue of input events plus the set of keys currently held.
/// The host pushes events; the runner drains the queue each frame.
/// Pointer events come only from hosts; the queue remembers where a press is held.
#[derive(Debug)]
pub struct InputQueue {
    events: Vec<InputEvent>,
    held: HashSet<Key>,
    pointer: Option<DVec2>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            held: HashSet::new(),
            pointer: None,
        }
    }

    /// Push a new input event. Key state is updated immediately.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key } => {
                self.held.insert(key);
            }
            InputEvent::KeyUp { key } => {
                self.held.remove(&key);
            }
            InputEvent::PointerDown { x, y } => self.pointer = Some(DVec2::new(x, y)),
            InputEvent::PointerUp { .. } => self.pointer = None,
        }
        self.events.push(event);
    }

    /// Drain all pending events. Held keys stay held.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Position of the press currently held down, if any.
    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
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
