//! Input handling.
//!
//! Raw signals (keys, pointer, fire) arrive from an [`InputSource`] and are
//! folded into [`InputCapture`]. The only signal that produces network intent
//! directly is `Fire`; heading is derived from the pointer once per tick.

use std::collections::{HashMap, VecDeque};

use arena_shared::{math::Vec2, net::ClientEvent, world::PlayerState};
use tokio::sync::mpsc;

/// A single input event from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSignal {
    KeyDown(String),
    KeyUp(String),
    /// Pointer position relative to the surface origin.
    PointerMove { x: f64, y: f64 },
    /// Discrete fire trigger (primary click).
    Fire,
}

/// Supplies the input signals that arrived since the last tick.
pub trait InputSource {
    fn drain(&mut self) -> Vec<InputSignal>;
}

/// In-memory queue, for scripted runs and tests.
#[derive(Debug, Default)]
pub struct QueuedInput {
    queue: VecDeque<InputSignal>,
}

impl QueuedInput {
    pub fn push(&mut self, signal: InputSignal) {
        self.queue.push_back(signal);
    }
}

impl InputSource for QueuedInput {
    fn drain(&mut self) -> Vec<InputSignal> {
        self.queue.drain(..).collect()
    }
}

/// Signals delivered from another thread (console, window event pump).
pub struct ChannelInput {
    rx: mpsc::UnboundedReceiver<InputSignal>,
}

impl ChannelInput {
    pub fn new() -> (mpsc::UnboundedSender<InputSignal>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

impl InputSource for ChannelInput {
    fn drain(&mut self) -> Vec<InputSignal> {
        let mut out = Vec::new();
        while let Ok(signal) = self.rx.try_recv() {
            out.push(signal);
        }
        out
    }
}

/// Current key and pointer state.
#[derive(Debug, Default)]
pub struct InputCapture {
    keys: HashMap<String, bool>,
    pointer: Vec2,
}

impl InputCapture {
    /// Records a signal. Returns the intent it produces, if any.
    pub fn apply(&mut self, signal: InputSignal) -> Option<ClientEvent> {
        match signal {
            InputSignal::KeyDown(key) => {
                self.keys.insert(key.to_lowercase(), true);
                None
            }
            InputSignal::KeyUp(key) => {
                self.keys.insert(key.to_lowercase(), false);
                None
            }
            InputSignal::PointerMove { x, y } => {
                self.pointer = Vec2::new(x, y);
                None
            }
            InputSignal::Fire => Some(ClientEvent::PlayerShoot),
        }
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.keys
            .get(&key.to_lowercase())
            .copied()
            .unwrap_or(false)
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Heading from the local ship towards the pointer, in radians.
    pub fn compute_aim_direction(&self, local: &PlayerState) -> f64 {
        local.position().angle_to(self.pointer)
    }
}
