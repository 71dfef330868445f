//! Named event dispatch.
//!
//! Inbound events are routed to handlers by their wire name, the way a
//! socket-style `on("gameState", ...)` registration works. Handlers run on
//! whatever task delivers the event, so they must be `Send + Sync`.

use std::collections::HashMap;

use crate::net::ServerEvent;

/// Callback registered for one event name.
pub type Handler = Box<dyn Fn(&ServerEvent) + Send + Sync>;

/// Handler table keyed by event name.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<&'static str, Vec<Handler>>,
}

impl EventDispatcher {
    /// Registers `handler` for events named `name`.
    pub fn on(&mut self, name: &'static str, handler: Handler) {
        self.handlers.entry(name).or_default().push(handler);
    }

    /// Runs every handler registered for the event's name, in registration
    /// order. Returns how many ran.
    pub fn dispatch(&self, event: &ServerEvent) -> usize {
        match self.handlers.get(event.name()) {
            Some(list) => {
                for handler in list {
                    handler(event);
                }
                list.len()
            }
            None => 0,
        }
    }
}
