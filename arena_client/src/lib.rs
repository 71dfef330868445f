//! `arena_client`
//!
//! Client-side systems:
//! - Input capture and aim
//! - Latest-snapshot store
//! - Frame renderer over an abstract drawing surface
//! - Status line projection
//! - Frame loop and scheduling
//! - Message channel to the authority (framed TCP)

pub mod channel;
pub mod client;
pub mod console;
pub mod game_loop;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod status;
pub mod store;

pub use client::GameClient;
pub use game_loop::{GameLoop, Host, LoopState};
