//! `arena_shared`
//!
//! Libraries shared by the arena client and anything speaking its protocol.
//!
//! Design goals:
//! - Snapshots are plain data, replaced whole and never mutated in place.
//! - Drawing goes through a trait so the client runs headless in tests.
//! - Wire format is explicit JSON with named events.
//! - No `unsafe`.

pub mod config;
pub mod event;
pub mod math;
pub mod net;
pub mod render;
pub mod world;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::net::{ClientEvent, ServerEvent};
    pub use crate::render::*;
    pub use crate::world::*;
}
