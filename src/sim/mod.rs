//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by creation order)
//! - No rendering or platform dependencies

pub mod body;
pub mod physics;
pub mod state;
pub mod tick;

pub use body::{Body, BodyColor, BodyId};
pub use physics::{Contact, body_contact, elastic_exchange, pointer_impulse, resolve_pair};
pub use state::Arena;
pub use tick::{TickInput, tick};
