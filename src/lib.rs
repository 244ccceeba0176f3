//! Ball Brawl - circular bodies bouncing around a square arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, physics step, hit-testing)
//! - `renderer`: Paint routine and WebGPU pipeline
//! - `driver`: Fixed-rate frame driver and session ownership
//! - `config`: Arena configuration (defaults mirror `consts`)

pub mod config;
pub mod driver;
pub mod renderer;
pub mod sim;

pub use config::ArenaConfig;
pub use driver::{CancelToken, FixedStep, Session, SessionEvent};

use glam::Vec2;

/// Fixed configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed tick length in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Ticks run per animation frame at most; a late frame never catches up
    pub const MAX_SUBSTEPS: u32 = 1;

    /// Arena dimensions (pixels, y pointing down)
    pub const ARENA_WIDTH: f32 = 500.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Body defaults
    pub const BODY_COUNT: usize = 5;
    pub const BODY_RADIUS: f32 = 30.0;
    pub const BODY_MASS: f32 = 1.0;
    pub const DEFAULT_COLOR: &str = "#100720";

    /// Per-tick velocity multiplier
    pub const DAMPING: f32 = 0.99;

    /// Pointer repulsion falls off linearly to zero at this distance
    pub const POINTER_RADIUS: f32 = 40.0;
    pub const POINTER_STRENGTH: f32 = 0.1;

    /// Recolor choices offered by the color menu (label, CSS color)
    pub const PALETTE: [(&str, &str); 3] = [
        ("Pink", "rgba(255, 94, 247, 1)"),
        ("Blue", "rgba(2, 245, 255, 1)"),
        ("Dark blue", "rgba(2, 19, 255, 1)"),
    ];
}

/// Unit vector from `from` toward `to`, or `fallback` when the points coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 {
        (delta / dist, dist)
    } else {
        (fallback, 0.0)
    }
}
