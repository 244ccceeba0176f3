//! Fixed timestep simulation tick
//!
//! One call advances the arena by one frame unit.

use glam::Vec2;

use super::physics::{integrate, reflect_walls, repel_from_pointer, resolve_pair};
use super::state::Arena;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Last known pointer position in arena coordinates
    pub pointer: Option<Vec2>,
    /// Freeze the simulation (rendering continues)
    pub paused: bool,
}

/// Advance the arena by one tick. Returns false when paused.
///
/// Bodies are processed in collection order. For body `i`: integrate,
/// damp, bounce off walls, resolve contact with every later body `j > i`,
/// then take the pointer kick. Later bodies have not moved yet this tick
/// when `i` collides with them.
pub fn tick(arena: &mut Arena, input: &TickInput) -> bool {
    if input.paused {
        return false;
    }

    arena.time_ticks += 1;

    let size = arena.size();
    let config = arena.config();
    let (damping, pointer_radius, pointer_strength) =
        (config.damping, config.pointer_radius, config.pointer_strength);

    for i in 0..arena.bodies.len() {
        let (head, rest) = arena.bodies.split_at_mut(i + 1);
        let body = &mut head[i];

        integrate(body, damping);
        reflect_walls(body, size);

        for other in rest.iter_mut() {
            resolve_pair(body, other);
        }

        if let Some(pointer) = input.pointer {
            repel_from_pointer(body, pointer, pointer_radius, pointer_strength);
        }
    }

    true
}
