//! Arena state
//!
//! The arena is the single owner of every body. Rendering and input code
//! reach bodies only through the accessors here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyColor, BodyId};
use crate::config::ArenaConfig;

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Seed the initial bodies were generated from
    pub seed: u64,
    /// Simulation tick counter (only advances while active)
    pub time_ticks: u64,
    config: ArenaConfig,
    /// Bodies in creation order; also the collision sweep and hit-test order
    pub(crate) bodies: Vec<Body>,
    /// Next body ID
    next_id: u32,
}

impl Arena {
    /// Create an arena with the default configuration, seeded with bodies
    pub fn new(seed: u64) -> Self {
        Self::with_config(ArenaConfig::default(), seed)
    }

    /// Create an arena and generate `config.body_count` bodies from `seed`
    pub fn with_config(config: ArenaConfig, seed: u64) -> Self {
        let mut arena = Self::empty(config);
        arena.seed = seed;

        let mut rng = Pcg32::seed_from_u64(seed);
        for _ in 0..arena.config.body_count {
            arena.generate(&mut rng);
        }

        log::debug!(
            "Arena {}x{} seeded with {} bodies (seed {})",
            arena.config.width,
            arena.config.height,
            arena.bodies.len(),
            seed
        );
        arena
    }

    /// Create an arena with no bodies
    ///
    /// The config is sanitized first; see [`ArenaConfig::sanitized`].
    pub fn empty(config: ArenaConfig) -> Self {
        let config = config.sanitized();
        Self {
            seed: 0,
            time_ticks: 0,
            bodies: Vec::with_capacity(config.body_count),
            config,
            next_id: 1,
        }
    }

    /// Allocate a new body ID
    fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a resting body at a random position fully inside the arena
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> BodyId {
        let id = self.next_body_id();
        let body = Body::random(
            id,
            rng,
            self.config.width,
            self.config.height,
            self.config.body_radius,
            BodyColor::new(self.config.default_color.as_str()),
        );
        self.bodies.push(body);
        id
    }

    /// Add a resting body centered at `pos`
    pub fn spawn_at(&mut self, pos: Vec2) -> BodyId {
        let id = self.next_body_id();
        let color = BodyColor::new(self.config.default_color.as_str());
        self.bodies
            .push(Body::new(id, pos, self.config.body_radius, color));
        id
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Arena extent as (width, height)
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    /// Bodies in creation order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    /// First body (in creation order) whose circle contains `point`
    ///
    /// Bodies are drawn in the same order, so when two overlap the one
    /// returned is the one painted underneath.
    pub fn hit_test(&self, point: Vec2) -> Option<&Body> {
        self.bodies.iter().find(|b| b.contains(point))
    }

    /// Overwrite a body's color. Returns false if no body has `id`.
    pub fn set_color(&mut self, id: BodyId, color: BodyColor) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.color = color;
                true
            }
            None => false,
        }
    }
}
