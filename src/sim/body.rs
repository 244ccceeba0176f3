//! Body entity and factory

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::BODY_MASS;

/// Stable body identifier (1-based, assigned in creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display color, stored verbatim (a CSS color string in practice)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyColor(String);

impl BodyColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BodyColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for BodyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A circular body
///
/// `id` and `radius` are fixed at creation; position, velocity and color
/// change freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    id: BodyId,
    radius: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BodyColor,
}

impl Body {
    pub(crate) fn new(id: BodyId, pos: Vec2, radius: f32, color: BodyColor) -> Self {
        Self {
            id,
            radius,
            pos,
            vel: Vec2::ZERO,
            color,
        }
    }

    /// Create a resting body at a uniformly random position that keeps the
    /// whole circle inside a `width` x `height` arena
    pub(crate) fn random<R: Rng>(
        id: BodyId,
        rng: &mut R,
        width: f32,
        height: f32,
        radius: f32,
        color: BodyColor,
    ) -> Self {
        let x = rng.random_range(radius..=width - radius);
        let y = rng.random_range(radius..=height - radius);
        Self::new(id, Vec2::new(x, y), radius, color)
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass used by collision response
    #[inline]
    pub fn mass(&self) -> f32 {
        BODY_MASS
    }

    /// Whether `point` lies on or inside the circle
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_body_fits_inside_arena() {
        let mut rng = Pcg32::seed_from_u64(7);
        for i in 0..200 {
            let body = Body::random(BodyId(i), &mut rng, 500.0, 500.0, 30.0, "#000".into());
            assert!((30.0..=470.0).contains(&body.pos.x));
            assert!((30.0..=470.0).contains(&body.pos.y));
            assert_eq!(body.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn test_contains_includes_rim() {
        let body = Body::new(BodyId(1), Vec2::new(100.0, 100.0), 30.0, "#000".into());
        assert!(body.contains(Vec2::new(130.0, 100.0)));
        assert!(body.contains(Vec2::new(100.0, 100.0)));
        assert!(!body.contains(Vec2::new(130.5, 100.0)));
    }

    #[test]
    fn test_color_is_opaque() {
        let color = BodyColor::from("not a color at all");
        assert_eq!(color.as_str(), "not a color at all");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"not a color at all\"");
    }
}
