//! Arena configuration
//!
//! Not user-editable; `Default` reproduces the fixed constants in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Parameters that shape an arena and its physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in pixels
    pub width: f32,
    /// Arena height in pixels
    pub height: f32,
    /// Number of bodies seeded at session start
    pub body_count: usize,
    /// Radius given to every generated body
    pub body_radius: f32,
    /// Color given to every generated body
    pub default_color: String,
    /// Velocity multiplier applied each tick
    pub damping: f32,
    /// Distance at which pointer repulsion vanishes
    pub pointer_radius: f32,
    /// Pointer repulsion strength at distance zero
    pub pointer_strength: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            body_count: BODY_COUNT,
            body_radius: BODY_RADIUS,
            default_color: DEFAULT_COLOR.to_string(),
            damping: DAMPING,
            pointer_radius: POINTER_RADIUS,
            pointer_strength: POINTER_STRENGTH,
        }
    }
}

impl ArenaConfig {
    /// Bring the geometry back into a range the physics can handle.
    ///
    /// Dimensions are made non-negative and the body radius is capped at half
    /// the shorter side, so every body fits and wall clamping has a legal
    /// range. NaN values are treated as zero.
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.max(0.0);
        self.height = self.height.max(0.0);

        let max_radius = self.width.min(self.height) / 2.0;
        let radius = self.body_radius.max(0.0).min(max_radius);
        if radius != self.body_radius {
            log::warn!(
                "Body radius {} does not fit a {}x{} arena, using {}",
                self.body_radius,
                self.width,
                self.height,
                radius
            );
            self.body_radius = radius;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let config = ArenaConfig::default();
        assert_eq!(config.width, 500.0);
        assert_eq!(config.height, 500.0);
        assert_eq!(config.body_count, 5);
        assert_eq!(config.body_radius, 30.0);
        assert_eq!(config.default_color, "#100720");
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ArenaConfig = serde_json::from_str(r#"{ "body_count": 3 }"#).unwrap();
        assert_eq!(config.body_count, 3);
        assert_eq!(config.damping, DAMPING);
        assert_eq!(config.pointer_radius, POINTER_RADIUS);
    }

    #[test]
    fn test_sanitized_caps_oversized_radius() {
        let config: ArenaConfig =
            serde_json::from_str(r#"{ "width": 200, "height": 100, "body_radius": 80 }"#).unwrap();
        let config = config.sanitized();
        assert_eq!(config.body_radius, 50.0);

        let config = ArenaConfig {
            width: -10.0,
            body_radius: -3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.width, 0.0);
        assert_eq!(config.body_radius, 0.0);

        assert_eq!(ArenaConfig::default().sanitized(), ArenaConfig::default());
    }
}
