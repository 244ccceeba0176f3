//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segments used for a circle of the given on-screen radius
pub fn circle_segments(radius: f32) -> u32 {
    // Roughly one segment per 3px of circumference, within sane limits
    ((TAU * radius / 3.0) as u32).clamp(12, 96)
}

/// Append vertices for a filled circle as a triangle fan
pub fn circle_into(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_lie_on_rim_or_center() {
        let mut out = Vec::new();
        let center = Vec2::new(100.0, 50.0);
        circle_into(&mut out, center, 30.0, [1.0; 4], 16);

        assert_eq!(out.len(), 48);
        for (i, v) in out.iter().enumerate() {
            let d = Vec2::from(v.position).distance(center);
            if i % 3 == 0 {
                assert!(d < 1e-4);
            } else {
                assert!((d - 30.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_segment_count_is_bounded() {
        assert_eq!(circle_segments(0.5), 12);
        assert_eq!(circle_segments(10_000.0), 96);
        assert!(circle_segments(30.0) > 12);
    }
}
