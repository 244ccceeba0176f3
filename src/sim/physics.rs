//! Physics rules for circular bodies
//!
//! Walls reflect, overlapping bodies separate and exchange momentum along
//! the line of centers, and the pointer pushes nearby bodies away.

use glam::Vec2;

use super::body::Body;
use crate::direction_or;

/// Overlap between two bodies
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit vector from the first body's center toward the second's
    pub normal: Vec2,
    /// How far the circles interpenetrate
    pub penetration: f32,
}

/// Move a body by its velocity, then damp the velocity
#[inline]
pub fn integrate(body: &mut Body, damping: f32) {
    body.pos += body.vel;
    body.vel *= damping;
}

/// Reflect one axis off `[0, extent]`, clamping the center back inside.
/// Returns true if the wall was hit.
#[inline]
fn reflect_axis(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) -> bool {
    if *pos - radius < 0.0 || *pos + radius > extent {
        *vel = -*vel;
        *pos = pos.clamp(radius, extent - radius);
        true
    } else {
        false
    }
}

/// Bounce a body off the arena walls (x first, then y).
/// Returns true if either wall was hit.
pub fn reflect_walls(body: &mut Body, size: Vec2) -> bool {
    let radius = body.radius();
    let hit_x = reflect_axis(&mut body.pos.x, &mut body.vel.x, radius, size.x);
    let hit_y = reflect_axis(&mut body.pos.y, &mut body.vel.y, radius, size.y);
    hit_x || hit_y
}

/// Check whether two bodies overlap
///
/// Coincident centers have no line of centers; `+x` is used instead.
pub fn body_contact(a: &Body, b: &Body) -> Option<Contact> {
    let (normal, dist) = direction_or(a.pos, b.pos, Vec2::X);
    let min_dist = a.radius() + b.radius();
    if dist < min_dist {
        Some(Contact {
            normal,
            penetration: min_dist - dist,
        })
    } else {
        None
    }
}

/// 1-D elastic collision: post-impact speeds along the normal
///
/// Equal masses simply swap `u1` and `u2`.
#[inline]
pub fn elastic_exchange(u1: f32, u2: f32, m1: f32, m2: f32) -> (f32, f32) {
    let total = m1 + m2;
    let v1 = (u1 * (m1 - m2) + 2.0 * m2 * u2) / total;
    let v2 = (u2 * (m2 - m1) + 2.0 * m1 * u1) / total;
    (v1, v2)
}

/// Separate two overlapping bodies and exchange their normal velocities.
/// Returns true if the pair was in contact.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let Some(contact) = body_contact(a, b) else {
        return false;
    };
    let n = contact.normal;

    // Split the overlap evenly
    let push = n * (contact.penetration * 0.5);
    a.pos -= push;
    b.pos += push;

    let t = Vec2::new(-n.y, n.x);
    let (tan_a, tan_b) = (a.vel.dot(t), b.vel.dot(t));
    let (norm_a, norm_b) = elastic_exchange(a.vel.dot(n), b.vel.dot(n), a.mass(), b.mass());

    a.vel = t * tan_a + n * norm_a;
    b.vel = t * tan_b + n * norm_b;
    true
}

/// Velocity kick away from the pointer
///
/// Scales linearly from `strength * offset` at distance 0 to nothing at
/// `radius`. The kick is proportional to the offset itself, so a body
/// sitting exactly on the pointer gets a zero vector.
#[inline]
pub fn pointer_impulse(pos: Vec2, pointer: Vec2, radius: f32, strength: f32) -> Vec2 {
    let offset = pos - pointer;
    let dist = offset.length();
    if dist < radius {
        offset * ((radius - dist) / radius) * strength
    } else {
        Vec2::ZERO
    }
}

/// Apply the pointer kick to a body's velocity
#[inline]
pub fn repel_from_pointer(body: &mut Body, pointer: Vec2, radius: f32, strength: f32) {
    body.vel += pointer_impulse(body.pos, pointer, radius, strength);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyId;
    use proptest::prelude::*;

    fn body_at(id: u32, x: f32, y: f32) -> Body {
        Body::new(BodyId(id), Vec2::new(x, y), 30.0, "#100720".into())
    }

    const ARENA: Vec2 = Vec2::new(500.0, 500.0);

    #[test]
    fn test_damping_decays_geometrically() {
        let mut body = body_at(1, 250.0, 250.0);
        body.vel = Vec2::new(0.5, -0.25);

        for _ in 0..50 {
            integrate(&mut body, 0.99);
            reflect_walls(&mut body, ARENA);
        }

        let expected = Vec2::new(0.5, -0.25) * 0.99f32.powi(50);
        assert!((body.vel - expected).length() < 1e-5);
    }

    #[test]
    fn test_wall_reflects_and_clamps() {
        let mut body = body_at(1, 480.0, 250.0);
        body.vel = Vec2::new(5.0, 1.0);

        assert!(reflect_walls(&mut body, ARENA));
        assert_eq!(body.pos.x, 470.0);
        assert_eq!(body.vel, Vec2::new(-5.0, 1.0));

        let mut body = body_at(2, 250.0, 10.0);
        body.vel = Vec2::new(0.0, -3.0);
        assert!(reflect_walls(&mut body, ARENA));
        assert_eq!(body.pos.y, 30.0);
        assert_eq!(body.vel.y, 3.0);
    }

    #[test]
    fn test_wall_touching_is_not_a_hit() {
        let mut body = body_at(1, 30.0, 470.0);
        body.vel = Vec2::new(-1.0, 1.0);
        assert!(!reflect_walls(&mut body, ARENA));
        assert_eq!(body.vel, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_elastic_exchange_equal_masses_swaps() {
        let (v1, v2) = elastic_exchange(3.0, -1.0, 1.0, 1.0);
        assert!((v1 - -1.0).abs() < 1e-6);
        assert!((v2 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_exchange_unequal_masses() {
        // Light body bouncing off a resting heavy one conserves momentum and energy
        let (v1, v2) = elastic_exchange(2.0, 0.0, 1.0, 3.0);
        assert!((1.0 * 2.0 - (1.0 * v1 + 3.0 * v2)).abs() < 1e-5);
        assert!((2.0 * 2.0 - (v1 * v1 + 3.0 * v2 * v2)).abs() < 1e-5);
        assert!(v1 < 0.0);
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let mut a = body_at(1, 100.0, 100.0);
        let mut b = body_at(2, 150.0, 100.0);
        a.vel = Vec2::new(2.0, 0.0);
        b.vel = Vec2::new(-1.0, 0.0);

        assert!(resolve_pair(&mut a, &mut b));
        assert!((a.vel - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert!((b.vel - Vec2::new(2.0, 0.0)).length() < 1e-5);
        assert!((a.pos.x - 95.0).abs() < 1e-4);
        assert!((b.pos.x - 155.0).abs() < 1e-4);
    }

    #[test]
    fn test_glancing_collision_keeps_tangential_velocity() {
        let mut a = body_at(1, 100.0, 100.0);
        let mut b = body_at(2, 150.0, 100.0);
        a.vel = Vec2::new(0.0, 4.0);

        resolve_pair(&mut a, &mut b);
        // Motion perpendicular to the line of centers is untouched
        assert!((a.vel - Vec2::new(0.0, 4.0)).length() < 1e-5);
        assert!(b.vel.length() < 1e-5);
    }

    #[test]
    fn test_separated_bodies_untouched() {
        let mut a = body_at(1, 100.0, 100.0);
        let mut b = body_at(2, 160.0, 100.0);
        a.vel = Vec2::new(1.0, 0.0);
        assert!(!resolve_pair(&mut a, &mut b));
        assert_eq!(a.pos, Vec2::new(100.0, 100.0));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_coincident_bodies_separate_without_nan() {
        let mut a = body_at(1, 200.0, 200.0);
        let mut b = body_at(2, 200.0, 200.0);
        a.vel = Vec2::new(1.0, 1.0);

        assert!(resolve_pair(&mut a, &mut b));
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!((a.pos.distance(b.pos) - 60.0).abs() < 1e-4);
        assert!((a.vel + b.vel - Vec2::new(1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_pointer_impulse_boundaries() {
        let pointer = Vec2::new(100.0, 100.0);

        // Exactly at the repulsion radius: nothing
        let at_edge = pointer_impulse(Vec2::new(140.0, 100.0), pointer, 40.0, 0.1);
        assert_eq!(at_edge, Vec2::ZERO);

        // On top of the pointer: full-strength formula, zero offset
        let on_top = pointer_impulse(pointer, pointer, 40.0, 0.1);
        assert_eq!(on_top, Vec2::ZERO);

        // Halfway: offset * 0.5 * 0.1
        let halfway = pointer_impulse(Vec2::new(120.0, 100.0), pointer, 40.0, 0.1);
        assert!((halfway - Vec2::new(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_repel_adds_to_velocity() {
        let mut body = body_at(1, 110.0, 100.0);
        body.vel = Vec2::new(0.0, 2.0);
        repel_from_pointer(&mut body, Vec2::new(100.0, 100.0), 40.0, 0.1);
        assert!((body.vel - Vec2::new(0.75, 2.0)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_collision_conserves_momentum_and_separates(
            ax in 100.0f32..400.0,
            ay in 100.0f32..400.0,
            angle in 0.0f32..std::f32::consts::TAU,
            dist in 1.0f32..59.0,
            avx in -10.0f32..10.0,
            avy in -10.0f32..10.0,
            bvx in -10.0f32..10.0,
            bvy in -10.0f32..10.0,
        ) {
            let mut a = body_at(1, ax, ay);
            let offset = Vec2::from_angle(angle) * dist;
            let mut b = body_at(2, ax + offset.x, ay + offset.y);
            a.vel = Vec2::new(avx, avy);
            b.vel = Vec2::new(bvx, bvy);
            let before = a.vel + b.vel;

            prop_assert!(resolve_pair(&mut a, &mut b));
            prop_assert!((a.vel + b.vel - before).length() < 1e-3);
            prop_assert!(a.pos.distance(b.pos) >= 60.0 - 1e-3);
        }

        #[test]
        fn prop_walls_contain_center(
            x in -100.0f32..600.0,
            y in -100.0f32..600.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let mut body = body_at(1, x, y);
            body.vel = Vec2::new(vx, vy);
            integrate(&mut body, 0.99);
            reflect_walls(&mut body, ARENA);
            prop_assert!((30.0..=470.0).contains(&body.pos.x));
            prop_assert!((30.0..=470.0).contains(&body.pos.y));
        }
    }
}
