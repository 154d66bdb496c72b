//! Collision response
//!
//! Overlap *detection* lives in `shape`; this module produces contacts with
//! a normal and penetration depth, and resolves them (push-out, damped
//! reflection, wall bounces).

use glam::Vec2;

/// Result of a contact check
#[derive(Debug, Clone)]
pub struct Contact {
    /// Whether a contact occurred
    pub hit: bool,
    /// Surface normal at the contact (pointing toward the moving body's center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Contact between a moving circle and a fixed round post (e.g. a rim).
///
/// A center exactly on the post yields no contact: there is no normal to
/// push along.
pub fn circle_point_contact(center: Vec2, radius: f32, post: Vec2, post_radius: f32) -> Contact {
    let delta = center - post;
    let distance = delta.length();
    let min_distance = radius + post_radius;
    if distance > 0.0 && distance < min_distance {
        return Contact {
            hit: true,
            normal: delta / distance,
            penetration: min_distance - distance,
        };
    }
    Contact::miss()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflection with a tunable restitution along the normal, followed by a
/// uniform damping of the whole velocity: `(v - k(v·n)n) * damping`.
///
/// `restitution = 2.0, damping = 1.0` is a perfect mirror.
#[inline]
pub fn reflect_damped(velocity: Vec2, normal: Vec2, restitution: f32, damping: f32) -> Vec2 {
    (velocity - restitution * velocity.dot(normal) * normal) * damping
}

/// Push a body out of overlap and reflect its velocity
pub fn resolve_contact(
    pos: &mut Vec2,
    vel: &mut Vec2,
    contact: &Contact,
    restitution: f32,
    damping: f32,
) {
    if !contact.hit {
        return;
    }
    *pos += contact.normal * contact.penetration;
    *vel = reflect_damped(*vel, contact.normal, restitution, damping);
}

/// Keep `pos >= min`; on contact the velocity points back inside, scaled by `damping`
pub fn bounce_low(pos: &mut f32, vel: &mut f32, min: f32, damping: f32) -> bool {
    if *pos <= min {
        *pos = min;
        *vel = vel.abs() * damping;
        return true;
    }
    false
}

/// Keep `pos <= max`; on contact the velocity points back inside, scaled by `damping`
pub fn bounce_high(pos: &mut f32, vel: &mut f32, max: f32, damping: f32) -> bool {
    if *pos >= max {
        *pos = max;
        *vel = -vel.abs() * damping;
        return true;
    }
    false
}
