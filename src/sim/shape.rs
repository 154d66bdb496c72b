//! Entity shapes and overlap tests
//!
//! Every collider in the arcade is either a circle or an axis-aligned
//! rectangle. Overlap tests go through one dispatch so no game carries its
//! own bespoke math.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Shrink (positive) or grow (negative) each side
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self {
            min: self.min + Vec2::new(dx, dy),
            max: self.max - Vec2::new(dx, dy),
        }
    }

    /// Interval overlap on both axes; `inclusive` counts touching edges
    pub fn intersects(&self, other: &Aabb, inclusive: bool) -> bool {
        if inclusive {
            self.max.x >= other.min.x
                && self.min.x <= other.max.x
                && self.max.y >= other.min.y
                && self.min.y <= other.max.y
        } else {
            self.max.x > other.min.x
                && self.min.x < other.max.x
                && self.max.y > other.min.y
                && self.min.y < other.max.y
        }
    }

    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// A shape placed in world space.
///
/// Rects are anchored at their top-left corner, circles at their centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub shape: Shape,
}

impl Body {
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            shape: Shape::Rect { width, height },
        }
    }

    pub fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            pos: Vec2::new(cx, cy),
            shape: Shape::Circle { radius },
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self.shape {
            Shape::Rect { width, height } => Aabb::new(self.pos.x, self.pos.y, width, height),
            Shape::Circle { radius } => Aabb {
                min: self.pos - Vec2::splat(radius),
                max: self.pos + Vec2::splat(radius),
            },
        }
    }

    /// Strict overlap: shapes that merely touch do not collide
    pub fn overlaps(&self, other: &Body) -> bool {
        intersect(self, other, false)
    }

    /// Inclusive overlap: touching edges count as contact
    pub fn touches(&self, other: &Body) -> bool {
        intersect(self, other, true)
    }
}

fn intersect(a: &Body, b: &Body, inclusive: bool) -> bool {
    match (a.shape, b.shape) {
        (Shape::Rect { .. }, Shape::Rect { .. }) => a.bounds().intersects(&b.bounds(), inclusive),
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            within(a.pos.distance_squared(b.pos), ra + rb, inclusive)
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_rect(a.pos, radius, &b.bounds(), inclusive)
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            circle_rect(b.pos, radius, &a.bounds(), inclusive)
        }
    }
}

fn circle_rect(center: Vec2, radius: f32, rect: &Aabb, inclusive: bool) -> bool {
    let closest = rect.closest_point(center);
    within(center.distance_squared(closest), radius, inclusive)
}

#[inline]
fn within(dist_sq: f32, reach: f32, inclusive: bool) -> bool {
    if inclusive {
        dist_sq <= reach * reach
    } else {
        dist_sq < reach * reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rect_touching_edges() {
        let a = Body::rect(0.0, 0.0, 10.0, 10.0);
        let b = Body::rect(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn test_rect_rect_separate() {
        let a = Body::rect(0.0, 0.0, 10.0, 10.0);
        let b = Body::rect(0.0, 20.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!a.touches(&b));
    }

    #[test]
    fn test_circle_circle() {
        let a = Body::circle(0.0, 0.0, 5.0);
        let b = Body::circle(8.0, 0.0, 3.0);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
        let c = Body::circle(7.0, 0.0, 3.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_circle_rect_corner() {
        let rect = Body::rect(10.0, 10.0, 10.0, 10.0);
        // Diagonal from the corner, ~7.07 away
        let near = Body::circle(5.0, 5.0, 7.5);
        let far = Body::circle(5.0, 5.0, 7.0);
        assert!(near.overlaps(&rect));
        assert!(rect.overlaps(&near));
        assert!(!far.overlaps(&rect));
    }

    #[test]
    fn test_circle_inside_rect() {
        let rect = Body::rect(0.0, 0.0, 100.0, 100.0);
        let ball = Body::circle(50.0, 50.0, 1.0);
        assert!(ball.overlaps(&rect));
    }

    #[test]
    fn test_inset_bounds() {
        let b = Body::circle(50.0, 50.0, 10.0).bounds().inset(6.0, 0.0);
        assert_eq!(b.min, Vec2::new(46.0, 40.0));
        assert_eq!(b.max, Vec2::new(54.0, 60.0));
    }
}
