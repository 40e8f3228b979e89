//! Collider shapes and exact overlap tests
//!
//! Ships, meteors, aliens and the shield are circles; laser bolts are
//! axis-aligned rectangles. Touching edges count as overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { center: Vec2, half_extents: Vec2 },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle { center, radius }
    }

    pub fn rect(center: Vec2, size: Vec2) -> Self {
        Shape::Rect {
            center,
            half_extents: size / 2.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } | Shape::Rect { center, .. } => center,
        }
    }

    /// Same shape, moved so its centre is `pos`
    pub fn at(self, pos: Vec2) -> Self {
        match self {
            Shape::Circle { radius, .. } => Shape::Circle {
                center: pos,
                radius,
            },
            Shape::Rect { half_extents, .. } => Shape::Rect {
                center: pos,
                half_extents,
            },
        }
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Circle { center, radius } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Shape::Rect {
                center,
                half_extents,
            } => (center - half_extents, center + half_extents),
        }
    }

    pub fn intersects(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (
                Shape::Circle {
                    center: a,
                    radius: ra,
                },
                Shape::Circle {
                    center: b,
                    radius: rb,
                },
            ) => circle_circle(a, ra, b, rb),
            (
                Shape::Circle { center, radius },
                Shape::Rect {
                    center: rc,
                    half_extents,
                },
            )
            | (
                Shape::Rect {
                    center: rc,
                    half_extents,
                },
                Shape::Circle { center, radius },
            ) => circle_rect(center, radius, rc, half_extents),
            (
                Shape::Rect {
                    center: a,
                    half_extents: ha,
                },
                Shape::Rect {
                    center: b,
                    half_extents: hb,
                },
            ) => rect_rect(a, ha, b, hb),
        }
    }
}

#[inline]
fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Closest point on the rectangle to the circle centre, then a distance test
#[inline]
fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) <= radius * radius
}

#[inline]
fn rect_rect(a: Vec2, ha: Vec2, b: Vec2, hb: Vec2) -> bool {
    let d = (a - b).abs();
    d.x <= ha.x + hb.x && d.y <= ha.y + hb.y
}
