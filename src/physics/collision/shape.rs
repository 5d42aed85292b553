//! Where colliders are in world space.
//!
//! These are the only functions that turn a collider and an entity transform
//! into geometry. Both overlap detection and collision resolution go through
//! them so that the two always agree on what overlaps.

use crate::{
    math::{Aabb, Vec2},
    scene::Transform2D,
};

/// A collider's shape placed in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorldShape {
    Rect(Aabb),
    Circle { center: Vec2, radius: f64 },
}

impl WorldShape {
    #[inline]
    pub fn center(&self) -> Vec2 {
        match self {
            WorldShape::Rect(aabb) => aabb.center(),
            WorldShape::Circle { center, .. } => *center,
        }
    }

    /// The smallest AABB containing the shape.
    pub fn aabb(&self) -> Aabb {
        match *self {
            WorldShape::Rect(aabb) => aabb,
            WorldShape::Circle { center, radius } => {
                Aabb::from_center(center, 2.0 * radius, 2.0 * radius)
            }
        }
    }
}

/// Center of a collider: the center of the entity's box shifted by the offset.
#[inline]
pub fn collider_center(tr: &Transform2D, offset: Vec2) -> Vec2 {
    tr.center() + offset
}

/// Bounds of a box collider of full size `width` x `height`.
#[inline]
pub fn rect_bounds(tr: &Transform2D, offset: Vec2, width: f64, height: f64) -> Aabb {
    Aabb::from_center(collider_center(tr, offset), width, height)
}

/// Center and radius of a circle collider.
#[inline]
pub fn circle_bounds(tr: &Transform2D, offset: Vec2, radius: f64) -> (Vec2, f64) {
    (collider_center(tr, offset), radius)
}
