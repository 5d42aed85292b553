use super::shape::{self, WorldShape};
use crate::{math::Vec2, scene::Transform2D};

/// The physical shape of a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum ColliderShape {
    /// Axis-aligned box with full side lengths.
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
}

/// A shape attached to an entity, used for overlap testing.
///
/// The shape is placed relative to the center of the entity's
/// [`Transform2D`][crate::Transform2D] bounding box, shifted by `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider {
    pub shape: ColliderShape,
    #[cfg_attr(feature = "serde-types", serde(default = "zero_offset"))]
    pub offset: [f64; 2],
    /// Triggers only report overlaps, they never push anything around.
    #[cfg_attr(feature = "serde-types", serde(default))]
    pub is_trigger: bool,
    /// Only meaningful to editors drawing the collider; ignored by the simulation.
    #[cfg_attr(feature = "serde-types", serde(default = "shown"))]
    pub show_in_editor: bool,
}

#[cfg(feature = "serde-types")]
fn zero_offset() -> [f64; 2] {
    [0.0, 0.0]
}

#[cfg(feature = "serde-types")]
fn shown() -> bool {
    true
}

/// Reason a collider was refused at registration.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidCollider {
    #[error("Collider dimensions must be finite and non-negative, got {0}x{1}")]
    BadSize(f64, f64),
    #[error("Collider radius must be finite and non-negative, got {0}")]
    BadRadius(f64),
    #[error("Collider offset must be finite")]
    BadOffset,
}

impl Collider {
    /// Create a solid box collider centered on its entity.
    pub fn new_rect(width: f64, height: f64) -> Self {
        Self::from_shape(ColliderShape::Rect { width, height })
    }

    /// Create a box collider with both sides set to the same length.
    pub fn new_square(side_length: f64) -> Self {
        Self::new_rect(side_length, side_length)
    }

    /// Create a solid circle collider centered on its entity.
    pub fn new_circle(radius: f64) -> Self {
        Self::from_shape(ColliderShape::Circle { radius })
    }

    fn from_shape(shape: ColliderShape) -> Self {
        Self {
            shape,
            offset: [0.0, 0.0],
            is_trigger: false,
            show_in_editor: true,
        }
    }

    /// Set the offset from the entity's center in a builder-like chain.
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = [x, y];
        self
    }

    /// Turn the collider into a trigger in a builder-like chain.
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset[0], self.offset[1])
    }

    /// Compute where this collider is in the world given its entity's transform.
    #[inline]
    pub fn world_shape(&self, tr: &Transform2D) -> WorldShape {
        match self.shape {
            ColliderShape::Rect { width, height } => {
                WorldShape::Rect(shape::rect_bounds(tr, self.offset(), width, height))
            }
            ColliderShape::Circle { radius } => {
                let (center, radius) = shape::circle_bounds(tr, self.offset(), radius);
                WorldShape::Circle { center, radius }
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), InvalidCollider> {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        if !self.offset.iter().all(|o| o.is_finite()) {
            return Err(InvalidCollider::BadOffset);
        }
        match self.shape {
            ColliderShape::Rect { width, height } if !(ok(width) && ok(height)) => {
                Err(InvalidCollider::BadSize(width, height))
            }
            ColliderShape::Circle { radius } if !ok(radius) => {
                Err(InvalidCollider::BadRadius(radius))
            }
            _ => Ok(()),
        }
    }
}
