//! Components the physics world expects to find on host entities.

use crate::math::Vec2;

/// Position, size and rotation of an entity.
///
/// `x` and `y` are the top-left corner of the entity's bounding box.
/// Colliders are positioned relative to the center of that box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Transform2D {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees. Only integrated, never used for collision shapes.
    pub angle: f64,
}

impl Transform2D {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            angle: 0.0,
        }
    }

    /// Geometric center of the entity's bounding box.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

/// Something attached to an entity that wants to hear about its collisions.
///
/// Every method does nothing by default,
/// so implementors only need to write the ones they care about.
/// `other` is always the entity on the other side of the pair.
#[allow(unused_variables)]
pub trait CollisionListener: Send + Sync + 'static {
    fn on_collision_enter(&mut self, other: hecs::Entity) {}
    fn on_collision_stay(&mut self, other: hecs::Entity) {}
    fn on_collision_exit(&mut self, other: hecs::Entity) {}
    fn on_trigger_enter(&mut self, other: hecs::Entity) {}
    fn on_trigger_stay(&mut self, other: hecs::Entity) {}
    fn on_trigger_exit(&mut self, other: hecs::Entity) {}
}

/// Component holding every listener attached to an entity,
/// notified in the order they were added.
#[derive(Default)]
pub struct Listeners(Vec<Box<dyn CollisionListener>>);

impl Listeners {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener in a builder-like chain.
    pub fn with(mut self, listener: impl CollisionListener) -> Self {
        self.push(listener);
        self
    }

    pub fn push(&mut self, listener: impl CollisionListener) {
        self.0.push(Box::new(listener));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn CollisionListener + 'static)> {
        self.0.iter_mut().map(|l| l.as_mut())
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.0.len())
            .finish()
    }
}
