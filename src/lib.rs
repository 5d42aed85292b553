//! Per-frame 2D collision and rigid body simulation for scenes stored in a
//! [`hecs`][hecs] world.
//!
//! The host owns the `hecs::World` and its entities. Entities that take part
//! in physics carry a [`Transform2D`] component, and optionally a
//! [`Listeners`] component holding the [`CollisionListener`]s that should hear
//! about collisions and trigger overlaps. Colliders and rigid bodies are
//! registered with a [`PhysicsWorld`], which is stepped once per frame with
//! [`PhysicsWorld::update`].

/// Open a profiling span that lasts until the end of the enclosing scope.
/// Does nothing unless the `tracy` feature is enabled and a client is running.
macro_rules! tracy_span {
    ($name:literal, $fn_name:literal) => {
        tracy_client::Client::running()
            .map(|client| client.span(tracy_client::span_location!($name), 0))
    };
}

pub mod math;
pub use math::{uv, Aabb, Unit, Vec2};

pub mod scene;
pub use scene::{CollisionListener, Listeners, Transform2D};

pub mod event;
pub use event::{CollisionEvent, CollisionKind, Phase};

pub mod physics;
pub use physics::{
    collision::{self, Collider, ColliderShape, Contact, WorldShape},
    registry::{BodyKey, ColliderKey},
    rigidbody::RigidBody,
    PhysicsConfig, PhysicsError, PhysicsWorld,
};

// Re-exported to guarantee the entity type matches
pub use hecs;
