pub mod broadphase;
pub use broadphase::BroadPhase;

mod collider;
pub use collider::{Collider, ColliderShape, InvalidCollider};

pub mod narrowphase;
pub use narrowphase::{contact, intersects, Contact};

mod pair_state;
pub(crate) use pair_state::{FrameOverlaps, PairStates};

pub mod shape;
pub use shape::WorldShape;
