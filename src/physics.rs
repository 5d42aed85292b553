use crate::{
    event::{CollisionEvent, CollisionKind},
    math::Vec2,
    scene::Transform2D,
};

use log::{debug, trace, warn};

//

pub mod collision;
use collision::{BroadPhase, FrameOverlaps, PairStates};
pub use collision::{Collider, ColliderShape, Contact, InvalidCollider};

pub mod registry;
use registry::{BodyRegistry, ColliderRegistry};
pub use registry::{BodyKey, ColliderKey};

pub mod rigidbody;
pub use rigidbody::{Mass, RigidBody};

mod solver;


//

/// Tunable parameters of a [`PhysicsWorld`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct PhysicsConfig {
    /// Acceleration applied to every dynamic body, in pixels per second squared.
    pub gravity: [f64; 2],
    /// Penetration depth in pixels that collision response leaves alone.
    pub position_slop: f64,
    /// Fraction of penetration beyond the slop that is corrected every frame.
    pub correction_percent: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: [0.0, 980.0],
            position_slop: 0.5,
            correction_percent: 0.8,
        }
    }
}

/// Errors from calls that break the physics world's contract.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    #[error("Delta time must be finite and non-negative, got {0}")]
    InvalidDeltaTime(f64),
    #[error("Rigid body mass must be finite and positive, got {0}")]
    InvalidMass(f64),
    #[error("Invalid collider")]
    InvalidCollider(#[from] InvalidCollider),
    #[error("Entity {0:?} already has a rigid body")]
    DuplicateRigidBody(hecs::Entity),
    #[error("Entity {0:?} has no rigid body")]
    NoSuchRigidBody(hecs::Entity),
}

/// The collision and rigid body simulation for one scene.
///
/// Holds every registered collider and rigid body along with which collider
/// pairs were overlapping last frame. Entities themselves live in the
/// host's `hecs::World`, which is passed in to [`update`][Self::update].
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    colliders: ColliderRegistry,
    bodies: BodyRegistry,
    pair_states: PairStates,
}

impl PhysicsWorld {
    /// Create an empty world with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        PhysicsWorld {
            config,
            colliders: ColliderRegistry::new(),
            bodies: BodyRegistry::new(),
            pair_states: PairStates::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Reset the world to an empty state, keeping its configuration.
    #[inline]
    pub fn init(&mut self) {
        self.clear();
    }

    /// Remove every collider, rigid body and remembered overlap.
    /// No exit events are produced for pairs that were overlapping.
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.bodies.clear();
        self.pair_states.clear();
        debug!("physics world cleared");
    }

    #[inline]
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.config.gravity[0], self.config.gravity[1])
    }

    #[inline]
    pub fn set_gravity(&mut self, x: f64, y: f64) {
        self.config.gravity = [x, y];
    }

    //
    // Colliders
    //

    /// Attach a collider to an entity.
    /// Colliders with non-finite or negative dimensions are refused.
    pub fn register_collider(
        &mut self,
        entity: hecs::Entity,
        collider: Collider,
    ) -> Result<ColliderKey, PhysicsError> {
        collider.validate()?;
        let key = self.colliders.insert(entity, collider);
        debug!("registered collider {:?} on {:?}", key, entity);
        Ok(key)
    }

    /// Remove a collider, returning it and its entity if it still existed.
    ///
    /// When this was the entity's last collider, its overlaps are forgotten
    /// without producing exit events. Otherwise the entity's remaining
    /// colliders decide on the next update whether its overlaps stay or exit.
    pub fn unregister_collider(&mut self, key: ColliderKey) -> Option<(hecs::Entity, Collider)> {
        let removed = self.colliders.remove(key)?;
        let entity = removed.0;
        if self.colliders.colliders_for(entity).is_empty() {
            self.pair_states.forget(entity);
        }
        debug!("unregistered collider {:?} from {:?}", key, entity);
        Some(removed)
    }

    /// Remove every collider attached to an entity.
    pub fn unregister_colliders_of(&mut self, entity: hecs::Entity) -> usize {
        let keys = self.colliders.remove_entity(entity);
        self.pair_states.forget(entity);
        if !keys.is_empty() {
            debug!("unregistered {} colliders from {:?}", keys.len(), entity);
        }
        keys.len()
    }

    #[inline]
    pub fn collider(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key)
    }

    #[inline]
    pub fn collider_mut(&mut self, key: ColliderKey) -> Option<&mut Collider> {
        self.colliders.get_mut(key)
    }

    #[inline]
    pub fn collider_entity(&self, key: ColliderKey) -> Option<hecs::Entity> {
        self.colliders.entity_of(key)
    }

    /// Every registered collider with its entity, in registration order.
    pub fn all_colliders(
        &self,
    ) -> impl Iterator<Item = (hecs::Entity, ColliderKey, &Collider)> + Clone {
        self.colliders.iter()
    }

    /// Colliders attached to one entity, in registration order.
    #[inline]
    pub fn colliders_for(&self, entity: hecs::Entity) -> &[ColliderKey] {
        self.colliders.colliders_for(entity)
    }

    //
    // Rigid bodies
    //

    /// Attach a rigid body to an entity.
    ///
    /// An entity can only have one rigid body at a time,
    /// and its mass must be finite and positive.
    pub fn register_rigidbody(
        &mut self,
        entity: hecs::Entity,
        body: RigidBody,
    ) -> Result<BodyKey, PhysicsError> {
        if !rigidbody::mass_is_valid(body.mass()) {
            return Err(PhysicsError::InvalidMass(body.mass()));
        }
        let key = self
            .bodies
            .insert(entity, body)
            .map_err(|_| PhysicsError::DuplicateRigidBody(entity))?;
        debug!("registered rigid body {:?} on {:?}", key, entity);
        Ok(key)
    }

    /// Remove an entity's rigid body, returning it if there was one.
    pub fn unregister_rigidbody(&mut self, entity: hecs::Entity) -> Option<RigidBody> {
        let body = self.bodies.remove(entity)?;
        debug!("unregistered rigid body from {:?}", entity);
        Some(body)
    }

    #[inline]
    pub fn rigidbody(&self, entity: hecs::Entity) -> Option<&RigidBody> {
        self.bodies.find(entity)
    }

    /// Mutable access for scripts that push bodies around with forces and impulses.
    #[inline]
    pub fn rigidbody_mut(&mut self, entity: hecs::Entity) -> Option<&mut RigidBody> {
        self.bodies.find_mut(entity)
    }

    /// Like [`rigidbody_mut`][Self::rigidbody_mut] but reporting a missing body as an error.
    pub fn try_rigidbody_mut(
        &mut self,
        entity: hecs::Entity,
    ) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies
            .find_mut(entity)
            .ok_or(PhysicsError::NoSuchRigidBody(entity))
    }

    #[inline]
    pub fn rigidbody_by_key(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    #[inline]
    pub fn rigidbody_by_key_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Unregister colliders and rigid bodies whose entities have been
    /// despawned from the given world. Returns how many were removed.
    pub fn remove_orphans(&mut self, world: &hecs::World) -> usize {
        let dead_coll_entities: Vec<hecs::Entity> = self
            .colliders
            .entities()
            .filter(|e| !world.contains(*e))
            .collect();
        let dead_body_entities: Vec<hecs::Entity> = self
            .bodies
            .entities()
            .filter(|e| !world.contains(*e))
            .collect();

        let mut removed = 0;
        for entity in dead_coll_entities {
            removed += self.unregister_colliders_of(entity);
        }
        for entity in dead_body_entities {
            if self.unregister_rigidbody(entity).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            warn!("removed {} physics objects of despawned entities", removed);
        }
        removed
    }

    //
    // Queries
    //

    /// World-space shape of a collider, if both it and its entity's transform exist.
    pub fn world_shape(
        &self,
        key: ColliderKey,
        world: &hecs::World,
    ) -> Option<collision::WorldShape> {
        let entity = self.colliders.entity_of(key)?;
        let coll = self.colliders.get(key)?;
        let tr = world.get::<&Transform2D>(entity).ok()?;
        Some(coll.world_shape(&tr))
    }

    /// Check whether two colliders currently overlap.
    /// Colliders on the same entity never collide with each other.
    pub fn check_collision(&self, a: ColliderKey, b: ColliderKey, world: &hecs::World) -> bool {
        self.overlap_shapes(a, b, world)
            .map(|[sa, sb]| collision::intersects(&sa, &sb))
            .unwrap_or(false)
    }

    /// Compute the contact between two colliders, with the normal pointing from `a` to `b`.
    pub fn contact(&self, a: ColliderKey, b: ColliderKey, world: &hecs::World) -> Option<Contact> {
        let [sa, sb] = self.overlap_shapes(a, b, world)?;
        collision::contact(&sa, &sb)
    }

    /// Whether any colliders of two entities were overlapping
    /// as of the last [`update`][Self::update].
    #[inline]
    pub fn was_overlapping(&self, a: hecs::Entity, b: hecs::Entity) -> bool {
        self.pair_states.is_overlapping(a, b)
    }

    fn overlap_shapes(
        &self,
        a: ColliderKey,
        b: ColliderKey,
        world: &hecs::World,
    ) -> Option<[collision::WorldShape; 2]> {
        if self.colliders.entity_of(a)? == self.colliders.entity_of(b)? {
            return None;
        }
        Some([self.world_shape(a, world)?, self.world_shape(b, world)?])
    }

    //
    // Stepping
    //

    /// Advance the simulation by one frame of `delta_millis` milliseconds.
    ///
    /// First moves every rigid body, then tests every pair of colliders
    /// on different entities, pushes apart solid pairs that overlap
    /// and notifies the [`Listeners`][crate::Listeners] on both entities.
    /// Returns the events in the order they were delivered.
    pub fn update(
        &mut self,
        world: &mut hecs::World,
        delta_millis: f64,
    ) -> Result<Vec<CollisionEvent>, PhysicsError> {
        if !delta_millis.is_finite() || delta_millis < 0.0 {
            return Err(PhysicsError::InvalidDeltaTime(delta_millis));
        }
        let dt = delta_millis / 1000.0;

        self.integrate(world, dt);
        Ok(self.detect_and_respond(world))
    }

    fn integrate(&mut self, world: &mut hecs::World, dt: f64) {
        let _span = tracy_span!("integrate bodies", "integrate");

        let gravity = self.gravity();
        for (_, (entity, body)) in self.bodies.bodies.iter_mut() {
            let Ok(tr) = world.query_one_mut::<&mut Transform2D>(*entity) else {
                trace!("skipping body of {:?} without a transform", entity);
                continue;
            };
            body.integrate(tr, gravity, dt);
        }
    }

    fn detect_and_respond(&mut self, world: &mut hecs::World) -> Vec<CollisionEvent> {
        let frame = self.detect(world);

        let _span = tracy_span!("dispatch collision events", "detect_and_respond");
        let mut events = Vec::new();
        for pair in frame.iter() {
            let [a, b] = pair.entities;
            for kind in [CollisionKind::Collision, CollisionKind::Trigger] {
                let overlapping = pair.overlapping(kind);
                let Some(phase) = self.pair_states.update(a, b, kind, overlapping) else {
                    continue;
                };
                trace!("{:?} {:?} {:?}-{:?}", kind, phase, a, b);

                let event = CollisionEvent {
                    kind,
                    phase,
                    entities: pair.entities,
                    colliders: pair.colliders(kind),
                };
                event.dispatch(world);
                events.push(event);
            }
        }

        events
    }

    /// Test every collider pair, resolving solid overlaps as they are found.
    /// Responses happen here, so they always precede the callbacks of the frame.
    fn detect(&mut self, world: &mut hecs::World) -> FrameOverlaps {
        let _span = tracy_span!("detect collisions", "detect");

        let mut frame = FrameOverlaps::new();
        // snapshot so that responses can borrow the registries mutably
        let keys: Vec<ColliderKey> = self.colliders.keys().to_vec();

        for [i, j] in collision::broadphase::BruteForce::pairs(keys.len()) {
            let (ka, kb) = (keys[i], keys[j]);
            let (Some(&entry_a), Some(&entry_b)) = (
                self.colliders.colliders.get(ka.0),
                self.colliders.colliders.get(kb.0),
            ) else {
                continue;
            };
            if entry_a.entity == entry_b.entity {
                continue;
            }

            // bounds are recomputed per pair because earlier responses may have moved things
            let shapes = (
                world
                    .get::<&Transform2D>(entry_a.entity)
                    .map(|tr| entry_a.collider.world_shape(&tr)),
                world
                    .get::<&Transform2D>(entry_b.entity)
                    .map(|tr| entry_b.collider.world_shape(&tr)),
            );
            let (Ok(shape_a), Ok(shape_b)) = shapes else {
                debug!(
                    "skipping pair {:?}-{:?}, an entity is missing its transform",
                    entry_a.entity, entry_b.entity
                );
                continue;
            };

            let overlap = collision::intersects(&shape_a, &shape_b).then(|| {
                if entry_a.collider.is_trigger || entry_b.collider.is_trigger {
                    CollisionKind::Trigger
                } else {
                    CollisionKind::Collision
                }
            });
            if overlap == Some(CollisionKind::Collision) {
                if let Some(contact) = collision::contact(&shape_a, &shape_b) {
                    self.respond(world, [entry_a.entity, entry_b.entity], &contact);
                }
            }

            frame.record([entry_a.entity, entry_b.entity], [ka, kb], overlap);
        }

        frame
    }

    /// Apply collision response to whichever sides of a contact have dynamic bodies.
    fn respond(&mut self, world: &mut hecs::World, entities: [hecs::Entity; 2], contact: &Contact) {
        let bodies = entities.map(|e| self.bodies.find(e));
        let inv_masses = bodies.map(|b| b.map(|b| b.inverse_mass()).unwrap_or(0.0));
        let velocities = bodies.map(|b| b.map(|b| b.velocity()).unwrap_or_else(Vec2::zero));

        let correction = solver::Correction {
            slop: self.config.position_slop,
            percent: self.config.correction_percent,
        };
        let Some(response) = solver::resolve(contact, inv_masses, velocities, correction) else {
            return;
        };

        for (idx, entity) in entities.into_iter().enumerate() {
            if inv_masses[idx] == 0.0 {
                continue;
            }
            if let Some(body) = self.bodies.find_mut(entity) {
                *body.velocity_mut() += response.velocity[idx];
            }
            if let Ok(tr) = world.query_one_mut::<&mut Transform2D>(entity) {
                tr.translate(response.position[idx]);
            }
        }
    }
}
