use super::{Collider, RigidBody};

use std::collections::HashMap;
use thunderdome as td;

/// Key type to look up a collider stored in the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderKey(pub(crate) td::Index);

impl ColliderKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }

    /// A totally ordered representation of the key, used to canonicalize pairs.
    #[inline]
    pub(crate) fn bits(&self) -> u64 {
        self.0.to_bits()
    }
}

/// Key type to look up a rigid body stored in the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyKey(pub(crate) td::Index);

impl BodyKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ColliderEntry {
    pub entity: hecs::Entity,
    pub collider: Collider,
}

/// Colliders attached to entities.
///
/// An entity may own any number of colliders.
/// Registration order is remembered so that iteration is deterministic.
#[derive(Debug, Default)]
pub struct ColliderRegistry {
    pub(crate) colliders: td::Arena<ColliderEntry>,
    by_entity: HashMap<hecs::Entity, Vec<ColliderKey>>,
    order: Vec<ColliderKey>,
}

impl ColliderRegistry {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a collider and attach it to an entity.
    ///
    /// A collider's identity is the key handed out here, so every call
    /// registers a new collider, even with settings equal to an existing one.
    /// Registering the same collider twice is impossible by construction.
    pub(crate) fn insert(&mut self, entity: hecs::Entity, collider: Collider) -> ColliderKey {
        let key = ColliderKey(self.colliders.insert(ColliderEntry { entity, collider }));
        self.by_entity.entry(entity).or_default().push(key);
        self.order.push(key);
        key
    }

    /// Remove a collider, returning it and its entity if it still existed.
    /// Drops the entity's entry entirely once it has no colliders left.
    pub(crate) fn remove(&mut self, key: ColliderKey) -> Option<(hecs::Entity, Collider)> {
        let entry = self.colliders.remove(key.0)?;
        if let Some(list) = self.by_entity.get_mut(&entry.entity) {
            list.retain(|k| *k != key);
            if list.is_empty() {
                self.by_entity.remove(&entry.entity);
            }
        }
        self.order.retain(|k| *k != key);
        Some((entry.entity, entry.collider))
    }

    /// Remove every collider of an entity, returning their keys.
    pub(crate) fn remove_entity(&mut self, entity: hecs::Entity) -> Vec<ColliderKey> {
        let Some(keys) = self.by_entity.remove(&entity) else {
            return Vec::new();
        };
        for key in &keys {
            self.colliders.remove(key.0);
        }
        self.order.retain(|k| !keys.contains(k));
        keys
    }

    #[inline]
    pub fn get(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key.0).map(|e| &e.collider)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ColliderKey) -> Option<&mut Collider> {
        self.colliders.get_mut(key.0).map(|e| &mut e.collider)
    }

    /// The entity a collider is attached to, if the collider still exists.
    #[inline]
    pub fn entity_of(&self, key: ColliderKey) -> Option<hecs::Entity> {
        self.colliders.get(key.0).map(|e| e.entity)
    }

    /// Colliders of one entity in registration order, possibly empty.
    pub fn colliders_for(&self, entity: hecs::Entity) -> &[ColliderKey] {
        self.by_entity
            .get(&entity)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Every registered collider in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (hecs::Entity, ColliderKey, &Collider)> + Clone {
        self.order.iter().filter_map(|key| {
            self.colliders
                .get(key.0)
                .map(|e| (e.entity, *key, &e.collider))
        })
    }

    /// Registration-ordered keys, used for addressing pairs during detection.
    #[inline]
    pub(crate) fn keys(&self) -> &[ColliderKey] {
        &self.order
    }

    /// Entities that own at least one collider.
    pub(crate) fn entities(&self) -> impl Iterator<Item = hecs::Entity> + '_ {
        self.by_entity.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.colliders.clear();
        self.by_entity.clear();
        self.order.clear();
    }
}

/// Rigid bodies attached to entities, at most one per entity.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    pub(crate) bodies: td::Arena<(hecs::Entity, RigidBody)>,
    by_entity: HashMap<hecs::Entity, BodyKey>,
}

impl BodyRegistry {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a body for an entity.
    /// Returns the body back if the entity already had one.
    pub(crate) fn insert(
        &mut self,
        entity: hecs::Entity,
        body: RigidBody,
    ) -> Result<BodyKey, RigidBody> {
        if self.by_entity.contains_key(&entity) {
            return Err(body);
        }
        let key = BodyKey(self.bodies.insert((entity, body)));
        self.by_entity.insert(entity, key);
        Ok(key)
    }

    pub(crate) fn remove(&mut self, entity: hecs::Entity) -> Option<RigidBody> {
        let key = self.by_entity.remove(&entity)?;
        self.bodies.remove(key.0).map(|(_, body)| body)
    }

    #[inline]
    pub fn key_of(&self, entity: hecs::Entity) -> Option<BodyKey> {
        self.by_entity.get(&entity).copied()
    }

    #[inline]
    pub fn find(&self, entity: hecs::Entity) -> Option<&RigidBody> {
        let key = self.by_entity.get(&entity)?;
        self.bodies.get(key.0).map(|(_, b)| b)
    }

    #[inline]
    pub fn find_mut(&mut self, entity: hecs::Entity) -> Option<&mut RigidBody> {
        let key = self.by_entity.get(&entity)?;
        self.bodies.get_mut(key.0).map(|(_, b)| b)
    }

    #[inline]
    pub fn get(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key.0).map(|(_, b)| b)
    }

    #[inline]
    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key.0).map(|(_, b)| b)
    }

    pub(crate) fn entities(&self) -> impl Iterator<Item = hecs::Entity> + '_ {
        self.by_entity.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.bodies.clear();
        self.by_entity.clear();
    }
}
