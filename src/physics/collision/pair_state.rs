use crate::{
    event::{CollisionKind, Phase},
    physics::registry::ColliderKey,
};

use std::collections::HashMap;

/// Canonical key of an unordered entity pair, so that `(a, b)` and `(b, a)` match.
#[inline]
fn entity_pair_key(a: hecs::Entity, b: hecs::Entity) -> [u64; 2] {
    let (a, b) = (a.to_bits().get(), b.to_bits().get());
    if a < b {
        [a, b]
    } else {
        [b, a]
    }
}

/// Remembers which pairs of entities overlapped on the previous frame.
///
/// Solid collisions and trigger overlaps are tracked separately,
/// so one entity pair can be in both at once if their colliders mix kinds.
/// Only overlapping pairs are stored; a missing entry means "not overlapping".
#[derive(Debug, Default)]
pub struct PairStates(HashMap<([u64; 2], CollisionKind), [hecs::Entity; 2]>);

impl PairStates {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the entities overlapped in any way on the last update.
    pub fn is_overlapping(&self, a: hecs::Entity, b: hecs::Entity) -> bool {
        let key = entity_pair_key(a, b);
        [CollisionKind::Collision, CollisionKind::Trigger]
            .into_iter()
            .any(|kind| self.0.contains_key(&(key, kind)))
    }

    /// Store the new overlap state of a pair and classify the change.
    pub fn update(
        &mut self,
        a: hecs::Entity,
        b: hecs::Entity,
        kind: CollisionKind,
        overlapping: bool,
    ) -> Option<Phase> {
        let key = (entity_pair_key(a, b), kind);
        let was_overlapping = if overlapping {
            self.0.insert(key, [a, b]).is_some()
        } else {
            self.0.remove(&key).is_some()
        };
        Phase::from_transition(was_overlapping, overlapping)
    }

    /// Forget every pair involving the given entity.
    pub fn forget(&mut self, entity: hecs::Entity) {
        self.0.retain(|_, pair| !pair.contains(&entity));
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Results of one detection pass for a single entity pair.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EntityPairFrame {
    pub entities: [hecs::Entity; 2],
    /// First collider pair tested between the entities, ordered like `entities`.
    pub tested: [ColliderKey; 2],
    /// First overlapping solid collider pair, if any.
    pub collision: Option<[ColliderKey; 2]>,
    /// First overlapping collider pair involving a trigger, if any.
    pub trigger: Option<[ColliderKey; 2]>,
}

impl EntityPairFrame {
    #[inline]
    pub fn overlapping(&self, kind: CollisionKind) -> bool {
        self.overlap(kind).is_some()
    }

    /// The collider pair to report in an event of the given kind.
    #[inline]
    pub fn colliders(&self, kind: CollisionKind) -> [ColliderKey; 2] {
        self.overlap(kind).unwrap_or(self.tested)
    }

    fn overlap(&self, kind: CollisionKind) -> Option<[ColliderKey; 2]> {
        match kind {
            CollisionKind::Collision => self.collision,
            CollisionKind::Trigger => self.trigger,
        }
    }
}

/// Collider pair results of one detection pass, grouped by entity pair.
///
/// An entity pair overlaps if any of its collider pairs does.
/// Entity pairs are kept in the order they were first tested.
#[derive(Debug, Default)]
pub(crate) struct FrameOverlaps {
    pairs: Vec<EntityPairFrame>,
    index: HashMap<[u64; 2], usize>,
}

impl FrameOverlaps {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of testing one collider pair.
    /// `overlap` is the kind of the overlap, or None if the colliders don't overlap.
    pub fn record(
        &mut self,
        entities: [hecs::Entity; 2],
        colliders: [ColliderKey; 2],
        overlap: Option<CollisionKind>,
    ) {
        let key = entity_pair_key(entities[0], entities[1]);
        let idx = *self.index.entry(key).or_insert_with(|| {
            self.pairs.push(EntityPairFrame {
                entities,
                tested: colliders,
                collision: None,
                trigger: None,
            });
            self.pairs.len() - 1
        });

        let pair = &mut self.pairs[idx];
        let colliders = if pair.entities[0] == entities[0] {
            colliders
        } else {
            [colliders[1], colliders[0]]
        };
        let slot = match overlap {
            Some(CollisionKind::Collision) => &mut pair.collision,
            Some(CollisionKind::Trigger) => &mut pair.trigger,
            None => return,
        };
        if slot.is_none() {
            *slot = Some(colliders);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityPairFrame> {
        self.pairs.iter()
    }
}
