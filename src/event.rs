use crate::{
    physics::registry::ColliderKey,
    scene::{CollisionListener, Listeners},
};

/// Whether an event came from a trigger overlap or a solid collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    Collision,
    Trigger,
}

/// Which part of an overlap's lifetime an event describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Stay,
    Exit,
}

impl Phase {
    /// Classify the change of a pair's overlap state between two frames.
    /// Returns None if the pair neither overlaps now nor did before.
    #[inline]
    pub fn from_transition(was_overlapping: bool, is_overlapping: bool) -> Option<Self> {
        match (was_overlapping, is_overlapping) {
            (false, true) => Some(Phase::Enter),
            (true, true) => Some(Phase::Stay),
            (true, false) => Some(Phase::Exit),
            (false, false) => None,
        }
    }
}

/// Events produced by the physics world when a pair of entities
/// starts, keeps or stops overlapping.
///
/// `colliders` names one collider pair responsible for the overlap,
/// ordered like `entities`.
///
/// Every event has been delivered to the [`Listeners`] of both entities
/// by the time [`update`][crate::PhysicsWorld::update] returns it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    pub phase: Phase,
    pub entities: [hecs::Entity; 2],
    pub colliders: [ColliderKey; 2],
}

impl CollisionEvent {
    /// Check whether the given entity is on either side of this event.
    #[inline]
    pub fn involves(&self, entity: hecs::Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Call the matching method on a single listener.
    pub fn deliver(&self, listener: &mut dyn CollisionListener, other: hecs::Entity) {
        use CollisionKind::*;
        use Phase::*;
        match (self.kind, self.phase) {
            (Collision, Enter) => listener.on_collision_enter(other),
            (Collision, Stay) => listener.on_collision_stay(other),
            (Collision, Exit) => listener.on_collision_exit(other),
            (Trigger, Enter) => listener.on_trigger_enter(other),
            (Trigger, Stay) => listener.on_trigger_stay(other),
            (Trigger, Exit) => listener.on_trigger_exit(other),
        }
    }

    /// Deliver the event to every listener on both entities,
    /// first entity first. Entities without listeners are skipped.
    pub fn dispatch(&self, world: &mut hecs::World) {
        let [a, b] = self.entities;
        for (this, other) in [(a, b), (b, a)] {
            let Ok(listeners) = world.query_one_mut::<&mut Listeners>(this) else {
                continue;
            };
            for listener in listeners.iter_mut() {
                self.deliver(listener, other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<(&'static str, hecs::Entity)>>>);

    impl CollisionListener for Log {
        fn on_collision_stay(&mut self, other: hecs::Entity) {
            self.0.lock().push(("collision_stay", other));
        }
        fn on_trigger_exit(&mut self, other: hecs::Entity) {
            self.0.lock().push(("trigger_exit", other));
        }
    }

    #[test]
    fn transitions() {
        assert_eq!(Phase::from_transition(false, true), Some(Phase::Enter));
        assert_eq!(Phase::from_transition(true, true), Some(Phase::Stay));
        assert_eq!(Phase::from_transition(true, false), Some(Phase::Exit));
        assert_eq!(Phase::from_transition(false, false), None);
    }

    #[test]
    fn dispatch_reaches_both_sides_and_skips_bare_entities() {
        let mut world = hecs::World::new();
        let log = Log::default();
        let a = world.spawn((Listeners::new().with(log.clone()).with(log.clone()),));
        let b = world.spawn((Listeners::new().with(log.clone()),));
        let bare = world.spawn(());

        let mut colliders = thunderdome::Arena::new();
        let keys = [
            ColliderKey(colliders.insert(())),
            ColliderKey(colliders.insert(())),
        ];

        let evt = CollisionEvent {
            kind: CollisionKind::Collision,
            phase: Phase::Stay,
            entities: [a, b],
            colliders: keys,
        };
        evt.dispatch(&mut world);
        assert_eq!(
            *log.0.lock(),
            vec![
                ("collision_stay", b),
                ("collision_stay", b),
                ("collision_stay", a)
            ]
        );

        log.0.lock().clear();
        let evt = CollisionEvent {
            kind: CollisionKind::Trigger,
            phase: Phase::Exit,
            entities: [bare, b],
            colliders: keys,
        };
        evt.dispatch(&mut world);
        assert_eq!(*log.0.lock(), vec![("trigger_exit", bare)]);
    }
}
