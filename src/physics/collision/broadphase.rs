//! Broad phase collision detection algorithms
//! are responsible for detecting pairs of possibly intersecting objects
//! for further, more accurate narrow phase inspection.

use itertools::Itertools;

/// A broad phase algorithm.
pub trait BroadPhase {
    /// Returns index pairs `[i, j]` with `i < j` of potentially intersecting objects,
    /// given how many objects there are.
    /// Objects are addressed by their position in the collider registration order.
    fn pairs(count: usize) -> Vec<[usize; 2]>;
}

/// The simplest possible broad phase algorithm,
/// which pairs every object with every other object.
/// Very inefficient, but can work for small systems.
///
/// Pairs are produced in lexicographic order,
/// which is also the order collision events are dispatched in.
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn pairs(count: usize) -> Vec<[usize; 2]> {
        (0..count)
            .tuple_combinations()
            .map(|(i, j)| [i, j])
            .collect()
    }
}
