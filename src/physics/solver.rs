//! Impulse-based response to a single contact between two solid colliders.

use crate::{math::Vec2, physics::collision::Contact};

/// How aggressively overlapping bodies are pushed apart.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Correction {
    /// Penetration depth that is tolerated without positional correction.
    pub slop: f64,
    /// Fraction of the remaining depth corrected per step.
    pub percent: f64,
}

/// Changes to apply to the two sides of a contact.
/// A side with zero inverse mass always gets zero changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Response {
    pub velocity: [Vec2; 2],
    pub position: [Vec2; 2],
}

/// Compute the response to a contact whose normal points from side 0 to side 1.
///
/// Restitution is zero, so the velocity along the normal is removed
/// rather than reflected. Returns None if nothing should change:
/// both sides are immovable, or they're already moving apart.
pub(crate) fn resolve(
    contact: &Contact,
    inv_masses: [f64; 2],
    velocities: [Vec2; 2],
    correction: Correction,
) -> Option<Response> {
    let inv_mass_sum = inv_masses[0] + inv_masses[1];
    if inv_mass_sum <= 0.0 {
        return None;
    }

    let normal = *contact.normal;
    let vel_along_normal = (velocities[1] - velocities[0]).dot(normal);
    if vel_along_normal > 0.0 {
        return None;
    }

    let impulse = normal * (-vel_along_normal / inv_mass_sum);
    let push =
        normal * ((contact.depth - correction.slop).max(0.0) * correction.percent / inv_mass_sum);

    Some(Response {
        velocity: [-impulse * inv_masses[0], impulse * inv_masses[1]],
        position: [-push * inv_masses[0], push * inv_masses[1]],
    })
}
