use crate::{math::Vec2, scene::Transform2D};

/// A rigid body moves its entity according to velocity, gravity and
/// forces, and gets pushed out of solid colliders it overlaps.
///
/// Forces and impulses are buffered: they take effect at the next
/// [`PhysicsWorld::update`][crate::PhysicsWorld::update] and are then discarded,
/// so a continuous force has to be added again every frame.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct RigidBody {
    mass: f64,
    /// Kinematic bodies ignore forces and gravity and act as if they had infinite mass
    /// when colliding. Move them by editing their entity's transform directly.
    pub is_kinematic: bool,
    pub use_gravity: bool,
    pub gravity_scale: f64,
    /// Fraction of linear velocity lost per second.
    pub drag: f64,
    /// Fraction of angular velocity lost per second.
    pub angular_drag: f64,
    #[cfg_attr(feature = "serde-types", serde(skip))]
    velocity: Vec2,
    /// Degrees per second.
    #[cfg_attr(feature = "serde-types", serde(skip))]
    angular_velocity: f64,
    #[cfg_attr(feature = "serde-types", serde(skip))]
    forces: Vec<Vec2>,
    #[cfg_attr(feature = "serde-types", serde(skip))]
    impulses: Vec<Vec2>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RigidBody {
    /// Create a dynamic body with the given mass.
    ///
    /// The mass is checked when the body is registered with a physics world,
    /// which refuses anything that isn't finite and positive.
    pub fn new(mass: f64) -> Self {
        RigidBody {
            mass,
            is_kinematic: false,
            use_gravity: true,
            gravity_scale: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            velocity: Vec2::zero(),
            angular_velocity: 0.0,
            forces: Vec::new(),
            impulses: Vec::new(),
        }
    }

    /// Kinematic bodies are not affected by forces or collisions.
    pub fn new_kinematic() -> Self {
        RigidBody {
            is_kinematic: true,
            ..Self::new(1.0)
        }
    }

    /// Set the velocity of the body in a builder-like chain.
    pub fn with_velocity(mut self, x: f64, y: f64) -> Self {
        self.set_velocity(x, y);
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_angular_drag(mut self, angular_drag: f64) -> Self {
        self.angular_drag = angular_drag;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f64) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_use_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Change the mass, refusing values that aren't finite and positive.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), f64> {
        if mass_is_valid(mass) {
            self.mass = mass;
            Ok(())
        } else {
            Err(mass)
        }
    }

    /// Mass as seen by collision response.
    #[inline]
    pub fn effective_mass(&self) -> Mass {
        if self.is_kinematic {
            Mass::Infinite
        } else {
            Mass::from(self.mass)
        }
    }

    /// Returns the inverse mass of the body, which is zero for kinematic bodies.
    #[inline]
    pub fn inverse_mass(&self) -> f64 {
        self.effective_mass().inv()
    }

    /// Queue a continuous force for the next step.
    pub fn add_force(&mut self, x: f64, y: f64) {
        self.forces.push(Vec2::new(x, y));
    }

    /// Queue an instantaneous change in momentum for the next step.
    pub fn add_impulse(&mut self, x: f64, y: f64) {
        self.impulses.push(Vec2::new(x, y));
    }

    #[inline]
    pub fn set_velocity(&mut self, x: f64, y: f64) {
        self.velocity = Vec2::new(x, y);
    }

    /// Linear velocity in pixels per second.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn set_angular_velocity(&mut self, omega: f64) {
        self.angular_velocity = omega;
    }

    /// Angular velocity in degrees per second.
    #[inline]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Change angular velocity immediately by `torque / mass`.
    pub fn add_torque(&mut self, torque: f64) {
        self.angular_velocity += torque / self.mass;
    }

    /// Forces and impulses waiting for the next step.
    #[inline]
    pub fn pending(&self) -> (&[Vec2], &[Vec2]) {
        (&self.forces, &self.impulses)
    }

    #[inline]
    pub(crate) fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.velocity
    }

    /// Advance the body and its entity by `dt` seconds.
    ///
    /// Kinematic bodies don't move here, but their queues are still emptied.
    pub(crate) fn integrate(&mut self, tr: &mut Transform2D, gravity: Vec2, dt: f64) {
        if self.is_kinematic {
            self.forces.clear();
            self.impulses.clear();
            return;
        }

        if self.use_gravity && self.gravity_scale != 0.0 {
            self.velocity += gravity * self.gravity_scale * dt;
        }

        let inv_mass = 1.0 / self.mass;
        for force in self.forces.drain(..) {
            self.velocity += force * inv_mass * dt;
        }
        for impulse in self.impulses.drain(..) {
            self.velocity += impulse * inv_mass;
        }

        // clamped so that drag can stop a body but never reverse it
        self.velocity = self.velocity * (1.0 - self.drag * dt).max(0.0);
        self.angular_velocity *= (1.0 - self.angular_drag * dt).max(0.0);

        tr.translate(self.velocity * dt);
        if self.angular_velocity != 0.0 {
            tr.angle += self.angular_velocity * dt;
        }
    }
}

#[inline]
pub(crate) fn mass_is_valid(mass: f64) -> bool {
    mass.is_finite() && mass > 0.0
}

/// Mass of a body, which can be infinite.
///
/// This stores both a mass value and its inverse, because the inverse
/// is what collision response actually needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mass {
    Finite { mass: f64, inverse: f64 },
    Infinite,
}

impl From<f64> for Mass {
    #[inline]
    fn from(mass: f64) -> Self {
        Mass::Finite {
            mass,
            inverse: 1.0 / mass,
        }
    }
}

impl Mass {
    /// Get the inverse of the mass, which is zero if the mass is infinite.
    #[inline]
    pub fn inv(&self) -> f64 {
        match self {
            Mass::Finite { inverse, .. } => *inverse,
            Mass::Infinite => 0.0,
        }
    }
}
