use crate::config::{BodyConfig, Integrator};
use crate::error::{PhysicsError, PhysicsResult};
use common::Vector2;

/// Ground friction only kicks in above this speed.
const FRICTION_MIN_SPEED: f32 = 0.5;

/// Velocity, force accumulators and contact state for one actor.
///
/// Forces and impulses are collected between ticks and consumed by the next
/// integration step. Positions live on the owning [`Actor`](crate::Actor).
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub integrator: Integrator,
    /// A disabled body is skipped entirely by the physics pass.
    pub enabled: bool,
    pub gravity_enabled: bool,
    /// Turned off automatically, with a warning, when the owner has no
    /// colliders to test with.
    pub collisions_enabled: bool,
    pub gravity_scale: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    mass: f32,
    velocity: Vector2<f32>,
    acceleration: Vector2<f32>,
    impulse_acceleration: Vector2<f32>,
    gravity_acceleration: Vector2<f32>,
    previous_position: Option<Vector2<f32>>,
    velocity_set: bool,
    on_ground: bool,
    collided_last_step: bool,
}

impl PhysicsBody {
    pub fn new(config: &BodyConfig) -> PhysicsResult<Self> {
        if !(config.mass.is_finite() && config.mass > 0.0) {
            return Err(PhysicsError::InvalidMass(config.mass));
        }
        Ok(PhysicsBody {
            integrator: config.integrator,
            enabled: true,
            gravity_enabled: config.gravity_enabled,
            collisions_enabled: config.collisions_enabled,
            gravity_scale: config.gravity_scale,
            friction: config.friction,
            max_speed: config.max_speed,
            min_speed: config.min_speed,
            mass: config.mass,
            velocity: Vector2::zeros(),
            acceleration: Vector2::zeros(),
            impulse_acceleration: Vector2::zeros(),
            gravity_acceleration: Vector2::zeros(),
            previous_position: None,
            velocity_set: false,
            on_ground: false,
            collided_last_step: false,
        })
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    /// Overrides the velocity. A Verlet body rebuilds its position history
    /// from it on the next step.
    pub fn set_velocity(&mut self, velocity: Vector2<f32>) {
        self.velocity = velocity;
        self.velocity_set = true;
    }

    /// Pending acceleration from forces applied since the last step.
    pub fn acceleration(&self) -> Vector2<f32> {
        self.acceleration
    }

    pub fn apply_force(&mut self, force: Vector2<f32>) {
        self.acceleration += force / self.mass;
    }

    pub fn apply_impulse(&mut self, impulse: Vector2<f32>) {
        self.impulse_acceleration += impulse / self.mass;
    }

    /// Whether the last collision pass pushed the body upward.
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub(crate) fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
    }

    /// Records this step's collision state and reports whether a collision
    /// just started.
    pub(crate) fn begin_contact(&mut self, collided: bool) -> bool {
        let started = collided && !self.collided_last_step;
        self.collided_last_step = collided;
        started
    }

    /// Forgets the Verlet history after a teleport.
    pub(crate) fn reset_history(&mut self) {
        self.previous_position = None;
    }

    pub(crate) fn apply_gravity(&mut self, gravity: f32) {
        self.gravity_acceleration = if self.gravity_enabled {
            Vector2::new(0.0, gravity * self.gravity_scale)
        } else {
            Vector2::zeros()
        };
    }

    /// Advances `position` by one step and clears the force accumulators.
    pub fn integrate(&mut self, position: &mut Vector2<f32>, dt: f32) {
        let acceleration = self.acceleration + self.impulse_acceleration + self.gravity_acceleration;
        match self.integrator {
            Integrator::Euler => self.integrate_euler(position, acceleration, dt),
            Integrator::Verlet => self.integrate_verlet(position, acceleration, dt),
        }
        self.acceleration = Vector2::zeros();
        self.impulse_acceleration = Vector2::zeros();
        self.gravity_acceleration = Vector2::zeros();
    }

    fn integrate_euler(&mut self, position: &mut Vector2<f32>, acceleration: Vector2<f32>, dt: f32) {
        self.velocity = self.clamp_speed(self.velocity + acceleration * dt);
        *position += self.velocity * dt;
    }

    fn integrate_verlet(&mut self, position: &mut Vector2<f32>, acceleration: Vector2<f32>, dt: f32) {
        let previous = match self.previous_position {
            Some(previous) if !self.velocity_set => previous,
            _ => *position - self.velocity * dt,
        };
        let next = *position * 2.0 - previous + acceleration * dt * dt;
        self.velocity = self.clamp_speed((next - *position) / dt);
        self.previous_position = Some(*position);
        *position += self.velocity * dt;
        self.velocity_set = false;
    }

    fn clamp_speed(&self, velocity: Vector2<f32>) -> Vector2<f32> {
        let speed = velocity.norm();
        if speed > self.max_speed {
            velocity * (self.max_speed / speed)
        } else if speed < self.min_speed {
            Vector2::zeros()
        } else {
            velocity
        }
    }

    /// Queues a force opposing the current velocity while grounded.
    pub(crate) fn apply_friction(&mut self) {
        if self.on_ground && self.velocity.norm() > FRICTION_MIN_SPEED {
            self.apply_force(-self.velocity * self.mass * self.friction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(integrator: Integrator) -> PhysicsBody {
        PhysicsBody::new(&BodyConfig {
            integrator,
            gravity_enabled: false,
            ..BodyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let config = BodyConfig {
            mass: 0.0,
            ..BodyConfig::default()
        };
        assert_eq!(PhysicsBody::new(&config).unwrap_err(), PhysicsError::InvalidMass(0.0));
    }

    #[test]
    fn test_force_scales_with_mass() {
        let mut b = PhysicsBody::new(&BodyConfig {
            mass: 2.0,
            ..BodyConfig::default()
        })
        .unwrap();
        b.apply_force(Vector2::new(10.0, 0.0));
        assert_eq!(b.acceleration(), Vector2::new(5.0, 0.0));
    }

    #[test]
    fn test_accumulators_cleared_after_step() {
        let mut b = body(Integrator::Euler);
        b.apply_force(Vector2::new(60.0, 0.0));
        b.apply_impulse(Vector2::new(60.0, 0.0));
        let mut position = Vector2::zeros();
        b.integrate(&mut position, 0.5);
        assert_eq!(b.velocity(), Vector2::new(60.0, 0.0));
        assert_eq!(b.acceleration(), Vector2::zeros());

        b.integrate(&mut position, 0.5);
        assert_eq!(b.velocity(), Vector2::new(60.0, 0.0));
        assert_eq!(position, Vector2::new(60.0, 0.0));
    }

    #[test]
    fn test_gravity_disabled_adds_nothing() {
        let mut b = body(Integrator::Euler);
        b.set_velocity(Vector2::new(10.0, 0.0));
        b.apply_gravity(980.0);
        let mut position = Vector2::zeros();
        b.integrate(&mut position, 0.1);
        assert_eq!(b.velocity(), Vector2::new(10.0, 0.0));
    }

    #[test]
    fn test_contact_edges() {
        let mut b = body(Integrator::Euler);
        assert!(b.begin_contact(true));
        assert!(!b.begin_contact(true));
        assert!(!b.begin_contact(false));
        assert!(b.begin_contact(true));
    }

    #[test]
    fn test_friction_only_when_grounded() {
        let mut b = body(Integrator::Euler);
        b.set_velocity(Vector2::new(10.0, 0.0));
        b.apply_friction();
        assert_eq!(b.acceleration(), Vector2::zeros());

        b.set_on_ground(true);
        b.apply_friction();
        assert!(b.acceleration().x < 0.0);
        assert_eq!(b.acceleration().y, 0.0);
    }

    #[test]
    fn test_friction_ignores_slow_bodies() {
        let mut b = body(Integrator::Euler);
        b.set_on_ground(true);
        b.set_velocity(Vector2::new(0.1, 0.0));
        b.apply_friction();
        assert_eq!(b.acceleration(), Vector2::zeros());
    }
}
