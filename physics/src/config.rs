use common::shapes::Rectangle;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    #[default]
    Euler,
    Verlet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub integrator: Integrator,
    pub mass: f32,
    pub gravity_scale: f32,
    /// Ground friction coefficient; the opposing force is
    /// `velocity * mass * friction`.
    pub friction: f32,
    pub max_speed: f32,
    /// Speeds below this snap to zero.
    pub min_speed: f32,
    pub gravity_enabled: bool,
    pub collisions_enabled: bool,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            integrator: Integrator::Euler,
            mass: 1.0,
            gravity_scale: 1.0,
            friction: 6.0,
            max_speed: 4000.0,
            min_speed: 0.01,
            gravity_enabled: true,
            collisions_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Half size of the square world the actor index covers, centred on the origin.
    pub world_extent: f32,
    /// Downward acceleration; `y` grows downward.
    pub gravity: f32,
    pub fixed_timestep: f32,
    /// Catch-up cap per frame. Time beyond it is dropped.
    pub max_physics_steps: u32,
    /// Radius around the camera inside which actors are updated and simulated.
    pub simulation_distance: f32,
    pub quadtree: quadtree::Config,
}

impl SceneConfig {
    pub fn world_bounds(&self) -> Rectangle {
        Rectangle::from_min_max(
            -self.world_extent,
            -self.world_extent,
            self.world_extent,
            self.world_extent,
        )
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            world_extent: 10_000.0,
            gravity: 980.0,
            fixed_timestep: 1.0 / 60.0,
            max_physics_steps: 5,
            simulation_distance: 2_500.0,
            quadtree: quadtree::Config::default(),
        }
    }
}
