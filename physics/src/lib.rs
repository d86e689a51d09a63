//! Fixed-timestep physics for scene actors.
//!
//! A [`Scene`] keeps every actor in a [`Quadtree`](quadtree::Quadtree) and
//! drives two passes: a variable-rate [`Scene::update`] that runs behaviours
//! for actors near the camera (and reorganizes the index as it goes), and a
//! fixed-rate [`Scene::physics_update`] that integrates each body and pushes
//! it out of whatever it ended up overlapping.

mod actor;
mod body;
mod config;
mod correction;
mod error;
mod scene;

pub use actor::{Actor, ActorHandle, ActorId, Behaviour, CollisionEvent};
pub use body::PhysicsBody;
pub use config::{BodyConfig, Integrator, SceneConfig};
pub use correction::{COLLISION_ITERATIONS, QUERY_MARGIN};
pub use error::{PhysicsError, PhysicsResult};
pub use scene::Scene;
