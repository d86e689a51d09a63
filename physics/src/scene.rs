use crate::actor::{Actor, ActorHandle, ActorId};
use crate::config::SceneConfig;
use crate::correction::{physics_step, StepContext};
use crate::error::{PhysicsError, PhysicsResult};
use collisions::{Aabb, ColliderId};
use common::shapes::Rectangle;
use common::Vector2;
use fxhash::FxHashMap;
use quadtree::Quadtree;
use tracing::{debug, warn};

/// Owns every actor and the spatial index over them.
///
/// Spawns and despawns are queued and applied at the end of each update, so
/// an actor never disappears from under a running query.
pub struct Scene {
    config: SceneConfig,
    tree: Quadtree<ActorHandle>,
    actors: FxHashMap<ActorId, ActorHandle>,
    pending_add: Vec<ActorHandle>,
    pending_remove: Vec<ActorId>,
    next_id: u32,
    camera: Vector2<f32>,
    accumulator: f32,
    interpolation_alpha: f32,
    active: Vec<ActorHandle>,
    candidates: Vec<ActorHandle>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> PhysicsResult<Self> {
        if !(config.fixed_timestep.is_finite() && config.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidTimestep(config.fixed_timestep));
        }
        let tree = Quadtree::new_with_config(config.world_bounds(), config.quadtree.clone())?;
        Ok(Scene {
            config,
            tree,
            actors: FxHashMap::default(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_id: 0,
            camera: Vector2::zeros(),
            accumulator: 0.0,
            interpolation_alpha: 0.0,
            active: Vec::new(),
            candidates: Vec::new(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Queues an actor for insertion and returns its handle right away.
    pub fn spawn(&mut self, mut actor: Actor) -> ActorHandle {
        actor.set_id(ActorId(self.next_id));
        self.next_id += 1;
        let handle = ActorHandle::new(actor);
        self.pending_add.push(handle.clone());
        handle
    }

    /// Queues removal. Unknown or already removed ids are ignored at flush.
    pub fn despawn(&mut self, id: ActorId) {
        self.pending_remove.push(id);
    }

    /// Applies queued spawns, then queued despawns.
    ///
    /// An actor spawned outside the world is dropped and reported, after the
    /// rest of the queue has been applied.
    pub fn flush_pending(&mut self) -> PhysicsResult<()> {
        let mut result = Ok(());
        for handle in self.pending_add.drain(..) {
            let id = handle.id();
            match self.tree.insert(handle.clone()) {
                Ok(()) => {
                    self.actors.insert(id, handle);
                }
                Err(err) => {
                    warn!(actor = id.0, %err, "dropping actor spawned outside the world");
                    if result.is_ok() {
                        result = Err(err.into());
                    }
                }
            }
        }
        for id in self.pending_remove.drain(..) {
            if let Some(handle) = self.actors.remove(&id) {
                self.tree.remove(&handle);
            }
        }
        debug!(actors = self.actors.len(), "flushed pending actors");
        result
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorHandle> {
        self.actors.get(&id)
    }

    /// Registered actors; queued spawns are not counted.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn camera(&self) -> Vector2<f32> {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Vector2<f32>) {
        self.camera = camera;
    }

    /// Runs behaviours for actors within simulation distance of the camera.
    ///
    /// The gathering query also reorganizes the index, so actors moved since
    /// the last frame settle back into the right nodes.
    pub fn update(&mut self, dt: f32) -> PhysicsResult<()> {
        self.active.clear();
        self.tree.query_circle(
            self.camera,
            self.config.simulation_distance,
            true,
            &mut self.active,
        )?;
        for handle in &self.active {
            let mut actor = handle.borrow_mut();
            actor.run_behaviour(dt);
            if actor.despawn_requested() {
                self.pending_remove.push(actor.id());
            }
        }
        self.active.clear();
        self.flush_pending()
    }

    /// One fixed-timestep physics step for actors near the camera.
    pub fn physics_update(&mut self) -> PhysicsResult<()> {
        self.active.clear();
        self.tree.query_circle(
            self.camera,
            self.config.simulation_distance,
            false,
            &mut self.active,
        )?;
        let ctx = StepContext {
            tree: &self.tree,
            gravity: self.config.gravity,
            dt: self.config.fixed_timestep,
        };
        for handle in &self.active {
            physics_step(handle, &ctx, &mut self.candidates)?;
        }
        self.active.clear();
        self.flush_pending()
    }

    /// Runs one frame: an update, then as many fixed physics steps as the
    /// accumulated time allows, up to the configured cap. Returns the number
    /// of physics steps taken.
    pub fn advance(&mut self, frame_dt: f32) -> PhysicsResult<u32> {
        self.update(frame_dt)?;
        let step = self.config.fixed_timestep;
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= step && steps < self.config.max_physics_steps {
            self.physics_update()?;
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            debug!(steps, behind = self.accumulator, "physics step cap reached; dropping time");
            self.accumulator %= step;
        }
        self.interpolation_alpha = self.accumulator / step;
        Ok(steps)
    }

    /// Fraction of a physics step left over after the last [`advance`](Self::advance).
    pub fn interpolation_alpha(&self) -> f32 {
        self.interpolation_alpha
    }

    /// Actors whose positions fall inside `viewport`. Does not touch the index layout.
    pub fn visible_actors(&self, viewport: &Rectangle, out: &mut Vec<ActorHandle>) -> PhysicsResult<()> {
        self.tree.query_rect(viewport, false, out)?;
        Ok(())
    }

    pub fn actors_near(&self, point: Vector2<f32>, radius: f32, out: &mut Vec<ActorHandle>) -> PhysicsResult<()> {
        self.tree.query_circle(point, radius, false, out)?;
        Ok(())
    }

    pub fn closest_actor(&self, point: Vector2<f32>) -> PhysicsResult<Option<ActorHandle>> {
        Ok(self.tree.find_closest(point)?)
    }

    pub fn debug_node_bounds(&self, out: &mut Vec<Rectangle>) {
        self.tree.all_node_bounds(out);
    }

    /// World-space bounds of every enabled collider, tagged with its owner.
    pub fn debug_collider_bounds(&self, out: &mut Vec<(ActorId, ColliderId, Aabb)>) {
        let mut scratch = Vec::new();
        for (&id, handle) in &self.actors {
            let actor = handle.borrow();
            if let Some(colliders) = actor.colliders.as_ref() {
                scratch.clear();
                colliders.debug_bounds(actor.position(), &mut scratch);
                out.extend(scratch.iter().map(|&(collider, aabb)| (id, collider, aabb)));
            }
        }
    }
}
