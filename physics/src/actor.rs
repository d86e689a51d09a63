use crate::body::PhysicsBody;
use collisions::{ColliderId, ColliderTree};
use common::Vector2;
use quadtree::Positioned;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ActorId(pub u32);

/// Per-frame logic attached to an actor.
pub trait Behaviour {
    fn update(&mut self, actor: &mut Actor, dt: f32);
}

impl<F: FnMut(&mut Actor, f32)> Behaviour for F {
    fn update(&mut self, actor: &mut Actor, dt: f32) {
        self(actor, dt)
    }
}

/// Delivered to an actor's collision callback when a collision starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub actor: ActorId,
    pub other: ActorId,
    /// Collider on the moving actor that took the hit.
    pub collider: ColliderId,
    pub other_collider: ColliderId,
    /// Translation applied to resolve the collision.
    pub displacement: Vector2<f32>,
}

type CollisionCallback = Box<dyn FnMut(&CollisionEvent)>;

pub struct Actor {
    id: ActorId,
    position: Vector2<f32>,
    prev_position: Vector2<f32>,
    pub body: Option<PhysicsBody>,
    pub colliders: Option<ColliderTree>,
    behaviour: Option<Box<dyn Behaviour>>,
    on_collide: Option<CollisionCallback>,
    despawn_requested: bool,
}

impl Actor {
    pub fn new(position: Vector2<f32>) -> Self {
        Actor {
            id: ActorId::default(),
            position,
            prev_position: position,
            body: None,
            colliders: None,
            behaviour: None,
            on_collide: None,
            despawn_requested: false,
        }
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_colliders(mut self, colliders: ColliderTree) -> Self {
        self.colliders = Some(colliders);
        self
    }

    pub fn with_behaviour(mut self, behaviour: impl Behaviour + 'static) -> Self {
        self.behaviour = Some(Box::new(behaviour));
        self
    }

    /// Called once each time this actor starts colliding while it moves.
    pub fn on_collide(mut self, callback: impl FnMut(&CollisionEvent) + 'static) -> Self {
        self.on_collide = Some(Box::new(callback));
        self
    }

    /// Assigned by the scene on spawn.
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ActorId) {
        self.id = id;
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position
    }

    /// Position at the start of the last physics step.
    pub fn prev_position(&self) -> Vector2<f32> {
        self.prev_position
    }

    /// Moves the actor without any interpolation or velocity carried over.
    pub fn set_position(&mut self, position: Vector2<f32>) {
        self.position = position;
        self.prev_position = position;
        if let Some(body) = self.body.as_mut() {
            body.reset_history();
        }
    }

    /// Blend between the last two physics positions for rendering.
    pub fn interpolated_position(&self, alpha: f32) -> Vector2<f32> {
        self.prev_position.lerp(&self.position, alpha)
    }

    /// Removal happens at the end of the current scene update.
    pub fn request_despawn(&mut self) {
        self.despawn_requested = true;
    }

    pub fn despawn_requested(&self) -> bool {
        self.despawn_requested
    }

    pub(crate) fn position_mut(&mut self) -> &mut Vector2<f32> {
        &mut self.position
    }

    pub(crate) fn snapshot_position(&mut self) {
        self.prev_position = self.position;
    }

    pub(crate) fn run_behaviour(&mut self, dt: f32) {
        if let Some(mut behaviour) = self.behaviour.take() {
            behaviour.update(self, dt);
            // A behaviour may install its own replacement.
            if self.behaviour.is_none() {
                self.behaviour = Some(behaviour);
            }
        }
    }

    pub(crate) fn notify_collision(&mut self, event: &CollisionEvent) {
        if let Some(callback) = self.on_collide.as_mut() {
            callback(event);
        }
    }
}

/// Shared handle stored in the scene's spatial index.
///
/// Equality is identity, so two handles compare equal only when they point
/// at the same actor.
#[derive(Clone)]
pub struct ActorHandle(Rc<RefCell<Actor>>);

impl ActorHandle {
    pub(crate) fn new(actor: Actor) -> Self {
        ActorHandle(Rc::new(RefCell::new(actor)))
    }

    pub fn borrow(&self) -> Ref<'_, Actor> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Actor> {
        self.0.borrow_mut()
    }

    pub fn id(&self) -> ActorId {
        self.0.borrow().id
    }
}

impl fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ActorHandle");
        match self.0.try_borrow() {
            Ok(actor) => out.field("id", &actor.id).field("position", &actor.position),
            Err(_) => out.field("borrowed", &true),
        };
        out.finish()
    }
}

impl PartialEq for ActorHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Positioned for ActorHandle {
    fn position(&self) -> Vector2<f32> {
        self.0.borrow().position
    }
}
