use crate::actor::{ActorHandle, CollisionEvent};
use crate::error::PhysicsResult;
use common::Vector2;
use quadtree::{Quadtree, QuadtreeError};
use tracing::{debug, warn};

/// Maximum push-out passes per actor per physics step.
pub const COLLISION_ITERATIONS: usize = 3;
/// Added to a mover's bounding diagonal when gathering candidates.
pub const QUERY_MARGIN: f32 = 1.0;

pub(crate) struct StepContext<'a> {
    pub tree: &'a Quadtree<ActorHandle>,
    pub gravity: f32,
    pub dt: f32,
}

/// One physics step for one actor: integrate, then push out of overlaps.
pub(crate) fn physics_step(
    handle: &ActorHandle,
    ctx: &StepContext<'_>,
    candidates: &mut Vec<ActorHandle>,
) -> PhysicsResult<()> {
    let check_collisions = {
        let mut actor = handle.borrow_mut();
        actor.snapshot_position();
        let id = actor.id();
        let mut position = actor.position();
        let has_colliders = actor.colliders.is_some();
        let Some(body) = actor.body.as_mut() else {
            return Ok(());
        };
        if !body.enabled {
            return Ok(());
        }
        body.apply_gravity(ctx.gravity);
        body.integrate(&mut position, ctx.dt);
        if body.collisions_enabled && !has_colliders {
            warn!(actor = id.0, "collisions enabled on an actor without colliders; disabling");
            body.collisions_enabled = false;
        }
        let check = body.collisions_enabled;
        *actor.position_mut() = position;
        check
    };

    if check_collisions {
        correct_collisions(handle, ctx.tree, candidates)?;
    }

    if let Some(body) = handle.borrow_mut().body.as_mut() {
        body.apply_friction();
    }
    Ok(())
}

struct Resolution {
    area: f32,
    event: CollisionEvent,
}

/// Finds the single worst overlap around the mover, or `None` when clear.
fn deepest_overlap(handle: &ActorHandle, candidates: &[ActorHandle]) -> Option<Resolution> {
    let mover = handle.borrow();
    let mover_placed = mover.colliders.as_ref()?.at(mover.position());
    let mut best: Option<Resolution> = None;

    for candidate in candidates {
        if candidate == handle {
            continue;
        }
        let other = candidate.borrow();
        if other.body.as_ref().is_some_and(|body| !body.collisions_enabled) {
            continue;
        }
        let Some(other_colliders) = other.colliders.as_ref() else {
            continue;
        };
        let other_placed = other_colliders.at(other.position());
        let Some(theirs) = other_placed.most_specific_colliding_child(&mover_placed) else {
            continue;
        };
        let Some(mine) = mover_placed.most_specific_colliding_child(&theirs) else {
            continue;
        };
        let area = mine.overlap_area(&theirs);
        if best.as_ref().map_or(true, |best| area > best.area) {
            best = Some(Resolution {
                area,
                event: CollisionEvent {
                    actor: mover.id(),
                    other: other.id(),
                    collider: mine.id(),
                    other_collider: theirs.id(),
                    displacement: mine.displacement_vector(&theirs),
                },
            });
        }
    }
    best
}

fn correct_collisions(
    handle: &ActorHandle,
    tree: &Quadtree<ActorHandle>,
    candidates: &mut Vec<ActorHandle>,
) -> PhysicsResult<()> {
    let mut first_event: Option<CollisionEvent> = None;
    let mut on_ground = false;

    for _ in 0..COLLISION_ITERATIONS {
        let (position, radius) = {
            let actor = handle.borrow();
            let Some(colliders) = actor.colliders.as_ref() else {
                return Ok(());
            };
            let bounds = colliders.at(actor.position()).bounds();
            (actor.position(), bounds.extents().norm() + QUERY_MARGIN)
        };

        candidates.clear();
        match tree.query_circle(position, radius, false, candidates) {
            Ok(()) => {}
            Err(QuadtreeError::OutOfRange { .. }) => {
                debug!(actor = handle.id().0, "actor left the world; skipping collisions");
                break;
            }
            Err(err) => return Err(err.into()),
        }

        let Some(resolution) = deepest_overlap(handle, candidates) else {
            break;
        };
        let displacement = resolution.event.displacement;
        if displacement == Vector2::zeros() {
            break;
        }
        first_event.get_or_insert(resolution.event);

        let mut actor = handle.borrow_mut();
        *actor.position_mut() += displacement;
        if let Some(body) = actor.body.as_mut() {
            let mut velocity = body.velocity();
            if displacement.x != 0.0 {
                velocity.x = 0.0;
            }
            if displacement.y != 0.0 {
                velocity.y = 0.0;
            }
            body.set_velocity(velocity);
        }
        if displacement.y < 0.0 {
            on_ground = true;
        }
    }
    candidates.clear();

    let mut actor = handle.borrow_mut();
    let started = match actor.body.as_mut() {
        Some(body) => {
            body.set_on_ground(on_ground);
            body.begin_contact(first_event.is_some())
        }
        None => false,
    };
    if let (true, Some(event)) = (started, first_event) {
        actor.notify_collision(&event);
    }
    Ok(())
}
