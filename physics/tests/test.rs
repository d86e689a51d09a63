use collisions::{BoxShape, ColliderTree};
use common::shapes::Rectangle;
use common::Vector2;
use physics::*;
use quadtree::QuadtreeError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn boxed(width: f32, height: f32) -> ColliderTree {
    ColliderTree::new(BoxShape::sized(width, height).unwrap())
}

fn body(config: BodyConfig) -> PhysicsBody {
    PhysicsBody::new(&config).unwrap()
}

fn weightless() -> BodyConfig {
    BodyConfig {
        gravity_enabled: false,
        ..BodyConfig::default()
    }
}

fn scene() -> Scene {
    Scene::new(SceneConfig::default()).unwrap()
}

fn spawn_static(scene: &mut Scene, position: Vector2<f32>, width: f32, height: f32) -> ActorHandle {
    scene.spawn(Actor::new(position).with_colliders(boxed(width, height)))
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_euler_step_moves_by_velocity() {
    let mut b = body(weightless());
    b.set_velocity(Vector2::new(100.0, 0.0));
    let mut position = Vector2::zeros();
    b.integrate(&mut position, 0.016);
    assert!(approx(position.x, 1.6));
    assert_eq!(position.y, 0.0);
    assert_eq!(b.velocity(), Vector2::new(100.0, 0.0));
}

#[test]
fn test_speed_clamped_to_max() {
    let mut b = body(BodyConfig {
        max_speed: 50.0,
        ..weightless()
    });
    b.set_velocity(Vector2::new(300.0, 400.0));
    let mut position = Vector2::zeros();
    b.integrate(&mut position, 0.1);
    assert!(approx(b.velocity().x, 30.0));
    assert!(approx(b.velocity().y, 40.0));
    assert!(approx(position.x, 3.0));
    assert!(approx(position.y, 4.0));
}

#[test]
fn test_slow_speed_snaps_to_zero() {
    let mut b = body(weightless());
    b.set_velocity(Vector2::new(0.001, 0.0));
    let mut position = Vector2::new(5.0, 5.0);
    b.integrate(&mut position, 0.1);
    assert_eq!(b.velocity(), Vector2::zeros());
    assert_eq!(position, Vector2::new(5.0, 5.0));
}

#[test]
fn test_verlet_keeps_set_velocity() {
    let mut b = body(BodyConfig {
        integrator: Integrator::Verlet,
        ..weightless()
    });
    b.set_velocity(Vector2::new(100.0, 0.0));
    let mut position = Vector2::zeros();
    b.integrate(&mut position, 0.016);
    assert!(approx(position.x, 1.6));
    assert!(approx(b.velocity().x, 100.0));

    b.integrate(&mut position, 0.016);
    assert!(approx(position.x, 3.2));
    assert!(approx(b.velocity().x, 100.0));
}

#[test]
fn test_verlet_accelerates_like_euler() {
    let mut b = body(BodyConfig {
        integrator: Integrator::Verlet,
        ..weightless()
    });
    let mut position = Vector2::zeros();
    for _ in 0..2 {
        b.apply_force(Vector2::new(0.0, 60.0));
        b.integrate(&mut position, 0.1);
    }
    assert!(approx(b.velocity().y, 12.0));
    assert!(approx(position.y, 1.8));
}

#[test]
fn test_landing_zeroes_only_vertical_velocity() {
    let mut scene = scene();
    spawn_static(&mut scene, Vector2::new(0.0, 14.0), 200.0, 10.0);
    let mut player = body(BodyConfig::default());
    player.set_velocity(Vector2::new(50.0, 120.0));
    let player = scene.spawn(
        Actor::new(Vector2::new(0.0, 4.0))
            .with_body(player)
            .with_colliders(boxed(10.0, 10.0)),
    );
    scene.flush_pending().unwrap();
    scene.physics_update().unwrap();

    let actor = player.borrow();
    let body = actor.body.as_ref().unwrap();
    assert_eq!(body.velocity(), Vector2::new(50.0, 0.0));
    assert!(body.on_ground());
    assert!(approx(actor.position().y, 4.0));
    assert!(actor.position().x > 0.0);
}

#[test]
fn test_wall_zeroes_only_horizontal_velocity() {
    let mut scene = scene();
    spawn_static(&mut scene, Vector2::new(20.0, 0.0), 10.0, 100.0);
    let mut player = body(weightless());
    player.set_velocity(Vector2::new(120.0, 30.0));
    let player = scene.spawn(
        Actor::new(Vector2::new(9.0, 0.0))
            .with_body(player)
            .with_colliders(boxed(10.0, 10.0)),
    );
    scene.flush_pending().unwrap();
    scene.physics_update().unwrap();

    let actor = player.borrow();
    let body = actor.body.as_ref().unwrap();
    assert_eq!(body.velocity(), Vector2::new(0.0, 30.0));
    assert!(!body.on_ground());
    assert!(approx(actor.position().x, 10.0));
}

#[test]
fn test_deepest_overlap_resolved_first() {
    let mut scene = scene();
    let below = spawn_static(&mut scene, Vector2::new(0.0, 8.0), 10.0, 10.0);
    spawn_static(&mut scene, Vector2::new(9.0, 0.0), 10.0, 10.0);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let player = scene.spawn(
        Actor::new(Vector2::zeros())
            .with_body(body(weightless()))
            .with_colliders(boxed(10.0, 10.0))
            .on_collide(move |event| sink.borrow_mut().push(*event)),
    );
    scene.flush_pending().unwrap();
    scene.physics_update().unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].other, below.id());
    assert_eq!(events[0].actor, player.id());
    assert_eq!(events[0].displacement, Vector2::new(0.0, -2.0));

    let actor = player.borrow();
    assert!(approx(actor.position().x, -1.0));
    assert!(approx(actor.position().y, -2.0));
    assert!(actor.body.as_ref().unwrap().on_ground());
}

#[test]
fn test_on_collide_fires_once_per_contact() {
    let mut scene = scene();
    spawn_static(&mut scene, Vector2::new(0.0, 14.0), 200.0, 10.0);
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let player = scene.spawn(
        Actor::new(Vector2::new(0.0, 4.0))
            .with_body(body(BodyConfig::default()))
            .with_colliders(boxed(10.0, 10.0))
            .on_collide(move |_| counter.set(counter.get() + 1)),
    );
    scene.flush_pending().unwrap();

    for _ in 0..5 {
        scene.physics_update().unwrap();
    }
    assert_eq!(hits.get(), 1);
    assert!(player.borrow().body.as_ref().unwrap().on_ground());

    player.borrow_mut().set_position(Vector2::new(0.0, -500.0));
    scene.physics_update().unwrap();
    assert_eq!(hits.get(), 1);
    assert!(!player.borrow().body.as_ref().unwrap().on_ground());

    player.borrow_mut().set_position(Vector2::new(0.0, 4.0));
    scene.physics_update().unwrap();
    assert_eq!(hits.get(), 2);
}

#[test]
fn test_missing_colliders_disable_collision_checks() {
    let mut scene = scene();
    spawn_static(&mut scene, Vector2::new(0.0, 0.0), 50.0, 50.0);
    let ghost = scene.spawn(Actor::new(Vector2::zeros()).with_body(body(BodyConfig::default())));
    scene.flush_pending().unwrap();

    scene.physics_update().unwrap();
    scene.physics_update().unwrap();
    let actor = ghost.borrow();
    assert!(!actor.body.as_ref().unwrap().collisions_enabled);
    assert!(actor.position().y > 0.0);
}

#[test]
fn test_disabled_body_does_not_move() {
    let mut scene = scene();
    let mut frozen = body(BodyConfig::default());
    frozen.enabled = false;
    frozen.set_velocity(Vector2::new(100.0, 0.0));
    let handle = scene.spawn(Actor::new(Vector2::new(3.0, 3.0)).with_body(frozen));
    scene.flush_pending().unwrap();
    scene.physics_update().unwrap();
    assert_eq!(handle.borrow().position(), Vector2::new(3.0, 3.0));
}

#[test]
fn test_spawn_and_despawn_are_deferred() {
    let mut scene = scene();
    let handle = scene.spawn(Actor::new(Vector2::new(1.0, 1.0)));
    assert_eq!(scene.len(), 0);
    assert_eq!(scene.closest_actor(Vector2::zeros()).unwrap(), None);

    scene.flush_pending().unwrap();
    assert_eq!(scene.len(), 1);
    assert!(scene.actor(handle.id()) == Some(&handle));

    scene.despawn(handle.id());
    scene.despawn(handle.id());
    assert_eq!(scene.len(), 1);
    scene.flush_pending().unwrap();
    assert!(scene.is_empty());
    assert_eq!(scene.closest_actor(Vector2::zeros()).unwrap(), None);

    scene.despawn(handle.id());
    scene.flush_pending().unwrap();
    assert!(scene.is_empty());
}

#[test]
fn test_spawn_outside_world_reported() {
    let mut scene = scene();
    scene.spawn(Actor::new(Vector2::new(50_000.0, 0.0)));
    let inside = scene.spawn(Actor::new(Vector2::new(10.0, 0.0)));
    let err = scene.flush_pending().unwrap_err();
    assert!(matches!(err, PhysicsError::Quadtree(QuadtreeError::OutOfRange { .. })));
    assert_eq!(scene.len(), 1);
    assert!(scene.actor(inside.id()).is_some());
}

#[test]
fn test_update_runs_behaviours_near_camera() {
    let mut scene = Scene::new(SceneConfig {
        simulation_distance: 100.0,
        ..SceneConfig::default()
    })
    .unwrap();
    let near_runs = Rc::new(Cell::new(0));
    let far_runs = Rc::new(Cell::new(0));
    let near_counter = Rc::clone(&near_runs);
    let far_counter = Rc::clone(&far_runs);
    scene.spawn(
        Actor::new(Vector2::new(10.0, 0.0))
            .with_behaviour(move |_: &mut Actor, _: f32| near_counter.set(near_counter.get() + 1)),
    );
    scene.spawn(
        Actor::new(Vector2::new(500.0, 0.0))
            .with_behaviour(move |_: &mut Actor, _: f32| far_counter.set(far_counter.get() + 1)),
    );
    scene.flush_pending().unwrap();

    scene.update(0.016).unwrap();
    assert_eq!(near_runs.get(), 1);
    assert_eq!(far_runs.get(), 0);

    scene.set_camera(Vector2::new(450.0, 0.0));
    scene.update(0.016).unwrap();
    assert_eq!(near_runs.get(), 1);
    assert_eq!(far_runs.get(), 1);
}

#[test]
fn test_behaviour_can_despawn_its_actor() {
    let mut scene = scene();
    let doomed = scene.spawn(Actor::new(Vector2::new(5.0, 5.0)).with_behaviour(
        |actor: &mut Actor, _: f32| actor.request_despawn(),
    ));
    scene.spawn(Actor::new(Vector2::new(-5.0, 5.0)));
    scene.flush_pending().unwrap();

    scene.update(0.016).unwrap();
    assert_eq!(scene.len(), 1);
    assert!(scene.actor(doomed.id()).is_none());
}

#[test]
fn test_update_keeps_moved_actors_findable() {
    let mut scene = Scene::new(SceneConfig {
        quadtree: quadtree::Config {
            node_capacity: 1,
            ..quadtree::Config::default()
        },
        ..SceneConfig::default()
    })
    .unwrap();
    let runner = scene.spawn(Actor::new(Vector2::new(10.0, 10.0)).with_behaviour(
        |actor: &mut Actor, _: f32| {
            let p = actor.position() + Vector2::new(-300.0, -300.0);
            actor.set_position(p);
        },
    ));
    for i in 0..8 {
        scene.spawn(Actor::new(Vector2::new(400.0 + i as f32 * 50.0, 400.0)));
    }
    scene.flush_pending().unwrap();

    for _ in 0..3 {
        scene.update(0.016).unwrap();
    }
    assert_eq!(runner.borrow().position(), Vector2::new(-890.0, -890.0));
    let closest = scene.closest_actor(Vector2::new(-890.0, -890.0)).unwrap();
    assert!(closest == Some(runner.clone()));
    scene.despawn(runner.id());
    scene.flush_pending().unwrap();
    assert_eq!(scene.len(), 8);
}

#[test]
fn test_advance_interpolates_between_steps() {
    let mut scene = Scene::new(SceneConfig {
        fixed_timestep: 0.1,
        ..SceneConfig::default()
    })
    .unwrap();
    let mut mover = body(weightless());
    mover.set_velocity(Vector2::new(10.0, 0.0));
    let handle = scene.spawn(Actor::new(Vector2::zeros()).with_body(mover));
    scene.flush_pending().unwrap();

    let steps = scene.advance(0.25).unwrap();
    assert_eq!(steps, 2);
    let alpha = scene.interpolation_alpha();
    assert!(approx(alpha, 0.5));

    let actor = handle.borrow();
    assert!(approx(actor.position().x, 2.0));
    assert!(approx(actor.prev_position().x, 1.0));
    assert!(approx(actor.interpolated_position(alpha).x, 1.5));
}

#[test]
fn test_advance_caps_catch_up_steps() {
    let mut scene = Scene::new(SceneConfig {
        fixed_timestep: 0.1,
        max_physics_steps: 2,
        ..SceneConfig::default()
    })
    .unwrap();
    assert_eq!(scene.advance(1.0).unwrap(), 2);
    let alpha = scene.interpolation_alpha();
    assert!((0.0..1.0).contains(&alpha));
    assert!(scene.advance(0.05).unwrap() <= 1);
}

#[test]
fn test_rejects_bad_timestep() {
    let config = SceneConfig {
        fixed_timestep: 0.0,
        ..SceneConfig::default()
    };
    assert_eq!(Scene::new(config).err(), Some(PhysicsError::InvalidTimestep(0.0)));
}

#[test]
fn test_visible_actors_and_closest() {
    let mut scene = scene();
    let a = scene.spawn(Actor::new(Vector2::new(0.0, 0.0)));
    let b = scene.spawn(Actor::new(Vector2::new(50.0, 50.0)));
    let c = scene.spawn(Actor::new(Vector2::new(500.0, 500.0)));
    scene.flush_pending().unwrap();

    let mut visible = Vec::new();
    scene
        .visible_actors(&Rectangle::new(0.0, 0.0, 200.0, 200.0), &mut visible)
        .unwrap();
    let mut ids: Vec<_> = visible.iter().map(|h| h.id()).collect();
    ids.sort();
    assert_eq!(ids, vec![a.id(), b.id()]);

    let mut near = Vec::new();
    scene.actors_near(Vector2::new(480.0, 480.0), 40.0, &mut near).unwrap();
    assert!(near == vec![c.clone()]);

    assert!(scene.closest_actor(Vector2::new(400.0, 400.0)).unwrap() == Some(c));
}

#[test]
fn test_debug_collider_bounds() {
    let mut scene = scene();
    let floor = spawn_static(&mut scene, Vector2::new(0.0, 14.0), 200.0, 10.0);
    scene.spawn(Actor::new(Vector2::new(30.0, 30.0)));
    scene.flush_pending().unwrap();

    let mut bounds = Vec::new();
    scene.debug_collider_bounds(&mut bounds);
    assert_eq!(bounds.len(), 1);
    let (owner, _, aabb) = bounds[0];
    assert_eq!(owner, floor.id());
    assert_eq!(aabb.mins.x, -100.0);
    assert_eq!(aabb.mins.y, 9.0);

    let mut nodes = Vec::new();
    scene.debug_node_bounds(&mut nodes);
    assert_eq!(nodes[0], scene.config().world_bounds());
}

#[test]
fn test_config_from_json() {
    let config: SceneConfig =
        serde_json::from_str(r#"{"gravity": 500.0, "quadtree": {"node_capacity": 8}}"#).unwrap();
    assert_eq!(config.gravity, 500.0);
    assert_eq!(config.quadtree.node_capacity, 8);
    assert_eq!(config.quadtree.max_depth, 16);
    assert_eq!(config.max_physics_steps, 5);

    let body: BodyConfig = serde_json::from_str(r#"{"integrator": "verlet", "mass": 2.0}"#).unwrap();
    assert_eq!(body.integrator, Integrator::Verlet);
    assert_eq!(body.mass, 2.0);
    assert!(body.collisions_enabled);
}
