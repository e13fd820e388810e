use std::sync::Arc;

use vizij_tween_core::{
    step::PositionTargets, EntityId, MemoryWorld, Position, Step, StepKind, TweenEngine,
    TweenEvent,
};

fn steps(list: Vec<Step>) -> Arc<[Step]> {
    list.into()
}

fn run(engine: &mut TweenEngine, world: &mut MemoryWorld, n: usize) -> Vec<TweenEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(engine.update(0.25, world).unwrap().events.iter().cloned());
    }
    events
}

fn spawn_step(function: &str, config: Option<&str>) -> Step {
    Step::new(StepKind::SpawnEntity {
        function: function.to_string(),
        config: config.map(str::to_string),
    })
}

fn with_place_function(world: &mut MemoryWorld) {
    world.register_function("place", |w, e, cfg| {
        let x: f32 = cfg
            .unwrap_or("0")
            .parse()
            .map_err(|err| format!("bad config: {err}"))?;
        w.insert(e, Position::at(x, 0.0));
        Ok(())
    });
}

/// it should create a fresh entity and configure it through the named function
#[test]
fn spawn_entity_runs_config_function() {
    let mut world = MemoryWorld::new();
    with_place_function(&mut world);
    let owner = world.spawn();
    let mut engine = TweenEngine::default();
    engine.start_steps(owner, steps(vec![spawn_step("place", Some("7.5"))]));

    let events = run(&mut engine, &mut world, 1);
    let spawned: Vec<EntityId> = events
        .iter()
        .filter_map(|ev| match ev {
            TweenEvent::EntitySpawned { entity } => Some(*entity),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    assert_eq!(world.get::<Position>(spawned[0]).unwrap().x, 7.5);
    assert_eq!(engine.script_count(), 0);
}

/// it should report a failed configuration and still continue the script
#[test]
fn failed_config_is_reported_not_fatal() {
    let mut world = MemoryWorld::new();
    with_place_function(&mut world);
    let owner = world.spawn();
    world.insert(owner, Position::default());
    let mut engine = TweenEngine::default();
    engine.start_steps(
        owner,
        steps(vec![
            spawn_step("missing", None),
            Step::new(StepKind::ExecuteConfigFunction {
                function: "place".into(),
                config: Some("not a number".into()),
            }),
            Step::new(StepKind::Position(PositionTargets {
                y: Some(2.0),
                ..Default::default()
            })),
        ]),
    );
    let events = run(&mut engine, &mut world, 1);
    let failures = events
        .iter()
        .filter(|ev| matches!(ev, TweenEvent::SideEffectFailed { .. }))
        .count();
    assert_eq!(failures, 2);
    assert_eq!(world.get::<Position>(owner).unwrap().y, 2.0);
}

/// it should run a config function on the owner when no target is given
#[test]
fn execute_config_defaults_to_owner() {
    let mut world = MemoryWorld::new();
    with_place_function(&mut world);
    let owner = world.spawn();
    let mut engine = TweenEngine::default();
    engine.start_steps(
        owner,
        steps(vec![Step::new(StepKind::ExecuteConfigFunction {
            function: "place".into(),
            config: Some("3".into()),
        })
        .with_delay(0.5)]),
    );
    run(&mut engine, &mut world, 1);
    assert!(world.get::<Position>(owner).is_none());
    run(&mut engine, &mut world, 1);
    assert_eq!(world.get::<Position>(owner).unwrap().x, 3.0);
}

/// it should delete another entity and release its running animations
#[test]
fn delete_entity_releases_animations() {
    let mut world = MemoryWorld::new();
    let owner = world.spawn();
    let victim = world.spawn();
    world.insert(victim, Position::default());

    let mut engine = TweenEngine::default();
    engine.start_steps(
        victim,
        steps(vec![Step::new(StepKind::Position(PositionTargets {
            x: Some(10.0),
            ..Default::default()
        }))
        .with_duration(5.0)]),
    );
    engine.start_steps(
        owner,
        steps(vec![
            Step::wait(0.5),
            Step::new(StepKind::DeleteEntity).with_target(victim),
        ]),
    );

    run(&mut engine, &mut world, 1);
    assert_eq!(engine.animations_on(victim).count(), 1);
    let events = run(&mut engine, &mut world, 1);
    assert!(events.contains(&TweenEvent::EntityDeleted { entity: victim }));
    assert!(!world.contains(victim));
    assert_eq!(engine.animation_count(), 0);

    // The victim's own script notices on its next tick.
    let events = run(&mut engine, &mut world, 1);
    assert!(events
        .iter()
        .any(|ev| matches!(ev, TweenEvent::ScriptCancelled { owner, .. } if *owner == victim)));
    assert_eq!(engine.script_count(), 0);
}

/// it should stop a script that deletes its own owner
#[test]
fn deleting_own_owner_cancels() {
    let mut world = MemoryWorld::new();
    let owner = world.spawn();
    world.insert(owner, Position::default());
    let mut engine = TweenEngine::default();
    let id = engine.start_steps(
        owner,
        steps(vec![
            Step::new(StepKind::DeleteEntity),
            Step::new(StepKind::Position(PositionTargets {
                x: Some(1.0),
                ..Default::default()
            })),
        ]),
    );
    let events = run(&mut engine, &mut world, 1);
    assert!(events.contains(&TweenEvent::ScriptCancelled { script: id, owner }));
    assert!(world.is_empty());
    assert_eq!(engine.animation_count(), 0);
}

/// it should refuse to delete an entity that no longer exists
#[test]
fn delete_of_dead_entity_fails_softly() {
    let mut world = MemoryWorld::new();
    let owner = world.spawn();
    let gone = world.spawn();
    world.despawn(gone);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        owner,
        steps(vec![Step::new(StepKind::DeleteEntity).with_target(gone)]),
    );
    let events = run(&mut engine, &mut world, 1);
    assert!(events.iter().any(|ev| matches!(
        ev,
        TweenEvent::SideEffectFailed { entity, .. } if *entity == gone
    )));
    assert!(world.contains(owner));
    assert_eq!(engine.script_count(), 0);
}

/// it should forget everything tied to an entity released by the host
#[test]
fn release_entity_drops_scripts_and_animations() {
    let mut world = MemoryWorld::new();
    let e = world.spawn();
    world.insert(e, Position::default());
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![Step::new(StepKind::Position(PositionTargets {
            x: Some(1.0),
            ..Default::default()
        }))
        .with_duration(2.0)]),
    );
    run(&mut engine, &mut world, 1);
    assert_eq!(engine.release_entity(e), 2);
    assert_eq!(engine.script_count(), 0);
    assert_eq!(engine.animation_count(), 0);
    engine.check_pools().unwrap();
}
