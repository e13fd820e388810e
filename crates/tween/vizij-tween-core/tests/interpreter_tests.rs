use std::sync::Arc;

use vizij_tween_core::{
    step::{ColorTargets, PositionTargets},
    Config, EntityId, Easing, MemoryWorld, Position, Step, StepKind, Tint, TweenEngine,
    TweenError, TweenEvent,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn move_x(x: f32) -> Step {
    Step::new(StepKind::Position(PositionTargets {
        x: Some(x),
        ..Default::default()
    }))
}

fn move_y(y: f32) -> Step {
    Step::new(StepKind::Position(PositionTargets {
        y: Some(y),
        ..Default::default()
    }))
}

fn fade(alpha: f32) -> Step {
    Step::new(StepKind::Color(ColorTargets {
        alpha: Some(alpha),
        ..Default::default()
    }))
}

fn steps(list: Vec<Step>) -> Arc<[Step]> {
    list.into()
}

fn spawn_at(world: &mut MemoryWorld, x: f32) -> EntityId {
    let e = world.spawn();
    world.insert(e, Position::at(x, 0.0));
    e
}

fn x_of(world: &MemoryWorld, e: EntityId) -> f32 {
    world.get::<Position>(e).unwrap().x
}

/// Run `n` ticks, collecting every event.
fn run(engine: &mut TweenEngine, world: &mut MemoryWorld, dt: f32, n: usize) -> Vec<TweenEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        let out = engine.update(dt, world).unwrap();
        events.extend(out.events.iter().cloned());
    }
    events
}

fn scenario_a(dt: f32) {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    let id = engine.start_steps(
        e,
        steps(vec![
            Step::wait(1.0),
            move_x(100.0).with_duration(2.0).with_easing(Easing::Linear),
        ]),
    );
    let per_second = (1.0 / dt) as usize;

    run(&mut engine, &mut world, dt, per_second);
    approx(x_of(&world, e), 0.0, 1e-6);
    assert!(engine.script(id).is_some());

    run(&mut engine, &mut world, dt, per_second);
    approx(x_of(&world, e), 50.0, 1e-4);

    let events = run(&mut engine, &mut world, dt, per_second);
    approx(x_of(&world, e), 100.0, 1e-6);
    assert!(engine.script(id).is_none());
    assert!(events.contains(&TweenEvent::ScriptFinished { script: id, owner: e }));
    assert_eq!(engine.animation_count(), 0);
}

/// it should hold x through the wait, reach the midpoint at t=2 and finish at t=3
#[test]
fn wait_then_linear_move() {
    scenario_a(0.25);
}

/// it should hit the same values at a coarser frame rate
#[test]
fn wait_then_linear_move_at_half_second_frames() {
    scenario_a(0.5);
}

/// it should run the parallel fade and the delayed move in lock-step, the latter on its own branch
#[test]
fn parallel_group_with_delayed_child() {
    let mut world = MemoryWorld::new();
    let a = world.spawn();
    world.insert(a, Tint::default());
    let b = spawn_at(&mut world, 0.0);

    let mut engine = TweenEngine::default();
    let id = engine.start_steps(
        a,
        steps(vec![Step::parallel(vec![
            fade(0.0),
            move_x(10.0).with_target(b).with_delay(0.5).with_duration(0.5),
        ])
        .with_duration(1.0)]),
    );

    let first = run(&mut engine, &mut world, 0.25, 1);
    let forked = first.iter().any(|ev| {
        matches!(ev, TweenEvent::BranchForked { parent, .. } if *parent == id)
    });
    assert!(forked, "delayed child should fork: {first:?}");
    assert_eq!(engine.script_count(), 2);
    approx(world.get::<Tint>(a).unwrap().alpha, 0.75, 1e-6);
    approx(x_of(&world, b), 0.0, 1e-6);

    run(&mut engine, &mut world, 0.25, 1);
    // t = 0.5: the delayed move has just started.
    approx(x_of(&world, b), 0.0, 1e-6);
    approx(world.get::<Tint>(a).unwrap().alpha, 0.5, 1e-6);

    run(&mut engine, &mut world, 0.25, 1);
    approx(x_of(&world, b), 5.0, 1e-5);

    run(&mut engine, &mut world, 0.25, 1);
    approx(world.get::<Tint>(a).unwrap().alpha, 0.0, 1e-6);
    approx(x_of(&world, b), 10.0, 1e-6);

    // Both branches done; the carrier entity is gone again.
    assert_eq!(engine.script_count(), 0);
    assert_eq!(world.len(), 2);
    engine.check_pools().unwrap();
}

/// it should let the parent continue immediately while the sub-script runs on a carrier
#[test]
fn sub_script_forks_and_cleans_up_carrier() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![
            Step::sub_script(vec![Step::wait(1.0), move_x(10.0)]),
            move_y(3.0),
        ]),
    );

    run(&mut engine, &mut world, 0.25, 1);
    assert_eq!(world.get::<Position>(e).unwrap().y, 3.0);
    approx(x_of(&world, e), 0.0, 1e-6);
    assert_eq!(world.len(), 2, "carrier entity should exist while the branch runs");
    assert_eq!(engine.script_count(), 1);

    run(&mut engine, &mut world, 0.25, 2);
    approx(x_of(&world, e), 0.0, 1e-6);

    run(&mut engine, &mut world, 0.25, 1);
    approx(x_of(&world, e), 10.0, 1e-6);
    assert_eq!(engine.script_count(), 0);
    assert_eq!(world.len(), 1);
}

/// it should skip forward over steps and finish when jumping past the end
#[test]
fn jump_forward_skips_steps() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![Step::jump(2), move_x(100.0), move_y(5.0)]),
    );
    run(&mut engine, &mut world, 0.25, 1);
    let p = world.get::<Position>(e).unwrap();
    assert_eq!(p.x, 0.0);
    assert_eq!(p.y, 5.0);
    assert_eq!(engine.script_count(), 0);

    let mut engine = TweenEngine::default();
    let id = engine.start_steps(e, steps(vec![Step::jump(7), move_x(100.0)]));
    let events = run(&mut engine, &mut world, 0.25, 1);
    assert!(events.contains(&TweenEvent::ScriptFinished { script: id, owner: e }));
    assert_eq!(x_of(&world, e), 0.0);
}

/// it should loop on a backward jump and honor the jump's own duration
#[test]
fn jump_backward_loops() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    let id = engine.start_steps(
        e,
        steps(vec![
            move_x(1.0).with_duration(0.5),
            move_x(0.0).with_duration(0.5),
            Step::jump(-2),
        ]),
    );
    // One full cycle is 1s; sample the peak of the third cycle.
    run(&mut engine, &mut world, 0.25, 10);
    approx(x_of(&world, e), 1.0, 1e-6);
    run(&mut engine, &mut world, 0.25, 2);
    approx(x_of(&world, e), 0.0, 1e-6);
    assert!(engine.script(id).is_some());
}

/// it should cap zero-time loops at max_steps_per_tick and keep running next tick
#[test]
fn zero_time_loop_is_bounded() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::new(Config {
        max_steps_per_tick: 4,
        ..Config::default()
    });
    let id = engine.start_steps(e, steps(vec![move_x(1.0), Step::jump(-1)]));
    run(&mut engine, &mut world, 0.25, 3);
    assert!(engine.script(id).is_some());
    assert_eq!(x_of(&world, e), 1.0);
}

/// it should snap zero-duration mutations on the tick they fire
#[test]
fn zero_duration_snaps() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(e, steps(vec![move_x(10.0), move_y(-2.0).with_delay(0.5)]));
    run(&mut engine, &mut world, 0.25, 1);
    assert_eq!(x_of(&world, e), 10.0);
    assert_eq!(world.get::<Position>(e).unwrap().y, 0.0);
    run(&mut engine, &mut world, 0.25, 1);
    assert_eq!(world.get::<Position>(e).unwrap().y, -2.0);
    assert_eq!(engine.script_count(), 0);
    assert_eq!(engine.animation_count(), 0);
}

/// it should skip a mutation whose component is missing and keep going
#[test]
fn missing_component_is_skipped() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(e, steps(vec![fade(0.0).with_duration(1.0), move_x(4.0)]));
    let events = run(&mut engine, &mut world, 0.25, 5);
    assert!(events.iter().any(|ev| matches!(
        ev,
        TweenEvent::MutationSkipped { entity, .. } if *entity == e
    )));
    assert_eq!(x_of(&world, e), 4.0);
    assert_eq!(engine.script_count(), 0);
}

/// it should cancel the instance when its owner disappears mid-script
#[test]
fn deleting_owner_cancels_script() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    let id = engine.start_steps(e, steps(vec![move_x(10.0).with_duration(2.0), move_y(1.0)]));
    run(&mut engine, &mut world, 0.25, 2);
    assert_eq!(engine.animation_count(), 1);

    world.despawn(e);
    let events = run(&mut engine, &mut world, 0.25, 1);
    assert!(events.contains(&TweenEvent::ScriptCancelled { script: id, owner: e }));
    assert_eq!(engine.script_count(), 0);
    assert_eq!(engine.animation_count(), 0);
    engine.check_pools().unwrap();
}

/// it should drop an animation whose target was deleted by someone else
#[test]
fn deleting_target_drops_animation() {
    let mut world = MemoryWorld::new();
    let owner = world.spawn();
    let other = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        owner,
        steps(vec![move_x(10.0).with_target(other).with_duration(2.0)]),
    );
    run(&mut engine, &mut world, 0.25, 1);
    world.despawn(other);
    let events = run(&mut engine, &mut world, 0.25, 1);
    assert!(events.iter().any(|ev| matches!(
        ev,
        TweenEvent::AnimationDropped { entity, .. } if *entity == other
    )));
    assert_eq!(engine.animation_count(), 0);
    // The script itself keeps waiting out the step duration.
    assert_eq!(engine.script_count(), 1);
}

/// it should skip sub-scripts and jumps placed directly in a parallel group
#[test]
fn unsupported_parallel_children_are_skipped() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![Step::parallel(vec![
            Step::sub_script(vec![move_y(9.0)]),
            Step::jump(1),
            Step::sub_script(vec![move_y(42.0)]).with_delay(0.25),
            Step::jump(1).with_delay(0.25),
            move_x(1.0),
        ])]),
    );
    // Delayed variants are skipped too rather than forked.
    let events = run(&mut engine, &mut world, 0.25, 8);
    let skipped = events
        .iter()
        .filter(|ev| matches!(ev, TweenEvent::StepSkipped { .. }))
        .count();
    assert_eq!(skipped, 4);
    assert!(!events
        .iter()
        .any(|ev| matches!(ev, TweenEvent::BranchForked { .. })));
    let p = world.get::<Position>(e).unwrap();
    assert_eq!((p.x, p.y), (1.0, 0.0));
}

/// it should delete a forked branch's carrier when the branch is stopped
#[test]
fn stopping_a_forked_branch_deletes_its_carrier() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let before = world.len();
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![Step::parallel(vec![move_x(10.0).with_delay(5.0)])]),
    );
    let events = run(&mut engine, &mut world, 0.25, 1);
    let (fork, carrier) = events
        .iter()
        .find_map(|ev| match ev {
            TweenEvent::BranchForked { script, carrier, .. } => Some((*script, *carrier)),
            _ => None,
        })
        .unwrap();
    assert_eq!(world.len(), before + 1);

    assert!(engine.stop(fork, &mut world));
    assert!(!world.contains(carrier));
    assert_eq!(world.len(), before);

    run(&mut engine, &mut world, 0.25, 40);
    assert_eq!(engine.script_count(), 0);
    assert_eq!(world.len(), before);
    assert_eq!(x_of(&world, e), 0.0);
}

/// it should fail the tick when an unrecognized step reaches dispatch
#[test]
fn unrecognized_step_is_fatal() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![
            Step::wait(0.0),
            Step::parallel(vec![move_x(1.0), Step::new(StepKind::Unrecognized)]),
        ]),
    );
    match engine.update(0.25, &mut world) {
        Err(TweenError::UnrecognizedStep { path, owner }) => {
            assert_eq!(path, "steps[1].steps[1]");
            assert_eq!(owner, e);
        }
        other => panic!("expected fatal error, got {other:?}"),
    }
}

/// it should rebase a running animation when a new step targets the same field
#[test]
fn overwrite_rebases_from_current_value() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(e, steps(vec![move_x(100.0).with_duration(1.0)]));
    run(&mut engine, &mut world, 0.5, 1);
    approx(x_of(&world, e), 50.0, 1e-5);

    engine.start_steps(e, steps(vec![move_x(0.0).with_duration(1.0)]));
    run(&mut engine, &mut world, 0.5, 1);
    assert_eq!(engine.animations_on(e).count(), 1);
    approx(x_of(&world, e), 25.0, 1e-5);

    run(&mut engine, &mut world, 0.5, 1);
    approx(x_of(&world, e), 0.0, 1e-6);
    run(&mut engine, &mut world, 0.5, 1);
    assert_eq!(engine.animation_count(), 0);
    assert_eq!(engine.script_count(), 0);
}

/// it should let later siblings in a group win the shared slot
#[test]
fn last_sibling_wins_shared_slot() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![Step::parallel(vec![move_x(10.0), move_x(-10.0)]).with_duration(1.0)]),
    );
    run(&mut engine, &mut world, 0.5, 1);
    assert_eq!(engine.animations_on(e).count(), 1);
    approx(x_of(&world, e), -5.0, 1e-5);
}

/// it should inherit duration and easing from the group but not its delay
#[test]
fn group_defaults_reach_children() {
    let mut world = MemoryWorld::new();
    let e = spawn_at(&mut world, 0.0);
    let mut engine = TweenEngine::default();
    engine.start_steps(
        e,
        steps(vec![Step::parallel(vec![move_x(100.0)])
            .with_duration(1.0)
            .with_easing(Easing::EaseIn)
            .with_delay(0.5)]),
    );
    run(&mut engine, &mut world, 0.25, 1);
    assert_eq!(engine.animation_count(), 0);
    run(&mut engine, &mut world, 0.25, 1);
    let anim = engine
        .animation(e, vizij_tween_core::PropertyId::PositionX)
        .expect("animation running");
    assert_eq!(anim.duration, 1.0);
    assert_eq!(anim.easing, Easing::EaseIn);
    run(&mut engine, &mut world, 0.25, 2);
    approx(x_of(&world, e), 25.0, 1e-4);
}
