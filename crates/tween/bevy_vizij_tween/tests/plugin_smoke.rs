use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_vizij_tween::{
    entity_id, start_script, Animated, ConfigFunctions, FixedDt, PlayTween, TweenEvents,
    VizijTweenEngine, VizijTweenPlugin,
};
use serde_json::json;
use vizij_tween_core::{parse_script_json, Position, Script, Step, StepKind, Tint, TweenEvent};

fn app_with_plugin(dt: f32) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(VizijTweenPlugin::default());
    app.world_mut().insert_resource(FixedDt(dt));
    app
}

fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn events(app: &App) -> Vec<TweenEvent> {
    app.world().resource::<TweenEvents>().events.clone()
}

#[test]
fn plugin_inserts_engine_resource() {
    let mut app = App::new();
    // it should insert the engine and staging resources when the plugin is added
    app.add_plugins(MinimalPlugins)
        .add_plugins(VizijTweenPlugin::default());

    assert!(app.world().get_resource::<VizijTweenEngine>().is_some());
    assert!(app.world().get_resource::<ConfigFunctions>().is_some());
    assert!(app.world().get_resource::<TweenEvents>().is_some());
}

/// it should start a requested script and drive an Animated<Position> on FixedUpdate
#[test]
fn fixed_update_drives_requested_script() {
    let mut app = app_with_plugin(0.25);
    let script = parse_script_json(
        &json!({
            "name": "slide",
            "steps": [
                { "type": "wait", "duration": 0.5 },
                { "type": "position", "x": 8.0, "duration": 1.0 }
            ]
        })
        .to_string(),
    )
    .unwrap();
    let e = app
        .world_mut()
        .spawn((Animated(Position::default()), PlayTween(script)))
        .id();

    tick(&mut app, 4);
    assert!(app.world().get::<PlayTween>(e).is_none());
    assert_eq!(app.world().get::<Animated<Position>>(e).unwrap().0.x, 4.0);

    tick(&mut app, 2);
    assert_eq!(app.world().get::<Animated<Position>>(e).unwrap().0.x, 8.0);
    assert!(events(&app)
        .iter()
        .any(|ev| matches!(ev, TweenEvent::ScriptFinished { owner, .. } if *owner == entity_id(e))));
    assert_eq!(app.world().resource::<VizijTweenEngine>().0.script_count(), 0);
}

fn make_red_box(world: &mut World, entity: Entity, _config: Option<&str>) -> Result<(), String> {
    world.entity_mut(entity).insert(Animated(Tint {
        color: [1.0, 0.0, 0.0, 1.0],
        alpha: 1.0,
    }));
    Ok(())
}

/// it should spawn entities through registered config functions
#[test]
fn spawn_entity_uses_config_functions() {
    let mut app = app_with_plugin(0.25);
    app.world_mut()
        .resource_mut::<ConfigFunctions>()
        .register("red_box", make_red_box);
    let owner = app.world_mut().spawn_empty().id();
    let script = Script::new(
        "spawner",
        vec![Step::new(StepKind::SpawnEntity {
            function: "red_box".into(),
            config: None,
        })],
    );
    start_script(app.world_mut(), owner, &script).unwrap();

    tick(&mut app, 1);
    let mut q = app.world_mut().query::<&Animated<Tint>>();
    let tints: Vec<[f32; 4]> = q.iter(app.world()).map(|t| t.0.color).collect();
    assert_eq!(tints, vec![[1.0, 0.0, 0.0, 1.0]]);
    assert!(events(&app)
        .iter()
        .any(|ev| matches!(ev, TweenEvent::EntitySpawned { .. })));
}

/// it should cancel scripts whose owner was despawned by gameplay code
#[test]
fn despawned_owner_cancels_script() {
    let mut app = app_with_plugin(0.25);
    let script = Script::new(
        "long",
        vec![Step::new(StepKind::Position(Default::default())).with_duration(10.0)],
    );
    let e = app.world_mut().spawn(Animated(Position::default())).id();
    start_script(app.world_mut(), e, &script).unwrap();
    tick(&mut app, 1);
    app.world_mut().despawn(e);
    tick(&mut app, 1);
    assert!(events(&app)
        .iter()
        .any(|ev| matches!(ev, TweenEvent::ScriptCancelled { .. })));
    assert_eq!(app.world().resource::<VizijTweenEngine>().0.script_count(), 0);
}

/// it should record a configuration fault and request app exit
#[test]
fn unrecognized_step_requests_exit() {
    let mut app = app_with_plugin(0.25);
    let e = app.world_mut().spawn_empty().id();
    let script = Script::new("broken", vec![Step::new(StepKind::Unrecognized)]);
    start_script(app.world_mut(), e, &script).unwrap();
    tick(&mut app, 1);
    assert!(app.world().resource::<TweenEvents>().fault.is_some());
    assert!(!app.world().resource::<Events<AppExit>>().is_empty());
}
