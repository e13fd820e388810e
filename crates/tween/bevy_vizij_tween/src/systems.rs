use bevy::app::AppExit;
use bevy::prelude::*;

use crate::components::PlayTween;
use crate::host::{entity_id, WorldHost};
use crate::resources::{FixedDt, TweenEvents};
use crate::VizijTweenEngine;

/// Start a script for every newly requested `PlayTween` and remove the request.
pub fn start_requested_tweens_system(
    mut commands: Commands,
    mut eng: ResMut<VizijTweenEngine>,
    requests: Query<(Entity, &PlayTween)>,
) {
    for (entity, play) in requests.iter() {
        let id = eng.0.start(entity_id(entity), &play.0);
        debug!("started tween '{}' as {id:?} on {entity:?}", play.0.name);
        commands.entity(entity).remove::<PlayTween>();
    }
}

/// Fixed timestep compute: interpreter pass over every script instance.
/// A configuration error is logged, recorded in `TweenEvents` and ends the app.
pub fn interpret_tweens_system(world: &mut World) {
    let dt = world.get_resource::<FixedDt>().map(|d| d.0).unwrap_or(1.0 / 60.0);
    let result = world.resource_scope(|world, mut eng: Mut<VizijTweenEngine>| {
        eng.0.begin_frame();
        let mut host = WorldHost::new(world);
        eng.0.interpret(dt, &mut host)
    });
    if let Err(err) = result {
        error!("tween interpreter stopped: {err}");
        if let Some(mut staged) = world.get_resource_mut::<TweenEvents>() {
            staged.fault = Some(err.to_string());
        }
        world.send_event(AppExit::error());
    }
}

/// Apply pass: write every running animation into its `Animated<_>` component and stage
/// the tick's events.
pub fn apply_tweens_system(world: &mut World) {
    let dt = world.get_resource::<FixedDt>().map(|d| d.0).unwrap_or(1.0 / 60.0);
    let (events, dropped) = world.resource_scope(|world, mut eng: Mut<VizijTweenEngine>| {
        let mut host = WorldHost::new(world);
        eng.0.apply(dt, &mut host);
        let out = eng.0.outputs();
        (out.events.clone(), out.dropped_events)
    });
    if dropped > 0 {
        debug!("{dropped} tween events dropped this tick");
    }
    if let Some(mut staged) = world.get_resource_mut::<TweenEvents>() {
        staged.events = events;
        staged.dropped = dropped;
    }
}
