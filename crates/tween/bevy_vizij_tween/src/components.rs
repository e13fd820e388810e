use bevy::prelude::*;
use vizij_tween_core::{PropertyComponent, Script};

/// Wraps one core component family so tweens can read and write it.
///
/// `Animated<Position>`, `Animated<Tint>` and so on; an entity without the wrapper for a
/// family has its mutations of that family skipped.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Animated<C: PropertyComponent + Send + Sync + 'static>(pub C);

/// Request to run a script on this entity. Consumed (removed) once the script is started.
#[derive(Component, Debug, Clone)]
pub struct PlayTween(pub Script);
