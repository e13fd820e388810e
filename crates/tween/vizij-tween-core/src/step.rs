//! Step tree data model.
//!
//! A script is a list of `Step`s. Steps are immutable once authored; optional fields
//! (`target`, `duration`, `easing`) are resolved against `StepDefaults` inherited from
//! the enclosing group, sub-script or script start, never written back into the tree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::ids::EntityId;
use crate::property::PropertyId;
use crate::value::PropertyValue;

/// Values a step falls back to when it leaves a field unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDefaults {
    #[serde(default)]
    pub target: EntityId,
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub easing: Option<Easing>,
}

impl StepDefaults {
    pub fn with_target(target: EntityId) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "EntityId::is_none")]
    pub target: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
    #[serde(flatten)]
    pub kind: StepKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Occupies its duration, nothing else.
    Wait,
    /// Children notionally start together.
    Parallel { steps: Arc<[Step]> },
    /// Children run as an independently timed branch.
    SubScript { steps: Arc<[Step]> },
    /// Relative branch within the current list.
    Jump { distance: i32 },

    Position(PositionTargets),
    Color(ColorTargets),
    Sprite(SpriteTargets),
    Spawner(SpawnerTargets),
    Visibility(VisibilityTargets),
    Sound(SoundTargets),
    Text(TextTargets),
    Switch(SwitchTargets),

    /// Create an entity and run a config function on it.
    SpawnEntity {
        function: String,
        #[serde(default)]
        config: Option<String>,
    },
    DeleteEntity,
    ExecuteConfigFunction {
        function: String,
        #[serde(default)]
        config: Option<String>,
    },

    /// Any `type` this build does not know. Dispatching it is a configuration error.
    #[serde(other)]
    Unrecognized,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Self {
            target: EntityId::NONE,
            delay: None,
            duration: None,
            easing: None,
            kind,
        }
    }

    pub fn wait(duration: f32) -> Self {
        Self::new(StepKind::Wait).with_duration(duration)
    }

    pub fn parallel(steps: Vec<Step>) -> Self {
        Self::new(StepKind::Parallel {
            steps: steps.into(),
        })
    }

    pub fn sub_script(steps: Vec<Step>) -> Self {
        Self::new(StepKind::SubScript {
            steps: steps.into(),
        })
    }

    pub fn jump(distance: i32) -> Self {
        Self::new(StepKind::Jump { distance })
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = target;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    #[inline]
    pub fn delay_or_zero(&self) -> f32 {
        self.delay.unwrap_or(0.0)
    }

    #[inline]
    pub fn resolved_duration(&self, defaults: &StepDefaults) -> f32 {
        self.duration.or(defaults.duration).unwrap_or(0.0)
    }

    #[inline]
    pub fn resolved_easing(&self, defaults: &StepDefaults) -> Easing {
        self.easing.or(defaults.easing).unwrap_or_default()
    }

    #[inline]
    pub fn resolved_target(&self, defaults: &StepDefaults) -> EntityId {
        self.target.or(defaults.target)
    }

    /// Defaults this step hands down to its children.
    pub fn child_defaults(&self, defaults: &StepDefaults) -> StepDefaults {
        StepDefaults {
            target: self.resolved_target(defaults),
            duration: self.duration.or(defaults.duration),
            easing: self.easing.or(defaults.easing),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            StepKind::Wait => "wait",
            StepKind::Parallel { .. } => "parallel",
            StepKind::SubScript { .. } => "sub_script",
            StepKind::Jump { .. } => "jump",
            StepKind::Position(_) => "position",
            StepKind::Color(_) => "color",
            StepKind::Sprite(_) => "sprite",
            StepKind::Spawner(_) => "spawner",
            StepKind::Visibility(_) => "visibility",
            StepKind::Sound(_) => "sound",
            StepKind::Text(_) => "text",
            StepKind::Switch(_) => "switch",
            StepKind::SpawnEntity { .. } => "spawn_entity",
            StepKind::DeleteEntity => "delete_entity",
            StepKind::ExecuteConfigFunction { .. } => "execute_config_function",
            StepKind::Unrecognized => "unrecognized",
        }
    }
}

impl StepKind {
    /// Append every non-null field target of a mutation step to `out`.
    /// Returns `false` when this is not a mutation step.
    pub fn mutation_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) -> bool {
        match self {
            StepKind::Position(t) => t.push_targets(out),
            StepKind::Color(t) => t.push_targets(out),
            StepKind::Sprite(t) => t.push_targets(out),
            StepKind::Spawner(t) => t.push_targets(out),
            StepKind::Visibility(t) => t.push_targets(out),
            StepKind::Sound(t) => t.push_targets(out),
            StepKind::Text(t) => t.push_targets(out),
            StepKind::Switch(t) => t.push_targets(out),
            _ => return false,
        }
        true
    }

    pub fn is_side_effect(&self) -> bool {
        matches!(
            self,
            StepKind::SpawnEntity { .. }
                | StepKind::DeleteEntity
                | StepKind::ExecuteConfigFunction { .. }
        )
    }
}

#[inline]
fn push<T>(
    out: &mut Vec<(PropertyId, PropertyValue)>,
    property: PropertyId,
    value: &Option<T>,
    wrap: impl FnOnce(T) -> PropertyValue,
) where
    T: Clone,
{
    if let Some(v) = value {
        out.push((property, wrap(v.clone())));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionTargets {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub scale_x: Option<f32>,
    #[serde(default)]
    pub scale_y: Option<f32>,
}

impl PositionTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::PositionX, &self.x, PropertyValue::Float);
        push(out, PropertyId::PositionY, &self.y, PropertyValue::Float);
        push(out, PropertyId::Rotation, &self.rotation, PropertyValue::Float);
        push(out, PropertyId::ScaleX, &self.scale_x, PropertyValue::Float);
        push(out, PropertyId::ScaleY, &self.scale_y, PropertyValue::Float);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTargets {
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub alpha: Option<f32>,
}

impl ColorTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::Tint, &self.color, PropertyValue::Color);
        push(out, PropertyId::Alpha, &self.alpha, PropertyValue::Float);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteTargets {
    #[serde(default)]
    pub frame: Option<i32>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub flip_x: Option<bool>,
    #[serde(default)]
    pub animation: Option<String>,
}

impl SpriteTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::SpriteFrame, &self.frame, PropertyValue::Int);
        push(out, PropertyId::SpriteSpeed, &self.speed, PropertyValue::Float);
        push(out, PropertyId::SpriteFlipX, &self.flip_x, PropertyValue::Bool);
        push(out, PropertyId::SpriteAnimation, &self.animation, PropertyValue::Text);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnerTargets {
    #[serde(default)]
    pub interval: Option<f32>,
    #[serde(default)]
    pub count: Option<i32>,
    #[serde(default)]
    pub spread: Option<f32>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl SpawnerTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::SpawnerInterval, &self.interval, PropertyValue::Float);
        push(out, PropertyId::SpawnerCount, &self.count, PropertyValue::Int);
        push(out, PropertyId::SpawnerSpread, &self.spread, PropertyValue::Float);
        push(out, PropertyId::SpawnerEnabled, &self.enabled, PropertyValue::Bool);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityTargets {
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
    #[serde(default)]
    pub period: Option<f32>,
    #[serde(default)]
    pub visible: Option<bool>,
}

impl VisibilityTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::VisibilityMin, &self.min, PropertyValue::Float);
        push(out, PropertyId::VisibilityMax, &self.max, PropertyValue::Float);
        push(out, PropertyId::VisibilityPeriod, &self.period, PropertyValue::Float);
        push(out, PropertyId::Visible, &self.visible, PropertyValue::Bool);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundTargets {
    #[serde(default)]
    pub volume: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
    #[serde(default)]
    pub clip: Option<String>,
}

impl SoundTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::SoundVolume, &self.volume, PropertyValue::Float);
        push(out, PropertyId::SoundPitch, &self.pitch, PropertyValue::Float);
        push(out, PropertyId::SoundClip, &self.clip, PropertyValue::Text);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextTargets {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub color: Option<[f32; 4]>,
}

impl TextTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::TextContent, &self.content, PropertyValue::Text);
        push(out, PropertyId::TextScale, &self.scale, PropertyValue::Float);
        push(out, PropertyId::TextColor, &self.color, PropertyValue::Color);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchTargets {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub mode: Option<u32>,
    #[serde(default)]
    pub state: Option<String>,
}

impl SwitchTargets {
    fn push_targets(&self, out: &mut Vec<(PropertyId, PropertyValue)>) {
        push(out, PropertyId::SwitchEnabled, &self.enabled, PropertyValue::Bool);
        push(out, PropertyId::SwitchMode, &self.mode, PropertyValue::Enum);
        push(out, PropertyId::SwitchState, &self.state, PropertyValue::Text);
    }
}
