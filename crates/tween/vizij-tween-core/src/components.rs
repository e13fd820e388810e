//! Host-side components that tweens write into.
//!
//! Each struct is the data of one property family. Hosts store them however they like
//! (`MemoryWorld` keeps them per entity, the Bevy adapter wraps them in a `Component`);
//! `PropertyComponent` is the typed field access both the interpreter (reads the start
//! value) and the applicators (write the interpolated value) go through.

use serde::{Deserialize, Serialize};

use crate::property::PropertyId;
use crate::value::PropertyValue;

pub trait PropertyComponent: Default {
    /// Current value of `property`, or `None` when the property is not part of this family.
    fn read(&self, property: PropertyId) -> Option<PropertyValue>;

    /// Store `value`. Returns `false` when the property is foreign to this family or the
    /// value kind does not match.
    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Position {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }
}

impl PropertyComponent for Position {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        let v = match property {
            PropertyId::PositionX => self.x,
            PropertyId::PositionY => self.y,
            PropertyId::Rotation => self.rotation,
            PropertyId::ScaleX => self.scale_x,
            PropertyId::ScaleY => self.scale_y,
            _ => return None,
        };
        Some(PropertyValue::Float(v))
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        let Some(v) = value.as_float() else {
            return false;
        };
        let field = match property {
            PropertyId::PositionX => &mut self.x,
            PropertyId::PositionY => &mut self.y,
            PropertyId::Rotation => &mut self.rotation,
            PropertyId::ScaleX => &mut self.scale_x,
            PropertyId::ScaleY => &mut self.scale_y,
            _ => return false,
        };
        *field = v;
        true
    }
}

/// Color and alpha of a renderable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub color: [f32; 4],
    pub alpha: f32,
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            alpha: 1.0,
        }
    }
}

impl PropertyComponent for Tint {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::Tint => Some(PropertyValue::Color(self.color)),
            PropertyId::Alpha => Some(PropertyValue::Float(self.alpha)),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::Tint, PropertyValue::Color(c)) => self.color = c,
            (PropertyId::Alpha, PropertyValue::Float(a)) => self.alpha = a,
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteState {
    pub frame: i32,
    pub speed: f32,
    pub flip_x: bool,
    pub animation: String,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self {
            frame: 0,
            speed: 1.0,
            flip_x: false,
            animation: String::new(),
        }
    }
}

impl PropertyComponent for SpriteState {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::SpriteFrame => Some(PropertyValue::Int(self.frame)),
            PropertyId::SpriteSpeed => Some(PropertyValue::Float(self.speed)),
            PropertyId::SpriteFlipX => Some(PropertyValue::Bool(self.flip_x)),
            PropertyId::SpriteAnimation => Some(PropertyValue::Text(self.animation.clone())),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::SpriteFrame, PropertyValue::Int(v)) => self.frame = v,
            (PropertyId::SpriteSpeed, PropertyValue::Float(v)) => self.speed = v,
            (PropertyId::SpriteFlipX, PropertyValue::Bool(v)) => self.flip_x = v,
            (PropertyId::SpriteAnimation, PropertyValue::Text(v)) => self.animation = v,
            _ => return false,
        }
        true
    }
}

/// Particle/entity spawner parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnerParams {
    pub interval: f32,
    pub count: i32,
    pub spread: f32,
    pub enabled: bool,
}

impl PropertyComponent for SpawnerParams {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::SpawnerInterval => Some(PropertyValue::Float(self.interval)),
            PropertyId::SpawnerCount => Some(PropertyValue::Int(self.count)),
            PropertyId::SpawnerSpread => Some(PropertyValue::Float(self.spread)),
            PropertyId::SpawnerEnabled => Some(PropertyValue::Bool(self.enabled)),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::SpawnerInterval, PropertyValue::Float(v)) => self.interval = v,
            (PropertyId::SpawnerCount, PropertyValue::Int(v)) => self.count = v,
            (PropertyId::SpawnerSpread, PropertyValue::Float(v)) => self.spread = v,
            (PropertyId::SpawnerEnabled, PropertyValue::Bool(v)) => self.enabled = v,
            _ => return false,
        }
        true
    }
}

/// Randomized visibility (flicker) band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityVariance {
    pub min: f32,
    pub max: f32,
    pub period: f32,
    pub visible: bool,
}

impl Default for VisibilityVariance {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 1.0,
            period: 0.0,
            visible: true,
        }
    }
}

impl PropertyComponent for VisibilityVariance {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::VisibilityMin => Some(PropertyValue::Float(self.min)),
            PropertyId::VisibilityMax => Some(PropertyValue::Float(self.max)),
            PropertyId::VisibilityPeriod => Some(PropertyValue::Float(self.period)),
            PropertyId::Visible => Some(PropertyValue::Bool(self.visible)),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::VisibilityMin, PropertyValue::Float(v)) => self.min = v,
            (PropertyId::VisibilityMax, PropertyValue::Float(v)) => self.max = v,
            (PropertyId::VisibilityPeriod, PropertyValue::Float(v)) => self.period = v,
            (PropertyId::Visible, PropertyValue::Bool(v)) => self.visible = v,
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundParams {
    pub volume: f32,
    pub pitch: f32,
    pub clip: String,
}

impl Default for SoundParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pitch: 1.0,
            clip: String::new(),
        }
    }
}

impl PropertyComponent for SoundParams {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::SoundVolume => Some(PropertyValue::Float(self.volume)),
            PropertyId::SoundPitch => Some(PropertyValue::Float(self.pitch)),
            PropertyId::SoundClip => Some(PropertyValue::Text(self.clip.clone())),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::SoundVolume, PropertyValue::Float(v)) => self.volume = v,
            (PropertyId::SoundPitch, PropertyValue::Float(v)) => self.pitch = v,
            (PropertyId::SoundClip, PropertyValue::Text(v)) => self.clip = v,
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    pub content: String,
    pub scale: f32,
    pub color: [f32; 4],
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            content: String::new(),
            scale: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl PropertyComponent for TextParams {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::TextContent => Some(PropertyValue::Text(self.content.clone())),
            PropertyId::TextScale => Some(PropertyValue::Float(self.scale)),
            PropertyId::TextColor => Some(PropertyValue::Color(self.color)),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::TextContent, PropertyValue::Text(v)) => self.content = v,
            (PropertyId::TextScale, PropertyValue::Float(v)) => self.scale = v,
            (PropertyId::TextColor, PropertyValue::Color(v)) => self.color = v,
            _ => return false,
        }
        true
    }
}

/// Generic discrete switches (flag, mode discriminant, named state).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Switches {
    pub enabled: bool,
    pub mode: u32,
    pub state: String,
}

impl PropertyComponent for Switches {
    fn read(&self, property: PropertyId) -> Option<PropertyValue> {
        match property {
            PropertyId::SwitchEnabled => Some(PropertyValue::Bool(self.enabled)),
            PropertyId::SwitchMode => Some(PropertyValue::Enum(self.mode)),
            PropertyId::SwitchState => Some(PropertyValue::Text(self.state.clone())),
            _ => None,
        }
    }

    fn write(&mut self, property: PropertyId, value: PropertyValue) -> bool {
        match (property, value) {
            (PropertyId::SwitchEnabled, PropertyValue::Bool(v)) => self.enabled = v,
            (PropertyId::SwitchMode, PropertyValue::Enum(v)) => self.mode = v,
            (PropertyId::SwitchState, PropertyValue::Text(v)) => self.state = v,
            _ => return false,
        }
        true
    }
}
