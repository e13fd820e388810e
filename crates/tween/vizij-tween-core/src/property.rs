//! Animatable property slots.
//!
//! Every animatable field has a `PropertyId`. The id doubles as the slot key (one live
//! animation per `(entity, property)`) and, through `family()`, selects the applicator
//! and host component that own the field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Host component family; one applicator pass per family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFamily {
    Position,
    Color,
    Sprite,
    Spawner,
    Visibility,
    Sound,
    Text,
    Switch,
}

impl PropertyFamily {
    pub const ALL: [PropertyFamily; 8] = [
        PropertyFamily::Position,
        PropertyFamily::Color,
        PropertyFamily::Sprite,
        PropertyFamily::Spawner,
        PropertyFamily::Visibility,
        PropertyFamily::Sound,
        PropertyFamily::Text,
        PropertyFamily::Switch,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyId {
    PositionX,
    PositionY,
    Rotation,
    ScaleX,
    ScaleY,

    Tint,
    Alpha,

    SpriteFrame,
    SpriteSpeed,
    SpriteFlipX,
    SpriteAnimation,

    SpawnerInterval,
    SpawnerCount,
    SpawnerSpread,
    SpawnerEnabled,

    VisibilityMin,
    VisibilityMax,
    VisibilityPeriod,
    Visible,

    SoundVolume,
    SoundPitch,
    SoundClip,

    TextContent,
    TextScale,
    TextColor,

    SwitchEnabled,
    SwitchMode,
    SwitchState,
}

impl PropertyId {
    pub fn family(self) -> PropertyFamily {
        use PropertyId::*;
        match self {
            PositionX | PositionY | Rotation | ScaleX | ScaleY => PropertyFamily::Position,
            Tint | Alpha => PropertyFamily::Color,
            SpriteFrame | SpriteSpeed | SpriteFlipX | SpriteAnimation => PropertyFamily::Sprite,
            SpawnerInterval | SpawnerCount | SpawnerSpread | SpawnerEnabled => {
                PropertyFamily::Spawner
            }
            VisibilityMin | VisibilityMax | VisibilityPeriod | Visible => {
                PropertyFamily::Visibility
            }
            SoundVolume | SoundPitch | SoundClip => PropertyFamily::Sound,
            TextContent | TextScale | TextColor => PropertyFamily::Text,
            SwitchEnabled | SwitchMode | SwitchState => PropertyFamily::Switch,
        }
    }

    pub fn kind(self) -> ValueKind {
        use PropertyId::*;
        match self {
            PositionX | PositionY | Rotation | ScaleX | ScaleY | Alpha | SpriteSpeed
            | SpawnerInterval | SpawnerSpread | VisibilityMin | VisibilityMax
            | VisibilityPeriod | SoundVolume | SoundPitch | TextScale => ValueKind::Float,
            SpriteFrame | SpawnerCount => ValueKind::Int,
            Tint | TextColor => ValueKind::Color,
            SpriteFlipX | SpawnerEnabled | Visible | SwitchEnabled => ValueKind::Bool,
            SwitchMode => ValueKind::Enum,
            SpriteAnimation | SoundClip | TextContent | SwitchState => ValueKind::Text,
        }
    }

    /// Dotted path used in logs and diagnostics.
    pub fn path(self) -> &'static str {
        use PropertyId::*;
        match self {
            PositionX => "position.x",
            PositionY => "position.y",
            Rotation => "position.rotation",
            ScaleX => "position.scale_x",
            ScaleY => "position.scale_y",
            Tint => "color.color",
            Alpha => "color.alpha",
            SpriteFrame => "sprite.frame",
            SpriteSpeed => "sprite.speed",
            SpriteFlipX => "sprite.flip_x",
            SpriteAnimation => "sprite.animation",
            SpawnerInterval => "spawner.interval",
            SpawnerCount => "spawner.count",
            SpawnerSpread => "spawner.spread",
            SpawnerEnabled => "spawner.enabled",
            VisibilityMin => "visibility.min",
            VisibilityMax => "visibility.max",
            VisibilityPeriod => "visibility.period",
            Visible => "visibility.visible",
            SoundVolume => "sound.volume",
            SoundPitch => "sound.pitch",
            SoundClip => "sound.clip",
            TextContent => "text.content",
            TextScale => "text.scale",
            TextColor => "text.color",
            SwitchEnabled => "switch.enabled",
            SwitchMode => "switch.mode",
            SwitchState => "switch.state",
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
