//! Typed property values exchanged with the host.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Int,
    Color,
    Bool,
    Enum,
    Text,
}

impl ValueKind {
    /// Discrete kinds flip at the easing midpoint instead of blending.
    #[inline]
    pub fn is_switch(self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::Enum | ValueKind::Text)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum PropertyValue {
    Float(f32),
    Int(i32),
    /// RGBA color
    Color([f32; 4]),
    Bool(bool),
    /// Enum discriminant
    Enum(u32),
    Text(String),
}

impl PropertyValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Int(_) => ValueKind::Int,
            PropertyValue::Color(_) => ValueKind::Color,
            PropertyValue::Bool(_) => ValueKind::Bool,
            PropertyValue::Enum(_) => ValueKind::Enum,
            PropertyValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}
