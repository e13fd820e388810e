//! Error types for the tween core.

use thiserror::Error;

use crate::ids::EntityId;
use crate::property::PropertyId;
use crate::value::ValueKind;

/// Failures reported by a `TweenHost` implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("entity {0} is not alive")]
    DeadEntity(EntityId),
    #[error("entity {entity} has no component for '{property}'")]
    MissingComponent {
        entity: EntityId,
        property: PropertyId,
    },
    #[error("'{property}' holds {expected:?} values, got {found:?}")]
    KindMismatch {
        property: PropertyId,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("unknown config function '{0}'")]
    UnknownFunction(String),
    #[error("config function '{function}' failed: {message}")]
    FunctionFailed { function: String, message: String },
}

/// Pool misuse. These are programming errors; callers log and count them rather than
/// trying to recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("handle {index}v{generation} is stale or already freed")]
    StaleHandle { index: u32, generation: u32 },
    #[error("pool bookkeeping out of sync: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Error)]
pub enum TweenError {
    #[error("script parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid step at {path}: {reason}")]
    InvalidStep { path: String, reason: String },
    #[error("unrecognized step type at {path} (owner {owner})")]
    UnrecognizedStep { path: String, owner: EntityId },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}
