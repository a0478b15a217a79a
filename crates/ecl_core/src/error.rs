//! Error types for ecl_core

use crate::ecs::Entity;
use crate::scene::ObjectId;
use thiserror::Error;

/// Errors raised by entity, part and scene operations
///
/// Lookups that simply find nothing return `None` or an empty `Vec`
/// instead of an error. The variants here are lifecycle misuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EclError {
    /// The entity was destroyed (or never existed in this world)
    #[error("stale entity handle {0:?}")]
    StaleHandle(Entity),

    /// A second entity was attached to a scene object
    #[error("scene object {object:?} already carries entity {entity:?}")]
    DuplicateAttach { object: ObjectId, entity: Entity },

    /// The scene host has no such object
    #[error("scene object {0:?} does not exist")]
    MissingObject(ObjectId),

    /// No template registered under this name
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Removing an entity the registry does not hold
    #[error("entity {0:?} is not registered")]
    NotRegistered(Entity),

    /// The logic is checked out because it is running right now
    #[error("part {0} is in use by the running logic")]
    PartInUse(&'static str),

    /// The part was removed while its own init hook was running
    #[error("part {0} was removed during initialisation")]
    MissingPart(&'static str),

    /// Parenting would create a cycle in the hierarchy
    #[error("cannot parent {object:?} under {parent:?}")]
    InvalidParent { object: ObjectId, parent: ObjectId },
}

/// Result type for ecl_core operations
pub type Result<T> = std::result::Result<T, EclError>;

/// A logic's `run` hook returned an error during a tick
///
/// Failures are isolated per logic: the tick keeps going and the failure is
/// handed back in the [`TickReport`](crate::ecs::TickReport).
#[derive(Error, Debug)]
#[error("logic {logic} on {entity:?} failed: {error:#}")]
pub struct RunFailure {
    /// Entity owning the failed logic
    pub entity: Entity,
    /// Type name of the logic
    pub logic: &'static str,
    /// The error the logic returned
    pub error: anyhow::Error,
}
