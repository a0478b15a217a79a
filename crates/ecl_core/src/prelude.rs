//! Common imports
//!
//! ```rust
//! use ecl_core::prelude::*;
//! ```

pub use crate::ecs::{
    Entity, Filter, Logic, LogicContext, LogicState, Part, Spawn, Tag, Tags, TickReport, World,
};
pub use crate::error::{EclError, Result};
pub use crate::math::{Quat, Vec3};
pub use crate::scene::{ObjectId, Scene, SceneHost, Template};
