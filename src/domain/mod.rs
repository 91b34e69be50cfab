//! Domain model for actors, projects, geos and tasks.
//!
//! The domain holds plain snapshots with validated values. Who may change
//! them lives in [`crate::access`]; how changes are recorded lives in
//! [`crate::history`].

mod actor;
mod error;
mod geo;
mod history;
mod ids;
mod project;
mod role;
mod status;
mod task;

pub use actor::{Actor, PersistedActorData};
pub use error::{DomainError, ParseRoleError, ParseTaskStatusError};
pub use geo::Geo;
pub use history::{HistoryEntry, Operation, OperationKind};
pub use ids::{ActorId, GeoId, ProjectId, TaskId};
pub use project::Project;
pub use role::Role;
pub use status::TaskStatus;
pub use task::{Task, TaskBuilder};

#[cfg(test)]
mod tests;
