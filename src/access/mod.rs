//! Authorization for every create, read, update and delete operation.
//!
//! A request builds an [`AccessContext`] from the acting actor and the
//! project roles resolved for it, then asks the [`PermissionEvaluator`] to
//! approve one target. Rules are pure functions over snapshots; lookups such
//! as login uniqueness are done by the caller and passed in.
//!
//! - Role resolution in [`roles`](resolve_effective_role)
//! - Per-entity rules in [`rules`]
//! - List narrowing in [`augment_list_filter`]

mod context;
mod error;
mod evaluator;
mod filter;
mod roles;
pub mod rules;

pub use context::AccessContext;
pub(crate) use error::conclude;
pub use error::{AccessDecision, AccessDenied, AccessResult, Action, EntityKind};
pub use evaluator::{
    CreateTarget, DeleteMode, DeleteTarget, PermissionEvaluator, ReadTarget, UpdateTarget,
};
pub use filter::{TaskFilter, TaskPredicate, augment_list_filter};
pub use roles::{EffectiveRoles, resolve_effective_role};

#[cfg(test)]
mod tests;
