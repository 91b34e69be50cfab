//! Access rules, one predicate function per entity and operation.
//!
//! Every rule first requires a present, non-archived actor and fails fast
//! if there is none. Independent checks after that are collected so the
//! caller sees every reason at once.

pub mod actor;
pub mod managed;
pub mod task;

use super::{AccessContext, AccessResult};

/// Any non-archived actor may read.
///
/// # Errors
///
/// Returns [`super::AccessDenied::MissingActor`] or
/// [`super::AccessDenied::ArchivedActor`].
pub fn check_any_active(context: &AccessContext<'_>) -> AccessResult {
    context.active_actor()?;
    Ok(())
}

const ADMIN: &str = "the admin role";
const ADMIN_OR_MANAGER: &str = "the admin or manager role";
const ADMIN_IN_BOTH: &str = "the admin or manager role in both the current and target project";
const VIEWER_OR_PARTICIPANT: &str =
    "the admin, manager or observer role, or participation in the task";
