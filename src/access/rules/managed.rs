//! Rules shared by projects and geos.
//!
//! Both are managed entities: managers and admins create, edit and archive
//! them, only admins remove them for good, and any active actor reads them.

use super::{ADMIN, ADMIN_IN_BOTH, ADMIN_OR_MANAGER};
use crate::access::{AccessContext, AccessDenied, AccessResult, Action, EntityKind, conclude};
use crate::domain::Geo;

/// Admin or Manager, globally or in the project.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the actor is missing, archived or lacks
/// the role.
pub fn check_create(context: &AccessContext<'_>, entity: EntityKind) -> AccessResult {
    context.active_actor()?;
    if context.roles().is_privileged() {
        return Ok(());
    }
    Err(AccessDenied::insufficient(Action::Create, entity, ADMIN_OR_MANAGER))
}

/// Admin or Manager at both the current and the target project context.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the actor is missing, archived or lacks
/// the role in either context.
pub fn check_update(context: &AccessContext<'_>, entity: EntityKind) -> AccessResult {
    context.active_actor()?;
    if context.roles().is_privileged() && context.target_roles().is_privileged() {
        return Ok(());
    }
    Err(AccessDenied::insufficient(Action::Update, entity, ADMIN_IN_BOTH))
}

/// Geo update rule: the project rule, plus the geo must stay in its project.
///
/// # Errors
///
/// Returns every failed check: [`AccessDenied::ProjectChangeForbidden`]
/// and the role denial are reported together.
pub fn check_geo_update(context: &AccessContext<'_>, old: &Geo, new: &Geo) -> AccessResult {
    context.active_actor()?;
    let mut denials = Vec::new();
    if old.project_id() != new.project_id() {
        denials.push(AccessDenied::ProjectChangeForbidden);
    }
    if let Err(denied) = check_update(context, EntityKind::Geo) {
        denials.push(denied);
    }
    conclude(denials)
}

/// Archive rule: Admin or Manager, and not archived yet.
///
/// # Errors
///
/// Returns every failed check.
pub fn check_soft_delete(
    context: &AccessContext<'_>,
    entity: EntityKind,
    is_archived: bool,
) -> AccessResult {
    context.active_actor()?;
    let mut denials = Vec::new();
    if is_archived {
        denials.push(AccessDenied::AlreadyArchived(entity));
    }
    if !context.roles().is_privileged() {
        denials.push(AccessDenied::insufficient(
            Action::SoftDelete,
            entity,
            ADMIN_OR_MANAGER,
        ));
    }
    conclude(denials)
}

/// Permanent removal rule: Admin, globally or in the project.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the actor is missing, archived or not an
/// admin.
pub fn check_hard_delete(context: &AccessContext<'_>, entity: EntityKind) -> AccessResult {
    context.active_actor()?;
    if context.roles().is_admin() {
        return Ok(());
    }
    Err(AccessDenied::insufficient(Action::HardDelete, entity, ADMIN))
}
