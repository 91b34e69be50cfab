//! Rules for tasks, including the status workflow.
//!
//! Update evaluation runs in a fixed order: the acting actor must be
//! active, then the observer rule is applied, then admins and managers pass
//! unconditionally. Everyone else may only move the status along the
//! requested transitions and must leave every other field untouched.

use super::{ADMIN, ADMIN_OR_MANAGER, VIEWER_OR_PARTICIPANT};
use crate::access::{AccessContext, AccessDenied, AccessResult, Action, EntityKind, conclude};
use crate::domain::{Role, Task};
use crate::history::{Diffable, paths};

/// Admin or Manager, globally or in the project.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the actor is missing, archived or lacks
/// the role.
pub fn check_create(context: &AccessContext<'_>) -> AccessResult {
    context.active_actor()?;
    if context.roles().is_privileged() {
        return Ok(());
    }
    Err(AccessDenied::insufficient(
        Action::Create,
        EntityKind::Task,
        ADMIN_OR_MANAGER,
    ))
}

/// Admin, Manager or Observer standing, or participation in the task.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the actor is missing, archived, or neither
/// holds a viewing role nor participates.
pub fn check_read(context: &AccessContext<'_>, task: &Task) -> AccessResult {
    let actor = context.active_actor()?;
    if context.roles().can_view_all() || task.is_participant(actor.id()) {
        return Ok(());
    }
    Err(AccessDenied::insufficient(
        Action::Read,
        EntityKind::Task,
        VIEWER_OR_PARTICIPANT,
    ))
}

/// Update rule combining role standing and the status workflow.
///
/// # Errors
///
/// Returns [`AccessDenied`] for a missing or archived actor, an observer
/// restriction, or, for unprivileged actors, every protected field change
/// together with an illegal status transition.
pub fn check_update(context: &AccessContext<'_>, old: &Task, new: &Task) -> AccessResult {
    let actor = context.active_actor()?;
    check_observer_standing(actor.role(), context)?;

    if context.roles().is_privileged() || context.target_roles().is_privileged() {
        return Ok(());
    }

    let mut denials: Vec<AccessDenied> = Vec::new();
    for operation in old.diff(new) {
        let path = operation.path;
        if path == paths::task::STATUS || path == paths::task::STATUS_CHANGED_AT {
            continue;
        }
        let denial = AccessDenied::ProtectedFieldChanged(path);
        if !denials.contains(&denial) {
            denials.push(denial);
        }
    }
    if !old.status().permits_requested_transition(new.status()) {
        denials.push(AccessDenied::IllegalStatusTransition {
            from: old.status(),
            to: new.status(),
        });
    }
    conclude(denials)
}

/// A global observer needs a contributing role in both project contexts; a
/// project observer role binds everyone else.
fn check_observer_standing(global: Role, context: &AccessContext<'_>) -> AccessResult {
    let current = context.project_role();
    let target = context.target_project_role();
    if global == Role::Observer {
        let contributes = |role: Option<Role>| role.is_some_and(Role::is_contributor);
        if contributes(current) && contributes(target) {
            return Ok(());
        }
        return Err(AccessDenied::GlobalObserver);
    }
    if current == Some(Role::Observer) || target == Some(Role::Observer) {
        return Err(AccessDenied::ProjectObserver);
    }
    Ok(())
}

/// Archive rule: the task must not be archived, and the actor must be a
/// global admin, a project admin or manager, or, when they hold no project
/// role at all, a global manager.
///
/// # Errors
///
/// Returns every failed check.
pub fn check_soft_delete(context: &AccessContext<'_>, task: &Task) -> AccessResult {
    let actor = context.active_actor()?;
    let mut denials = Vec::new();
    if task.is_archived() {
        denials.push(AccessDenied::AlreadyArchived(EntityKind::Task));
    }
    let allowed = match context.project_role() {
        _ if actor.role().is_admin() => true,
        Some(project_role) => project_role.is_privileged(),
        None => actor.role() == Role::Manager,
    };
    if !allowed {
        denials.push(AccessDenied::insufficient(
            Action::SoftDelete,
            EntityKind::Task,
            ADMIN_OR_MANAGER,
        ));
    }
    conclude(denials)
}

/// Permanent removal rule: Admin globally or in the project.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the actor is missing, archived or not an
/// admin.
pub fn check_hard_delete(context: &AccessContext<'_>) -> AccessResult {
    context.active_actor()?;
    if context.roles().is_admin() {
        return Ok(());
    }
    Err(AccessDenied::insufficient(
        Action::HardDelete,
        EntityKind::Task,
        ADMIN,
    ))
}
