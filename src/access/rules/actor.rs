//! Rules for actor accounts.
//!
//! Only global admins manage accounts. Project roles play no part here.
//! Login uniqueness is looked up by the caller and passed in as a flag so
//! the rules stay free of I/O.

use super::ADMIN;
use crate::access::{AccessContext, AccessDenied, AccessResult, Action, EntityKind, conclude};
use crate::domain::{Actor, Role};

/// Checks the preconditions shared by create and update.
///
/// The archived-actor and duplicate-login checks are independent; both are
/// reported when both fail.
fn check_preconditions(
    context: &AccessContext<'_>,
    login: &str,
    login_taken: bool,
) -> AccessResult<Role> {
    let actor = context.actor().ok_or(AccessDenied::MissingActor)?;
    let mut denials = Vec::new();
    if actor.is_archived() {
        denials.push(AccessDenied::ArchivedActor(actor.id()));
    }
    if login_taken {
        denials.push(AccessDenied::DuplicateLogin(login.to_owned()));
    }
    conclude(denials)?;
    Ok(actor.role())
}

/// Admin only, and the login must be free.
///
/// # Errors
///
/// Returns [`AccessDenied`] for a missing or archived actor, a taken login,
/// or a non-admin actor.
pub fn check_create(
    context: &AccessContext<'_>,
    candidate: &Actor,
    login_taken: bool,
) -> AccessResult {
    let role = check_preconditions(context, candidate.login(), login_taken)?;
    if role.is_admin() {
        return Ok(());
    }
    Err(AccessDenied::insufficient(
        Action::Create,
        EntityKind::Actor,
        ADMIN,
    ))
}

/// Admin only; an admin editing their own account may not change its role
/// or archive flag.
///
/// `login_taken` must be `true` only when the login changed and another
/// actor already holds the new one.
///
/// # Errors
///
/// Returns [`AccessDenied`] for failed preconditions, a non-admin actor, or
/// a forbidden self-edit. Self-edit violations are reported together.
pub fn check_update(
    context: &AccessContext<'_>,
    old: &Actor,
    new: &Actor,
    login_taken: bool,
) -> AccessResult {
    let role = check_preconditions(context, new.login(), login_taken)?;
    if !role.is_admin() {
        return Err(AccessDenied::insufficient(
            Action::Update,
            EntityKind::Actor,
            ADMIN,
        ));
    }

    let acting_on_self = context.actor().is_some_and(|actor| actor.id() == old.id());
    let mut denials = Vec::new();
    if acting_on_self && old.role() != new.role() {
        denials.push(AccessDenied::SelfRoleChange);
    }
    if acting_on_self && old.is_archived() != new.is_archived() {
        denials.push(AccessDenied::SelfArchiveChange);
    }
    conclude(denials)
}

/// Admin only, never one's own account, and the target must not be
/// archived already.
///
/// # Errors
///
/// Returns every failed check.
pub fn check_soft_delete(context: &AccessContext<'_>, target: &Actor) -> AccessResult {
    let actor = context.active_actor()?;
    let mut denials = Vec::new();
    if !actor.role().is_admin() {
        denials.push(AccessDenied::insufficient(
            Action::SoftDelete,
            EntityKind::Actor,
            ADMIN,
        ));
    }
    if actor.id() == target.id() {
        denials.push(AccessDenied::SelfArchiveChange);
    }
    if target.is_archived() {
        denials.push(AccessDenied::AlreadyArchived(EntityKind::Actor));
    }
    conclude(denials)
}

/// Admin only, and never one's own account.
///
/// # Errors
///
/// Returns every failed check.
pub fn check_hard_delete(context: &AccessContext<'_>, target: &Actor) -> AccessResult {
    let actor = context.active_actor()?;
    let mut denials = Vec::new();
    if !actor.role().is_admin() {
        denials.push(AccessDenied::insufficient(
            Action::HardDelete,
            EntityKind::Actor,
            ADMIN,
        ));
    }
    if actor.id() == target.id() {
        denials.push(AccessDenied::SelfDeletion);
    }
    conclude(denials)
}
