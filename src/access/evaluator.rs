//! Single entry point dispatching checks to the per-entity rules.

use super::rules::{self, managed};
use super::{AccessContext, AccessResult, EntityKind};
use crate::domain::{Actor, Geo, Project, Task};

/// Whether a delete archives or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteMode {
    /// Set `is_archived` and keep the record.
    Soft,
    /// Remove the record and reconcile references to it.
    Hard,
}

/// The entity a create check concerns.
#[derive(Debug, Clone, Copy)]
pub enum CreateTarget<'a> {
    /// A new actor account.
    Actor {
        /// The account about to be stored.
        candidate: &'a Actor,
        /// Whether another actor already holds the login.
        login_taken: bool,
    },
    /// A new project.
    Project(&'a Project),
    /// A new geo.
    Geo(&'a Geo),
    /// A new task.
    Task(&'a Task),
}

/// The entity a read check concerns.
#[derive(Debug, Clone, Copy)]
pub enum ReadTarget<'a> {
    /// An actor account.
    Actor(&'a Actor),
    /// A project.
    Project(&'a Project),
    /// A geo.
    Geo(&'a Geo),
    /// A task.
    Task(&'a Task),
}

/// The snapshots an update check compares.
#[derive(Debug, Clone, Copy)]
pub enum UpdateTarget<'a> {
    /// An actor account.
    Actor {
        /// Stored snapshot.
        old: &'a Actor,
        /// Requested snapshot.
        new: &'a Actor,
        /// Whether the login changed to one another actor holds.
        login_taken: bool,
    },
    /// A project.
    Project {
        /// Stored snapshot.
        old: &'a Project,
        /// Requested snapshot.
        new: &'a Project,
    },
    /// A geo.
    Geo {
        /// Stored snapshot.
        old: &'a Geo,
        /// Requested snapshot.
        new: &'a Geo,
    },
    /// A task.
    Task {
        /// Stored snapshot.
        old: &'a Task,
        /// Requested snapshot.
        new: &'a Task,
    },
}

/// The entity a delete check concerns.
#[derive(Debug, Clone, Copy)]
pub enum DeleteTarget<'a> {
    /// An actor account.
    Actor(&'a Actor),
    /// A project.
    Project(&'a Project),
    /// A geo.
    Geo(&'a Geo),
    /// A task.
    Task(&'a Task),
}

macro_rules! entity_kind {
    ($target:ident) => {
        impl $target<'_> {
            /// Returns the entity kind of the target.
            #[must_use]
            pub const fn kind(&self) -> EntityKind {
                match self {
                    Self::Actor { .. } => EntityKind::Actor,
                    Self::Project { .. } => EntityKind::Project,
                    Self::Geo { .. } => EntityKind::Geo,
                    Self::Task { .. } => EntityKind::Task,
                }
            }
        }
    };
}

entity_kind!(CreateTarget);
entity_kind!(ReadTarget);
entity_kind!(UpdateTarget);
entity_kind!(DeleteTarget);

/// Stateless permission evaluator.
///
/// Every method is a pure function of its arguments, so one evaluator can
/// be shared freely across threads.
///
/// # Examples
///
/// ```
/// use geotask::access::{AccessContext, PermissionEvaluator, ReadTarget};
/// use geotask::domain::{Actor, Project, Role};
/// use mockable::DefaultClock;
///
/// let clock = DefaultClock;
/// let reader = Actor::new("reader", "Reader", Role::Actor, &clock).expect("valid actor");
/// let project = Project::new("Estuary", &clock).expect("valid project");
///
/// let evaluator = PermissionEvaluator::new();
/// let context = AccessContext::resolve(Some(&reader), Some(&project));
/// assert!(evaluator.check_read(&context, ReadTarget::Project(&project)).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// Creates an evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks whether the context may create the target.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessDenied`] with every reason for refusal.
    pub fn check_create(&self, context: &AccessContext<'_>, target: CreateTarget<'_>) -> AccessResult {
        match target {
            CreateTarget::Actor {
                candidate,
                login_taken,
            } => rules::actor::check_create(context, candidate, login_taken),
            CreateTarget::Project(_) | CreateTarget::Geo(_) => {
                managed::check_create(context, target.kind())
            }
            CreateTarget::Task(_) => rules::task::check_create(context),
        }
    }

    /// Checks whether the context may read the target.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessDenied`] with every reason for refusal.
    pub fn check_read(&self, context: &AccessContext<'_>, target: ReadTarget<'_>) -> AccessResult {
        match target {
            ReadTarget::Actor(_) | ReadTarget::Project(_) | ReadTarget::Geo(_) => {
                rules::check_any_active(context)
            }
            ReadTarget::Task(task) => rules::task::check_read(context, task),
        }
    }

    /// Checks whether the context may replace the old snapshot with the new
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessDenied`] with every reason for refusal.
    pub fn check_update(&self, context: &AccessContext<'_>, target: UpdateTarget<'_>) -> AccessResult {
        match target {
            UpdateTarget::Actor {
                old,
                new,
                login_taken,
            } => rules::actor::check_update(context, old, new, login_taken),
            UpdateTarget::Project { .. } => managed::check_update(context, EntityKind::Project),
            UpdateTarget::Geo { old, new } => managed::check_geo_update(context, old, new),
            UpdateTarget::Task { old, new } => rules::task::check_update(context, old, new),
        }
    }

    /// Checks whether the context may delete the target in the given mode.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessDenied`] with every reason for refusal.
    pub fn check_delete(
        &self,
        context: &AccessContext<'_>,
        target: DeleteTarget<'_>,
        mode: DeleteMode,
    ) -> AccessResult {
        match (target, mode) {
            (DeleteTarget::Actor(actor), DeleteMode::Soft) => {
                rules::actor::check_soft_delete(context, actor)
            }
            (DeleteTarget::Actor(actor), DeleteMode::Hard) => {
                rules::actor::check_hard_delete(context, actor)
            }
            (DeleteTarget::Project(project), DeleteMode::Soft) => {
                managed::check_soft_delete(context, EntityKind::Project, project.is_archived())
            }
            (DeleteTarget::Geo(geo), DeleteMode::Soft) => {
                managed::check_soft_delete(context, EntityKind::Geo, geo.is_archived())
            }
            (DeleteTarget::Project(_) | DeleteTarget::Geo(_), DeleteMode::Hard) => {
                managed::check_hard_delete(context, target.kind())
            }
            (DeleteTarget::Task(task), DeleteMode::Soft) => {
                rules::task::check_soft_delete(context, task)
            }
            (DeleteTarget::Task(_), DeleteMode::Hard) => rules::task::check_hard_delete(context),
        }
    }
}
