//! Stable path labels used in history operations.

/// Paths of task fields, in declaration order.
pub mod task {
    /// Task identifier.
    pub const ID: &str = "/id";
    /// Owning project.
    pub const PROJECT_ID: &str = "/project_id";
    /// Title.
    pub const TITLE: &str = "/title";
    /// Description.
    pub const DESCRIPTION: &str = "/description";
    /// Workflow status.
    pub const STATUS: &str = "/status";
    /// Status change timestamp.
    pub const STATUS_CHANGED_AT: &str = "/status_changed_at";
    /// Creating actor.
    pub const CREATED_BY: &str = "/created_by";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "/created_at";
    /// Responsible actor.
    pub const RESPONSIBLE_ACTOR: &str = "/responsible_actor";
    /// Assistant actors.
    pub const ASSISTANT_ACTORS: &str = "/assistant_actors";
    /// Observer actors.
    pub const OBSERVER_ACTORS: &str = "/observer_actors";
    /// Covered geos.
    pub const GEO_IDS: &str = "/geo_ids";
    /// Planned start.
    pub const PLANNED_START_AT: &str = "/planned_start_at";
    /// Planned finish.
    pub const PLANNED_FINISH_AT: &str = "/planned_finish_at";
    /// Archive flag.
    pub const IS_ARCHIVED: &str = "/is_archived";
}

/// Paths of project fields, in declaration order.
pub mod project {
    /// Project identifier.
    pub const ID: &str = "/id";
    /// Title.
    pub const TITLE: &str = "/title";
    /// Description.
    pub const DESCRIPTION: &str = "/description";
    /// Role overrides; entries are addressed as `/project_actor_roles/{actor}`.
    pub const PROJECT_ACTOR_ROLES: &str = "/project_actor_roles";
    /// Geo layers.
    pub const LAYERS: &str = "/layers";
    /// Archive flag.
    pub const IS_ARCHIVED: &str = "/is_archived";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "/created_at";
}

/// Paths of geo fields, in declaration order.
pub mod geo {
    /// Geo identifier.
    pub const ID: &str = "/id";
    /// Owning project.
    pub const PROJECT_ID: &str = "/project_id";
    /// Title.
    pub const TITLE: &str = "/title";
    /// Description.
    pub const DESCRIPTION: &str = "/description";
    /// Archive flag.
    pub const IS_ARCHIVED: &str = "/is_archived";
    /// Creating actor.
    pub const CREATED_BY: &str = "/created_by";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "/created_at";
}

/// Paths of actor fields, in declaration order.
pub mod actor {
    /// Actor identifier.
    pub const ID: &str = "/id";
    /// Login.
    pub const LOGIN: &str = "/login";
    /// Display name.
    pub const NAME: &str = "/name";
    /// Global role.
    pub const ROLE: &str = "/role";
    /// Archive flag.
    pub const IS_ARCHIVED: &str = "/is_archived";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "/created_at";
}
