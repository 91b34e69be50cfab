//! Geotask: collaborative tasks over projects and geospatial regions.
//!
//! This crate decides who may create, read, update and delete actors,
//! projects, geos and tasks, which task status changes are legal, and how
//! every approved task change is recorded in an append-only field-level
//! history.
//!
//! # Architecture
//!
//! Geotask follows hexagonal architecture principles:
//!
//! - **Domain**: Plain snapshots with validated values
//! - **Ports**: Abstract repository traits for persistence
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: Load, authorize, record and persist
//!
//! # Modules
//!
//! - [`domain`]: Actors, projects, geos, tasks, roles and statuses
//! - [`access`]: Role resolution, permission rules and list narrowing
//! - [`history`]: Structural diffs and audit entries
//! - [`ports`]: Repository contracts
//! - [`adapters`]: In-memory repositories
//! - [`services`]: Command and query orchestration

pub mod access;
pub mod adapters;
pub mod domain;
pub mod history;
pub mod ports;
pub mod services;
