//! In-memory task repository.
//!
//! List queries evaluate [`TaskFilter`] predicates directly against the
//! stored snapshots.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::access::{EntityKind, TaskFilter};
use crate::domain::{ActorId, GeoId, ProjectId, Task, TaskId};
use crate::ports::{PageRequest, RepositoryError, RepositoryResult, TaskPage, TaskRepository};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(&self, keep: impl Fn(&Task) -> bool) -> RepositoryResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        let mut found: Vec<Task> = tasks.values().filter(|task| keep(task)).cloned().collect();
        found.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(found)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> RepositoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        if tasks.contains_key(&task.id()) {
            return Err(RepositoryError::duplicate(EntityKind::Task, task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let slot = tasks
            .get_mut(&task.id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Task, task.id()))?;
        slot.clone_from(task);
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> RepositoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Task, id))
    }

    async fn find_by_id(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_by_filter(
        &self,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> RepositoryResult<TaskPage> {
        let matching = self.collect_sorted(|task| filter.matches(task))?;
        let total_count = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(TaskPage { items, total_count })
    }

    async fn find_by_project(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>> {
        self.collect_sorted(|task| task.project_id() == project_id)
    }

    async fn find_referencing_actor(&self, actor_id: ActorId) -> RepositoryResult<Vec<Task>> {
        self.collect_sorted(|task| task.is_participant(actor_id))
    }

    async fn find_referencing_geo(&self, geo_id: GeoId) -> RepositoryResult<Vec<Task>> {
        self.collect_sorted(|task| task.geo_ids().contains(&geo_id))
    }
}
