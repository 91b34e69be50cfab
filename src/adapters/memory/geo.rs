//! In-memory geo repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::access::EntityKind;
use crate::domain::{Geo, GeoId, ProjectId};
use crate::ports::{GeoRepository, RepositoryError, RepositoryResult};

/// Thread-safe in-memory geo repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGeoRepository {
    geos: Arc<RwLock<HashMap<GeoId, Geo>>>,
}

impl InMemoryGeoRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GeoRepository for InMemoryGeoRepository {
    async fn store(&self, geo: &Geo) -> RepositoryResult<()> {
        let mut geos = self.geos.write().map_err(poisoned)?;
        if geos.contains_key(&geo.id()) {
            return Err(RepositoryError::duplicate(EntityKind::Geo, geo.id()));
        }
        geos.insert(geo.id(), geo.clone());
        Ok(())
    }

    async fn update(&self, geo: &Geo) -> RepositoryResult<()> {
        let mut geos = self.geos.write().map_err(poisoned)?;
        let slot = geos
            .get_mut(&geo.id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Geo, geo.id()))?;
        slot.clone_from(geo);
        Ok(())
    }

    async fn delete(&self, id: GeoId) -> RepositoryResult<()> {
        let mut geos = self.geos.write().map_err(poisoned)?;
        geos.remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Geo, id))
    }

    async fn find_by_id(&self, id: GeoId) -> RepositoryResult<Option<Geo>> {
        let geos = self.geos.read().map_err(poisoned)?;
        Ok(geos.get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> RepositoryResult<Vec<Geo>> {
        let geos = self.geos.read().map_err(poisoned)?;
        let mut found: Vec<Geo> = geos
            .values()
            .filter(|geo| geo.project_id() == project_id)
            .cloned()
            .collect();
        found.sort_by_key(|geo| (geo.created_at(), geo.id()));
        Ok(found)
    }
}
