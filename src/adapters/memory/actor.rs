//! In-memory actor repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::access::EntityKind;
use crate::domain::{Actor, ActorId};
use crate::ports::{ActorRepository, RepositoryError, RepositoryResult};

/// Thread-safe in-memory actor repository with a login index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActorRepository {
    state: Arc<RwLock<InMemoryActorState>>,
}

#[derive(Debug, Default)]
struct InMemoryActorState {
    actors: HashMap<ActorId, Actor>,
    login_index: HashMap<String, ActorId>,
}

impl InMemoryActorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorRepository for InMemoryActorRepository {
    async fn store(&self, actor: &Actor) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.actors.contains_key(&actor.id()) {
            return Err(RepositoryError::duplicate(EntityKind::Actor, actor.id()));
        }
        if state.login_index.contains_key(actor.login()) {
            return Err(RepositoryError::DuplicateLogin(actor.login().to_owned()));
        }
        state.login_index.insert(actor.login().to_owned(), actor.id());
        state.actors.insert(actor.id(), actor.clone());
        Ok(())
    }

    async fn update(&self, actor: &Actor) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let old_login = state
            .actors
            .get(&actor.id())
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Actor, actor.id()))?
            .login()
            .to_owned();

        if old_login != actor.login() {
            if state.login_index.contains_key(actor.login()) {
                return Err(RepositoryError::DuplicateLogin(actor.login().to_owned()));
            }
            state.login_index.remove(&old_login);
            state.login_index.insert(actor.login().to_owned(), actor.id());
        }
        state.actors.insert(actor.id(), actor.clone());
        Ok(())
    }

    async fn delete(&self, id: ActorId) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state
            .actors
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Actor, id))?;
        state.login_index.remove(removed.login());
        Ok(())
    }

    async fn find_by_id(&self, id: ActorId) -> RepositoryResult<Option<Actor>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.actors.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> RepositoryResult<Option<Actor>> {
        let state = self.state.read().map_err(poisoned)?;
        let actor = state
            .login_index
            .get(login.trim())
            .and_then(|id| state.actors.get(id))
            .cloned();
        Ok(actor)
    }

    async fn list(&self) -> RepositoryResult<Vec<Actor>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut actors: Vec<Actor> = state.actors.values().cloned().collect();
        actors.sort_by(|left, right| left.login().cmp(right.login()));
        Ok(actors)
    }
}
