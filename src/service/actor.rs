use std::sync::Arc;

use crate::changeset::{compose_actor, ActorChangeset};
use crate::errors::Result;
use crate::model::{Actor, Sanitize};
use crate::service::sanitized;
use crate::validate::{validate_actor, ActorDraft, UpdateMode};

pub trait ActorStorage: Send + Sync {
    fn add_actor(&self, draft: &ActorDraft, user_id: i64) -> Result<i64>;
    fn get_actor(&self, actor_id: i64) -> Result<Actor>;
    fn update_actor(&self, actor_id: i64, user_id: i64, changes: &ActorChangeset) -> Result<()>;
    fn delete_actor(&self, actor_id: i64, user_id: i64) -> Result<()>;
    fn actors_in_film(&self, film_id: i64) -> Result<Vec<Actor>>;
}

#[derive(Clone)]
pub struct ActorService {
    storage: Arc<dyn ActorStorage>,
}

impl ActorService {
    pub fn new(storage: Arc<dyn ActorStorage>) -> Self {
        Self { storage }
    }

    pub fn add_actor(&self, body: &[u8], user_id: i64) -> Result<i64> {
        let draft = validate_actor(body, UpdateMode::Full)?;
        self.storage.add_actor(&draft, user_id)
    }

    pub fn get_actor(&self, actor_id: i64) -> Result<Actor> {
        let mut actor = self.storage.get_actor(actor_id)?;
        actor.sanitize();
        Ok(actor)
    }

    pub fn update_actor(
        &self,
        body: &[u8],
        mode: UpdateMode,
        actor_id: i64,
        user_id: i64,
    ) -> Result<()> {
        let draft = validate_actor(body, mode)?;
        let changes = compose_actor(draft)?;
        log::debug!("updating actor {} columns {:?}", actor_id, changes.columns());
        self.storage.update_actor(actor_id, user_id, &changes)
    }

    pub fn delete_actor(&self, actor_id: i64, user_id: i64) -> Result<()> {
        self.storage.delete_actor(actor_id, user_id)
    }

    pub fn actors_in_film(&self, film_id: i64) -> Result<Vec<Actor>> {
        self.storage.actors_in_film(film_id).map(sanitized)
    }
}
