use diesel::prelude::*;

use crate::changeset::ActorChangeset;
use crate::db::{is_user_admin, transaction, DbPool};
use crate::errors::{ApiError, Entity, Result};
use crate::model::Actor;
use crate::schema::{actor, film_actor};
use crate::service::ActorStorage;
use crate::validate::ActorDraft;

pub struct PgActorStorage {
    pool: DbPool,
}

impl PgActorStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn select_author_id(conn: &mut PgConnection, actor_id: i64) -> Result<i64> {
    actor::table
        .find(actor_id)
        .select(actor::author_id)
        .first::<i64>(conn)
        .optional()?
        .ok_or(ApiError::NotFound(Entity::Actor))
}

impl ActorStorage for PgActorStorage {
    fn add_actor(&self, draft: &ActorDraft, user_id: i64) -> Result<i64> {
        transaction(&self.pool, |conn| {
            if !is_user_admin(conn, user_id)? {
                log::warn!("user {} is not allowed to add actors", user_id);
                return Err(ApiError::NotAdmin(Entity::Actor));
            }

            let new_actor = draft.to_insertable(user_id)?;
            let actor_id = diesel::insert_into(actor::table)
                .values(&new_actor)
                .returning(actor::id)
                .get_result::<i64>(conn)?;
            Ok(actor_id)
        })
    }

    fn get_actor(&self, actor_id: i64) -> Result<Actor> {
        transaction(&self.pool, |conn| {
            actor::table
                .find(actor_id)
                .select(Actor::as_select())
                .first(conn)
                .optional()?
                .ok_or(ApiError::NotFound(Entity::Actor))
        })
    }

    fn update_actor(&self, actor_id: i64, user_id: i64, changes: &ActorChangeset) -> Result<()> {
        transaction(&self.pool, |conn| {
            if select_author_id(conn, actor_id)? != user_id {
                log::warn!("user {} is not the author of actor {}", user_id, actor_id);
                return Err(ApiError::NotAuthor(Entity::Actor));
            }
            if changes.is_empty() {
                return Err(ApiError::NoUpdateFields(Entity::Actor));
            }

            let updated = diesel::update(actor::table.find(actor_id))
                .set(changes)
                .execute(conn)?;
            if updated == 0 {
                return Err(ApiError::UpdateFailed(Entity::Actor));
            }
            Ok(())
        })
    }

    fn delete_actor(&self, actor_id: i64, user_id: i64) -> Result<()> {
        transaction(&self.pool, |conn| {
            let deleted = diesel::delete(
                actor::table.filter(actor::id.eq(actor_id).and(actor::author_id.eq(user_id))),
            )
            .execute(conn)?;
            if deleted > 0 {
                return Ok(());
            }

            // Nothing deleted: tell a missing actor from someone else's.
            select_author_id(conn, actor_id)?;
            log::warn!("user {} is not the author of actor {}", user_id, actor_id);
            Err(ApiError::NotAuthor(Entity::Actor))
        })
    }

    fn actors_in_film(&self, film_id: i64) -> Result<Vec<Actor>> {
        transaction(&self.pool, |conn| {
            let actors = actor::table
                .inner_join(film_actor::table)
                .filter(film_actor::film_id.eq(film_id))
                .select(Actor::as_select())
                .order(actor::id.asc())
                .load(conn)?;
            Ok(actors)
        })
    }
}
