use diesel::prelude::*;
use diesel::sql_types::Text;

use crate::changeset::FilmChangeset;
use crate::db::{is_user_admin, prefix_tsquery, transaction, DbPool};
use crate::errors::{ApiError, Entity, Result};
use crate::model::Film;
use crate::schema::{film, film_actor};
use crate::service::{FilmStorage, SortType};
use crate::validate::FilmDraft;

const SEARCH_BY_TITLE: &str = r#"
SELECT id, author_id, title, description, release_date, rating, created_at
FROM film
WHERE to_tsvector('english', title) @@ to_tsquery('english', $1)
ORDER BY ts_rank(to_tsvector('english', title), to_tsquery('english', $1)) DESC, id"#;

const SEARCH_BY_ACTORS_NAME: &str = r#"
SELECT f.id, f.author_id, f.title, f.description, f.release_date, f.rating, f.created_at
FROM film f
JOIN film_actor fa ON f.id = fa.film_id
JOIN actor a ON fa.actor_id = a.id
WHERE to_tsvector('english', a.name) @@ to_tsquery('english', $1)
GROUP BY f.id
ORDER BY max(ts_rank(to_tsvector('english', a.name), to_tsquery('english', $1))) DESC, f.id"#;

pub struct PgFilmStorage {
    pool: DbPool,
}

impl PgFilmStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn search(&self, sql: &'static str, searched: &str) -> Result<Vec<Film>> {
        let Some(query) = prefix_tsquery(searched) else {
            return Ok(Vec::new());
        };
        transaction(&self.pool, |conn| {
            let films = diesel::sql_query(sql)
                .bind::<Text, _>(query)
                .load::<Film>(conn)?;
            Ok(films)
        })
    }
}

fn select_author_id(conn: &mut PgConnection, film_id: i64) -> Result<i64> {
    film::table
        .find(film_id)
        .select(film::author_id)
        .first::<i64>(conn)
        .optional()?
        .ok_or(ApiError::NotFound(Entity::Film))
}

impl FilmStorage for PgFilmStorage {
    fn add_film(&self, draft: &FilmDraft, user_id: i64) -> Result<i64> {
        transaction(&self.pool, |conn| {
            if !is_user_admin(conn, user_id)? {
                log::warn!("user {} is not allowed to add films", user_id);
                return Err(ApiError::NotAdmin(Entity::Film));
            }

            let new_film = draft.to_insertable(user_id)?;
            let film_id = diesel::insert_into(film::table)
                .values(&new_film)
                .returning(film::id)
                .get_result::<i64>(conn)?;
            Ok(film_id)
        })
    }

    fn get_film(&self, film_id: i64) -> Result<Film> {
        transaction(&self.pool, |conn| {
            film::table
                .find(film_id)
                .select(Film::as_select())
                .first(conn)
                .optional()?
                .ok_or(ApiError::NotFound(Entity::Film))
        })
    }

    fn update_film(&self, film_id: i64, user_id: i64, changes: &FilmChangeset) -> Result<()> {
        transaction(&self.pool, |conn| {
            if select_author_id(conn, film_id)? != user_id {
                log::warn!("user {} is not the author of film {}", user_id, film_id);
                return Err(ApiError::NotAuthor(Entity::Film));
            }
            if changes.is_empty() {
                return Err(ApiError::NoUpdateFields(Entity::Film));
            }

            let updated = diesel::update(film::table.find(film_id))
                .set(changes)
                .execute(conn)?;
            if updated == 0 {
                return Err(ApiError::UpdateFailed(Entity::Film));
            }
            Ok(())
        })
    }

    fn delete_film(&self, film_id: i64, user_id: i64) -> Result<()> {
        transaction(&self.pool, |conn| {
            let deleted = diesel::delete(
                film::table.filter(film::id.eq(film_id).and(film::author_id.eq(user_id))),
            )
            .execute(conn)?;
            if deleted > 0 {
                return Ok(());
            }

            // Nothing deleted: tell a missing film from someone else's.
            select_author_id(conn, film_id)?;
            log::warn!("user {} is not the author of film {}", user_id, film_id);
            Err(ApiError::NotAuthor(Entity::Film))
        })
    }

    fn films_with_actor(&self, actor_id: i64) -> Result<Vec<Film>> {
        transaction(&self.pool, |conn| {
            let films = film::table
                .inner_join(film_actor::table)
                .filter(film_actor::actor_id.eq(actor_id))
                .select(Film::as_select())
                .order(film::id.asc())
                .load(conn)?;
            Ok(films)
        })
    }

    fn list_films(&self, limit: i64, offset: i64, sort: SortType) -> Result<Vec<Film>> {
        transaction(&self.pool, |conn| {
            let query = film::table.select(Film::as_select()).into_boxed();
            let query = match sort {
                SortType::Rating => query.order(film::rating.desc()),
                SortType::CreatedAt => query.order(film::created_at.desc()),
                SortType::Title => query.order(film::title.asc()),
            };
            let films = query
                .then_order_by(film::id.asc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;
            Ok(films)
        })
    }

    fn search_by_title(&self, searched: &str) -> Result<Vec<Film>> {
        self.search(SEARCH_BY_TITLE, searched)
    }

    fn search_by_actor_name(&self, searched: &str) -> Result<Vec<Film>> {
        self.search(SEARCH_BY_ACTORS_NAME, searched)
    }
}
