use std::sync::Arc;

use crate::changeset::{compose_film, FilmChangeset};
use crate::errors::Result;
use crate::model::{Film, Sanitize};
use crate::service::sanitized;
use crate::validate::{validate_film, FilmDraft, UpdateMode};

/// Ordering of the film feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
    Rating,
    CreatedAt,
    Title,
}

impl From<u64> for SortType {
    fn from(value: u64) -> Self {
        match value {
            1 => SortType::CreatedAt,
            2 => SortType::Title,
            _ => SortType::Rating,
        }
    }
}

pub trait FilmStorage: Send + Sync {
    /// Inserts a film on behalf of an admin and returns its id.
    fn add_film(&self, draft: &FilmDraft, user_id: i64) -> Result<i64>;
    fn get_film(&self, film_id: i64) -> Result<Film>;
    /// Applies `changes` if `user_id` authored the film.
    fn update_film(&self, film_id: i64, user_id: i64, changes: &FilmChangeset) -> Result<()>;
    fn delete_film(&self, film_id: i64, user_id: i64) -> Result<()>;
    fn films_with_actor(&self, actor_id: i64) -> Result<Vec<Film>>;
    fn list_films(&self, limit: i64, offset: i64, sort: SortType) -> Result<Vec<Film>>;
    /// Full-text search on titles, best match first.
    fn search_by_title(&self, searched: &str) -> Result<Vec<Film>>;
    /// Full-text search on the names of the film's actors, best match first.
    fn search_by_actor_name(&self, searched: &str) -> Result<Vec<Film>>;
}

#[derive(Clone)]
pub struct FilmService {
    storage: Arc<dyn FilmStorage>,
}

impl FilmService {
    pub fn new(storage: Arc<dyn FilmStorage>) -> Self {
        Self { storage }
    }

    pub fn add_film(&self, body: &[u8], user_id: i64) -> Result<i64> {
        let draft = validate_film(body, UpdateMode::Full)?;
        self.storage.add_film(&draft, user_id)
    }

    pub fn get_film(&self, film_id: i64) -> Result<Film> {
        let mut film = self.storage.get_film(film_id)?;
        film.sanitize();
        Ok(film)
    }

    pub fn update_film(
        &self,
        body: &[u8],
        mode: UpdateMode,
        film_id: i64,
        user_id: i64,
    ) -> Result<()> {
        let draft = validate_film(body, mode)?;
        let changes = compose_film(draft)?;
        log::debug!("updating film {} columns {:?}", film_id, changes.columns());
        self.storage.update_film(film_id, user_id, &changes)
    }

    pub fn delete_film(&self, film_id: i64, user_id: i64) -> Result<()> {
        self.storage.delete_film(film_id, user_id)
    }

    pub fn films_with_actor(&self, actor_id: i64) -> Result<Vec<Film>> {
        self.storage.films_with_actor(actor_id).map(sanitized)
    }

    pub fn list_films(&self, limit: u32, offset: u32, sort_type: u64) -> Result<Vec<Film>> {
        self.storage
            .list_films(i64::from(limit), i64::from(offset), SortType::from(sort_type))
            .map(sanitized)
    }

    pub fn search_by_title(&self, searched: &str) -> Result<Vec<Film>> {
        self.storage.search_by_title(searched).map(sanitized)
    }

    pub fn search_by_actor_name(&self, searched: &str) -> Result<Vec<Film>> {
        self.storage.search_by_actor_name(searched).map(sanitized)
    }
}
