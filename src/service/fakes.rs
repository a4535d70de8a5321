//! In-memory storage with the same authorization rules as the Postgres one.

use std::sync::Mutex;

use chrono::{Duration, NaiveDateTime};

use crate::changeset::{ActorChangeset, FilmChangeset, UserChangeset};
use crate::errors::{ApiError, Entity, Result};
use crate::model::{Actor, Film, User, UserWithoutPassword};
use crate::service::{ActorStorage, FilmStorage, SortType, UserStorage};
use crate::validate::{ActorDraft, FilmDraft};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    films: Vec<Film>,
    actors: Vec<Actor>,
    film_actor: Vec<(i64, i64)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing so "newest first" is well defined.
    fn created_at(&self) -> NaiveDateTime {
        NaiveDateTime::default() + Duration::seconds(self.next_id)
    }

    fn is_admin(&self, user_id: i64) -> bool {
        self.users.iter().any(|u| u.id == user_id && u.is_admin)
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<State>,
}

impl FakeCatalog {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn insert_user(&self, email: &str, is_admin: bool) -> i64 {
        let mut state = self.state();
        let id = state.next_id();
        let created_at = state.created_at();
        state.users.push(User {
            id,
            email: email.to_string(),
            password: String::new(),
            is_admin,
            created_at,
        });
        id
    }

    pub fn link(&self, film_id: i64, actor_id: i64) {
        self.state().film_actor.push((film_id, actor_id));
    }

    pub fn film_count(&self) -> usize {
        self.state().films.len()
    }

    pub fn raw_film(&self, film_id: i64) -> Film {
        self.state()
            .films
            .iter()
            .find(|f| f.id == film_id)
            .cloned()
            .unwrap()
    }

    pub fn raw_user(&self, user_id: i64) -> User {
        self.state()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .unwrap()
    }
}

/// Occurrences of the searched words in `text`; stands in for `ts_rank`.
fn match_count(text: &str, searched: &str) -> usize {
    let text = text.to_lowercase();
    searched
        .split_whitespace()
        .map(|word| text.matches(&word.to_lowercase()).count())
        .sum()
}

/// Matching films, best match first, ties in id order.
fn ranked(mut scored: Vec<(usize, Film)>) -> Vec<Film> {
    scored.retain(|(score, _)| *score > 0);
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
    scored.into_iter().map(|(_, film)| film).collect()
}

impl FilmStorage for FakeCatalog {
    fn add_film(&self, draft: &FilmDraft, user_id: i64) -> Result<i64> {
        let mut state = self.state();
        if !state.is_admin(user_id) {
            return Err(ApiError::NotAdmin(Entity::Film));
        }
        let new_film = draft.to_insertable(user_id)?;
        let film = Film {
            id: 0,
            author_id: new_film.author_id,
            title: new_film.title.to_string(),
            description: new_film.description.to_string(),
            release_date: new_film.release_date,
            rating: new_film.rating,
            created_at: state.created_at(),
        };
        let id = state.next_id();
        state.films.push(Film { id, ..film });
        Ok(id)
    }

    fn get_film(&self, film_id: i64) -> Result<Film> {
        self.state()
            .films
            .iter()
            .find(|f| f.id == film_id)
            .cloned()
            .ok_or(ApiError::NotFound(Entity::Film))
    }

    fn update_film(&self, film_id: i64, user_id: i64, changes: &FilmChangeset) -> Result<()> {
        let mut state = self.state();
        let film = state
            .films
            .iter_mut()
            .find(|f| f.id == film_id)
            .ok_or(ApiError::NotFound(Entity::Film))?;
        if film.author_id != user_id {
            return Err(ApiError::NotAuthor(Entity::Film));
        }
        if changes.is_empty() {
            return Err(ApiError::NoUpdateFields(Entity::Film));
        }
        if let Some(title) = &changes.title {
            film.title = title.clone();
        }
        if let Some(description) = &changes.description {
            film.description = description.clone();
        }
        if changes.release_date.is_some() {
            film.release_date = changes.release_date;
        }
        if let Some(rating) = changes.rating {
            film.rating = rating;
        }
        Ok(())
    }

    fn delete_film(&self, film_id: i64, user_id: i64) -> Result<()> {
        let mut state = self.state();
        let position = state.films.iter().position(|f| f.id == film_id);
        match position {
            None => Err(ApiError::NotFound(Entity::Film)),
            Some(i) if state.films[i].author_id != user_id => Err(ApiError::NotAuthor(Entity::Film)),
            Some(i) => {
                state.films.remove(i);
                state.film_actor.retain(|(film, _)| *film != film_id);
                Ok(())
            }
        }
    }

    fn films_with_actor(&self, actor_id: i64) -> Result<Vec<Film>> {
        let state = self.state();
        Ok(state
            .films
            .iter()
            .filter(|f| state.film_actor.contains(&(f.id, actor_id)))
            .cloned()
            .collect())
    }

    fn list_films(&self, limit: i64, offset: i64, sort: SortType) -> Result<Vec<Film>> {
        let mut films = self.state().films.clone();
        match sort {
            SortType::Rating => films.sort_by(|a, b| b.rating.cmp(&a.rating)),
            SortType::CreatedAt => films.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortType::Title => films.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        Ok(films
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    fn search_by_title(&self, searched: &str) -> Result<Vec<Film>> {
        let scored = self
            .state()
            .films
            .iter()
            .map(|f| (match_count(&f.title, searched), f.clone()))
            .collect();
        Ok(ranked(scored))
    }

    fn search_by_actor_name(&self, searched: &str) -> Result<Vec<Film>> {
        let state = self.state();
        let scored = state
            .films
            .iter()
            .map(|f| {
                let best = state
                    .actors
                    .iter()
                    .filter(|a| state.film_actor.contains(&(f.id, a.id)))
                    .map(|a| match_count(&a.name, searched))
                    .max()
                    .unwrap_or(0);
                (best, f.clone())
            })
            .collect();
        Ok(ranked(scored))
    }
}

impl ActorStorage for FakeCatalog {
    fn add_actor(&self, draft: &ActorDraft, user_id: i64) -> Result<i64> {
        let mut state = self.state();
        if !state.is_admin(user_id) {
            return Err(ApiError::NotAdmin(Entity::Actor));
        }
        let new_actor = draft.to_insertable(user_id)?;
        let actor = Actor {
            id: 0,
            author_id: new_actor.author_id,
            name: new_actor.name.to_string(),
            birthday: new_actor.birthday,
            gender: new_actor.gender.map(str::to_string),
            created_at: state.created_at(),
        };
        let id = state.next_id();
        state.actors.push(Actor { id, ..actor });
        Ok(id)
    }

    fn get_actor(&self, actor_id: i64) -> Result<Actor> {
        self.state()
            .actors
            .iter()
            .find(|a| a.id == actor_id)
            .cloned()
            .ok_or(ApiError::NotFound(Entity::Actor))
    }

    fn update_actor(&self, actor_id: i64, user_id: i64, changes: &ActorChangeset) -> Result<()> {
        let mut state = self.state();
        let actor = state
            .actors
            .iter_mut()
            .find(|a| a.id == actor_id)
            .ok_or(ApiError::NotFound(Entity::Actor))?;
        if actor.author_id != user_id {
            return Err(ApiError::NotAuthor(Entity::Actor));
        }
        if changes.is_empty() {
            return Err(ApiError::NoUpdateFields(Entity::Actor));
        }
        if let Some(name) = &changes.name {
            actor.name = name.clone();
        }
        if changes.birthday.is_some() {
            actor.birthday = changes.birthday;
        }
        if changes.gender.is_some() {
            actor.gender = changes.gender.clone();
        }
        Ok(())
    }

    fn delete_actor(&self, actor_id: i64, user_id: i64) -> Result<()> {
        let mut state = self.state();
        let position = state.actors.iter().position(|a| a.id == actor_id);
        match position {
            None => Err(ApiError::NotFound(Entity::Actor)),
            Some(i) if state.actors[i].author_id != user_id => {
                Err(ApiError::NotAuthor(Entity::Actor))
            }
            Some(i) => {
                state.actors.remove(i);
                state.film_actor.retain(|(_, actor)| *actor != actor_id);
                Ok(())
            }
        }
    }

    fn actors_in_film(&self, film_id: i64) -> Result<Vec<Actor>> {
        let state = self.state();
        Ok(state
            .actors
            .iter()
            .filter(|a| state.film_actor.contains(&(film_id, a.id)))
            .cloned()
            .collect())
    }
}

impl UserStorage for FakeCatalog {
    fn add_user(&self, email: &str, password_hash: &str) -> Result<UserWithoutPassword> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == email) {
            return Err(ApiError::EmailNotAvailable);
        }
        let id = state.next_id();
        let user = User {
            id,
            email: email.to_string(),
            password: password_hash.to_string(),
            is_admin: false,
            created_at: state.created_at(),
        };
        state.users.push(user.clone());
        Ok(user.into())
    }

    fn get_user(&self, user_id: i64) -> Result<UserWithoutPassword> {
        self.state()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .map(UserWithoutPassword::from)
            .ok_or(ApiError::NotFound(Entity::User))
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.state()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(ApiError::NotFound(Entity::User))
    }

    fn update_user(&self, user_id: i64, changes: &UserChangeset) -> Result<()> {
        let mut state = self.state();
        if let Some(email) = &changes.email {
            if state.users.iter().any(|u| u.id != user_id && &u.email == email) {
                return Err(ApiError::EmailNotAvailable);
            }
        }
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ApiError::NotFound(Entity::User))?;
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(password) = &changes.password {
            user.password = password.clone();
        }
        Ok(())
    }

    fn delete_user(&self, user_id: i64) -> Result<()> {
        let mut state = self.state();
        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        if state.users.len() == before {
            return Err(ApiError::NotFound(Entity::User));
        }
        Ok(())
    }
}
