//! Sparse `UPDATE` payloads built from validated drafts.
//!
//! A `None` field is left out of the `SET` clause by diesel, so a changeset
//! only ever touches the columns the caller supplied.

use chrono::NaiveDate;
use diesel::AsChangeset;

use crate::errors::{ApiError, Entity, Result};
use crate::schema::{actor, film, users};
use crate::validate::{ActorDraft, FilmDraft, UserDraft};

#[derive(Debug, Default, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = film)]
pub struct FilmChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<i16>,
}

impl FilmChangeset {
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.title.is_some() {
            columns.push("title");
        }
        if self.description.is_some() {
            columns.push("description");
        }
        if self.release_date.is_some() {
            columns.push("release_date");
        }
        if self.rating.is_some() {
            columns.push("rating");
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = actor)]
pub struct ActorChangeset {
    pub name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl ActorChangeset {
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.name.is_some() {
            columns.push("name");
        }
        if self.birthday.is_some() {
            columns.push("birthday");
        }
        if self.gender.is_some() {
            columns.push("gender");
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}

/// `password` holds the bcrypt hash by the time it reaches storage.
#[derive(Debug, Default, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserChangeset {
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.email.is_some() {
            columns.push("email");
        }
        if self.password.is_some() {
            columns.push("password");
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}

pub fn compose_film(draft: FilmDraft) -> Result<FilmChangeset> {
    let changes = FilmChangeset {
        title: draft.title,
        description: draft.description,
        release_date: draft.release_date,
        rating: draft.rating,
    };
    non_empty(changes.is_empty(), Entity::Film)?;
    Ok(changes)
}

pub fn compose_actor(draft: ActorDraft) -> Result<ActorChangeset> {
    let changes = ActorChangeset {
        name: draft.name,
        birthday: draft.birthday,
        gender: draft.gender,
    };
    non_empty(changes.is_empty(), Entity::Actor)?;
    Ok(changes)
}

pub fn compose_user(draft: UserDraft) -> Result<UserChangeset> {
    let changes = UserChangeset {
        email: draft.email,
        password: draft.password,
    };
    non_empty(changes.is_empty(), Entity::User)?;
    Ok(changes)
}

fn non_empty(empty: bool, entity: Entity) -> Result<()> {
    if empty {
        log::info!("no {} fields to update", entity);
        return Err(ApiError::NoUpdateFields(entity));
    }
    Ok(())
}
