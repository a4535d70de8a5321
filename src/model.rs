use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::*;

/// Strips unsafe markup from free-text fields before they leave the service.
pub trait Sanitize {
    fn sanitize(&mut self);
}

fn clean(text: &mut String) {
    *text = ammonia::clean(text);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = film)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Film {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub rating: i16,
    pub created_at: NaiveDateTime,
}

impl Sanitize for Film {
    fn sanitize(&mut self) {
        clean(&mut self.title);
        clean(&mut self.description);
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = film)]
pub struct NewFilm<'a> {
    pub author_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub release_date: Option<NaiveDate>,
    pub rating: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = actor)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Actor {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Sanitize for Actor {
    fn sanitize(&mut self) {
        clean(&mut self.name);
        if let Some(gender) = self.gender.as_mut() {
            clean(gender);
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = actor)]
pub struct NewActor<'a> {
    pub author_id: i64,
    pub name: &'a str,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<&'a str>,
}

/// A full user row, password hash included. Never serialized.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserWithoutPassword {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserWithoutPassword {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            is_admin: value.is_admin,
            created_at: value.created_at,
        }
    }
}

impl Sanitize for UserWithoutPassword {
    fn sanitize(&mut self) {
        clean(&mut self.email);
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
}
