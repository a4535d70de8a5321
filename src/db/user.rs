use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::changeset::UserChangeset;
use crate::db::{transaction, DbPool};
use crate::errors::{ApiError, Entity, Result};
use crate::model::{NewUser, User, UserWithoutPassword};
use crate::schema::users;
use crate::service::UserStorage;

pub struct PgUserStorage {
    pool: DbPool,
}

impl PgUserStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Whether `email` belongs to anyone other than `except`.
fn is_email_busy(conn: &mut PgConnection, email: &str, except: Option<i64>) -> Result<bool> {
    let mut query = users::table
        .filter(users::email.eq(email))
        .select(users::id)
        .into_boxed();
    if let Some(user_id) = except {
        query = query.filter(users::id.ne(user_id));
    }
    let owner = query.first::<i64>(conn).optional()?;
    Ok(owner.is_some())
}

/// A concurrent writer can take the email between the check and the write;
/// the unique constraint then reports it.
fn email_conflict(err: DieselError) -> ApiError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            log::info!("email already taken: {}", info.message());
            ApiError::EmailNotAvailable
        }
        other => other.into(),
    }
}

impl UserStorage for PgUserStorage {
    fn add_user(&self, email: &str, password_hash: &str) -> Result<UserWithoutPassword> {
        transaction(&self.pool, |conn| {
            if is_email_busy(conn, email, None)? {
                return Err(ApiError::EmailNotAvailable);
            }

            let user = diesel::insert_into(users::table)
                .values(NewUser {
                    email,
                    password: password_hash,
                })
                .returning(UserWithoutPassword::as_returning())
                .get_result(conn)
                .map_err(email_conflict)?;
            Ok(user)
        })
    }

    fn get_user(&self, user_id: i64) -> Result<UserWithoutPassword> {
        transaction(&self.pool, |conn| {
            users::table
                .find(user_id)
                .select(UserWithoutPassword::as_select())
                .first(conn)
                .optional()?
                .ok_or(ApiError::NotFound(Entity::User))
        })
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        transaction(&self.pool, |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(User::as_select())
                .first(conn)
                .optional()?
                .ok_or(ApiError::NotFound(Entity::User))
        })
    }

    fn update_user(&self, user_id: i64, changes: &UserChangeset) -> Result<()> {
        transaction(&self.pool, |conn| {
            if changes.is_empty() {
                return Err(ApiError::NoUpdateFields(Entity::User));
            }
            if let Some(email) = changes.email.as_deref() {
                if is_email_busy(conn, email, Some(user_id))? {
                    return Err(ApiError::EmailNotAvailable);
                }
            }

            let updated = diesel::update(users::table.find(user_id))
                .set(changes)
                .execute(conn)
                .map_err(email_conflict)?;
            if updated == 0 {
                return Err(ApiError::NotFound(Entity::User));
            }
            Ok(())
        })
    }

    fn delete_user(&self, user_id: i64) -> Result<()> {
        transaction(&self.pool, |conn| {
            let deleted = diesel::delete(users::table.find(user_id)).execute(conn)?;
            if deleted == 0 {
                return Err(ApiError::NotFound(Entity::User));
            }
            Ok(())
        })
    }
}
