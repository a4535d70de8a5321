use anyhow::anyhow;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use r2d2::Pool;

use crate::errors::Result;
use crate::schema::users;

pub mod actor;
pub mod film;
pub mod user;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| anyhow!("Failed to create pool: {}", e))
}

/// Runs `f` inside one transaction on a pooled connection. Any error rolls back.
pub(crate) fn transaction<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut PgConnection) -> Result<T>,
{
    let mut pooled = pool
        .get()
        .map_err(|e| anyhow!("Couldn't get db connection from pool: {}", e))?;
    let conn: &mut PgConnection = &mut pooled;
    conn.transaction(f)
}

/// An unknown user is not an admin.
pub(crate) fn is_user_admin(conn: &mut PgConnection, user_id: i64) -> Result<bool> {
    let is_admin = users::table
        .find(user_id)
        .select(users::is_admin)
        .first::<bool>(conn)
        .optional()?;
    Ok(is_admin.unwrap_or(false))
}

/// Builds a prefix-matching `tsquery` that ORs every searched word, e.g.
/// `"The Matrix"` becomes `the:* | matrix:*`. Characters with a meaning in
/// the `tsquery` syntax are dropped.
pub(crate) fn prefix_tsquery(input: &str) -> Option<String> {
    let terms: Vec<String> = input
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .map(|word| format!("{}:*", word))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" | "))
    }
}
