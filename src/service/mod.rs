use crate::model::Sanitize;

pub mod actor;
pub mod film;
pub mod user;

#[cfg(test)]
pub(crate) mod fakes;

pub use actor::{ActorService, ActorStorage};
pub use film::{FilmService, FilmStorage, SortType};
pub use user::{UserService, UserStorage};

fn sanitized<T: Sanitize>(mut items: Vec<T>) -> Vec<T> {
    items.iter_mut().for_each(Sanitize::sanitize);
    items
}
