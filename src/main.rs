use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use env_logger::Env;

use crate::auth::SessionKeys;
use crate::db::actor::PgActorStorage;
use crate::db::film::PgFilmStorage;
use crate::db::user::PgUserStorage;
use crate::service::{ActorService, FilmService, UserService};
use crate::settings::Settings;

mod auth;
mod changeset;
mod db;
mod errors;
mod handlers;
mod model;
mod schema;
mod service;
mod settings;
mod validate;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load()?;
    let pool = db::create_pool(&settings.database_url, settings.pool_max_size)?;

    let films = web::Data::new(FilmService::new(Arc::new(PgFilmStorage::new(pool.clone()))));
    let actors = web::Data::new(ActorService::new(Arc::new(PgActorStorage::new(pool.clone()))));
    let users = web::Data::new(UserService::new(
        Arc::new(PgUserStorage::new(pool)),
        settings.bcrypt_cost,
    ));
    let keys = web::Data::new(SessionKeys::new(
        settings.secret.clone(),
        chrono::Duration::hours(settings.session_ttl_hours),
    ));
    let allow_origin = settings.allow_origin.clone();

    log::info!("listening on {}:{}", settings.host, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(handlers::cors(&allow_origin))
            .app_data(keys.clone())
            .app_data(films.clone())
            .app_data(actors.clone())
            .app_data(users.clone())
            .app_data(handlers::query_config())
            .configure(handlers::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
