use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::SessionUser;
use crate::errors::Result;
use crate::handlers::{ok, ok_id, update_mode, IdQuery};
use crate::service::FilmService;

pub const RESPONSE_SUCCESSFUL_DELETE_FILM: &str = "Film deleted successfully";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_type: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ActorIdQuery {
    pub actor_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub searched: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/film/add").route(web::post().to(add_film)))
        .service(web::resource("/film/get").route(web::get().to(get_film)))
        .service(
            web::resource("/film/update")
                .route(web::patch().to(update_film))
                .route(web::put().to(update_film)),
        )
        .service(web::resource("/film/delete").route(web::delete().to(delete_film)))
        .service(
            web::resource("/film/get_list_of_films_with_actor")
                .route(web::get().to(films_with_actor)),
        )
        .service(web::resource("/film/get_list_of_films").route(web::get().to(list_films)))
        .service(web::resource("/film/search_by_title").route(web::get().to(search_by_title)))
        .service(
            web::resource("/film/search_by_actors_name")
                .route(web::get().to(search_by_actors_name)),
        );
}

async fn add_film(
    service: web::Data<FilmService>,
    user: SessionUser,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let film_id = web::block(move || service.add_film(&body, user.id)).await??;

    log::info!("user {} added film id={}", user.id, film_id);
    Ok(ok_id(film_id))
}

async fn get_film(
    service: web::Data<FilmService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let film_id = query.id;
    let film = web::block(move || service.get_film(film_id)).await??;

    Ok(ok(film))
}

async fn update_film(
    req: HttpRequest,
    service: web::Data<FilmService>,
    user: SessionUser,
    query: web::Query<IdQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let mode = update_mode(&req);
    let film_id = query.id;
    web::block(move || service.update_film(&body, mode, film_id, user.id)).await??;

    log::info!("user {} updated film id={}", user.id, film_id);
    Ok(ok_id(film_id))
}

async fn delete_film(
    service: web::Data<FilmService>,
    user: SessionUser,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let film_id = query.id;
    web::block(move || service.delete_film(film_id, user.id)).await??;

    log::info!("user {} deleted film id={}", user.id, film_id);
    Ok(ok(RESPONSE_SUCCESSFUL_DELETE_FILM))
}

async fn films_with_actor(
    service: web::Data<FilmService>,
    query: web::Query<ActorIdQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let actor_id = query.actor_id;
    let films = web::block(move || service.films_with_actor(actor_id)).await??;

    Ok(ok(films))
}

async fn list_films(
    service: web::Data<FilmService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let limit = query.limit.unwrap_or(10);
    let offset = query.offset.unwrap_or(0);
    let sort_type = query.sort_type.unwrap_or(0);
    let films = web::block(move || service.list_films(limit, offset, sort_type)).await??;

    Ok(ok(films))
}

async fn search_by_title(
    service: web::Data<FilmService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let searched = query.into_inner().searched;
    let films = web::block(move || service.search_by_title(&searched)).await??;

    Ok(ok(films))
}

async fn search_by_actors_name(
    service: web::Data<FilmService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let searched = query.into_inner().searched;
    let films = web::block(move || service.search_by_actor_name(&searched)).await??;

    Ok(ok(films))
}
