use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::SessionUser;
use crate::errors::Result;
use crate::handlers::{ok, ok_id, update_mode, IdQuery};
use crate::service::ActorService;

pub const RESPONSE_SUCCESSFUL_DELETE_ACTOR: &str = "Actor deleted successfully";

#[derive(Debug, Deserialize)]
pub struct FilmIdQuery {
    pub film_id: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/actor/add").route(web::post().to(add_actor)))
        .service(web::resource("/actor/get").route(web::get().to(get_actor)))
        .service(
            web::resource("/actor/update")
                .route(web::patch().to(update_actor))
                .route(web::put().to(update_actor)),
        )
        .service(web::resource("/actor/delete").route(web::delete().to(delete_actor)))
        .service(
            web::resource("/actor/get_list_of_actors_in_film")
                .route(web::get().to(actors_in_film)),
        );
}

async fn add_actor(
    service: web::Data<ActorService>,
    user: SessionUser,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let actor_id = web::block(move || service.add_actor(&body, user.id)).await??;

    log::info!("user {} added actor id={}", user.id, actor_id);
    Ok(ok_id(actor_id))
}

async fn get_actor(
    service: web::Data<ActorService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let actor_id = query.id;
    let actor = web::block(move || service.get_actor(actor_id)).await??;

    Ok(ok(actor))
}

async fn update_actor(
    req: HttpRequest,
    service: web::Data<ActorService>,
    user: SessionUser,
    query: web::Query<IdQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let mode = update_mode(&req);
    let actor_id = query.id;
    web::block(move || service.update_actor(&body, mode, actor_id, user.id)).await??;

    log::info!("user {} updated actor id={}", user.id, actor_id);
    Ok(ok_id(actor_id))
}

async fn delete_actor(
    service: web::Data<ActorService>,
    user: SessionUser,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let actor_id = query.id;
    web::block(move || service.delete_actor(actor_id, user.id)).await??;

    log::info!("user {} deleted actor id={}", user.id, actor_id);
    Ok(ok(RESPONSE_SUCCESSFUL_DELETE_ACTOR))
}

async fn actors_in_film(
    service: web::Data<ActorService>,
    query: web::Query<FilmIdQuery>,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let film_id = query.film_id;
    let actors = web::block(move || service.actors_in_film(film_id)).await??;

    Ok(ok(actors))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use crate::errors::ErrorResponse;
    use crate::handlers::tests::{test_app, TestContext};
    use crate::handlers::{Envelope, ResponseId};
    use crate::model::Actor;

    const ACTOR: &str = r#"{"name":"Keanu Reeves","birthday":"1964-09-02","gender":"Male"}"#;

    #[actix_web::test]
    async fn admin_adds_actor_with_normalized_gender() {
        let ctx = TestContext::new();
        let admin = ctx.catalog.insert_user("admin@films.io", true);
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/actor/add")
            .cookie(ctx.cookie_for(admin))
            .set_payload(ACTOR)
            .to_request();
        let created: Envelope<ResponseId> = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/actor/get?id={}", created.body.id))
            .to_request();
        let actor: Envelope<Actor> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(actor.body.name, "Keanu Reeves");
        assert_eq!(actor.body.gender.as_deref(), Some("male"));
    }

    #[actix_web::test]
    async fn unknown_gender_is_rejected() {
        let ctx = TestContext::new();
        let admin = ctx.catalog.insert_user("admin@films.io", true);
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/actor/add")
            .cookie(ctx.cookie_for(admin))
            .set_payload(r#"{"name":"Keanu Reeves","gender":"robot"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.internal_code, "VE-00400");
    }

    #[actix_web::test]
    async fn only_the_author_updates() {
        let ctx = TestContext::new();
        let admin = ctx.catalog.insert_user("admin@films.io", true);
        let other = ctx.catalog.insert_user("other@films.io", true);
        let actor_id = ctx.actors.add_actor(ACTOR.as_bytes(), admin).unwrap();
        let app = test_app!(ctx);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/actor/update?id={}", actor_id))
            .cookie(ctx.cookie_for(other))
            .set_payload(r#"{"name":"Neo"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.internal_code, "NAU-00403");

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/actor/update?id={}", actor_id))
            .cookie(ctx.cookie_for(admin))
            .set_payload(r#"{"name":"Neo"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(ctx.actors.get_actor(actor_id).unwrap().name, "Neo");
    }

    #[actix_web::test]
    async fn empty_patch_has_no_fields() {
        let ctx = TestContext::new();
        let admin = ctx.catalog.insert_user("admin@films.io", true);
        let actor_id = ctx.actors.add_actor(ACTOR.as_bytes(), admin).unwrap();
        let app = test_app!(ctx);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/actor/update?id={}", actor_id))
            .cookie(ctx.cookie_for(admin))
            .set_payload("{}")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.internal_code, "NUF-00400");
    }

    #[actix_web::test]
    async fn lists_the_cast_of_a_film() {
        let ctx = TestContext::new();
        let admin = ctx.catalog.insert_user("admin@films.io", true);
        let film_id = ctx
            .films
            .add_film(br#"{"title":"Speed","description":"Bus","rating":7}"#, admin)
            .unwrap();
        let actor_id = ctx.actors.add_actor(ACTOR.as_bytes(), admin).unwrap();
        ctx.actors
            .add_actor(br#"{"name":"Carrie-Anne Moss"}"#, admin)
            .unwrap();
        ctx.catalog.link(film_id, actor_id);
        let app = test_app!(ctx);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/actor/get_list_of_actors_in_film?film_id={}", film_id))
            .to_request();
        let cast: Envelope<Vec<Actor>> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(cast.body.len(), 1);
        assert_eq!(cast.body[0].id, actor_id);
    }

    #[actix_web::test]
    async fn deleted_actor_is_gone() {
        let ctx = TestContext::new();
        let admin = ctx.catalog.insert_user("admin@films.io", true);
        let actor_id = ctx.actors.add_actor(ACTOR.as_bytes(), admin).unwrap();
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/actor/delete?id={}", actor_id))
            .cookie(ctx.cookie_for(admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/actor/get?id={}", actor_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
