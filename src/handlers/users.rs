use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::{removal_cookie, SessionKeys, SessionUser};
use crate::errors::Result;
use crate::handlers::{ok, ok_id, update_mode, Envelope, STATUS_RESPONSE_SUCCESSFUL};
use crate::model::UserWithoutPassword;
use crate::service::UserService;

pub const RESPONSE_SUCCESSFUL_LOGOUT: &str = "Logged out successfully";
pub const RESPONSE_SUCCESSFUL_DELETE_USER: &str = "User deleted successfully";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/signup").route(web::post().to(sign_up)))
        .service(web::resource("/signin").route(web::post().to(sign_in)))
        .service(web::resource("/logout").route(web::post().to(logout)))
        .service(web::resource("/user/get").route(web::get().to(get_user)))
        .service(
            web::resource("/user/update")
                .route(web::patch().to(update_user))
                .route(web::put().to(update_user)),
        )
        .service(web::resource("/user/delete").route(web::delete().to(delete_user)));
}

/// Responds with the user and a fresh session cookie.
fn start_session(keys: &SessionKeys, user: UserWithoutPassword) -> Result<HttpResponse> {
    let token = keys.generate_token(user.id)?;
    Ok(HttpResponse::Ok()
        .cookie(keys.session_cookie(token))
        .json(Envelope {
            status: STATUS_RESPONSE_SUCCESSFUL,
            body: user,
        }))
}

fn end_session(message: &str) -> HttpResponse {
    HttpResponse::Ok().cookie(removal_cookie()).json(Envelope {
        status: STATUS_RESPONSE_SUCCESSFUL,
        body: message,
    })
}

async fn sign_up(
    service: web::Data<UserService>,
    keys: web::Data<SessionKeys>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let user = web::block(move || service.sign_up(&body)).await??;

    log::info!("signed up user id={}", user.id);
    start_session(&keys, user)
}

async fn sign_in(
    service: web::Data<UserService>,
    keys: web::Data<SessionKeys>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let user = web::block(move || service.sign_in(&body)).await??;

    log::info!("signed in user id={}", user.id);
    start_session(&keys, user)
}

async fn logout(user: SessionUser) -> Result<HttpResponse> {
    log::info!("logged out user id={}", user.id);
    Ok(end_session(RESPONSE_SUCCESSFUL_LOGOUT))
}

async fn get_user(service: web::Data<UserService>, user: SessionUser) -> Result<HttpResponse> {
    let service = service.into_inner();
    let user = web::block(move || service.get_user(user.id)).await??;

    Ok(ok(user))
}

async fn update_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    user: SessionUser,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let service = service.into_inner();
    let mode = update_mode(&req);
    web::block(move || service.update_user(&body, mode, user.id)).await??;

    log::info!("updated user id={}", user.id);
    Ok(ok_id(user.id))
}

async fn delete_user(service: web::Data<UserService>, user: SessionUser) -> Result<HttpResponse> {
    let service = service.into_inner();
    web::block(move || service.delete_user(user.id)).await??;

    log::info!("deleted user id={}", user.id);
    Ok(end_session(RESPONSE_SUCCESSFUL_DELETE_USER))
}
