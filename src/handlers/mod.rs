use actix_cors::Cors;
use actix_web::error::QueryPayloadError;
use actix_web::http::{header, Method};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::validate::UpdateMode;

pub mod actors;
pub mod films;
pub mod users;

pub const STATUS_RESPONSE_SUCCESSFUL: u16 = 200;

/// Body of every successful response.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub body: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseId {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

pub fn ok<T: Serialize>(body: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        status: STATUS_RESPONSE_SUCCESSFUL,
        body,
    })
}

pub fn ok_id(id: i64) -> HttpResponse {
    ok(ResponseId { id })
}

/// `PATCH` sends a subset of fields, `PUT` the whole entity.
pub fn update_mode(req: &HttpRequest) -> UpdateMode {
    if req.method() == actix_web::http::Method::PATCH {
        UpdateMode::Partial
    } else {
        UpdateMode::Full
    }
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        ApiError::validation("query", err.to_string()).into()
    })
}

/// Browser access from `allow_origin`, session cookie included.
pub fn cors(allow_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allow_origin)
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_header(header::CONTENT_TYPE)
        .supports_credentials()
        .max_age(3600)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(users::configure)
            .configure(films::configure)
            .configure(actors::configure),
    );
}
