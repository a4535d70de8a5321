use std::future::{ready, Ready};

use actix_web::cookie::{time, Cookie};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use anyhow::anyhow;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub exp: i64,
    pub iss: String,
    pub sub: String,
    pub user_id: i64,
}

/// Signs and checks the session tokens carried by the session cookie.
#[derive(Clone)]
pub struct SessionKeys {
    secret: String,
    ttl: chrono::Duration,
}

impl SessionKeys {
    pub fn new(secret: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn generate_token(&self, user_id: i64) -> anyhow::Result<String> {
        let expiration = chrono::Utc::now() + self.ttl;
        let claims = SessionClaims {
            sub: "FilmLibraryClient".to_string(),
            iss: "FilmLibraryBackend".to_string(),
            exp: expiration.timestamp(),
            user_id,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| anyhow!("{}", e))
    }

    pub fn get_claims_and_validate(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(claims.claims)
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .finish()
    }
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// The caller identified by a valid session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
}

impl SessionUser {
    fn from_request_sync(req: &HttpRequest) -> Result<Self, ApiError> {
        let keys = req
            .app_data::<web::Data<SessionKeys>>()
            .ok_or_else(|| anyhow!("session keys are not configured"))?;
        let cookie = req.cookie(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;

        keys.get_claims_and_validate(cookie.value())
            .map(|claims| SessionUser {
                id: claims.user_id,
            })
            .map_err(|e| {
                log::info!("rejected session cookie: {}", e);
                ApiError::Unauthorized
            })
    }
}

impl FromRequest for SessionUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req))
    }
}
