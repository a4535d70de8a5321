use std::fmt;

use actix_web::body::BoxBody;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, ApiError>;

/// The catalog record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Film,
    Actor,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Film => "film",
            Entity::Actor => "actor",
            Entity::User => "user",
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{field} error: {message}")]
    Validation { field: String, message: String },
    #[error("Invalid {0} json")]
    InvalidJson(Entity),
    #[error("This {0} was not found")]
    NotFound(Entity),
    #[error("Only the author can change this {0}")]
    NotAuthor(Entity),
    #[error("Only an administrator can add a {0}")]
    NotAdmin(Entity),
    #[error("There are no {0} fields to update")]
    NoUpdateFields(Entity),
    #[error("Could not update the {0}")]
    UpdateFailed(Entity),
    #[error("The Email is not available")]
    EmailNotAvailable,
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unspecified internal error ocurred")]
    InternalError(#[from] anyhow::Error),
    #[error("An unspecified internal error ocurred")]
    DatabaseError(#[from] BlockingError),
}

impl From<diesel::result::Error> for ApiError {
    fn from(value: diesel::result::Error) -> Self {
        ApiError::InternalError(anyhow::Error::new(value))
    }
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn get_error_code(&self) -> String {
        match self {
            ApiError::Validation { .. } => "VE-00400".to_string(),
            ApiError::InvalidJson(_) => "IJ-00400".to_string(),
            ApiError::NotFound(_) => "NF-00404".to_string(),
            ApiError::NotAuthor(_) => "NAU-00403".to_string(),
            ApiError::NotAdmin(_) => "NAD-00403".to_string(),
            ApiError::NoUpdateFields(_) => "NUF-00400".to_string(),
            ApiError::UpdateFailed(_) => "UF-00409".to_string(),
            ApiError::EmailNotAvailable => "ENA-00400".to_string(),
            ApiError::InvalidCredentials => "IC-00400".to_string(),
            ApiError::Unauthorized => "UA-00401".to_string(),
            ApiError::InternalError(_) => "IE-00500".to_string(),
            ApiError::DatabaseError(_) => "DE-00500".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    pub timestamp: NaiveDateTime,
    pub internal_code: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(value: &ApiError) -> Self {
        Self {
            message: value.to_string(),
            status: value.status_code().as_u16(),
            timestamp: chrono::Utc::now().naive_utc(),
            internal_code: value.get_error_code(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAuthor(_) => StatusCode::FORBIDDEN,
            ApiError::NotAdmin(_) => StatusCode::FORBIDDEN,
            ApiError::NoUpdateFields(_) => StatusCode::BAD_REQUEST,
            ApiError::UpdateFailed(_) => StatusCode::CONFLICT,
            ApiError::EmailNotAvailable => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            ApiError::InternalError(e) => log::error!("{:?}", e),
            ApiError::DatabaseError(e) => log::error!("{}", e),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(self))
    }
}
