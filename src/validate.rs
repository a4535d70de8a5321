//! Payload decoding and validation shared by the film, actor and user services.
//!
//! A draft is an entity without its identifier. Every field is optional so the
//! same type carries both full (`PUT`, create) and partial (`PATCH`) payloads;
//! [`UpdateMode`] decides whether a missing field is an error.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{ApiError, Entity, Result};
use crate::model::{NewActor, NewFilm};

const REQUIRED: &str = "required";
const REQUIRED_MESSAGE: &str = "non zero value required";
const GENDERS: [&str; 3] = ["male", "female", "other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Full,
    Partial,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct FilmDraft {
    #[validate(
        required(message = "non zero value required"),
        length(min = 1, max = 150, message = "Title length must be from 1 to 150")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "non zero value required"),
        length(min = 1, max = 1000, message = "Description length must be from 1 to 1000")
    )]
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[validate(
        required(message = "non zero value required"),
        range(min = 0, max = 10, message = "Rating must be from 0 to 10")
    )]
    pub rating: Option<i16>,
}

impl FilmDraft {
    fn trim(&mut self) {
        trim(&mut self.title);
        trim(&mut self.description);
    }

    pub fn to_insertable(&self, author_id: i64) -> Result<NewFilm<'_>> {
        Ok(NewFilm {
            author_id,
            title: self.title.as_deref().ok_or_else(|| missing("title"))?,
            description: self
                .description
                .as_deref()
                .ok_or_else(|| missing("description"))?,
            release_date: self.release_date,
            rating: self.rating.ok_or_else(|| missing("rating"))?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct ActorDraft {
    #[validate(
        required(message = "non zero value required"),
        length(min = 1, max = 256, message = "Name length must be from 1 to 256")
    )]
    pub name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl ActorDraft {
    fn trim(&mut self) {
        trim(&mut self.name);
        trim(&mut self.gender);
        self.gender = self.gender.take().map(|gender| gender.to_lowercase());
    }

    fn check_gender(&self, errors: &mut ValidationErrors) {
        if let Some(gender) = self.gender.as_deref() {
            if !GENDERS.contains(&gender) {
                let mut err = ValidationError::new("in");
                err.message = Some(Cow::from("Gender must be one of male, female, other"));
                errors.add("gender", err);
            }
        }
    }

    pub fn to_insertable(&self, author_id: i64) -> Result<NewActor<'_>> {
        Ok(NewActor {
            author_id,
            name: self.name.as_deref().ok_or_else(|| missing("name"))?,
            birthday: self.birthday,
            gender: self.gender.as_deref(),
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct UserDraft {
    #[validate(
        required(message = "non zero value required"),
        email(message = "Not valid email"),
        length(max = 256, message = "Email must be at most 256 symbols")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "non zero value required"),
        length(min = 6, message = "Password must be at least 6 symbols")
    )]
    pub password: Option<String>,
}

impl UserDraft {
    fn trim(&mut self) {
        trim(&mut self.email);
        if self.password.as_deref() == Some("") {
            self.password = None;
        }
    }

    /// Email and password of a fully validated draft.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        Ok((
            self.email.as_deref().ok_or_else(|| missing("email"))?,
            self.password.as_deref().ok_or_else(|| missing("password"))?,
        ))
    }
}

pub fn validate_film(body: &[u8], mode: UpdateMode) -> Result<FilmDraft> {
    let mut draft: FilmDraft = decode(body, Entity::Film)?;
    draft.trim();

    report(errors_of(&draft), mode)?;
    Ok(draft)
}

pub fn validate_actor(body: &[u8], mode: UpdateMode) -> Result<ActorDraft> {
    let mut draft: ActorDraft = decode(body, Entity::Actor)?;
    draft.trim();

    let mut errors = errors_of(&draft);
    draft.check_gender(&mut errors);
    report(errors, mode)?;
    Ok(draft)
}

pub fn validate_user(body: &[u8], mode: UpdateMode) -> Result<UserDraft> {
    let mut draft: UserDraft = decode(body, Entity::User)?;
    draft.trim();

    report(errors_of(&draft), mode)?;
    Ok(draft)
}

/// Sign-in payloads never reveal which field was wrong.
pub fn validate_credentials(body: &[u8]) -> Result<UserDraft> {
    validate_user(body, UpdateMode::Full).map_err(|e| match e {
        ApiError::Validation { field, message } => {
            log::info!("rejected credentials: {} error: {}", field, message);
            ApiError::InvalidCredentials
        }
        other => other,
    })
}

fn decode<T: DeserializeOwned>(body: &[u8], entity: Entity) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        log::info!("failed to decode {} payload: {}", entity, e);
        ApiError::InvalidJson(entity)
    })
}

fn trim(field: &mut Option<String>) {
    *field = field
        .take()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
}

fn missing(field: &str) -> ApiError {
    ApiError::validation(field, REQUIRED_MESSAGE)
}

fn errors_of<T: Validate>(draft: &T) -> ValidationErrors {
    match draft.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    }
}

/// Turns collected diagnostics into the first failure by field name. In
/// partial mode a `required` diagnostic only means the field was not sent.
fn report(errors: ValidationErrors, mode: UpdateMode) -> Result<()> {
    let mut failures: Vec<(String, &ValidationError)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |err| (field.to_string(), err)))
        .filter(|(_, err)| mode == UpdateMode::Full || err.code != REQUIRED)
        .collect();
    failures.sort_by(|a, b| a.0.cmp(&b.0));

    match failures.first() {
        None => Ok(()),
        Some((field, err)) => {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            log::info!("validation failed: {} error: {}", field, message);
            Err(ApiError::validation(field.clone(), message))
        }
    }
}
