//! Shorthand constructors used by handlers.

use super::envelope::{HttpResponse, NOT_FOUND_MESSAGE};
use http::StatusCode;

/// 200 with no body.
#[must_use]
pub fn ok<T>() -> HttpResponse<T> {
    HttpResponse::status(StatusCode::OK)
}

/// 200 with `model` as JSON.
#[must_use]
pub fn ok_with<T>(model: T) -> HttpResponse<T> {
    HttpResponse::with_model(model, StatusCode::OK)
}

/// 201 with no body.
#[must_use]
pub fn created<T>() -> HttpResponse<T> {
    HttpResponse::status(StatusCode::CREATED)
}

/// 201 with `model` as JSON.
#[must_use]
pub fn created_with<T>(model: T) -> HttpResponse<T> {
    HttpResponse::with_model(model, StatusCode::CREATED)
}

/// 204.
#[must_use]
pub fn no_content<T>() -> HttpResponse<T> {
    HttpResponse::status(StatusCode::NO_CONTENT)
}

/// 204 carrying a model.
///
/// The model travels through the adapter like any other payload, but the
/// server never writes a body for a 204.
#[must_use]
pub fn no_content_with<T>(model: T) -> HttpResponse<T> {
    HttpResponse::with_model(model, StatusCode::NO_CONTENT)
}

/// 404 with the canonical [`NOT_FOUND_MESSAGE`].
#[must_use]
pub fn not_found<T>() -> HttpResponse<T> {
    HttpResponse::failure(NOT_FOUND_MESSAGE, StatusCode::NOT_FOUND)
}

/// 409 with `message`.
///
/// # Panics
///
/// Panics when `message` is blank; see [`HttpResponse::failure`].
#[must_use]
pub fn conflict<T>(message: impl Into<String>) -> HttpResponse<T> {
    HttpResponse::failure(message, StatusCode::CONFLICT)
}
