// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the Tidelab SDK.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Message used when a failed response carries no usable one.
const FALLBACK_MESSAGE: &str = "An error occurred.";

/// Diagnostic payload extracted from a failed API response.
///
/// The platform reports failures as a JSON object with a `message` field
/// (plus endpoint-specific extras), occasionally as a bare JSON array, and
/// in degraded cases as plain text. All three shapes end up here.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code of the failed response.
    pub status: StatusCode,
    /// Human-readable message: the `message` field when the body is a JSON
    /// object, the raw body text when it is not JSON.
    pub message: String,
    /// Complete JSON body, kept whenever the body parsed as valid JSON.
    pub data: Option<serde_json::Value>,
}

impl ApiError {
    fn new(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(json) => {
                let message = json
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or(FALLBACK_MESSAGE)
                    .to_string();
                Self {
                    status,
                    message,
                    data: Some(json),
                }
            }
            Err(_) => {
                let message = if body.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    body.to_string()
                };
                Self {
                    status,
                    message,
                    data: None,
                }
            }
        }
    }

    /// Items of a JSON-array error body, when the server returned one.
    pub fn items(&self) -> Option<&[serde_json::Value]> {
        self.data
            .as_ref()
            .and_then(serde_json::Value::as_array)
            .map(Vec::as_slice)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {})", self.message, self.status.as_u16())
    }
}

/// Errors that can occur when using the SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// 400: malformed or invalid request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(ApiError),

    /// 401: missing or invalid credential.
    #[error("unauthorized: {0}")]
    Unauthorized(ApiError),

    /// 403: valid credential, insufficient permission.
    #[error("forbidden: {0}")]
    Forbidden(ApiError),

    /// 404: the resource does not exist or is not accessible.
    #[error("not found: {0}")]
    NotFound(ApiError),

    /// 5xx: server-side failure.
    #[error("internal server error: {0}")]
    InternalServerError(ApiError),

    /// Any other non-2xx status.
    #[error("api error: {0}")]
    Api(ApiError),

    /// Transport-level failure (connect, TLS, request timeout, body decode).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A client-side precondition was violated; no request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Client configuration could not be assembled.
    #[error("configuration error: {0}")]
    Config(String),

    /// A polled resource did not reach a terminal state within the deadline.
    #[error("{resource_id} did not reach a terminal state within {timeout:?}")]
    Timeout {
        resource_id: String,
        timeout: Duration,
    },
}

impl Error {
    /// Classify a failed response by status code, extracting the payload.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let api = ApiError::new(status, body);
        match status.as_u16() {
            400 => Error::BadRequest(api),
            401 => Error::Unauthorized(api),
            403 => Error::Forbidden(api),
            404 => Error::NotFound(api),
            500..=599 => Error::InternalServerError(api),
            _ => Error::Api(api),
        }
    }

    /// HTTP status of the failed response, when the error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadRequest(api)
            | Error::Unauthorized(api)
            | Error::Forbidden(api)
            | Error::NotFound(api)
            | Error::InternalServerError(api)
            | Error::Api(api) => Some(api.status),
            Error::Http(err) => err.status(),
            Error::InvalidArgument(_) | Error::Config(_) | Error::Timeout { .. } => None,
        }
    }

    /// Server-provided diagnostic payload, when present.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::BadRequest(api)
            | Error::Unauthorized(api)
            | Error::Forbidden(api)
            | Error::NotFound(api)
            | Error::InternalServerError(api)
            | Error::Api(api) => Some(api),
            _ => None,
        }
    }
}
