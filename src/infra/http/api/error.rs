use std::error::Error as StdError;

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    application::{error::ErrorReport, resolver::ResolveError},
    domain::types::ResourceKind,
};

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INVALID_QUERY: &str = "invalid_query";
    pub const NOT_FOUND: &str = "not_found";
    pub const TYPE_NOT_FOUND: &str = "type_not_found";
    pub const WEAKNESSES_NOT_FOUND: &str = "weaknesses_not_found";
    pub const CREATURE_NOT_FOUND: &str = "creature_not_found";
    pub const PAGE_NOT_FOUND: &str = "page_not_found";
    pub const LEVEL_NOT_FOUND: &str = "level_not_found";
    pub const EVOLUTION_TYPE_NOT_FOUND: &str = "evolution_type_not_found";
    pub const INTERNAL: &str = "internal_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            report: None,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn not_found(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, hint)
    }

    /// 500 whose public body stays generic while the log keeps the full chain.
    pub fn internal(error: &dyn StdError) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self {
            report: Some(ErrorReport::from_error(
                "infra::http::api",
                status,
                error,
            )),
            ..Self::new(status, codes::INTERNAL, "Internal server error", None)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Malformed query string", Some(rejection.body_text()))
    }
}

impl From<ResolveError> for ApiError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::InvalidQuery(err) => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_QUERY,
                "Invalid query parameter",
                Some(err.to_string()),
            ),
            ResolveError::IdentifierNotFound { kind, identifier } => {
                let (code, message) = match kind {
                    ResourceKind::Types => (codes::TYPE_NOT_FOUND, "Type not found"),
                    ResourceKind::Creatures => (codes::CREATURE_NOT_FOUND, "Creature not found"),
                    ResourceKind::ExtinctionLevels => {
                        (codes::LEVEL_NOT_FOUND, "Extinction level not found")
                    }
                    ResourceKind::EvolutionTypes => {
                        (codes::EVOLUTION_TYPE_NOT_FOUND, "Evolution type not found")
                    }
                };
                Self::new(
                    StatusCode::NOT_FOUND,
                    code,
                    message,
                    Some(format!("no record has identifier `{identifier}`")),
                )
            }
            ResolveError::NoMatches { kind } => {
                let (code, message) = match kind {
                    ResourceKind::Types => (
                        codes::WEAKNESSES_NOT_FOUND,
                        "No type has all of the requested weaknesses",
                    ),
                    ResourceKind::Creatures => (
                        codes::CREATURE_NOT_FOUND,
                        "No creature matches the requested filters",
                    ),
                    ResourceKind::ExtinctionLevels | ResourceKind::EvolutionTypes => {
                        (codes::NOT_FOUND, "No record matches the requested filters")
                    }
                };
                Self::new(StatusCode::NOT_FOUND, code, message, None)
            }
            ResolveError::PageNotFound { page, total_pages } => Self::new(
                StatusCode::NOT_FOUND,
                codes::PAGE_NOT_FOUND,
                "Page not found",
                Some(format!("page {page} requested, {total_pages} available")),
            ),
            ResolveError::Payload(err) => Self::internal(&err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message(
                "infra::http::api",
                self.status,
                format!(
                    "{}: {}",
                    self.code,
                    self.hint.as_deref().unwrap_or(self.message)
                ),
            )
        });
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}
