use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    /// Machine-readable error code.
    pub code: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.type_url = format!("https://errors.example.com/{code}");
        self.code = code;
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }
}

/// Renders a `Problem` with its status and the problem+json content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    ProblemResponse(
        Problem::new(status, title, detail)
            .with_code(code)
            .with_instance(instance),
    )
}

/// Map a domain error to an RFC 9457 response.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UnknownSortField { .. } | DomainError::UnknownSortDirection { .. } => {
            from_parts(
                StatusCode::BAD_REQUEST,
                "USERS_INVALID_SORT",
                "Invalid sort",
                e.to_string(),
                instance,
            )
        }
        DomainError::ZeroItemsPerPage => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_INVALID_PAGE_SIZE",
            "Invalid page size",
            e.to_string(),
            instance,
        ),
        DomainError::DuplicateId { .. }
        | DomainError::IdSpaceExhausted { .. }
        | DomainError::LoadFailed { .. } => {
            tracing::error!(error = ?e, "user data unavailable");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_UNAVAILABLE",
                "Internal error",
                "User data is unavailable",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_response_sets_status_and_content_type() {
        let resp = map_domain_error(
            &DomainError::unknown_sort_field("salary"),
            "/api/users/view",
        )
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let ProblemResponse(p) = map_domain_error(&DomainError::duplicate_id(3), "/x");
        assert_eq!(p.status, 500);
        assert_eq!(p.code, "USERS_UNAVAILABLE");
        assert!(!p.detail.contains('3'));
        assert_eq!(p.type_url, "https://errors.example.com/USERS_UNAVAILABLE");
    }
}
