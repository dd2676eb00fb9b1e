use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};
use validator::ValidationErrors;

use carlot_types::api::{ErrorResponse, FieldError, ValidationErrorResponse};

use crate::token::AuthError;

/// Every way a request can fail. Rendered as `{errors: [...]}` for field
/// validation and `{error: "..."}` for everything else.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} with this name already exists")]
    DuplicateName(&'static str),

    #[error("tag is already assigned to this listing")]
    DuplicateAssignment,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Deliberately the same for an unknown name and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The reason is logged, never sent to the client.
    #[error("unauthenticated")]
    Unauthenticated(#[from] AuthError),

    #[error("you are not allowed to modify this {0}")]
    Forbidden(&'static str),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::BadRequest(_)
            | Self::DuplicateName(_)
            | Self::DuplicateAssignment => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: camel_case(&field),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        // HashMap order is random; keep responses stable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation(fields)
    }
}

/// `image_link` -> `imageLink`, matching the JSON the client sent.
pub(crate) fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            Self::Validation(errors) => {
                (status, Json(ValidationErrorResponse { errors })).into_response()
            }
            other => {
                match &other {
                    Self::Internal(e) => error!("Internal error: {:#}", e),
                    Self::Unauthenticated(reason) => debug!("Rejected bearer token: {}", reason),
                    _ => {}
                }

                (status, Json(ErrorResponse { error: other.to_string() })).into_response()
            }
        }
    }
}
