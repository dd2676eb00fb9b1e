use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use carlot_types::api::FieldError;

use crate::error::ApiError;

/// JSON body that has been deserialized into its typed request and passed
/// its validation rules before the handler sees it.
///
/// Syntax errors and a wrong content type are a plain 400. A missing or
/// wrongly typed field is reported against that field, like a failed rule.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let value: T = serde_path_to_error::deserialize(raw)
            .map_err(|e| ApiError::Validation(vec![field_error(&e)]))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters, rejected as an `{error}` body.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string, rejected as an `{error}` body.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Name the field a deserialization error is about. serde reports a missing
/// or unknown field against its parent object, so that name comes from the
/// message instead of the path.
fn field_error(err: &serde_path_to_error::Error<serde_json::Error>) -> FieldError {
    let message = err.inner().to_string();

    let path = err.path().to_string();
    let parent = if path == "." { None } else { Some(path) };

    let (field, message) = match quoted_name(&message) {
        Some(name) if message.starts_with("missing field") => {
            let name = name.to_string();
            let text = format!("{} is required", name);
            (name, text)
        }
        Some(name) if message.starts_with("unknown field") => {
            let name = name.to_string();
            let text = format!("{} is not allowed", name);
            (name, text)
        }
        _ => (String::new(), message),
    };

    let field = match (parent, field.is_empty()) {
        (Some(parent), true) => parent,
        (Some(parent), false) if parent == field || parent.ends_with(&format!(".{}", field)) => parent,
        (Some(parent), false) => format!("{}.{}", parent, field),
        (None, true) => "body".to_string(),
        (None, false) => field,
    };

    FieldError { field, message }
}

/// The first `backticked` name in a serde message.
fn quoted_name(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}
