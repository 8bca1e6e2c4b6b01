//! Extractors that answer with the API envelope on rejection

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::Json;
use http::request::Parts;
use serde::de::DeserializeOwned;

use shared::{AppError, AppResult};

/// `Json<T>` whose rejection is a 400 validation error
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}

/// `Query<T>` whose rejection is a 400 validation error
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_error(rejection)),
        }
    }
}

fn query_error(rejection: QueryRejection) -> AppError {
    AppError::validation(rejection.body_text())
}

/// Parse an optional JSON body; an empty body yields `T::default()`
pub fn optional_json<T>(body: &Bytes) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, serde::Deserialize)]
    struct Body {
        note: Option<String>,
    }

    #[test]
    fn test_optional_json() {
        let empty: Body = optional_json(&Bytes::new()).unwrap();
        assert!(empty.note.is_none());

        let parsed: Body = optional_json(&Bytes::from_static(br#"{"note":"hi"}"#)).unwrap();
        assert_eq!(parsed.note.as_deref(), Some("hi"));

        let err = optional_json::<Body>(&Bytes::from_static(b"{oops")).unwrap_err();
        assert_eq!(err.message, "Validation error");
    }
}
