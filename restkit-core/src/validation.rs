use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HttpError;

// ── Error types ────────────────────────────────────────────

/// A field-level validation error.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

/// Container for validation errors, used as the payload of `HttpError::Validation`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

// ── Validation pipe ────────────────────────────────────────

/// Request-payload validation pipe, expressed as a body extractor.
///
/// `Validated<T>` deserializes the JSON body into `T` and runs its `garde`
/// rules before the handler body executes. A malformed body or a failing
/// rule short-circuits with 400 and a structured
/// `{ "error": ..., "details": [{field, message, code}] }` response.
///
/// ```ignore
/// async fn create(Validated(body): Validated<CreateTask>) -> JsonResult<Task> { ... }
/// ```
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + garde::Validate,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject_body)?;
        value
            .validate()
            .map_err(|report| convert_garde_report(&report))?;
        Ok(Validated(value))
    }
}

fn reject_body(rejection: JsonRejection) -> Response {
    HttpError::BadRequest(rejection.body_text()).into_response()
}

fn convert_garde_report(report: &garde::Report) -> Response {
    let mut field_errors = Vec::new();

    for (path, error) in report.iter() {
        let field = {
            let s = path.to_string();
            if s.is_empty() {
                "value".to_string()
            } else {
                s
            }
        };
        field_errors.push(FieldError {
            field,
            message: error.message().to_string(),
            code: "validation".to_string(),
        });
    }

    HttpError::Validation(ValidationErrorResponse {
        errors: field_errors,
    })
    .into_response()
}

// Re-export garde::Validate for convenience.
pub use garde::Validate;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::StatusCode;

    #[derive(Debug, serde::Deserialize, garde::Validate)]
    struct CreateThing {
        #[garde(length(min = 1, max = 10))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let req = json_request(r#"{"name": "a"}"#);
        let Validated(value) = Validated::<CreateThing>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(value.name, "a");
    }

    #[tokio::test]
    async fn rejects_failing_rule_with_400() {
        let req = json_request(r#"{"name": ""}"#);
        let resp = Validated::<CreateThing>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_malformed_body_with_400() {
        let req = json_request("not json");
        let resp = Validated::<CreateThing>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
