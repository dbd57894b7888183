//! Convenience type aliases for common handler return types.

use crate::error::HttpError;
use axum::http::StatusCode;
use axum::Json;

/// Flexible result alias for any response type with [`HttpError`].
pub type ApiResult<T> = Result<T, HttpError>;

/// The most common handler return type, `Result<Json<T>, HttpError>`.
///
/// ```ignore
/// async fn list(state: State<S>) -> JsonResult<Vec<Task>> {
///     Ok(Json(state.service().find(filter).await?))
/// }
/// ```
pub type JsonResult<T> = Result<Json<T>, HttpError>;

/// Shorthand for endpoints that return only a status code (e.g. DELETE).
pub type StatusResult = Result<StatusCode, HttpError>;
