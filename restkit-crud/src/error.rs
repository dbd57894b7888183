use restkit_core::HttpError;

/// Errors surfaced by a [`CrudService`](crate::CrudService) implementation.
#[derive(Debug)]
pub enum CrudError {
    NotFound(String),
    Conflict(String),
    Database(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl CrudError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by service implementations to wrap driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        CrudError::Database(Box::new(err))
    }
}

impl std::fmt::Display for CrudError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrudError::NotFound(msg) => write!(f, "Not found: {msg}"),
            CrudError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            CrudError::Database(err) => write!(f, "Database error: {err}"),
            CrudError::Other(msg) => write!(f, "Service error: {msg}"),
        }
    }
}

impl std::error::Error for CrudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrudError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<CrudError> for HttpError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::NotFound(msg) => HttpError::NotFound(msg),
            CrudError::Conflict(msg) => HttpError::Conflict(msg),
            CrudError::Database(e) => HttpError::Internal(e.to_string()),
            CrudError::Other(msg) => HttpError::Internal(msg),
        }
    }
}
