use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::error::HttpError;

/// Trait representing an authenticated identity (user, service account, etc.).
///
/// Implement this trait on your identity type to decouple guards from a
/// concrete identity struct.
pub trait Identity: Send + Sync {
    /// Unique subject identifier.
    fn sub(&self) -> &str;

    /// Roles associated with this identity.
    fn roles(&self) -> &[String];

    /// Email associated with this identity, if available.
    fn email(&self) -> Option<&str> {
        None
    }
}

/// Sentinel type representing the absence of an identity.
pub struct NoIdentity;

impl Identity for NoIdentity {
    fn sub(&self) -> &str {
        ""
    }
    fn roles(&self) -> &[String] {
        &[]
    }
}

/// The identity attached to a request that passed the auth guard.
///
/// As an extractor it doubles as the guard itself: listing it as a handler
/// parameter makes the bearer-token check run before the handler body, and a
/// missing or invalid token short-circuits with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub roles: Vec<String>,
    pub email: Option<String>,
}

impl Identity for AuthenticatedUser {
    fn sub(&self) -> &str {
        &self.sub
    }
    fn roles(&self) -> &[String] {
        &self.roles
    }
    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Pre-handler authorization check: turns a bearer token into an identity.
///
/// The guard infrastructure is abstract over the verification scheme; a JWT
/// validator, an opaque-token introspector and [`StaticTokenVerifier`] are
/// all just implementations of this trait.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `TokenVerifier`",
    label = "this type cannot verify bearer tokens",
    note = "implement `TokenVerifier` for your type and expose it through `HasVerifier` on your state"
)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, HttpError>;
}

/// Trait for application states that expose a [`TokenVerifier`].
///
/// Implement this for your app state so the [`AuthenticatedUser`] extractor
/// can find the verifier:
///
/// ```ignore
/// impl HasVerifier for AppState {
///     fn verifier(&self) -> &dyn TokenVerifier {
///         self.verifier.as_ref()
///     }
/// }
/// ```
pub trait HasVerifier {
    fn verifier(&self) -> &dyn TokenVerifier;
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: HasVerifier + Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                HttpError::Unauthorized("Missing Authorization header".into()).into_response()
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            HttpError::Unauthorized("Expected a bearer token".into()).into_response()
        })?;

        state
            .verifier()
            .verify(token)
            .map_err(|err| err.into_response())
    }
}

/// A [`TokenVerifier`] backed by a fixed token-to-identity map.
///
/// Intended for demos and tests; production deployments plug in a real
/// verifier behind the same trait.
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token that resolves to an identity with the given subject
    /// and roles.
    pub fn with_token(mut self, token: &str, sub: &str, roles: &[&str]) -> Self {
        self.tokens.insert(
            token.to_string(),
            AuthenticatedUser {
                sub: sub.to_string(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
                email: None,
            },
        );
        self
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, HttpError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| HttpError::Unauthorized("Unknown token".into()))
    }
}
