//! Bearer-token authentication and claim-based authorization.
//!
//! [`authenticate`] runs for every request and, when a valid JWT is presented,
//! attaches its [`Claims`] to the request. Handlers then declare what they need
//! through the [`AuthUser`], [`AdminUser`] or [`MaybeUser`] extractors, which
//! inspect the attached claims before the handler body runs.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppState, error::AppError};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self { decoding: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

/// Attaches the caller's claims when the bearer token verifies. Missing or invalid
/// tokens leave the request anonymous; the extractors decide whether that is allowed.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(Authorization(bearer)) = req.headers().typed_get::<Authorization<Bearer>>() {
        match state.jwt.decode(bearer.token()) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            },
            Err(err) => debug!(error = %err, "rejected bearer token"),
        }
    }
    next.run(req).await
}

/// Caller claims when authenticated, `None` for anonymous callers.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Claims>().cloned()))
    }
}

/// Any authenticated caller.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Claims>().cloned().map(Self).ok_or(AppError::Unauthorized)
    }
}

/// An authenticated caller holding the admin role claim.
#[derive(Clone, Debug)]
pub struct AdminUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if claims.is_admin() { Ok(Self(claims)) } else { Err(AppError::Forbidden) }
    }
}

#[cfg(test)]
pub(crate) fn sign(secret: &str, claims: &Claims) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("sign test token")
}
