use crate::{AppState, Error};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::error::Error as DomainError;
use domain::{user as UserApi, users, Id};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::*;
use serde::Deserialize;

pub(crate) const AUTH_JWT_SECRET_VAR: &str = "AUTH_JWT_SECRET";

/// The user behind the request's bearer token.
///
/// Tokens are HS256 JWTs issued by the external auth provider; `sub` holds the user id and
/// the user row must exist. The loaded user is cached in the request extensions, so
/// extracting it again in a handler after `require_auth` costs no database round trip.
pub(crate) struct AuthenticatedUser(pub users::Model);

#[derive(Debug, Deserialize)]
struct AuthClaims {
    sub: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn user_id_from_token(state: &AppState, token: &str) -> Result<Id, Error> {
    let secret = state
        .config
        .auth_jwt_secret()
        .ok_or_else(|| DomainError::config(AUTH_JWT_SECRET_VAR))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[state.config.auth_jwt_audience()]);

    let claims = decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| {
        debug!("Rejected bearer token: {err}");
        Error::Unauthorized
    })?
    .claims;

    Id::parse_str(&claims.sub).map_err(|_| {
        debug!("Bearer token subject is not a user id: {}", claims.sub);
        Error::Unauthorized
    })
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<users::Model>() {
            return Ok(AuthenticatedUser(user.clone()));
        }

        let token = bearer_token(parts).ok_or(Error::Unauthorized)?;
        let user_id = user_id_from_token(state, token)?;

        let user = match UserApi::find_by_id(state.db_conn_ref(), user_id).await {
            Ok(user) => user,
            Err(err) if err.is_not_found() => {
                warn!("Valid token for unknown user {user_id}");
                return Err(Error::Unauthorized);
            }
            Err(err) => return Err(err.into()),
        };
        trace!("Authenticated user {}", user.id);

        parts.extensions.insert(user.clone());
        Ok(AuthenticatedUser(user))
    }
}
