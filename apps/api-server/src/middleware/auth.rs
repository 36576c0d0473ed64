//! Authentication extractors.
//!
//! `Identity` rejects the request with a 401 unless a valid Bearer token
//! is present. `OptionalIdentity` never rejects; listings and detail
//! pages use it so anonymous readers and logged-in authors share one
//! handler and differ only in what the visibility rules let them see.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse,
    dev::Payload,
    http::{StatusCode, header},
    web,
};
use std::future::{Ready, ready};
use std::sync::Arc;

use blogicum_core::domain::{STAFF_ROLE, Viewer};
use blogicum_core::ports::{AuthError, TokenClaims, TokenService};
use blogicum_shared::ErrorResponse;

/// The authenticated caller, as attested by their token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl Identity {
    /// The viewing principal this identity acts as.
    pub fn viewer(&self) -> Viewer {
        if self.roles.iter().any(|role| role == STAFF_ROLE) {
            Viewer::Staff(self.user_id)
        } else {
            Viewer::User(self.user_id)
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            authenticate(req)
                .map(Identity::from)
                .map_err(AuthenticationError),
        )
    }
}

/// Runs the whole handshake: locate the service, read the header, verify.
fn authenticate(req: &HttpRequest) -> Result<TokenClaims, AuthError> {
    let tokens = req
        .app_data::<web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("token service missing from app data");
            AuthError::InvalidToken("Token service unavailable".to_string())
        })?;

    tokens.validate_token(bearer_token(req)?)
}

/// Pulls the raw token out of `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| {
            AuthError::InvalidToken("Authorization header is not valid text".to_string())
        })?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Authorization scheme must be Bearer".to_string()))
}

/// Rendered as a 401 problem body, except for server-side surprises.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("The token has expired, log in again to get a fresh one."),
            AuthError::InvalidToken(message) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(message.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Send a Bearer token in the Authorization header."),
            _ => ErrorResponse::new(500, "Internal Server Error"),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Identity when a valid token was sent, anonymous otherwise.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn viewer(&self) -> Viewer {
        match &self.0 {
            Some(identity) => identity.viewer(),
            None => Viewer::Anonymous,
        }
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload).into_inner().ok();
        ready(Ok(OptionalIdentity(identity)))
    }
}
