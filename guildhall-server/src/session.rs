use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use guildhall_core::{Identity, Sessions};
use time::Duration;

use crate::{context::ServerContext, errors::ServerError};

/// Name of the http-only cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "guildhall_session";

/// A live session resolved from the session cookie.
///
/// Extracting it is the `requireAuthenticated` check: handlers that take a
/// [Session] (or [AdminSession]) are never entered without one.
pub struct Session {
    token: String,
    identity: Identity,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

#[async_trait]
impl FromRequestParts<ServerContext> for Session {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ServerError::Unauthorized)?;

        let identity = state
            .guildhall
            .sessions
            .identity(&token)
            .ok_or(ServerError::Unauthorized)?;

        Ok(Self { token, identity })
    }
}

/// A live session whose identity carries the admin flag.
pub struct AdminSession(Session);

impl AdminSession {
    pub fn identity(&self) -> &Identity {
        self.0.identity()
    }

    pub fn username(&self) -> &str {
        self.0.username()
    }
}

#[async_trait]
impl FromRequestParts<ServerContext> for AdminSession {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        if !session.identity.is_admin {
            return Err(ServerError::Forbidden);
        }

        Ok(Self(session))
    }
}

/// Builds the cookie handed out at the end of the OAuth callback.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(Sessions::DURATION_IN_DAYS))
        .build()
}

/// Cookie used to clear the session cookie on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
