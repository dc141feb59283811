use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use guildhall_core::{DiscordError, Guildhall, Identity, UNKNOWN_ACTOR};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    context::Context,
    errors::ServerResult,
    serialized::{AuthStatus, AuthUrl, CurrentUser, Success},
    session::{removal_cookie, session_cookie, Session},
    Router,
};

pub fn router() -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/discord", get(discord_url))
        .route("/discord/callback", get(discord_callback))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "auth",
    responses(
        (status = 200, body = AuthStatus)
    )
)]
pub(crate) async fn status(State(context): Context) -> Json<AuthStatus> {
    let configured = context.guildhall.discord.is_configured();

    let message = if configured {
        "Discord OAuth configured"
    } else {
        "Discord OAuth NOT configured - set the DISCORD_* environment variables"
    };

    Json(AuthStatus {
        configured,
        message: message.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/auth/discord",
    tag = "auth",
    responses(
        (status = 200, body = AuthUrl),
        (status = 503, description = "Discord OAuth is not configured")
    )
)]
pub(crate) async fn discord_url(State(context): Context) -> ServerResult<Json<AuthUrl>> {
    let url = context.guildhall.discord.authorize_url()?;

    Ok(Json(AuthUrl { url }))
}

#[derive(Debug, Deserialize, IntoParams)]
struct CallbackQuery {
    code: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/auth/discord/callback",
    tag = "auth",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Session started, redirecting to the frontend")
    )
)]
pub(crate) async fn discord_callback(
    State(context): Context,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> (CookieJar, Redirect) {
    let guildhall = &context.guildhall;
    let frontend = &guildhall.config.frontend_url;

    let Some(code) = query.code else {
        return (jar, Redirect::to(&format!("{frontend}?error=no_code")));
    };

    match login(guildhall, &code).await {
        Ok(token) => {
            let cookie = session_cookie(token, guildhall.config.production);

            (jar.add(cookie), Redirect::to(frontend))
        }
        Err(e) => {
            error!("Discord login failed: {e}");

            (jar, Redirect::to(&format!("{frontend}?error=auth_failed")))
        }
    }
}

/// Runs the whole login: code exchange, profile + role lookup, session start.
async fn login(guildhall: &Guildhall, code: &str) -> Result<String, DiscordError> {
    let access_token = guildhall.discord.exchange_code(code).await?;
    let user = guildhall.discord.fetch_user(&access_token).await?;

    info!("{} logged in (admin: {})", user.username, user.is_admin);

    let identity = Identity {
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    };

    Ok(guildhall.sessions.start(identity))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, body = CurrentUser)
    )
)]
pub(crate) async fn me(session: Option<Session>) -> Json<CurrentUser> {
    Json(CurrentUser {
        user: session.map(Session::into_identity),
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, body = Success)
    )
)]
pub(crate) async fn logout(
    State(context): Context,
    jar: CookieJar,
    session: Option<Session>,
) -> (CookieJar, Json<Success>) {
    let guildhall = &context.guildhall;

    let username = session
        .as_ref()
        .map(|s| s.username().to_string())
        .unwrap_or_else(|| UNKNOWN_ACTOR.to_string());

    guildhall
        .audit
        .record(&username, "LOGOUT", format!("{username} logged out"), json!({}))
        .await;

    if let Some(session) = session {
        guildhall.sessions.end(session.token());
    }

    (jar.remove(removal_cookie()), Json(Success::new()))
}
