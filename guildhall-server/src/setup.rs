use axum::{
    extract::State,
    routing::get,
    Json,
};
use guildhall_core::{GuildConfig, GuildInfo};
use serde_json::Value;

use crate::{
    context::Context,
    errors::ServerResult,
    schemas::{SetupSchema, ValidatedJson},
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new().route("/", get(read_config).post(save_config))
}

#[utoipa::path(
    get,
    path = "/api/config",
    tag = "config",
    responses(
        (status = 200, body = GuildConfig)
    )
)]
pub(crate) async fn read_config(State(context): Context) -> Json<GuildConfig> {
    Json(context.guildhall.collections.config().read().await)
}

#[utoipa::path(
    post,
    path = "/api/config",
    tag = "config",
    request_body = SetupSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = GuildConfig)
    )
)]
pub(crate) async fn save_config(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<SetupSchema>,
) -> ServerResult<Json<GuildConfig>> {
    let guildhall = &context.guildhall;

    let config = body.into_config();
    guildhall.collections.config().write(&config).await?;

    // Seed the profile document the guild page reads
    let guild = GuildInfo {
        name: config.name.clone(),
        faction: config.faction,
        version: config.version,
        ..Default::default()
    };
    guildhall.collections.guild().write(&guild).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "CONFIG_SAVED",
            format!("Guild setup saved: {}", config.name),
            serde_json::to_value(&config).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(config))
}
