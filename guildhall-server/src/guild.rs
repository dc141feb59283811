use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::get,
    Json,
};
use guildhall_core::{GuildInfo, Member};
use serde_json::Value;

use crate::{
    context::Context,
    errors::ServerResult,
    schemas::{UpdateGuildSchema, ValidatedJson},
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new().route("/", get(overview).put(update_guild))
}

#[utoipa::path(
    get,
    path = "/api/guild",
    tag = "guild",
    responses(
        (status = 200, body = GuildInfo)
    )
)]
pub(crate) async fn overview(State(context): Context) -> Json<GuildInfo> {
    let collections = &context.guildhall.collections;

    let info = collections.guild().read().await;
    let members = collections.members().read().await;

    Json(with_distributions(info, &members))
}

#[utoipa::path(
    put,
    path = "/api/guild",
    tag = "guild",
    request_body = UpdateGuildSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = GuildInfo)
    )
)]
pub(crate) async fn update_guild(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<UpdateGuildSchema>,
) -> ServerResult<Json<GuildInfo>> {
    let guildhall = &context.guildhall;
    let guild = guildhall.collections.guild();

    let mut info = guild.read().await;
    body.apply(&mut info);
    guild.write(&info).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "GUILD_UPDATED",
            format!("Guild profile updated: {}", info.name),
            serde_json::to_value(&info).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(info))
}

/// Overlays the stored profile with counts derived from the live roster.
fn with_distributions(mut info: GuildInfo, members: &[Member]) -> GuildInfo {
    let mut classes = BTreeMap::new();
    let mut roles = BTreeMap::new();

    for member in members {
        *classes.entry(member.class).or_insert(0) += 1;
        *roles.entry(member.role).or_insert(0) += 1;
    }

    info.member_count = members.len();
    info.class_distribution = classes;
    info.role_distribution = roles;

    info
}
