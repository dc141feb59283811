use axum::{
    extract::State,
    routing::get,
    Json,
};
use guildhall_core::{timestamp_id, CalendarEvent, Dungeon, EventType};
use serde_json::Value;

use crate::{
    context::Context,
    errors::ServerResult,
    schemas::{NewDungeonSchema, ValidatedJson},
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new().route("/", get(list_dungeons).post(create_dungeon))
}

#[utoipa::path(
    get,
    path = "/api/dungeons",
    tag = "dungeons",
    responses(
        (status = 200, body = Vec<Dungeon>)
    )
)]
pub(crate) async fn list_dungeons(State(context): Context) -> Json<Vec<Dungeon>> {
    Json(context.guildhall.collections.dungeons().read().await)
}

#[utoipa::path(
    post,
    path = "/api/dungeons",
    tag = "dungeons",
    request_body = NewDungeonSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Dungeon)
    )
)]
pub(crate) async fn create_dungeon(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewDungeonSchema>,
) -> ServerResult<Json<Dungeon>> {
    let guildhall = &context.guildhall;
    let dungeons = guildhall.collections.dungeons();
    let calendar = guildhall.collections.calendar();

    let dungeon = body.into_dungeon(timestamp_id());

    let mut runs = dungeons.read().await;
    runs.push(dungeon.clone());
    dungeons.write(&runs).await?;

    let mut events = calendar.read().await;
    events.push(CalendarEvent {
        id: format!("cal-{}", dungeon.id),
        title: dungeon.name.clone(),
        event_type: EventType::Donjon,
        date: dungeon.date.clone(),
        time: Some(dungeon.time.clone()),
        description: None,
        raid_id: None,
    });
    calendar.write(&events).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "DUNGEON_CREATED",
            format!("Dungeon scheduled: {}", dungeon.name),
            serde_json::to_value(&dungeon).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(dungeon))
}
