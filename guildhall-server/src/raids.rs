use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json,
};
use guildhall_core::{timestamp_id, CalendarEvent, EventType, Raid};
use serde_json::{json, Value};

use crate::{
    context::Context,
    errors::{ServerError, ServerResult},
    schemas::{NewRaidSchema, UpdateRaidSchema, ValidatedJson},
    serialized::Success,
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_raids).post(create_raid))
        .route("/:id", put(update_raid).delete(delete_raid))
}

/// The calendar entry mirroring a scheduled raid.
fn mirror_event(raid: &Raid) -> CalendarEvent {
    CalendarEvent {
        id: format!("cal-{}", raid.id),
        title: raid.name.clone(),
        event_type: EventType::Raid,
        date: raid.date.clone(),
        time: Some(raid.time.clone()),
        description: None,
        raid_id: Some(raid.id.clone()),
    }
}

#[utoipa::path(
    get,
    path = "/api/raids",
    tag = "raids",
    responses(
        (status = 200, body = Vec<Raid>)
    )
)]
pub(crate) async fn list_raids(State(context): Context) -> Json<Vec<Raid>> {
    Json(context.guildhall.collections.raids().read().await)
}

#[utoipa::path(
    post,
    path = "/api/raids",
    tag = "raids",
    request_body = NewRaidSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Raid)
    )
)]
pub(crate) async fn create_raid(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewRaidSchema>,
) -> ServerResult<Json<Raid>> {
    let guildhall = &context.guildhall;
    let raids = guildhall.collections.raids();
    let calendar = guildhall.collections.calendar();

    let raid = body.into_raid(timestamp_id());

    let mut scheduled = raids.read().await;
    scheduled.push(raid.clone());
    raids.write(&scheduled).await?;

    let mut events = calendar.read().await;
    events.push(mirror_event(&raid));
    calendar.write(&events).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "RAID_CREATED",
            format!("Raid scheduled: {}", raid.name),
            serde_json::to_value(&raid).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(raid))
}

#[utoipa::path(
    put,
    path = "/api/raids/{id}",
    tag = "raids",
    request_body = UpdateRaidSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Raid),
        (status = 404, description = "No raid with this id")
    )
)]
pub(crate) async fn update_raid(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateRaidSchema>,
) -> ServerResult<Json<Raid>> {
    let guildhall = &context.guildhall;
    let raids = guildhall.collections.raids();

    let mut scheduled = raids.read().await;

    let (before, updated) = {
        let raid = scheduled
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ServerError::NotFound { resource: "Raid" })?;

        let before = raid.clone();
        body.apply(raid);

        (before, raid.clone())
    };

    raids.write(&scheduled).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "RAID_UPDATED",
            format!("Raid updated: {}", updated.instance),
            json!({ "old": before, "new": updated }),
        )
        .await;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/raids/{id}",
    tag = "raids",
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Success)
    )
)]
pub(crate) async fn delete_raid(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
) -> ServerResult<Json<Success>> {
    let guildhall = &context.guildhall;
    let raids = guildhall.collections.raids();
    let calendar = guildhall.collections.calendar();

    let mut scheduled = raids.read().await;
    let removed = scheduled.iter().find(|r| r.id == id).cloned();

    scheduled.retain(|r| r.id != id);
    raids.write(&scheduled).await?;

    // The mirrored entry goes with the raid, leaving no orphans behind
    let mut events = calendar.read().await;
    events.retain(|e| e.raid_id.as_deref() != Some(id.as_str()));
    calendar.write(&events).await?;

    if let Some(raid) = removed {
        guildhall
            .audit
            .record(
                session.username(),
                "RAID_DELETED",
                format!("Raid removed: {}", raid.name),
                serde_json::to_value(&raid).unwrap_or(Value::Null),
            )
            .await;
    }

    Ok(Json(Success::new()))
}
