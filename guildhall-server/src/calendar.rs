use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json,
};
use guildhall_core::{timestamp_id, CalendarEvent};
use serde_json::Value;

use crate::{
    context::Context,
    errors::ServerResult,
    schemas::{NewEventSchema, ValidatedJson},
    serialized::Success,
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", delete(delete_event))
}

#[utoipa::path(
    get,
    path = "/api/calendar",
    tag = "calendar",
    responses(
        (status = 200, body = Vec<CalendarEvent>)
    )
)]
pub(crate) async fn list_events(State(context): Context) -> Json<Vec<CalendarEvent>> {
    Json(context.guildhall.collections.calendar().read().await)
}

#[utoipa::path(
    post,
    path = "/api/calendar",
    tag = "calendar",
    request_body = NewEventSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = CalendarEvent)
    )
)]
pub(crate) async fn create_event(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewEventSchema>,
) -> ServerResult<Json<CalendarEvent>> {
    let guildhall = &context.guildhall;
    let calendar = guildhall.collections.calendar();

    let event = CalendarEvent {
        id: timestamp_id(),
        title: body.title,
        event_type: body.event_type,
        date: body.date,
        time: body.time,
        description: body.description,
        raid_id: body.raid_id,
    };

    let mut events = calendar.read().await;
    events.push(event.clone());
    calendar.write(&events).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "EVENT_CREATED",
            format!("Event created: {}", event.title),
            serde_json::to_value(&event).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/calendar/{id}",
    tag = "calendar",
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Success)
    )
)]
pub(crate) async fn delete_event(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
) -> ServerResult<Json<Success>> {
    let guildhall = &context.guildhall;
    let calendar = guildhall.collections.calendar();

    let mut events = calendar.read().await;
    let removed = events.iter().find(|e| e.id == id).cloned();

    events.retain(|e| e.id != id);
    calendar.write(&events).await?;

    if let Some(event) = removed {
        guildhall
            .audit
            .record(
                session.username(),
                "EVENT_DELETED",
                format!("Event removed: {}", event.title),
                serde_json::to_value(&event).unwrap_or(Value::Null),
            )
            .await;
    }

    Ok(Json(Success::new()))
}
