use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json,
};
use guildhall_core::{timestamp_id, Loot};
use serde_json::{json, Value};

use crate::{
    context::Context,
    errors::{ServerError, ServerResult},
    schemas::{NewLootSchema, UpdateLootSchema, ValidatedJson},
    serialized::Success,
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_loot).post(create_loot))
        .route("/member/:id", get(member_loot))
        .route("/:id", put(update_loot).delete(delete_loot))
}

#[utoipa::path(
    get,
    path = "/api/loot",
    tag = "loot",
    responses(
        (status = 200, body = Vec<Loot>)
    )
)]
pub(crate) async fn list_loot(State(context): Context) -> Json<Vec<Loot>> {
    Json(context.guildhall.collections.loot().read().await)
}

#[utoipa::path(
    get,
    path = "/api/loot/member/{id}",
    tag = "loot",
    responses(
        (status = 200, body = Vec<Loot>)
    )
)]
pub(crate) async fn member_loot(State(context): Context, Path(id): Path<String>) -> Json<Vec<Loot>> {
    let mut loot = context.guildhall.collections.loot().read().await;
    loot.retain(|l| l.assigned_to == id);

    Json(loot)
}

#[utoipa::path(
    post,
    path = "/api/loot",
    tag = "loot",
    request_body = NewLootSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Loot)
    )
)]
pub(crate) async fn create_loot(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewLootSchema>,
) -> ServerResult<Json<Loot>> {
    let guildhall = &context.guildhall;
    let loot = guildhall.collections.loot();

    let item = body.into_loot(timestamp_id());

    let mut assigned = loot.read().await;
    assigned.push(item.clone());
    loot.write(&assigned).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "LOOT_CREATED",
            format!("Loot added: {}", item.item_name),
            serde_json::to_value(&item).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/api/loot/{id}",
    tag = "loot",
    request_body = UpdateLootSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Loot),
        (status = 404, description = "No loot with this id")
    )
)]
pub(crate) async fn update_loot(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateLootSchema>,
) -> ServerResult<Json<Loot>> {
    let guildhall = &context.guildhall;
    let loot = guildhall.collections.loot();

    let mut assigned = loot.read().await;

    let (before, updated) = {
        let item = assigned
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(ServerError::NotFound { resource: "Loot" })?;

        let before = item.clone();
        body.apply(item);

        (before, item.clone())
    };

    loot.write(&assigned).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "LOOT_UPDATED",
            format!("Loot updated: {}", updated.item_name),
            json!({ "old": before, "new": updated }),
        )
        .await;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/loot/{id}",
    tag = "loot",
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Success)
    )
)]
pub(crate) async fn delete_loot(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
) -> ServerResult<Json<Success>> {
    let guildhall = &context.guildhall;
    let loot = guildhall.collections.loot();

    let mut assigned = loot.read().await;
    let removed = assigned.iter().find(|l| l.id == id).cloned();

    assigned.retain(|l| l.id != id);
    loot.write(&assigned).await?;

    if let Some(item) = removed {
        guildhall
            .audit
            .record(
                session.username(),
                "LOOT_DELETED",
                format!("Loot removed: {}", item.item_name),
                serde_json::to_value(&item).unwrap_or(Value::Null),
            )
            .await;
    }

    Ok(Json(Success::new()))
}
