use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json,
};
use guildhall_core::{timestamp_id, Member};
use serde_json::{json, Value};

use crate::{
    context::Context,
    errors::{ServerError, ServerResult},
    schemas::{NewMemberSchema, UpdateMemberSchema, ValidatedJson},
    serialized::Success,
    session::AdminSession,
    Router,
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/:id", put(update_member).delete(delete_member))
}

#[utoipa::path(
    get,
    path = "/api/members",
    tag = "members",
    responses(
        (status = 200, body = Vec<Member>)
    )
)]
pub(crate) async fn list_members(State(context): Context) -> Json<Vec<Member>> {
    Json(context.guildhall.collections.members().read().await)
}

#[utoipa::path(
    post,
    path = "/api/members",
    tag = "members",
    request_body = NewMemberSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Member)
    )
)]
pub(crate) async fn create_member(
    session: AdminSession,
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewMemberSchema>,
) -> ServerResult<Json<Member>> {
    let guildhall = &context.guildhall;
    let members = guildhall.collections.members();

    let member = body.into_member(timestamp_id());

    let mut roster = members.read().await;
    roster.push(member.clone());
    members.write(&roster).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "MEMBER_CREATED",
            format!("Member added: {}", member.name),
            serde_json::to_value(&member).unwrap_or(Value::Null),
        )
        .await;

    Ok(Json(member))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "members",
    request_body = UpdateMemberSchema,
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Member),
        (status = 404, description = "No member with this id")
    )
)]
pub(crate) async fn update_member(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateMemberSchema>,
) -> ServerResult<Json<Member>> {
    let guildhall = &context.guildhall;
    let members = guildhall.collections.members();

    let mut roster = members.read().await;

    let (before, updated) = {
        let member = roster
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ServerError::NotFound { resource: "Member" })?;

        let before = member.clone();
        body.apply(member);

        (before, member.clone())
    };

    members.write(&roster).await?;

    guildhall
        .audit
        .record(
            session.username(),
            "MEMBER_UPDATED",
            format!("Member updated: {}", updated.name),
            json!({ "old": before, "new": updated }),
        )
        .await;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "members",
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Success)
    )
)]
pub(crate) async fn delete_member(
    session: AdminSession,
    State(context): Context,
    Path(id): Path<String>,
) -> ServerResult<Json<Success>> {
    let guildhall = &context.guildhall;
    let members = guildhall.collections.members();

    let mut roster = members.read().await;
    let removed = roster.iter().find(|m| m.id == id).cloned();

    roster.retain(|m| m.id != id);
    members.write(&roster).await?;

    if let Some(member) = removed {
        guildhall
            .audit
            .record(
                session.username(),
                "MEMBER_DELETED",
                format!("Member removed: {}", member.name),
                serde_json::to_value(&member).unwrap_or(Value::Null),
            )
            .await;
    }

    Ok(Json(Success::new()))
}
