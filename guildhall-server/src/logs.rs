use axum::{extract::State, routing::get, Json};
use guildhall_core::LogEntry;

use crate::{context::Context, session::AdminSession, Router};

pub fn router() -> Router {
    Router::new().route("/", get(list_logs))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "logs",
    security(
        ("SessionCookie" = [])
    ),
    responses(
        (status = 200, body = Vec<LogEntry>)
    )
)]
pub(crate) async fn list_logs(_session: AdminSession, State(context): Context) -> Json<Vec<LogEntry>> {
    Json(context.guildhall.audit.entries().await)
}
