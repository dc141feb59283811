use std::borrow::BorrowMut;

use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipauto::utoipauto;

use crate::session::SESSION_COOKIE;

#[utoipauto(paths = "./guildhall-server/src, ./guildhall-core/src from guildhall_core")]
#[derive(OpenApi)]
#[openapi(
    modifiers(&Security),
    info(
        description = "guildhall-server exposes the REST API consumed by the guild manager frontend"
    ))
]
pub struct ApiDoc;

struct Security;

impl Modify for Security {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.borrow_mut() {
            let scheme = SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE)));

            components.add_security_scheme("SessionCookie", scheme)
        }
    }
}

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
