//! Response shapes that are not stored documents.

use guildhall_core::Identity;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatus {
    pub configured: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthUrl {
    pub url: String,
}

/// Body of `/api/auth/me`: the session's identity, or null when anonymous.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUser {
    pub user: Option<Identity>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for Success {
    fn default() -> Self {
        Self::new()
    }
}
