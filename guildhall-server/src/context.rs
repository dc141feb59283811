use std::sync::Arc;

use axum::extract::{FromRef, State};
use guildhall_core::Guildhall;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub guildhall: Arc<Guildhall>,
}

/// Extractor alias used by every handler.
pub type Context = State<ServerContext>;
