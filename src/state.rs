use std::sync::Arc;

use crate::db::OrmConn;

/// Per-request handle to everything a service call needs. Cloned into each
/// handler by axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(orm: OrmConn, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            orm,
            jwt_secret: jwt_secret.into(),
        }
    }
}
