use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated salon owner for a dashboard request.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub salon_id: String,
}

/// Resolves a bearer token to the salon that owns it.
pub fn resolve(state: &AppState, token: &str) -> Result<Session, AppError> {
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    let salon = {
        let db = state.conn()?;
        queries::get_salon_by_token(&db, token)?
    };

    salon
        .map(|s| Session { salon_id: s.id })
        .ok_or(AppError::Unauthorized)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or("");

        resolve(state, token)
    }
}
